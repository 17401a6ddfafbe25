//! Distance structures and the distance-test wrapper.
//!
//! - [`matrix`]: the [`DistanceMatrix`] type and its invariants
//! - [`wrapper`]: normalises an external permutation test's result to a
//!   scalar p-value

pub mod matrix;
pub mod wrapper;

pub use matrix::{sample_ids, DistanceMatrix};
pub use wrapper::{distance_p_value, DistanceTest, DistanceTestInput, TestOutcome};
