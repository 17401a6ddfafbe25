//! Synthetic data generators.
//!
//! Each generator takes its Bound configuration and a random stream, draws
//! the realized parameters, then synthesises observations from them:
//!
//! - [`location`]: one-sample, two-sample, k-group, lognormal and uniform
//! - [`relationship`]: linear predictor/response pairs
//! - [`distance`]: PERMANOVA-style grouped matrices and Mantel-style pairs
//! - [`groups`]: the group-size policy shared by all of the above
//!
//! Generators are generic over `R: Rng + ?Sized` and never create their own
//! stream, so one seeded stream threads through a whole run.

use crate::types::{Result, SimError};

pub mod distance;
pub mod groups;
pub mod location;
pub mod relationship;

pub use distance::{mantel, permanova, PermanovaConfig};
pub use groups::{binomial_split, equal_group_sizes, MIN_SPLIT_GROUP_SIZE};
pub use location::{
    k_group, lognormal, one_sample, two_sample, uniform, KGroupConfig, NormalConfig,
    UniformConfig,
};
pub use relationship::{linear, LinearConfig};

/// Passes `value` through, or fails with `InvalidBound` when a draw overflowed.
pub(crate) fn require_finite(value: f64, what: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimError::InvalidBound(format!(
            "{} drew a non-finite value ({}); narrow its bounds",
            what, value
        )))
    }
}
