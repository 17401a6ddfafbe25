//! # powersim_core: Synthetic Data for Statistical-Power Studies
//!
//! Generates datasets whose ground-truth parameters are known, so that a later
//! power analysis can compare a test's outcomes against the truth.
//!
//! ## Layout
//!
//! - `types`: bounds (`Bound`), realized parameters, sample collections and
//!   errors
//! - `rng`: the seeded stream every draw consumes (`SimRng`)
//! - `generators`: location, linear-relationship and distance-matrix families
//!   and the group-size policy
//! - `distance`: the `DistanceMatrix` type and the distance-test wrapper
//! - `effect`: ground-truth effect sizes of generated samples
//! - `registry`: named families with fixed Bound configurations
//! - `runner`: repeated rounds per family, handed to a `RecordSink`
//!
//! ## Reproducibility
//!
//! One stream is seeded once. Generators never create their own randomness,
//! and every generator documents the order of its draws, so the same seed and
//! the same registry reproduce every record bit for bit.
//!
//! ## Usage Examples
//!
//! ```rust
//! use powersim_core::prelude::*;
//!
//! let registry = Registry::builtin()
//!     .and_then(|r| r.select(&["ttest_1", "permanova"]))
//!     .unwrap();
//! let runner = Runner::new(registry, 3).unwrap();
//!
//! let mut rng = SimRng::from_seed(42);
//! let mut sink = MemorySink::new();
//! let summary = runner.run(&mut rng, &mut sink).unwrap();
//! assert_eq!(summary.total_records(), 6);
//!
//! let record = sink.get("ttest_1", 0).unwrap();
//! assert_eq!(record.params.num_groups(), 1);
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod distance;
pub mod effect;
pub mod generators;
pub mod registry;
pub mod rng;
pub mod runner;
pub mod types;

/// Commonly used items.
pub mod prelude {
    pub use crate::distance::{distance_p_value, DistanceMatrix, DistanceTest, TestOutcome};
    pub use crate::effect::record_effect_size;
    pub use crate::registry::{FamilyConfig, Registry, RegistryEntry};
    pub use crate::rng::SimRng;
    pub use crate::runner::{MemorySink, RecordSink, RunSummary, Runner};
    pub use crate::types::{Bound, RealizedParams, Result, Samples, SimError, SimulationRecord};
}
