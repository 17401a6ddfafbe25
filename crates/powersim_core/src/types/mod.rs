//! Core data model: bounds, realized parameters, samples and errors.

pub mod bound;
pub mod error;
pub mod params;
pub mod samples;

pub use bound::{Bound, BoundValue};
pub use error::{Result, SimError};
pub use params::{
    DistanceParams, GroupParams, LinearParams, PermanovaParams, RealizedParams,
    SampleDistribution,
};
pub use samples::{Samples, SimulationRecord};
