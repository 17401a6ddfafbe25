//! Error types for structured error handling.
//!
//! Every generator either returns a complete record or fails with a
//! [`SimError`]. There is no partially populated result.

use thiserror::Error;

/// Categorised simulation errors.
///
/// # Variants
/// - `InvalidBound`: a bound has `lo > hi`, is not finite, or violates a
///   positivity requirement
/// - `DegenerateGroup`: a group size falls below the minimum the family needs
/// - `UnsupportedResultShape`: a distance-test result has no p-value to extract
/// - `InvalidConfig`: registry or runner configuration is unusable
/// - `InvalidDistance`: a matrix breaks the distance-structure invariants
/// - `IncompatibleSamples`: a record does not carry the data an operation needs
/// - `Persistence`: a record sink failed to store a record
/// - `Round`: any of the above, tagged with the family and round that failed
///
/// # Examples
/// ```
/// use powersim_core::types::SimError;
///
/// let err = SimError::InvalidBound("sigma_lim: lo 2 > hi 1".to_string());
/// assert_eq!(format!("{}", err), "Invalid bound: sigma_lim: lo 2 > hi 1");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Bound is inverted, non-finite, or breaks a sign requirement.
    #[error("Invalid bound: {0}")]
    InvalidBound(String),

    /// A computed group size is below the required minimum.
    #[error("Degenerate group: {reason} (got {got}, need at least {need})")]
    DegenerateGroup {
        /// What was being sized
        reason: String,
        /// Size that was produced or requested
        got: usize,
        /// Minimum acceptable size
        need: usize,
    },

    /// A distance-test result could not be normalised to a scalar p-value.
    #[error("Unsupported result shape: {0}")]
    UnsupportedResultShape(String),

    /// Registry or runner configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A matrix is not square, symmetric, zero-diagonal and non-negative.
    #[error("Invalid distance matrix: {0}")]
    InvalidDistance(String),

    /// The sample collection has the wrong shape for the requested operation.
    #[error("Incompatible samples: expected {expected}, got {actual}")]
    IncompatibleSamples {
        /// Shape the operation needs
        expected: &'static str,
        /// Shape that was supplied
        actual: &'static str,
    },

    /// A record sink failed to store a record.
    #[error("Persistence failure: {0}")]
    Persistence(String),

    /// A round failed; wraps the underlying cause.
    #[error("Round {round} of family '{family}' failed: {source}")]
    Round {
        /// Family name
        family: String,
        /// Zero-based round index
        round: usize,
        /// Underlying failure
        #[source]
        source: Box<SimError>,
    },
}

impl SimError {
    /// Create a degenerate-group error.
    pub fn degenerate(reason: impl Into<String>, got: usize, need: usize) -> Self {
        Self::DegenerateGroup {
            reason: reason.into(),
            got,
            need,
        }
    }

    /// Wrap an error with the family and round it occurred in.
    pub fn in_round(self, family: &str, round: usize) -> Self {
        Self::Round {
            family: family.to_string(),
            round,
            source: Box::new(self),
        }
    }
}

/// Result alias for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;
