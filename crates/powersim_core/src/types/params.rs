//! Realized parameters: the ground truth drawn for one generator call.

use serde::{Deserialize, Serialize};

/// Distribution family the observations were drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleDistribution {
    /// Normal with the group's location as mean and scale as standard deviation.
    Normal,
    /// Log-normal; location and scale are the mean and standard deviation of
    /// the underlying normal.
    LogNormal,
    /// Uniform on `[location - scale, location + scale]`.
    Uniform,
}

impl SampleDistribution {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::LogNormal => "lognormal",
            Self::Uniform => "uniform",
        }
    }
}

/// Location, scale and size drawn for one group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupParams {
    /// Mean (normal, lognormal) or centre (uniform).
    pub location: f64,
    /// Standard deviation (normal, lognormal) or half-width (uniform).
    pub scale: f64,
    /// Number of observations.
    pub count: usize,
}

/// Parameters of a linear model `y = slope * x + intercept + N(0, sigma)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearParams {
    /// Number of observations (or of samples, for distance matrices).
    pub count: usize,
    /// Slope `m`.
    pub slope: f64,
    /// Intercept `b`.
    pub intercept: f64,
    /// Noise standard deviation.
    pub sigma: f64,
    /// Predictor range `[lo, hi]` the predictor was drawn from.
    pub x_range: [f64; 2],
}

/// Centre and spread of a distance distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceParams {
    /// Centre of the distance distribution.
    pub center: f64,
    /// Standard deviation around the centre.
    pub spread: f64,
}

/// Parameters of a two-group distance structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermanovaParams {
    /// Total number of samples.
    pub num_samples: usize,
    /// Distances between samples of the same group.
    pub within: DistanceParams,
    /// Distances between samples of different groups.
    pub between: DistanceParams,
    /// Sample identifiers of each group, group 1 first.
    pub groups: Vec<Vec<String>>,
}

impl PermanovaParams {
    /// Sizes of the groups, in order.
    pub fn group_sizes(&self) -> Vec<usize> {
        self.groups.iter().map(Vec::len).collect()
    }

    /// Zero-based group index of `id`, if present.
    pub fn group_of(&self, id: &str) -> Option<usize> {
        self.groups
            .iter()
            .position(|members| members.iter().any(|m| m == id))
    }
}

/// Every value drawn for one generator call.
///
/// Immutable once produced; downstream power analysis compares test outcomes
/// against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RealizedParams {
    /// One or more independent groups from a location family.
    Location {
        /// Distribution the observations came from.
        distribution: SampleDistribution,
        /// Per-group parameters, in sample order.
        groups: Vec<GroupParams>,
    },
    /// Predictor/response pair under a linear model.
    Linear(LinearParams),
    /// Two-group distance structure.
    Permanova(PermanovaParams),
    /// Predictor/response distance structures under a linear model.
    Mantel(LinearParams),
}

impl RealizedParams {
    /// Number of groups (1 for relationship families).
    pub fn num_groups(&self) -> usize {
        match self {
            Self::Location { groups, .. } => groups.len(),
            Self::Permanova(p) => p.groups.len(),
            Self::Linear(_) | Self::Mantel(_) => 1,
        }
    }

    /// Kind tag, as serialised.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Location { .. } => "location",
            Self::Linear(_) => "linear",
            Self::Permanova(_) => "permanova",
            Self::Mantel(_) => "mantel",
        }
    }
}
