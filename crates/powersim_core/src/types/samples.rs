//! Sample collections and the persisted simulation record.

use serde::{Deserialize, Serialize};

use super::params::RealizedParams;
use crate::distance::DistanceMatrix;

/// Synthesised observations returned alongside [`RealizedParams`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Samples {
    /// A single sequence (one-sample families).
    Single(Vec<f64>),
    /// One sequence per group (two-sample and k-group families).
    Groups(Vec<Vec<f64>>),
    /// Predictor and response sequences of equal length.
    Paired {
        /// Predictor values.
        x: Vec<f64>,
        /// Response values.
        y: Vec<f64>,
    },
    /// One distance structure over grouped samples.
    Distance(DistanceMatrix),
    /// Predictor and response distance structures over the same samples.
    DistancePair {
        /// Predictor distances.
        x: DistanceMatrix,
        /// Response distances.
        y: DistanceMatrix,
    },
}

impl Samples {
    /// Shape name used in errors and logs.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Single(_) => "single",
            Self::Groups(_) => "groups",
            Self::Paired { .. } => "paired",
            Self::Distance(_) => "distance",
            Self::DistancePair { .. } => "distance_pair",
        }
    }

    /// Total number of observations (or samples, for distance structures).
    pub fn num_observations(&self) -> usize {
        match self {
            Self::Single(v) => v.len(),
            Self::Groups(groups) => groups.iter().map(Vec::len).sum(),
            Self::Paired { x, .. } => x.len(),
            Self::Distance(d) => d.len(),
            Self::DistancePair { x, .. } => x.len(),
        }
    }
}

/// One persisted unit: the realized parameters and the data they produced.
///
/// Written once per (family, round) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRecord {
    /// Ground-truth parameters.
    pub params: RealizedParams,
    /// Synthesised data.
    pub samples: Samples,
}

impl SimulationRecord {
    /// Pairs parameters with samples.
    pub fn new(params: RealizedParams, samples: Samples) -> Self {
        Self { params, samples }
    }
}
