//! Pass-through wrapper around an external distance-matrix permutation test.
//!
//! The test itself (PERMANOVA, Mantel, ...) is supplied by the caller through
//! [`DistanceTest`]. Such routines disagree on what they return: a named
//! record, a `(statistic, p-value, permutations)` sequence, or a bare p-value.
//! [`TestOutcome::p_value`] reduces all three to one scalar.

use std::collections::BTreeMap;

use tracing::debug;

use super::matrix::DistanceMatrix;
use crate::types::{RealizedParams, Result, Samples, SimError, SimulationRecord};

/// Keys recognised as the p-value in a named record, in lookup order.
const P_VALUE_KEYS: [&str; 4] = ["p-value", "p_value", "pvalue", "p"];

/// Raw result of an external distance test.
#[derive(Debug, Clone, PartialEq)]
pub enum TestOutcome {
    /// Named fields, e.g. `{"test statistic": 4.2, "p-value": 0.01}`.
    Record(BTreeMap<String, f64>),
    /// Positional values; a single value is the p-value, otherwise the
    /// layout is `(statistic, p-value, ...)`.
    Sequence(Vec<f64>),
    /// The p-value itself.
    Scalar(f64),
}

impl TestOutcome {
    /// Extracts the p-value, failing with `UnsupportedResultShape` if none can
    /// be found or it is not a probability.
    pub fn p_value(&self) -> Result<f64> {
        let p = match self {
            Self::Record(fields) => P_VALUE_KEYS
                .iter()
                .find_map(|key| fields.get(*key).copied())
                .ok_or_else(|| {
                    SimError::UnsupportedResultShape(format!(
                        "record has no p-value field (fields: {:?})",
                        fields.keys().collect::<Vec<_>>()
                    ))
                })?,
            Self::Sequence(values) => match values.as_slice() {
                [] => {
                    return Err(SimError::UnsupportedResultShape(
                        "empty result sequence".to_string(),
                    ))
                }
                [p] => *p,
                [_, p, ..] => *p,
            },
            Self::Scalar(p) => *p,
        };

        if (0.0..=1.0).contains(&p) {
            Ok(p)
        } else {
            Err(SimError::UnsupportedResultShape(format!(
                "p-value {} is not a probability",
                p
            )))
        }
    }
}

/// Data handed to a distance test.
#[derive(Debug, Clone, PartialEq)]
pub enum DistanceTestInput<'a> {
    /// One matrix with a group label per row (PERMANOVA-style).
    Grouped {
        /// Distances between samples.
        matrix: &'a DistanceMatrix,
        /// Zero-based group index of each row.
        grouping: Vec<usize>,
    },
    /// Two matrices over the same samples (Mantel-style).
    Paired {
        /// Predictor distances.
        x: &'a DistanceMatrix,
        /// Response distances.
        y: &'a DistanceMatrix,
    },
}

impl<'a> DistanceTestInput<'a> {
    /// Builds the test input from a distance-based simulation record.
    ///
    /// Grouped input takes its labels from the record's realized group
    /// membership; every matrix row must belong to exactly one group.
    pub fn from_record(record: &'a SimulationRecord) -> Result<Self> {
        match (&record.params, &record.samples) {
            (RealizedParams::Permanova(params), Samples::Distance(matrix)) => {
                let grouping = matrix
                    .ids()
                    .iter()
                    .map(|id| {
                        params.group_of(id).ok_or_else(|| {
                            SimError::InvalidDistance(format!("sample '{}' has no group", id))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self::Grouped { matrix, grouping })
            }
            (_, Samples::DistancePair { x, y }) => {
                if x.ids() != y.ids() {
                    return Err(SimError::InvalidDistance(
                        "paired matrices are indexed by different samples".to_string(),
                    ));
                }
                Ok(Self::Paired { x, y })
            }
            (_, other) => Err(SimError::IncompatibleSamples {
                expected: "distance or distance_pair",
                actual: other.shape(),
            }),
        }
    }
}

/// An external distance-matrix permutation test.
pub trait DistanceTest {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Runs the test and returns its raw result.
    fn run(&self, input: &DistanceTestInput<'_>) -> Result<TestOutcome>;
}

/// Runs `test` on a distance-based record and returns its p-value.
pub fn distance_p_value<T>(test: &T, record: &SimulationRecord) -> Result<f64>
where
    T: DistanceTest + ?Sized,
{
    let input = DistanceTestInput::from_record(record)?;
    let outcome = test.run(&input)?;
    let p = outcome.p_value()?;
    debug!(test = test.name(), p_value = p, "Distance test completed");
    Ok(p)
}
