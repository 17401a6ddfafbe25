//! Distance-matrix generators.
//!
//! [`permanova`] builds one grouped dissimilarity matrix whose within-group
//! and between-group distances come from separate distributions.
//! [`mantel`] builds a predictor matrix from latent 1-D coordinates and a
//! response matrix that is a noisy linear function of it.
//!
//! Every pairwise draw is clipped at zero.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use super::groups::binomial_split;
use super::relationship::{LinearConfig, LinearModel};
use crate::distance::{sample_ids, DistanceMatrix};
use crate::types::{
    Bound, DistanceParams, PermanovaParams, RealizedParams, Result, Samples, SimError,
    SimulationRecord,
};

/// Smallest matrix with at least one pairwise distance.
const MIN_DISTANCE_SAMPLES: usize = 2;

/// Bounds for the grouped (PERMANOVA) family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermanovaConfig {
    /// Fixed total number of samples.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_samples: Option<usize>,
    /// Bound the total number of samples is drawn from when it is not fixed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_lim: Option<Bound<usize>>,
    /// Fixed size of group 2. Drawn from a binomial split when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group2: Option<usize>,
    /// Bound for the within-group distance centre.
    pub wdist: Bound<f64>,
    /// Bound for the within-group spread.
    pub wspread: Bound<f64>,
    /// Bound for the between-group distance centre.
    pub bdist: Bound<f64>,
    /// Bound for the between-group spread.
    pub bspread: Bound<f64>,
}

impl PermanovaConfig {
    /// Checks that centres and spreads are non-negative, that exactly one of
    /// `num_samples` and `count_lim` is set, and that at least two samples
    /// are produced.
    pub fn validate(&self) -> Result<()> {
        self.wdist.require_non_negative("wdist")?;
        self.wspread.require_non_negative("wspread")?;
        self.bdist.require_non_negative("bdist")?;
        self.bspread.require_non_negative("bspread")?;
        match (self.num_samples, &self.count_lim) {
            (Some(n), None) if n < MIN_DISTANCE_SAMPLES => Err(SimError::degenerate(
                "number of samples",
                n,
                MIN_DISTANCE_SAMPLES,
            )),
            (Some(_), None) => Ok(()),
            (None, Some(count_lim)) => {
                count_lim.require_at_least(MIN_DISTANCE_SAMPLES, "count_lim")
            }
            (Some(_), Some(_)) => Err(SimError::InvalidConfig(
                "set either num_samples or count_lim, not both".to_string(),
            )),
            (None, None) => Err(SimError::InvalidConfig(
                "one of num_samples or count_lim is required".to_string(),
            )),
        }
    }
}

/// Negative draws become zero. Non-finite draws pass through and are rejected
/// by [`DistanceMatrix::from_upper`].
#[inline]
fn clip(d: f64) -> f64 {
    if d < 0.0 {
        0.0
    } else {
        d
    }
}

fn distance_law(params: &DistanceParams) -> Result<Normal<f64>> {
    Normal::new(params.center, params.spread).map_err(|e| {
        SimError::InvalidBound(format!(
            "distance N({}, {}): {}",
            params.center, params.spread, e
        ))
    })
}

/// Grouped distance matrix over two groups.
///
/// Draw order: total size (unless fixed), group-2 size (unless fixed), the
/// within centre and spread, the between centre and spread, then one distance
/// per pair `i < j` in row-major order. The first `n1` sample ids form
/// group 1.
pub fn permanova<R: Rng + ?Sized>(
    config: &PermanovaConfig,
    rng: &mut R,
) -> Result<SimulationRecord> {
    config.validate()?;
    let total = match (config.num_samples, config.count_lim) {
        (Some(n), _) => n,
        (None, Some(count_lim)) => count_lim.sample(rng),
        (None, None) => {
            return Err(SimError::InvalidConfig(
                "one of num_samples or count_lim is required".to_string(),
            ))
        }
    };
    let (n1, _) = binomial_split(total, config.group2, rng)?;

    let within = DistanceParams {
        center: config.wdist.sample(rng),
        spread: config.wspread.sample(rng),
    };
    let between = DistanceParams {
        center: config.bdist.sample(rng),
        spread: config.bspread.sample(rng),
    };
    let within_law = distance_law(&within)?;
    let between_law = distance_law(&between)?;

    let ids = sample_ids(total);
    let groups = vec![ids[..n1].to_vec(), ids[n1..].to_vec()];
    let matrix = DistanceMatrix::from_upper(ids, |i, j| {
        let law = if (i < n1) == (j < n1) {
            &within_law
        } else {
            &between_law
        };
        clip(law.sample(rng))
    })?;

    let params = PermanovaParams {
        num_samples: total,
        within,
        between,
        groups,
    };
    Ok(SimulationRecord::new(
        RealizedParams::Permanova(params),
        Samples::Distance(matrix),
    ))
}

/// Predictor and response distance matrices under a linear model.
///
/// Draws the linear parameters as the linear family does, then one latent
/// coordinate per sample. The predictor matrix holds `|x_i - x_j|`; each
/// response entry is `slope * predictor + intercept + noise`, drawn in the
/// same pair order.
///
/// Coordinates come from the realized `x_range`, a sub-range of `x_lim`,
/// so the recorded parameters describe the predictor exactly: no predictor
/// distance exceeds `x_range[1] - x_range[0]`. An overflowing response fails
/// with `InvalidDistance`.
pub fn mantel<R: Rng + ?Sized>(config: &LinearConfig, rng: &mut R) -> Result<SimulationRecord> {
    config.validate(MIN_DISTANCE_SAMPLES)?;
    let params = config.draw(rng);
    let model = LinearModel::new(&params)?;
    let support = Bound::new(params.x_range[0], params.x_range[1])?;

    let mut coords = Vec::with_capacity(params.count);
    for _ in 0..params.count {
        coords.push(support.sample(rng));
    }

    let ids = sample_ids(params.count);
    let x = DistanceMatrix::from_upper(ids.clone(), |i, j| (coords[i] - coords[j]).abs())?;
    let y = DistanceMatrix::from_upper(ids, |i, j| clip(model.respond(x.get(i, j), rng)))?;

    Ok(SimulationRecord::new(
        RealizedParams::Mantel(params),
        Samples::DistancePair { x, y },
    ))
}
