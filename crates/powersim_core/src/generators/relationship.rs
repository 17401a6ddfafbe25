//! Linear-relationship generator.
//!
//! Draws slope, intercept, noise scale, sample count and a predictor range,
//! then synthesises `y = slope * x + intercept + N(0, sigma)`.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use super::require_finite;
use crate::types::{
    Bound, LinearParams, RealizedParams, Result, Samples, SimError, SimulationRecord,
};

/// Bounds for the linear-relationship and Mantel families.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConfig {
    /// Bound for the slope.
    pub slope_lim: Bound<f64>,
    /// Bound for the intercept.
    pub intercept_lim: Bound<f64>,
    /// Bound for the noise standard deviation; must be non-negative.
    pub sigma_lim: Bound<f64>,
    /// Bound for the number of observations.
    pub count_lim: Bound<usize>,
    /// Bound the predictor range is drawn from.
    pub x_lim: Bound<f64>,
}

impl LinearConfig {
    /// Checks the sign and size requirements, with `min_count` observations.
    pub fn validate(&self, min_count: usize) -> Result<()> {
        self.sigma_lim.require_non_negative("sigma_lim")?;
        self.count_lim.require_at_least(min_count, "count_lim")
    }

    /// Draws slope, intercept, sigma, count and the predictor range, in that
    /// order. The range is two draws from `x_lim`, sorted.
    pub(crate) fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> LinearParams {
        let slope = self.slope_lim.sample(rng);
        let intercept = self.intercept_lim.sample(rng);
        let sigma = self.sigma_lim.sample(rng);
        let count = self.count_lim.sample(rng);
        let a = self.x_lim.sample(rng);
        let b = self.x_lim.sample(rng);
        LinearParams {
            count,
            slope,
            intercept,
            sigma,
            x_range: [a.min(b), a.max(b)],
        }
    }
}

/// Noise-free part of the linear model plus one noise draw.
pub(crate) struct LinearModel {
    slope: f64,
    intercept: f64,
    noise: Normal<f64>,
}

impl LinearModel {
    pub(crate) fn new(params: &LinearParams) -> Result<Self> {
        let noise = Normal::new(0.0, params.sigma)
            .map_err(|e| SimError::InvalidBound(format!("sigma {}: {}", params.sigma, e)))?;
        Ok(Self {
            slope: params.slope,
            intercept: params.intercept,
            noise,
        })
    }

    /// `slope * x + intercept + noise`, consuming one normal draw.
    #[inline]
    pub(crate) fn respond<R: Rng + ?Sized>(&self, x: f64, rng: &mut R) -> f64 {
        self.slope * x + self.intercept + self.noise.sample(rng)
    }
}

/// Predictor/response pair under a linear model with additive normal noise.
///
/// All predictor values are drawn first, uniformly from the realized range;
/// then one response per predictor, in order.
pub fn linear<R: Rng + ?Sized>(config: &LinearConfig, rng: &mut R) -> Result<SimulationRecord> {
    config.validate(1)?;
    let params = config.draw(rng);
    let model = LinearModel::new(&params)?;
    let support = Bound::new(params.x_range[0], params.x_range[1])?;

    let mut x = Vec::with_capacity(params.count);
    for _ in 0..params.count {
        x.push(support.sample(rng));
    }
    let mut y = Vec::with_capacity(params.count);
    for &xi in &x {
        y.push(require_finite(model.respond(xi, rng), "linear response")?);
    }

    Ok(SimulationRecord::new(
        RealizedParams::Linear(params),
        Samples::Paired { x, y },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimRng;
    use approx::assert_abs_diff_eq;

    fn config() -> LinearConfig {
        LinearConfig {
            slope_lim: Bound::new(-2.0, 2.0).unwrap(),
            intercept_lim: Bound::new(-1.0, 1.0).unwrap(),
            sigma_lim: Bound::new(0.5, 1.0).unwrap(),
            count_lim: Bound::new(40, 60).unwrap(),
            x_lim: Bound::new(-10.0, 10.0).unwrap(),
        }
    }

    fn paired(record: &SimulationRecord) -> (&[f64], &[f64]) {
        match &record.samples {
            Samples::Paired { x, y } => (x.as_slice(), y.as_slice()),
            other => panic!("Expected paired samples, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_model_is_exactly_zero() {
        let mut rng = SimRng::from_seed(1);
        let config = LinearConfig {
            slope_lim: Bound::fixed(0.0),
            intercept_lim: Bound::fixed(0.0),
            sigma_lim: Bound::fixed(0.0),
            count_lim: Bound::new(25, 25).unwrap(),
            x_lim: Bound::new(-5.0, 5.0).unwrap(),
        };
        let record = linear(&config, &mut rng).unwrap();
        let (x, y) = paired(&record);
        assert_eq!(x.len(), 25);
        assert!(y.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_noise_free_line() {
        let mut rng = SimRng::from_seed(2);
        let config = LinearConfig {
            slope_lim: Bound::fixed(3.0),
            intercept_lim: Bound::fixed(-2.0),
            sigma_lim: Bound::fixed(0.0),
            count_lim: Bound::new(10, 10).unwrap(),
            x_lim: Bound::new(0.0, 1.0).unwrap(),
        };
        let record = linear(&config, &mut rng).unwrap();
        let (x, y) = paired(&record);
        for (&xi, &yi) in x.iter().zip(y) {
            assert_abs_diff_eq!(yi, 3.0 * xi - 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_params_within_bounds() {
        let mut rng = SimRng::from_seed(3);
        let cfg = config();
        let record = linear(&cfg, &mut rng).unwrap();

        let params = match &record.params {
            RealizedParams::Linear(p) => *p,
            other => panic!("Expected linear params, got {:?}", other),
        };
        assert!(cfg.slope_lim.contains(params.slope));
        assert!(cfg.intercept_lim.contains(params.intercept));
        assert!(cfg.sigma_lim.contains(params.sigma));
        assert!(cfg.count_lim.contains(params.count));
        assert!(params.x_range[0] <= params.x_range[1]);

        let (x, y) = paired(&record);
        assert_eq!(x.len(), params.count);
        assert_eq!(y.len(), params.count);
        assert!(x
            .iter()
            .all(|&v| v >= params.x_range[0] && v <= params.x_range[1]));
    }

    #[test]
    fn test_negative_sigma_rejected() {
        let mut rng = SimRng::from_seed(4);
        let mut cfg = config();
        cfg.sigma_lim = Bound::new(-1.0, 1.0).unwrap();
        assert!(matches!(linear(&cfg, &mut rng), Err(SimError::InvalidBound(_))));
    }

    #[test]
    fn test_overflowing_response_rejected() {
        let mut rng = SimRng::from_seed(6);
        let cfg = LinearConfig {
            slope_lim: Bound::fixed(1.0e308),
            intercept_lim: Bound::fixed(0.0),
            sigma_lim: Bound::fixed(0.0),
            count_lim: Bound::new(5, 5).unwrap(),
            x_lim: Bound::new(2.0, 3.0).unwrap(),
        };
        let err = linear(&cfg, &mut rng).unwrap_err();
        assert!(matches!(err, SimError::InvalidBound(_)));
        assert!(err.to_string().contains("linear response"));
    }

    #[test]
    fn test_residual_spread_matches_sigma() {
        let mut rng = SimRng::from_seed(5);
        let cfg = LinearConfig {
            slope_lim: Bound::fixed(1.5),
            intercept_lim: Bound::fixed(0.5),
            sigma_lim: Bound::fixed(2.0),
            count_lim: Bound::new(20_000, 20_000).unwrap(),
            x_lim: Bound::new(-10.0, 10.0).unwrap(),
        };
        let record = linear(&cfg, &mut rng).unwrap();
        let (x, y) = paired(&record);

        let residuals: Vec<f64> = x
            .iter()
            .zip(y)
            .map(|(&xi, &yi)| yi - (1.5 * xi + 0.5))
            .collect();
        let n = residuals.len() as f64;
        let mean = residuals.iter().sum::<f64>() / n;
        let sd = (residuals.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n).sqrt();

        assert_abs_diff_eq!(mean, 0.0, epsilon = 0.1);
        assert_abs_diff_eq!(sd, 2.0, epsilon = 0.1);
    }
}
