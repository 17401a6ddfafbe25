//! Location-family generators.
//!
//! One-sample, two-sample and k-group normal generators, plus the lognormal
//! and uniform two-group generators used for rank-based tests.
//!
//! Every generator draws, in this order:
//! 1. a `(location, scale)` pair per group, group by group
//! 2. one shared group size from `count_lim`
//! 3. the observations, group by group
//!
//! Group sizes are always equal within a call.

use rand::Rng;
use rand_distr::{Distribution, LogNormal, Normal};
use serde::{Deserialize, Serialize};

use super::groups::equal_group_sizes;
use super::require_finite;
use crate::types::{
    Bound, GroupParams, RealizedParams, Result, SampleDistribution, Samples, SimError,
    SimulationRecord,
};

/// Bounds for normal and lognormal families.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalConfig {
    /// Bound for each group's mean.
    pub mu_lim: Bound<f64>,
    /// Bound for each group's standard deviation; must be strictly positive.
    pub sigma_lim: Bound<f64>,
    /// Bound for the shared group size.
    pub count_lim: Bound<usize>,
}

impl NormalConfig {
    /// Checks the sign and size requirements of the bounds.
    pub fn validate(&self) -> Result<()> {
        self.sigma_lim.require_positive("sigma_lim")?;
        self.count_lim.require_at_least(1, "count_lim")
    }
}

/// Bounds for the k-group (one-way ANOVA) family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KGroupConfig {
    /// Number of groups; fixed, at least 2.
    pub groups: usize,
    /// Bound for each group's mean.
    pub mu_lim: Bound<f64>,
    /// Bound for each group's standard deviation; must be strictly positive.
    pub sigma_lim: Bound<f64>,
    /// Bound for the shared group size.
    pub count_lim: Bound<usize>,
}

impl KGroupConfig {
    /// The per-group bounds.
    pub fn bounds(&self) -> NormalConfig {
        NormalConfig {
            mu_lim: self.mu_lim,
            sigma_lim: self.sigma_lim,
            count_lim: self.count_lim,
        }
    }

    /// Checks the group count and the bounds.
    pub fn validate(&self) -> Result<()> {
        if self.groups < 2 {
            return Err(SimError::degenerate("number of ANOVA groups", self.groups, 2));
        }
        self.bounds().validate()
    }
}

/// Bounds for the uniform two-group family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniformConfig {
    /// Bound for each group's centre.
    pub range_lim: Bound<f64>,
    /// Bound for each group's half-width; must be non-negative.
    pub delta_lim: Bound<f64>,
    /// Bound for the shared group size.
    pub count_lim: Bound<usize>,
}

impl UniformConfig {
    /// Checks the sign and size requirements of the bounds.
    pub fn validate(&self) -> Result<()> {
        self.delta_lim.require_non_negative("delta_lim")?;
        self.count_lim.require_at_least(1, "count_lim")
    }
}

/// One normal sample: draws `mu`, `sigma`, then `n`, and emits `n` normal
/// observations.
pub fn one_sample<R: Rng + ?Sized>(
    config: &NormalConfig,
    rng: &mut R,
) -> Result<SimulationRecord> {
    config.validate()?;
    let (params, mut samples) = simulate_groups(
        SampleDistribution::Normal,
        &config.mu_lim,
        &config.sigma_lim,
        &config.count_lim,
        1,
        rng,
    )?;
    let single = samples.pop().unwrap_or_default();
    Ok(SimulationRecord::new(params, Samples::Single(single)))
}

/// Two independent normal samples of equal size.
///
/// Both groups use the same bounds with independent draws of `mu` and `sigma`.
pub fn two_sample<R: Rng + ?Sized>(
    config: &NormalConfig,
    rng: &mut R,
) -> Result<SimulationRecord> {
    config.validate()?;
    grouped(
        SampleDistribution::Normal,
        &config.mu_lim,
        &config.sigma_lim,
        &config.count_lim,
        2,
        rng,
    )
}

/// `k` independent normal samples of equal size (one-way ANOVA).
pub fn k_group<R: Rng + ?Sized>(config: &KGroupConfig, rng: &mut R) -> Result<SimulationRecord> {
    config.validate()?;
    grouped(
        SampleDistribution::Normal,
        &config.mu_lim,
        &config.sigma_lim,
        &config.count_lim,
        config.groups,
        rng,
    )
}

/// Two independent lognormal samples of equal size.
///
/// `mu` and `sigma` are drawn in log space; observations are `exp(N(mu, sigma))`.
pub fn lognormal<R: Rng + ?Sized>(
    config: &NormalConfig,
    rng: &mut R,
) -> Result<SimulationRecord> {
    config.validate()?;
    grouped(
        SampleDistribution::LogNormal,
        &config.mu_lim,
        &config.sigma_lim,
        &config.count_lim,
        2,
        rng,
    )
}

/// Two independent uniform samples of equal size.
///
/// Each group draws a centre from `range_lim` and a half-width from
/// `delta_lim`, then samples uniformly from `[centre - delta, centre + delta]`.
pub fn uniform<R: Rng + ?Sized>(config: &UniformConfig, rng: &mut R) -> Result<SimulationRecord> {
    config.validate()?;
    grouped(
        SampleDistribution::Uniform,
        &config.range_lim,
        &config.delta_lim,
        &config.count_lim,
        2,
        rng,
    )
}

fn grouped<R: Rng + ?Sized>(
    distribution: SampleDistribution,
    location_lim: &Bound<f64>,
    scale_lim: &Bound<f64>,
    count_lim: &Bound<usize>,
    groups: usize,
    rng: &mut R,
) -> Result<SimulationRecord> {
    let (params, samples) =
        simulate_groups(distribution, location_lim, scale_lim, count_lim, groups, rng)?;
    Ok(SimulationRecord::new(params, Samples::Groups(samples)))
}

fn simulate_groups<R: Rng + ?Sized>(
    distribution: SampleDistribution,
    location_lim: &Bound<f64>,
    scale_lim: &Bound<f64>,
    count_lim: &Bound<usize>,
    groups: usize,
    rng: &mut R,
) -> Result<(RealizedParams, Vec<Vec<f64>>)> {
    let mut drawn = Vec::with_capacity(groups);
    for _ in 0..groups {
        let location = location_lim.sample(rng);
        let scale = scale_lim.sample(rng);
        drawn.push((location, scale));
    }
    let sizes = equal_group_sizes(count_lim, groups, 1, rng)?;

    let params: Vec<GroupParams> = drawn
        .into_iter()
        .zip(sizes)
        .map(|((location, scale), count)| GroupParams {
            location,
            scale,
            count,
        })
        .collect();

    let mut samples = Vec::with_capacity(groups);
    for group in &params {
        samples.push(draw_observations(distribution, group, rng)?);
    }

    Ok((
        RealizedParams::Location {
            distribution,
            groups: params,
        },
        samples,
    ))
}

fn draw_observations<R: Rng + ?Sized>(
    distribution: SampleDistribution,
    group: &GroupParams,
    rng: &mut R,
) -> Result<Vec<f64>> {
    let mut out = Vec::with_capacity(group.count);
    match distribution {
        SampleDistribution::Normal => {
            let normal = Normal::new(group.location, group.scale)
                .map_err(|e| SimError::InvalidBound(format!("normal({:?}): {}", group, e)))?;
            for _ in 0..group.count {
                out.push(require_finite(normal.sample(rng), "normal group")?);
            }
        }
        SampleDistribution::LogNormal => {
            let lognormal = LogNormal::new(group.location, group.scale)
                .map_err(|e| SimError::InvalidBound(format!("lognormal({:?}): {}", group, e)))?;
            for _ in 0..group.count {
                out.push(require_finite(lognormal.sample(rng), "lognormal group")?);
            }
        }
        SampleDistribution::Uniform => {
            let support = Bound::new(group.location - group.scale, group.location + group.scale)?;
            for _ in 0..group.count {
                out.push(support.sample(rng));
            }
        }
    }
    Ok(out)
}
