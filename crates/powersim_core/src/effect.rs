//! Ground-truth effect sizes computed from synthesised samples.
//!
//! Downstream power analysis compares a test's empirical power against the
//! effect size of the data it was given. Standard deviations here are
//! population standard deviations (divide by `n`); the pooled estimates then
//! weight each group's variance by `n - 1`.
//!
//! | Samples            | Effect size                       |
//! |--------------------|-----------------------------------|
//! | `Single`           | Cohen's d against `x0`            |
//! | `Groups` (2)       | Cohen's d, pooled                 |
//! | `Groups` (k > 2)   | Cohen's f                         |
//! | `Paired`           | Pearson's r                       |

use crate::types::{Result, Samples, SimError, SimulationRecord};

/// Mean and population standard deviation. Needs two observations.
fn vitals(sample: &[f64]) -> Result<(f64, f64)> {
    if sample.len() < 2 {
        return Err(SimError::degenerate("observations for a spread", sample.len(), 2));
    }
    let n = sample.len() as f64;
    let mean = sample.iter().sum::<f64>() / n;
    let var = sample.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Ok((mean, var.sqrt()))
}

fn nonzero(spread: f64) -> Result<f64> {
    if spread > 0.0 && spread.is_finite() {
        Ok(spread)
    } else {
        Err(SimError::degenerate("distinct observation values", 1, 2))
    }
}

/// Cohen's d of one sample against a reference mean: `(mean - x0) / sd`.
pub fn cohen_d_one_sample(sample: &[f64], x0: f64) -> Result<f64> {
    let (mean, sd) = vitals(sample)?;
    Ok((mean - x0) / nonzero(sd)?)
}

/// Cohen's d of two independent samples over their pooled standard deviation.
pub fn cohen_d_independent(a: &[f64], b: &[f64]) -> Result<f64> {
    let (mean_a, sd_a) = vitals(a)?;
    let (mean_b, sd_b) = vitals(b)?;
    let (na, nb) = (a.len() as f64, b.len() as f64);
    let pooled =
        ((sd_a.powi(2) * (na - 1.0) + sd_b.powi(2) * (nb - 1.0)) / (na + nb - 2.0)).sqrt();
    Ok((mean_a - mean_b) / nonzero(pooled)?)
}

/// Cohen's f for a one-way layout of `k >= 2` groups.
///
/// `sqrt(sum(((mean_i - grand_mean) / pooled)^2) / k)`, with the pooled
/// standard deviation taken over `N - k` degrees of freedom.
pub fn cohen_f(groups: &[Vec<f64>]) -> Result<f64> {
    if groups.len() < 2 {
        return Err(SimError::degenerate("number of groups", groups.len(), 2));
    }
    let mut vitals_by_group = Vec::with_capacity(groups.len());
    for group in groups {
        vitals_by_group.push(vitals(group)?);
    }

    let total: usize = groups.iter().map(Vec::len).sum();
    let grand_mean = groups.iter().flatten().sum::<f64>() / total as f64;
    let k = groups.len() as f64;

    let weighted: f64 = groups
        .iter()
        .zip(&vitals_by_group)
        .map(|(g, &(_, sd))| sd.powi(2) * (g.len() as f64 - 1.0))
        .sum();
    let pooled = nonzero((weighted / (total as f64 - k)).sqrt())?;

    let spread: f64 = vitals_by_group
        .iter()
        .map(|&(mean, _)| ((mean - grand_mean) / pooled).powi(2))
        .sum();
    Ok((spread / k).sqrt())
}

/// Pearson's correlation coefficient of two equal-length sequences.
pub fn pearson_r(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(SimError::degenerate(
            "response values matching predictor values",
            y.len(),
            x.len(),
        ));
    }
    let (mx, sx) = vitals(x)?;
    let (my, sy) = vitals(y)?;
    let n = x.len() as f64;
    let cov = x
        .iter()
        .zip(y)
        .map(|(a, b)| (a - mx) * (b - my))
        .sum::<f64>()
        / n;
    Ok(cov / (nonzero(sx)? * nonzero(sy)?))
}

/// Effect size of a record's samples. `x0` is only used for single samples.
///
/// Distance structures carry no scalar effect size and are rejected.
pub fn record_effect_size(record: &SimulationRecord, x0: f64) -> Result<f64> {
    match &record.samples {
        Samples::Single(sample) => cohen_d_one_sample(sample, x0),
        Samples::Groups(groups) => match groups.as_slice() {
            [single] => cohen_d_one_sample(single, x0),
            [a, b] => cohen_d_independent(a, b),
            _ => cohen_f(groups),
        },
        Samples::Paired { x, y } => pearson_r(x, y),
        other => Err(SimError::IncompatibleSamples {
            expected: "single, groups or paired",
            actual: other.shape(),
        }),
    }
}
