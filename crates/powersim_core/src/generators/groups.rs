//! Group-size policy.
//!
//! Turns a count bound and a group count into per-group sample sizes:
//! - one group: a single size drawn from the bound
//! - equal groups: one size drawn from the bound, replicated for every group
//! - asymmetric split: group 2 ~ Binomial(total, 0.5), clipped so that both
//!   groups keep at least [`MIN_SPLIT_GROUP_SIZE`] members

use rand::Rng;
use rand_distr::{Binomial, Distribution};

use crate::types::{Bound, Result, SimError};

/// Smallest group a binomial split may produce.
pub const MIN_SPLIT_GROUP_SIZE: usize = 1;

/// Draws one size from `count_lim` and replicates it `groups` times.
///
/// Fails with `DegenerateGroup` if `groups` is zero or the bound can yield a
/// size below `min_size`.
pub fn equal_group_sizes<R: Rng + ?Sized>(
    count_lim: &Bound<usize>,
    groups: usize,
    min_size: usize,
    rng: &mut R,
) -> Result<Vec<usize>> {
    if groups == 0 {
        return Err(SimError::degenerate("number of groups", 0, 1));
    }
    count_lim.require_at_least(min_size, "count_lim")?;
    let n = count_lim.sample(rng);
    Ok(vec![n; groups])
}

/// Splits `total` samples into two non-empty groups.
///
/// With `fixed_second = Some(n2)` the split is `(total - n2, n2)`; `n2` must
/// lie in `[MIN_SPLIT_GROUP_SIZE, total - MIN_SPLIT_GROUP_SIZE]`. Otherwise
/// group 2's size is drawn from `Binomial(total, 0.5)` and clipped into that
/// interval. Group 1 always receives the remainder.
pub fn binomial_split<R: Rng + ?Sized>(
    total: usize,
    fixed_second: Option<usize>,
    rng: &mut R,
) -> Result<(usize, usize)> {
    let need = 2 * MIN_SPLIT_GROUP_SIZE;
    if total < need {
        return Err(SimError::degenerate("samples to split into two groups", total, need));
    }
    let (lo, hi) = (MIN_SPLIT_GROUP_SIZE, total - MIN_SPLIT_GROUP_SIZE);

    let second = match fixed_second {
        Some(n2) if n2 < lo => {
            return Err(SimError::degenerate("fixed size of group 2", n2, lo));
        }
        Some(n2) if n2 > hi => {
            return Err(SimError::degenerate(
                "remaining size of group 1",
                total.saturating_sub(n2),
                lo,
            ));
        }
        Some(n2) => n2,
        None => {
            let binomial = Binomial::new(total as u64, 0.5).map_err(|e| {
                SimError::InvalidConfig(format!("binomial split of {}: {}", total, e))
            })?;
            (binomial.sample(rng) as usize).clamp(lo, hi)
        }
    };

    Ok((total - second, second))
}
