//! Closed-interval bounds and the range sampler.
//!
//! A [`Bound`] is the configuration value from which one parameter is drawn
//! per generator call. Bounds are validated on construction (including
//! deserialisation), so an inverted bound can never reach a generator.
//!
//! ## Inclusivity
//!
//! Both ends are inclusive for every value type:
//! - `Bound<f64>` draws uniformly from `[lo, hi]`
//! - `Bound<usize>` draws uniformly from the integers `lo..=hi`, so
//!   `[10, 10]` always yields `10` and `[2, 3]` yields both `2` and `3`
//!
//! A degenerate continuous bound (`lo == hi`) returns `lo` exactly without
//! consuming randomness.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::{Result, SimError};

/// Scalar types a [`Bound`] can hold.
pub trait BoundValue: Copy + PartialOrd + fmt::Debug {
    /// Whether the value may appear as a bound end (e.g. finite).
    fn is_admissible(self) -> bool;

    /// Whether `[lo, hi]` can be sampled, e.g. its width does not overflow.
    fn spans(lo: Self, hi: Self) -> bool;

    /// Draws uniformly from the closed range `[lo, hi]`.
    ///
    /// Callers guarantee `lo <= hi`.
    fn draw<R: Rng + ?Sized>(lo: Self, hi: Self, rng: &mut R) -> Self;
}

impl BoundValue for f64 {
    #[inline]
    fn is_admissible(self) -> bool {
        self.is_finite()
    }

    #[inline]
    fn spans(lo: Self, hi: Self) -> bool {
        (hi - lo).is_finite()
    }

    #[inline]
    fn draw<R: Rng + ?Sized>(lo: Self, hi: Self, rng: &mut R) -> Self {
        if lo == hi {
            lo
        } else {
            rng.gen_range(lo..=hi)
        }
    }
}

impl BoundValue for usize {
    #[inline]
    fn is_admissible(self) -> bool {
        true
    }

    #[inline]
    fn spans(_lo: Self, _hi: Self) -> bool {
        true
    }

    #[inline]
    fn draw<R: Rng + ?Sized>(lo: Self, hi: Self, rng: &mut R) -> Self {
        rng.gen_range(lo..=hi)
    }
}

/// An ordered pair `(lo, hi)` with `lo <= hi`.
///
/// Serialised as a two-element array, e.g. `mu_lim = [0.0, 5.0]` in TOML.
///
/// # Examples
/// ```
/// use powersim_core::rng::SimRng;
/// use powersim_core::types::Bound;
///
/// let mut rng = SimRng::from_seed(7);
/// let mu = Bound::new(-1.0, 1.0).unwrap();
/// let x = mu.sample(&mut rng);
/// assert!((-1.0..=1.0).contains(&x));
///
/// assert!(Bound::new(2.0, 1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[T; 2]", into = "[T; 2]")]
#[serde(bound(
    serialize = "T: BoundValue + Serialize",
    deserialize = "T: BoundValue + Deserialize<'de>"
))]
pub struct Bound<T: BoundValue> {
    lo: T,
    hi: T,
}

impl<T: BoundValue> Bound<T> {
    /// Creates a bound, failing with `InvalidBound` when `lo > hi`, either
    /// end is not admissible (NaN or infinite for floats), or the width of a
    /// float bound overflows.
    pub fn new(lo: T, hi: T) -> Result<Self> {
        if !lo.is_admissible() || !hi.is_admissible() {
            return Err(SimError::InvalidBound(format!(
                "ends must be finite, got [{:?}, {:?}]",
                lo, hi
            )));
        }
        // Written as a negation so that incomparable values are rejected too.
        if !(lo <= hi) {
            return Err(SimError::InvalidBound(format!(
                "lo {:?} > hi {:?}",
                lo, hi
            )));
        }
        if !T::spans(lo, hi) {
            return Err(SimError::InvalidBound(format!(
                "width of [{:?}, {:?}] is not finite",
                lo, hi
            )));
        }
        Ok(Self { lo, hi })
    }

    /// A degenerate bound that always yields `value`.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not admissible (e.g. `f64::NAN`).
    pub fn fixed(value: T) -> Self {
        assert!(value.is_admissible(), "fixed bound must be admissible");
        Self { lo: value, hi: value }
    }

    /// Lower end.
    #[inline]
    pub fn lo(&self) -> T {
        self.lo
    }

    /// Upper end.
    #[inline]
    pub fn hi(&self) -> T {
        self.hi
    }

    /// Whether `lo == hi`.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.lo == self.hi
    }

    /// Whether `value` lies in `[lo, hi]`.
    #[inline]
    pub fn contains(&self, value: T) -> bool {
        self.lo <= value && value <= self.hi
    }

    /// Draws one value uniformly from the closed interval.
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        T::draw(self.lo, self.hi, rng)
    }
}

impl Bound<f64> {
    /// Fails unless every value in the bound is strictly positive.
    pub fn require_positive(&self, name: &str) -> Result<()> {
        if self.lo > 0.0 {
            Ok(())
        } else {
            Err(SimError::InvalidBound(format!(
                "{}: must be strictly positive, got [{}, {}]",
                name, self.lo, self.hi
            )))
        }
    }

    /// Fails if any value in the bound is negative.
    pub fn require_non_negative(&self, name: &str) -> Result<()> {
        if self.lo >= 0.0 {
            Ok(())
        } else {
            Err(SimError::InvalidBound(format!(
                "{}: must be non-negative, got [{}, {}]",
                name, self.lo, self.hi
            )))
        }
    }
}

impl Bound<usize> {
    /// Fails with `DegenerateGroup` if the bound can yield fewer than `min`.
    pub fn require_at_least(&self, min: usize, name: &str) -> Result<()> {
        if self.lo >= min {
            Ok(())
        } else {
            Err(SimError::degenerate(name, self.lo, min))
        }
    }
}

impl<T: BoundValue> TryFrom<[T; 2]> for Bound<T> {
    type Error = SimError;

    fn try_from(pair: [T; 2]) -> Result<Self> {
        Self::new(pair[0], pair[1])
    }
}

impl<T: BoundValue> From<Bound<T>> for [T; 2] {
    fn from(bound: Bound<T>) -> Self {
        [bound.lo, bound.hi]
    }
}

impl<T: BoundValue + fmt::Display> fmt::Display for Bound<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimRng;
    use proptest::prelude::*;

    #[test]
    fn test_inverted_bound_rejected() {
        let err = Bound::new(3.0, 1.0).unwrap_err();
        assert!(matches!(err, SimError::InvalidBound(_)));

        assert!(Bound::new(5usize, 4).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(Bound::new(f64::NAN, 1.0).is_err());
        assert!(Bound::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_overflowing_width_rejected() {
        let err = Bound::new(-1.0e308, 1.0e308).unwrap_err();
        assert!(matches!(err, SimError::InvalidBound(_)));
        assert!(err.to_string().contains("width"));

        let result: std::result::Result<Bound<f64>, _> =
            serde_json::from_str("[-1.7e308, 1.7e308]");
        assert!(result.is_err());
    }

    #[test]
    fn test_wide_finite_bound_samples() {
        let mut rng = SimRng::from_seed(1);
        let b = Bound::new(-1.0e307, 1.0e307).unwrap();
        for _ in 0..10 {
            assert!(b.contains(b.sample(&mut rng)));
        }
        assert_eq!(Bound::new(0usize, usize::MAX).unwrap().hi(), usize::MAX);
    }

    #[test]
    fn test_degenerate_float_is_exact() {
        let mut rng = SimRng::from_seed(1);
        let b = Bound::new(5.0, 5.0).unwrap();
        for _ in 0..10 {
            assert_eq!(b.sample(&mut rng), 5.0);
        }
    }

    #[test]
    fn test_degenerate_float_consumes_nothing() {
        use rand::rngs::mock::StepRng;
        use rand::RngCore;

        let mut rng = StepRng::new(0, 1);
        assert_eq!(Bound::fixed(2.5).sample(&mut rng), 2.5);
        assert_eq!(rng.next_u64(), 0);
    }

    #[test]
    fn test_count_bound_upper_end_reachable() {
        let mut rng = SimRng::from_seed(2024);
        let b = Bound::new(2usize, 3).unwrap();
        let draws: Vec<usize> = (0..200).map(|_| b.sample(&mut rng)).collect();

        assert!(draws.iter().all(|&n| n == 2 || n == 3));
        assert!(draws.contains(&2), "lower end never drawn");
        assert!(draws.contains(&3), "upper end never drawn");
    }

    #[test]
    fn test_fixed_count_bound() {
        let mut rng = SimRng::from_seed(9);
        let b = Bound::new(10usize, 10).unwrap();
        assert_eq!(b.sample(&mut rng), 10);
    }

    #[test]
    fn test_require_positive() {
        assert!(Bound::new(0.1, 1.0).unwrap().require_positive("sigma_lim").is_ok());
        let err = Bound::new(0.0, 1.0)
            .unwrap()
            .require_positive("sigma_lim")
            .unwrap_err();
        assert!(err.to_string().contains("sigma_lim"));
    }

    #[test]
    fn test_require_non_negative() {
        assert!(Bound::new(0.0, 0.0).unwrap().require_non_negative("wspread").is_ok());
        assert!(Bound::new(-0.5, 1.0).unwrap().require_non_negative("wspread").is_err());
    }

    #[test]
    fn test_require_at_least() {
        let b = Bound::new(1usize, 5).unwrap();
        assert!(b.require_at_least(1, "count_lim").is_ok());
        assert!(matches!(
            b.require_at_least(2, "count_lim"),
            Err(SimError::DegenerateGroup { got: 1, need: 2, .. })
        ));
    }

    #[test]
    fn test_serde_as_pair() {
        let b = Bound::new(-1.5, 2.5).unwrap();
        let json = serde_json::to_string(&b).unwrap();
        assert_eq!(json, "[-1.5,2.5]");

        let back: Bound<f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);
    }

    #[test]
    fn test_serde_rejects_inverted() {
        let result: std::result::Result<Bound<usize>, _> = serde_json::from_str("[9, 3]");
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Bound::new(1usize, 4).unwrap().to_string(), "[1, 4]");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Every continuous draw lies inside the bound.
        #[test]
        fn prop_float_draw_in_bound(
            seed in any::<u64>(),
            a in -1.0e6f64..1.0e6,
            b in -1.0e6f64..1.0e6,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let bound = Bound::new(lo, hi).unwrap();
            let mut rng = SimRng::from_seed(seed);
            for _ in 0..32 {
                let x = bound.sample(&mut rng);
                prop_assert!(bound.contains(x), "{} outside [{}, {}]", x, lo, hi);
            }
        }

        /// Every count draw lies inside the inclusive integer range.
        #[test]
        fn prop_count_draw_in_bound(seed in any::<u64>(), lo in 0usize..500, width in 0usize..50) {
            let bound = Bound::new(lo, lo + width).unwrap();
            let mut rng = SimRng::from_seed(seed);
            for _ in 0..32 {
                let n = bound.sample(&mut rng);
                prop_assert!(n >= lo && n <= lo + width);
            }
        }

        /// Any inverted pair is rejected.
        #[test]
        fn prop_inverted_rejected(lo in -1.0e6f64..1.0e6, gap in 1.0e-3f64..1.0e3) {
            prop_assert!(Bound::new(lo + gap, lo).is_err());
        }
    }
}
