//! Pearson correlation with explicit undefined outcomes
//!
//! A correlation coefficient is only meaningful when there are at least two
//! paired observations and both columns vary. Instead of returning `NaN` (which
//! silently propagates through later arithmetic), [`pearson`] reports those
//! cases as [`Correlation::Undefined`] with the reason attached.
//!
//! # Examples
//!
//! ```
//! use genrescope_stats::correlation::{Correlation, UndefinedReason, pearson};
//!
//! let pairs = [(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)];
//! assert_eq!(pearson(pairs).value(), Some(1.0));
//!
//! let constant = [(1.0, 2.0), (1.0, 4.0), (1.0, 6.0)];
//! assert_eq!(
//!     pearson(constant),
//!     Correlation::Undefined {
//!         reason: UndefinedReason::ZeroVariance
//!     }
//! );
//! ```

use serde::Serialize;

/// Outcome of a correlation computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Correlation {
    /// Coefficient in `[-1, 1]`.
    Defined { value: f64 },
    /// No coefficient exists for this input.
    Undefined { reason: UndefinedReason },
}

/// Why a correlation could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedReason {
    /// Fewer than two paired observations.
    #[display("insufficient samples")]
    InsufficientSamples,
    /// At least one of the columns is constant.
    #[display("zero variance")]
    ZeroVariance,
}

impl Correlation {
    /// Returns the coefficient, or `None` when undefined.
    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Correlation::Defined { value } => Some(value),
            Correlation::Undefined { .. } => None,
        }
    }

    #[must_use]
    pub fn is_defined(self) -> bool {
        matches!(self, Correlation::Defined { .. })
    }
}

/// Computes the Pearson correlation coefficient of paired observations.
///
/// Every pair is used as given; callers are responsible for dropping pairs
/// where either side is missing. Constant columns are detected exactly
/// (all values equal), so a column like `[0.1, 0.1, 0.1]` is reported as
/// [`UndefinedReason::ZeroVariance`] even though its floating-point mean may
/// not equal `0.1` exactly.
///
/// The result is clamped to `[-1, 1]` to absorb rounding error.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn pearson<I>(pairs: I) -> Correlation
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let pairs = pairs.into_iter().collect::<Vec<_>>();
    if pairs.len() < 2 {
        return Correlation::Undefined {
            reason: UndefinedReason::InsufficientSamples,
        };
    }

    let (x0, y0) = pairs[0];
    let x_constant = pairs.iter().all(|&(x, _)| x == x0);
    let y_constant = pairs.iter().all(|&(_, y)| y == y0);
    if x_constant || y_constant {
        return Correlation::Undefined {
            reason: UndefinedReason::ZeroVariance,
        };
    }

    // Pearson is scale invariant; scaling each column into [-1, 1] keeps the
    // sums of squares finite and nonzero at extreme magnitudes.
    let scale_x = pairs.iter().map(|(x, _)| x.abs()).fold(0.0, f64::max);
    let scale_y = pairs.iter().map(|(_, y)| y.abs()).fold(0.0, f64::max);
    let scaled = pairs
        .iter()
        .map(|&(x, y)| (x / scale_x, y / scale_y))
        .collect::<Vec<_>>();

    let n = scaled.len() as f64;
    let mean_x = scaled.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = scaled.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for &(x, y) in &scaled {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = var_x.sqrt() * var_y.sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return Correlation::Undefined {
            reason: UndefinedReason::ZeroVariance,
        };
    }

    Correlation::Defined {
        value: (cov / denom).clamp(-1.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_perfect_negative() {
        let r = pearson([(1.0, 3.0), (2.0, 2.0), (3.0, 1.0)]);
        assert!((r.value().unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_known_value() {
        // x = 1..5, y = [2, 4, 5, 4, 5] -> r = 0.7745966692414834
        let r = pearson([(1.0, 2.0), (2.0, 4.0), (3.0, 5.0), (4.0, 4.0), (5.0, 5.0)]);
        assert!((r.value().unwrap() - 0.774_596_669_241_483_4).abs() < 1e-12);
    }

    #[test]
    fn test_single_pair_is_insufficient() {
        assert_eq!(
            pearson([(1.0, 1.0)]),
            Correlation::Undefined {
                reason: UndefinedReason::InsufficientSamples
            }
        );
        assert_eq!(
            pearson(Vec::new()),
            Correlation::Undefined {
                reason: UndefinedReason::InsufficientSamples
            }
        );
    }

    #[test]
    fn test_constant_target_is_zero_variance() {
        let r = pearson([(1.0, 0.1), (2.0, 0.1), (3.0, 0.1)]);
        assert!(!r.is_defined());
        assert_eq!(r.value(), None);
    }

    #[test]
    fn test_extreme_magnitudes() {
        let huge = pearson([(1e200, 1e200), (2e200, 2e200), (3e200, 3e200)]);
        assert!((huge.value().unwrap() - 1.0).abs() < 1e-12);

        let tiny = pearson([(1e-200, 1.0), (2e-200, 2.0), (3e-200, 3.0)]);
        assert!((tiny.value().unwrap() - 1.0).abs() < 1e-12);

        let mixed = pearson([(-1e300, 3e-300), (0.0, 2e-300), (1e300, 1e-300)]);
        assert!((mixed.value().unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_serializes_with_status_tag() {
        let undefined = Correlation::Undefined {
            reason: UndefinedReason::ZeroVariance,
        };
        let json = serde_json::to_string(&undefined).unwrap();
        assert_eq!(json, r#"{"status":"undefined","reason":"zero_variance"}"#);
    }

    proptest! {
        #[test]
        fn coefficient_stays_in_unit_interval(
            pairs in proptest::collection::vec((-1e3f64..1e3, -1e3f64..1e3), 0..40)
        ) {
            if let Some(r) = pearson(pairs).value() {
                prop_assert!((-1.0..=1.0).contains(&r));
            }
        }
    }
}
