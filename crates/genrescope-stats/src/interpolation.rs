//! Gap filling for equally spaced series
//!
//! A series is a slice of `Option<f64>` where `None` marks a missing
//! observation. Missing entries are distinct from observed zeros: a `Some(0.0)`
//! is kept as-is and acts as a known anchor for interpolation.
//!
//! Positions are treated as equally spaced (index `i` is one step after index
//! `i - 1`), which matches a series keyed by consecutive integer buckets.
//!
//! # Examples
//!
//! ```
//! use genrescope_stats::interpolation::{InterpolationPolicy, fill_gaps};
//!
//! let series = [None, Some(0.2), None, Some(0.6), None];
//! let filled = fill_gaps(&series, InterpolationPolicy::Linear);
//! assert_eq!(filled[0], 0.2); // constant fill before the first known value
//! assert!((filled[2] - 0.4).abs() < 1e-12);
//! assert_eq!(filled[4], 0.6); // constant fill after the last known value
//! ```

use serde::{Deserialize, Serialize};

/// How missing entries of a series are filled.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationPolicy {
    /// Linear interpolation between the nearest known neighbours, with the
    /// nearest known value repeated outside the first/last known positions.
    ///
    /// A series without any known value resolves to all zeros.
    #[default]
    Linear,
    /// Every missing entry becomes `0.0`.
    Zero,
}

/// Fills missing entries of `series` according to `policy`.
///
/// The returned vector has the same length as `series`, and every known
/// entry is returned unchanged.
#[must_use]
pub fn fill_gaps(series: &[Option<f64>], policy: InterpolationPolicy) -> Vec<f64> {
    match policy {
        InterpolationPolicy::Linear => fill_linear(series),
        InterpolationPolicy::Zero => series.iter().map(|v| v.unwrap_or(0.0)).collect(),
    }
}

#[expect(clippy::cast_precision_loss)]
fn fill_linear(series: &[Option<f64>]) -> Vec<f64> {
    let known = series
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .collect::<Vec<_>>();

    let (Some(&(first_idx, first_value)), Some(&(last_idx, last_value))) =
        (known.first(), known.last())
    else {
        return vec![0.0; series.len()];
    };

    let mut filled = Vec::with_capacity(series.len());
    filled.extend(std::iter::repeat_n(first_value, first_idx));

    for window in known.windows(2) {
        let (lower_idx, lower_value) = window[0];
        let (upper_idx, upper_value) = window[1];
        filled.push(lower_value);
        let span = (upper_idx - lower_idx) as f64;
        for idx in lower_idx + 1..upper_idx {
            let ratio = (idx - lower_idx) as f64 / span;
            filled.push(lower_value + ratio * (upper_value - lower_value));
        }
    }

    filled.push(last_value);
    filled.extend(std::iter::repeat_n(last_value, series.len() - last_idx - 1));

    debug_assert_eq!(filled.len(), series.len());
    filled
}
