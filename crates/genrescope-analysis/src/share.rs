//! Bucketed share aggregation
//!
//! Groups labelled observations by a bucket key (a year, a country, ...) and
//! computes each label's share of its bucket:
//!
//! ```text
//! share(bucket, label) = count(bucket, label) / count(bucket)
//! ```
//!
//! Normalization is bucket-local, so the shares of every bucket sum to 1.0.
//! Only `(bucket, label)` pairs with at least one observation are emitted; an
//! absent pair means "no observation", never "observed zero".
//!
//! # Examples
//!
//! ```
//! use genrescope_analysis::{share::aggregate_by_year, taxonomy::Label};
//!
//! let observations = [
//!     (1990.0, Label::from("Pop")),
//!     (1990.0, Label::from("Rock")),
//!     (1990.0, Label::from("Pop")),
//!     (1991.0, Label::from("Rock")),
//! ];
//! let cells = aggregate_by_year(observations).unwrap();
//!
//! assert_eq!(cells.len(), 3);
//! assert_eq!((cells[0].bucket, cells[0].label.as_str(), cells[0].count), (1990, "Pop", 2));
//! assert!((cells[0].share - 2.0 / 3.0).abs() < 1e-12);
//! assert_eq!((cells[2].bucket, cells[2].share), (1991, 1.0));
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::taxonomy::Label;

/// Calendar year used as the time bucket.
pub type Year = i32;

/// Count and share of one label within one bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareCell<K> {
    pub bucket: K,
    pub label: Label,
    /// Number of observations; always at least 1
    pub count: usize,
    /// `count` divided by the bucket's total count
    pub share: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum AggregateError {
    #[display("invalid input: bucket value {value} is not a representable integer year")]
    InvalidInput { value: f64 },
}

/// Converts a raw year value to a [`Year`].
///
/// Fails unless `value` is finite, integral and within the `i32` domain.
#[expect(clippy::cast_possible_truncation)]
pub fn year_bucket(value: f64) -> Result<Year, AggregateError> {
    let representable = value.is_finite()
        && value.fract() == 0.0
        && value >= f64::from(Year::MIN)
        && value <= f64::from(Year::MAX);
    if representable {
        Ok(value as Year)
    } else {
        Err(AggregateError::InvalidInput { value })
    }
}

/// Aggregates labelled observations by an arbitrary ordered bucket key.
///
/// Cells are ordered by bucket, then by label.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn aggregate_shares<K, I>(observations: I) -> Vec<ShareCell<K>>
where
    K: Ord + Clone,
    I: IntoIterator<Item = (K, Label)>,
{
    let mut counts: BTreeMap<K, BTreeMap<Label, usize>> = BTreeMap::new();
    for (bucket, label) in observations {
        *counts.entry(bucket).or_default().entry(label).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .flat_map(|(bucket, label_counts)| {
            let total = label_counts.values().sum::<usize>() as f64;
            label_counts
                .into_iter()
                .map(move |(label, count)| ShareCell {
                    bucket: bucket.clone(),
                    label,
                    count,
                    share: count as f64 / total,
                })
        })
        .collect()
}

/// Aggregates `(year, label)` observations into per-year shares.
///
/// Fails with [`AggregateError::InvalidInput`] on the first year that is not
/// a representable integer.
pub fn aggregate_by_year<I>(observations: I) -> Result<Vec<ShareCell<Year>>, AggregateError>
where
    I: IntoIterator<Item = (f64, Label)>,
{
    let observations = observations
        .into_iter()
        .map(|(year, label)| Ok((year_bucket(year)?, label)))
        .collect::<Result<Vec<_>, AggregateError>>()?;
    Ok(aggregate_shares(observations))
}
