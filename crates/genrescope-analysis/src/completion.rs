//! Dense series completion over a year range
//!
//! Aggregated shares are sparse: a label that has no track in a given year
//! has no cell for that year. Stacked-area renderers need the opposite, one
//! value per `(year, label)` pair. [`complete`] builds that dense grid.
//!
//! # Algorithm
//!
//! 1. **Label universe**: every distinct label in the input cells, ordered by
//!    first appearance
//! 2. **Seeding**: for each year in the range and each label, take the
//!    observed share if a cell exists, otherwise mark the entry as missing
//!    (`None`, never a literal zero)
//! 3. **Filling**: each label's column is filled independently with the
//!    chosen [`InterpolationPolicy`] (labels are processed in parallel)
//! 4. **Emission**: entries ordered by year, then label universe order
//!
//! With [`InterpolationPolicy::Linear`], gaps between two observed years are
//! interpolated linearly, years before the first (after the last) observation
//! repeat that observation, and a label never observed inside the range is
//! zero everywhere.
//!
//! # Missing vs. Zero
//!
//! [`aggregate_by_year`](crate::share::aggregate_by_year) never emits a cell
//! with count zero, so "missing" always means "no track that year". Feeding
//! cells with a literal `0.0` share here is allowed, but such a cell is an
//! interpolation anchor, not a gap.
//!
//! # Examples
//!
//! ```
//! use genrescope_analysis::{
//!     completion::complete,
//!     share::ShareCell,
//!     taxonomy::Label,
//! };
//! use genrescope_stats::interpolation::InterpolationPolicy;
//!
//! let cell = |bucket, label: &str, share| ShareCell {
//!     bucket,
//!     label: Label::from(label),
//!     count: 1,
//!     share,
//! };
//! let cells = [cell(1990, "A", 0.2), cell(1994, "A", 0.6)];
//!
//! let series = complete(&cells, 1990..=1994, InterpolationPolicy::Linear).unwrap();
//! let shares = series.iter().map(|e| e.share).collect::<Vec<_>>();
//! assert_eq!(shares.len(), 5);
//! assert!((shares[2] - 0.4).abs() < 1e-12);
//! ```

use std::{
    collections::{HashMap, HashSet},
    ops::RangeInclusive,
};

use genrescope_stats::interpolation::{InterpolationPolicy, fill_gaps};
use rayon::prelude::*;
use serde::Serialize;

use crate::{
    share::{ShareCell, Year},
    taxonomy::Label,
};

/// One point of the completed series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesEntry {
    pub bucket: Year,
    pub label: Label,
    pub share: f64,
    /// `true` if `share` comes from an aggregated cell rather than gap filling
    pub observed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid bucket range: min {min} is greater than max {max}")]
pub struct RangeError {
    pub min: Year,
    pub max: Year,
}

/// Validates that `range` is non-empty.
pub fn check_range(range: &RangeInclusive<Year>) -> Result<(), RangeError> {
    if range.start() > range.end() {
        return Err(RangeError {
            min: *range.start(),
            max: *range.end(),
        });
    }
    Ok(())
}

/// Builds the dense `range × label universe` grid from sparse share cells.
///
/// Cells whose bucket lies outside `range` do not seed the grid, but their
/// labels still belong to the label universe. If the same `(bucket, label)`
/// appears more than once, the first cell wins.
///
/// Fails with [`RangeError`] if the range is empty (`min > max`).
pub fn complete(
    cells: &[ShareCell<Year>],
    range: RangeInclusive<Year>,
    policy: InterpolationPolicy,
) -> Result<Vec<SeriesEntry>, RangeError> {
    check_range(&range)?;

    let mut seen = HashSet::new();
    let universe = cells
        .iter()
        .map(|cell| &cell.label)
        .filter(|label| seen.insert(*label))
        .collect::<Vec<_>>();

    let mut observed: HashMap<(&Label, Year), f64> = HashMap::new();
    for cell in cells.iter().filter(|cell| range.contains(&cell.bucket)) {
        observed
            .entry((&cell.label, cell.bucket))
            .or_insert(cell.share);
    }

    tracing::debug!(
        labels = universe.len(),
        buckets = range.clone().count(),
        observed = observed.len(),
        "completing series grid"
    );

    let columns = universe
        .par_iter()
        .map(|label| {
            let seeded = range
                .clone()
                .map(|bucket| observed.get(&(*label, bucket)).copied())
                .collect::<Vec<_>>();
            let filled = fill_gaps(&seeded, policy);
            (seeded, filled)
        })
        .collect::<Vec<_>>();

    let entries = range
        .enumerate()
        .flat_map(|(row, bucket)| {
            universe
                .iter()
                .zip(&columns)
                .map(move |(label, (seeded, filled))| SeriesEntry {
                    bucket,
                    label: (*label).clone(),
                    share: filled[row],
                    observed: seeded[row].is_some(),
                })
        })
        .collect();

    Ok(entries)
}
