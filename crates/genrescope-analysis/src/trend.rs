//! End-to-end genre trend pipeline
//!
//! ```text
//! TrackRecord (year, genre)
//!     ↓ drop records without year or genre, keep years inside the range
//! Taxonomy::classify
//!     ↓
//! aggregate_by_year          → ShareCell<Year>  (sparse)
//!     ↓
//! complete                   → SeriesEntry      (dense, gap-filled)
//! ```

use std::ops::RangeInclusive;

use genrescope_stats::interpolation::InterpolationPolicy;
use serde::Serialize;

use crate::{
    completion::{RangeError, SeriesEntry, check_range, complete},
    share::{AggregateError, ShareCell, Year, aggregate_by_year},
    taxonomy::Taxonomy,
    track::TrackRecord,
};

/// First year of the default range.
pub const DEFAULT_START_YEAR: Year = 1923;
/// Last year of the default range.
pub const DEFAULT_END_YEAR: Year = 2023;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendOptions {
    /// Years to keep and to complete, inclusive
    pub range: RangeInclusive<Year>,
    pub interpolation: InterpolationPolicy,
}

impl Default for TrendOptions {
    fn default() -> Self {
        Self {
            range: DEFAULT_START_YEAR..=DEFAULT_END_YEAR,
            interpolation: InterpolationPolicy::default(),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error, derive_more::From,
)]
pub enum TrendError {
    #[display("{_0}")]
    Aggregate(AggregateError),
    #[display("{_0}")]
    Range(RangeError),
}

/// Output of [`genre_trend`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreTrend {
    pub start: Year,
    pub end: Year,
    pub interpolation: InterpolationPolicy,
    /// Number of tracks that were classified and aggregated
    pub track_count: usize,
    /// Sparse per-year shares, as observed
    pub cells: Vec<ShareCell<Year>>,
    /// Dense series, one entry per year and label
    pub series: Vec<SeriesEntry>,
}

/// Runs the genre trend pipeline over `records`.
///
/// # Examples
///
/// ```
/// use genrescope_analysis::{
///     taxonomy::{Taxonomy, TaxonomyPreset},
///     track::TrackRecord,
///     trend::{TrendOptions, genre_trend},
/// };
///
/// let records: Vec<TrackRecord> = serde_json::from_str(
///     r#"[
///         { "Year": 1990, "Genre": "Synth Pop" },
///         { "Year": 1990, "Genre": "Hard Rock" },
///         { "Year": 1993, "Genre": "Hard Rock" },
///         { "Year": 1850, "Genre": "Opera" }
///     ]"#,
/// )
/// .unwrap();
///
/// let taxonomy = Taxonomy::preset(TaxonomyPreset::Century);
/// let options = TrendOptions {
///     range: 1990..=1993,
///     ..TrendOptions::default()
/// };
/// let trend = genre_trend(&records, &taxonomy, &options).unwrap();
///
/// assert_eq!(trend.track_count, 3);
/// assert_eq!(trend.series.len(), 8); // 4 years × {Hard Rock, Pop}
/// ```
pub fn genre_trend(
    records: &[TrackRecord],
    taxonomy: &Taxonomy,
    options: &TrendOptions,
) -> Result<GenreTrend, TrendError> {
    check_range(&options.range)?;
    let start = f64::from(*options.range.start());
    let end = f64::from(*options.range.end());

    let observations = records
        .iter()
        .filter_map(|record| {
            let year = record.year?;
            let genre = record.genre.as_ref()?;
            (start <= year && year <= end).then(|| (year, taxonomy.classify_value(genre).clone()))
        })
        .collect::<Vec<_>>();
    let track_count = observations.len();
    tracing::debug!(
        kept = track_count,
        dropped = records.len() - track_count,
        "classified tracks for genre trend"
    );

    let cells = aggregate_by_year(observations)?;
    let series = complete(&cells, options.range.clone(), options.interpolation)?;

    Ok(GenreTrend {
        start: *options.range.start(),
        end: *options.range.end(),
        interpolation: options.interpolation,
        track_count,
        cells,
        series,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::taxonomy::TaxonomyPreset;

    fn records() -> Vec<TrackRecord> {
        serde_json::from_value(json!([
            { "Year": 1990, "Genre": "dance pop" },
            { "Year": 1990, "Genre": "soft rock" },
            { "Year": 1990, "Genre": "soft rock, pop" },
            { "Year": 1990, "Genre": "pop" },
            { "Year": 1994, "Genre": "pop" },
            { "Year": 1994, "Genre": "soft rock" },
            { "Year": 1994, "Genre": 3 },
            { "Year": null, "Genre": "pop" },
            { "Year": 1992 },
            { "Year": 2050, "Genre": "pop" },
        ]))
        .unwrap()
    }

    fn options(range: RangeInclusive<Year>) -> TrendOptions {
        TrendOptions {
            range,
            ..TrendOptions::default()
        }
    }

    fn share_of(trend: &GenreTrend, year: Year, label: &str) -> f64 {
        trend
            .series
            .iter()
            .find(|e| e.bucket == year && e.label.as_str() == label)
            .map(|e| e.share)
            .unwrap()
    }

    #[test]
    fn test_pipeline() {
        let taxonomy = Taxonomy::preset(TaxonomyPreset::Century);
        let trend = genre_trend(&records(), &taxonomy, &options(1990..=1995)).unwrap();

        assert_eq!(trend.track_count, 7);
        // Labels observed: Pop, Soft Rock, Other -> 6 years x 3 labels
        assert_eq!(trend.series.len(), 18);

        assert!((share_of(&trend, 1990, "Pop") - 0.5).abs() < 1e-12);
        assert!((share_of(&trend, 1990, "Soft Rock") - 0.5).abs() < 1e-12);
        // 1990: Pop 0.5 -> 1994: Pop 1/3, interpolated in between
        let pop_1992 = share_of(&trend, 1992, "Pop");
        assert!((pop_1992 - (0.5 + 0.5 * (1.0 / 3.0 - 0.5))).abs() < 1e-12);
        // "Other" only observed in 1994; constant fill backwards and forwards
        assert!((share_of(&trend, 1990, "Other") - 1.0 / 3.0).abs() < 1e-12);
        assert!((share_of(&trend, 1995, "Other") - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_inverted_range() {
        let taxonomy = Taxonomy::default();
        let (min, max) = (2000, 1990);
        let err = genre_trend(&records(), &taxonomy, &options(min..=max)).unwrap_err();
        assert!(matches!(err, TrendError::Range(_)));
    }

    #[test]
    fn test_fractional_year_is_invalid_input() {
        let records: Vec<TrackRecord> =
            serde_json::from_value(json!([{ "year": 1990.5, "genre": "pop" }])).unwrap();
        let err = genre_trend(&records, &Taxonomy::default(), &options(1990..=1991)).unwrap_err();
        assert!(matches!(err, TrendError::Aggregate(_)));
    }

    #[test]
    fn test_repeatable_output() {
        let taxonomy = Taxonomy::default();
        let first = genre_trend(&records(), &taxonomy, &TrendOptions::default()).unwrap();
        let second = genre_trend(&records(), &taxonomy, &TrendOptions::default()).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(first.series.len(), 101 * 3);
    }
}
