//! Era-bucketed feature correlation against a target metric
//!
//! Tracks are partitioned into named eras by release year. Within each era,
//! every audio feature is correlated (Pearson) with the target metric,
//! typically popularity, producing an era × feature matrix.
//!
//! # Partitioning
//!
//! [`EraTable::era_of`] returns the first era whose inclusive year range
//! contains the track's year. Tracks without a year, or whose year falls in
//! no era, are left out of the panel entirely.
//!
//! # Missing Values
//!
//! Each `(feature, target)` pair uses only tracks where both columns hold a
//! number (pairwise complete case), so a missing `tempo` does not discard the
//! track's `energy` observation.
//!
//! # Undefined Cells
//!
//! A cell is [`Correlation::Undefined`] when the era has fewer than two paired
//! observations or when either column is constant. Undefined cells are kept
//! in the output so the matrix stays rectangular.
//!
//! # Examples
//!
//! ```
//! use genrescope_analysis::{
//!     correlation::{EraTable, build_correlation_panel},
//!     track::TrackRecord,
//! };
//!
//! let records: Vec<TrackRecord> = serde_json::from_str(
//!     r#"[
//!         { "year": 1975, "popularity": 10, "energy": 0.1 },
//!         { "year": 1980, "popularity": 20, "energy": 0.2 },
//!         { "year": 1985, "popularity": 30, "energy": 0.4 }
//!     ]"#,
//! )
//! .unwrap();
//!
//! let features = ["energy".to_owned()];
//! let panel = build_correlation_panel(&records, &EraTable::default(), &features, "popularity");
//!
//! assert_eq!(panel.cells.len(), 1);
//! assert_eq!(panel.cells[0].era, "1970-1989 (Classic Era)");
//! assert!(panel.cells[0].correlation.value().unwrap() > 0.9);
//! ```

use std::collections::HashMap;

use genrescope_stats::{
    correlation::{Correlation, pearson},
    descriptive::DescriptiveStats,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{share::Year, track::TrackRecord};

/// Audio features correlated by default.
pub const DEFAULT_FEATURES: [&str; 9] = [
    "danceability",
    "energy",
    "loudness",
    "acousticness",
    "valence",
    "speechiness",
    "instrumentalness",
    "liveness",
    "tempo",
];

pub const DEFAULT_TARGET: &str = "popularity";

/// A named, inclusive range of years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Era {
    pub name: String,
    pub start: Year,
    pub end: Year,
}

impl Era {
    #[must_use]
    pub fn new(name: &str, start: Year, end: Year) -> Self {
        Self {
            name: name.to_owned(),
            start,
            end,
        }
    }

    #[must_use]
    pub fn contains(&self, year: f64) -> bool {
        f64::from(self.start) <= year && year <= f64::from(self.end)
    }
}

/// Declarative form of an era table, as stored in JSON files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EraConfig {
    pub eras: Vec<Era>,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum EraError {
    #[display("era #{index} has an empty name")]
    EmptyName { index: usize },
    #[display("era '{name}' starts after it ends ({start} > {end})")]
    InvertedRange { name: String, start: Year, end: Year },
    #[display("eras '{first}' and '{second}' overlap")]
    Overlap { first: String, second: String },
}

/// Validated set of non-overlapping eras.
#[derive(Debug, Clone)]
pub struct EraTable {
    eras: Vec<Era>,
}

impl EraTable {
    pub fn new(eras: Vec<Era>) -> Result<Self, EraError> {
        for (index, era) in eras.iter().enumerate() {
            if era.name.trim().is_empty() {
                return Err(EraError::EmptyName { index });
            }
            if era.start > era.end {
                return Err(EraError::InvertedRange {
                    name: era.name.clone(),
                    start: era.start,
                    end: era.end,
                });
            }
        }

        let mut sorted = eras.iter().collect::<Vec<_>>();
        sorted.sort_by_key(|era| era.start);
        if let Some(pair) = sorted.windows(2).find(|pair| pair[1].start <= pair[0].end) {
            return Err(EraError::Overlap {
                first: pair[0].name.clone(),
                second: pair[1].name.clone(),
            });
        }

        Ok(Self { eras })
    }

    pub fn from_config(config: EraConfig) -> Result<Self, EraError> {
        Self::new(config.eras)
    }

    /// Returns the era containing `year`, if any.
    #[must_use]
    pub fn era_of(&self, year: f64) -> Option<&Era> {
        self.eras.iter().find(|era| era.contains(year))
    }

    #[must_use]
    pub fn eras(&self) -> &[Era] {
        &self.eras
    }
}

impl Default for EraTable {
    fn default() -> Self {
        Self {
            eras: vec![
                Era::new("1970-1989 (Classic Era)", 1970, 1989),
                Era::new("1990-2009 (Transition Era)", 1990, 2009),
                Era::new("2010-2020 (Modern Era)", 2010, 2020),
            ],
        }
    }
}

/// Correlation of one feature with the target within one era.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EraCorrelationCell {
    pub era: String,
    pub feature: String,
    #[serde(flatten)]
    pub correlation: Correlation,
    /// Number of tracks with both the feature and the target present
    pub paired_count: usize,
}

/// Per-era overview shown next to the correlation matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EraSummary {
    pub era: String,
    pub track_count: usize,
    /// Distribution of the target metric, if any track in the era has it
    pub target: Option<DescriptiveStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationPanel {
    pub target: String,
    /// Cells ordered by era (first appearance in the input), then feature
    pub cells: Vec<EraCorrelationCell>,
    /// One entry per era present in the input, same order as `cells`
    pub eras: Vec<EraSummary>,
}

/// Correlates each of `features` with `target` inside every era.
///
/// Eras appear in the order their first track appears in `records`; eras
/// without any track are omitted. Eras are processed in parallel.
#[must_use]
pub fn build_correlation_panel(
    records: &[TrackRecord],
    eras: &EraTable,
    features: &[String],
    target: &str,
) -> CorrelationPanel {
    let mut groups: Vec<(&Era, Vec<&TrackRecord>)> = vec![];
    let mut group_index: HashMap<&str, usize> = HashMap::new();
    let mut dropped = 0_usize;
    for record in records {
        let Some(era) = record.year.and_then(|year| eras.era_of(year)) else {
            dropped += 1;
            continue;
        };
        let index = *group_index.entry(era.name.as_str()).or_insert_with(|| {
            groups.push((era, vec![]));
            groups.len() - 1
        });
        groups[index].1.push(record);
    }
    tracing::debug!(
        eras = groups.len(),
        dropped,
        "partitioned tracks for correlation"
    );

    let per_era = groups
        .par_iter()
        .map(|(era, tracks)| {
            let cells = features
                .iter()
                .map(|feature| {
                    let pairs = tracks
                        .iter()
                        .filter_map(|t| Some((t.numeric(feature)?, t.numeric(target)?)))
                        .collect::<Vec<_>>();
                    EraCorrelationCell {
                        era: era.name.clone(),
                        feature: feature.clone(),
                        paired_count: pairs.len(),
                        correlation: pearson(pairs),
                    }
                })
                .collect::<Vec<_>>();
            let summary = EraSummary {
                era: era.name.clone(),
                track_count: tracks.len(),
                target: DescriptiveStats::new(tracks.iter().filter_map(|t| t.numeric(target))),
            };
            (cells, summary)
        })
        .collect::<Vec<_>>();

    let (cells, summaries): (Vec<_>, Vec<_>) = per_era.into_iter().unzip();
    CorrelationPanel {
        target: target.to_owned(),
        cells: cells.into_iter().flatten().collect(),
        eras: summaries,
    }
}

#[cfg(test)]
mod tests {
    use genrescope_stats::correlation::UndefinedReason;
    use serde_json::json;

    use super::*;

    fn records(value: serde_json::Value) -> Vec<TrackRecord> {
        serde_json::from_value(value).unwrap()
    }

    fn features(names: &[&str]) -> Vec<String> {
        names.iter().map(|&s| s.to_owned()).collect()
    }

    #[test]
    fn test_era_of() {
        let eras = EraTable::default();
        assert_eq!(eras.era_of(1970.0).unwrap().start, 1970);
        assert_eq!(eras.era_of(1989.0).unwrap().start, 1970);
        assert_eq!(eras.era_of(2009.0).unwrap().start, 1990);
        assert_eq!(eras.era_of(2020.0).unwrap().start, 2010);
        assert!(eras.era_of(1969.0).is_none());
        assert!(eras.era_of(2021.0).is_none());
        assert!(eras.era_of(f64::NAN).is_none());
    }

    #[test]
    fn test_era_table_validation() {
        assert!(matches!(
            EraTable::new(vec![Era::new("bad", 2000, 1990)]),
            Err(EraError::InvertedRange { .. })
        ));
        assert!(matches!(
            EraTable::new(vec![Era::new("a", 1990, 2000), Era::new("b", 2000, 2010)]),
            Err(EraError::Overlap { .. })
        ));
        assert!(matches!(
            EraTable::new(vec![Era::new(" ", 1990, 2000)]),
            Err(EraError::EmptyName { index: 0 })
        ));
        assert!(EraTable::new(vec![Era::new("b", 2001, 2010), Era::new("a", 1990, 2000)]).is_ok());
    }

    #[test]
    fn test_constant_feature_is_undefined() {
        let records = records(json!([
            { "year": 1995, "popularity": 10, "energy": 0.5, "tempo": 100 },
            { "year": 1996, "popularity": 50, "energy": 0.5, "tempo": 120 },
            { "year": 1997, "popularity": 90, "energy": 0.5, "tempo": 140 },
        ]));
        let panel = build_correlation_panel(
            &records,
            &EraTable::default(),
            &features(&["energy", "tempo"]),
            "popularity",
        );

        assert_eq!(panel.cells.len(), 2);
        assert_eq!(
            panel.cells[0].correlation,
            Correlation::Undefined {
                reason: UndefinedReason::ZeroVariance
            }
        );
        assert!((panel.cells[1].correlation.value().unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pairwise_complete_case() {
        let records = records(json!([
            { "year": 2012, "popularity": 10, "energy": 0.1, "tempo": 90 },
            { "year": 2013, "popularity": 20, "energy": 0.2 },
            { "year": 2014, "popularity": 30, "energy": 0.3, "tempo": null },
            { "year": 2015, "energy": 0.9, "tempo": 200 },
        ]));
        let panel = build_correlation_panel(
            &records,
            &EraTable::default(),
            &features(&["energy", "tempo"]),
            "popularity",
        );

        let energy = &panel.cells[0];
        assert_eq!(energy.paired_count, 3);
        assert!((energy.correlation.value().unwrap() - 1.0).abs() < 1e-12);

        let tempo = &panel.cells[1];
        assert_eq!(tempo.paired_count, 1);
        assert_eq!(
            tempo.correlation,
            Correlation::Undefined {
                reason: UndefinedReason::InsufficientSamples
            }
        );
    }

    #[test]
    fn test_ordering_follows_era_appearance_then_features() {
        let records = records(json!([
            { "year": 2015, "popularity": 1, "energy": 0.1, "valence": 0.3 },
            { "year": 1975, "popularity": 2, "energy": 0.2, "valence": 0.2 },
            { "year": 1950, "popularity": 3, "energy": 0.3, "valence": 0.1 },
            { "popularity": 3, "energy": 0.3, "valence": 0.1 },
            { "year": 2016, "popularity": 4, "energy": 0.4, "valence": 0.0 },
        ]));
        let panel = build_correlation_panel(
            &records,
            &EraTable::default(),
            &features(&["valence", "energy"]),
            "popularity",
        );

        let order = panel
            .cells
            .iter()
            .map(|c| (c.era.as_str(), c.feature.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            order,
            vec![
                ("2010-2020 (Modern Era)", "valence"),
                ("2010-2020 (Modern Era)", "energy"),
                ("1970-1989 (Classic Era)", "valence"),
                ("1970-1989 (Classic Era)", "energy"),
            ]
        );
        assert_eq!(panel.eras.len(), 2);
        assert_eq!(panel.eras[0].track_count, 2);
        assert_eq!(panel.eras[1].track_count, 1);
        assert_eq!(panel.eras[0].target.as_ref().unwrap().mean, 2.5);
    }

    #[test]
    fn test_cell_serialization() {
        let cell = EraCorrelationCell {
            era: "e".to_owned(),
            feature: "energy".to_owned(),
            correlation: Correlation::Undefined {
                reason: UndefinedReason::ZeroVariance,
            },
            paired_count: 4,
        };
        assert_eq!(
            serde_json::to_value(&cell).unwrap(),
            json!({
                "era": "e",
                "feature": "energy",
                "status": "undefined",
                "reason": "zero_variance",
                "paired_count": 4
            })
        );
    }

    #[test]
    fn test_era_config_from_json() {
        let config: EraConfig = serde_json::from_value(json!({
            "eras": [{ "name": "Nineties", "start": 1990, "end": 1999 }]
        }))
        .unwrap();
        let table = EraTable::from_config(config).unwrap();
        assert_eq!(table.era_of(1995.0).unwrap().name, "Nineties");
    }
}
