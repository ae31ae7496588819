//! Per-country genre shares
//!
//! Chart exports list the top tracks per country. This view classifies every
//! track and reports each label's share of its country's chart, plus a
//! global-average row computed over all classified tracks.
//!
//! The global row is the label distribution of the pooled tracks, not the mean
//! of per-country shares: a country with more chart entries weighs more.
//! Tracks without a country only contribute to the global row.

use serde::Serialize;

use crate::{
    share::{ShareCell, aggregate_shares},
    taxonomy::Taxonomy,
    track::TrackRecord,
};

/// Bucket name of the pooled distribution.
pub const GLOBAL_AVERAGE: &str = "Global Average";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryShares {
    /// Cells ordered by country, then label
    pub countries: Vec<ShareCell<String>>,
    /// Pooled distribution, every cell bucketed under [`GLOBAL_AVERAGE`]
    pub global_average: Vec<ShareCell<String>>,
}

impl CountryShares {
    /// Classifies `records` and aggregates them per country.
    ///
    /// Records without a genre are dropped.
    #[must_use]
    pub fn from_records(records: &[TrackRecord], taxonomy: &Taxonomy) -> Self {
        let labelled = records
            .iter()
            .filter_map(|record| Some((record, record.label(taxonomy)?)))
            .collect::<Vec<_>>();
        tracing::debug!(
            kept = labelled.len(),
            dropped = records.len() - labelled.len(),
            "classified chart tracks"
        );

        let countries = aggregate_shares(labelled.iter().filter_map(|(record, label)| {
            Some((record.country.clone()?, (*label).clone()))
        }));
        let global_average = aggregate_shares(
            labelled
                .iter()
                .map(|(_, label)| (GLOBAL_AVERAGE.to_owned(), (*label).clone())),
        );

        Self {
            countries,
            global_average,
        }
    }

    /// All rows: per-country cells followed by the global-average cells.
    pub fn rows(&self) -> impl Iterator<Item = &ShareCell<String>> {
        self.countries.iter().chain(&self.global_average)
    }

    /// Distinct countries in bucket order.
    #[must_use]
    pub fn country_names(&self) -> Vec<&str> {
        let mut names = self
            .countries
            .iter()
            .map(|cell| cell.bucket.as_str())
            .collect::<Vec<_>>();
        names.dedup();
        names
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::taxonomy::TaxonomyPreset;

    #[test]
    fn test_country_and_global_rows() {
        let records: Vec<TrackRecord> = serde_json::from_value(json!([
            { "country": "japan", "top genre": "j-pop" },
            { "country": "japan", "top genre": "anime" },
            { "country": "japan", "top genre": "j-rock" },
            { "country": "mexico", "top genre": "latin" },
            { "top genre": "latin pop" },
            { "country": "mexico" },
        ]))
        .unwrap();
        let taxonomy = Taxonomy::preset(TaxonomyPreset::Global);
        let shares = CountryShares::from_records(&records, &taxonomy);

        let countries = shares
            .countries
            .iter()
            .map(|c| (c.bucket.as_str(), c.label.as_str(), c.count))
            .collect::<Vec<_>>();
        assert_eq!(
            countries,
            vec![
                ("japan", "Other", 1),
                ("japan", "Pop", 1),
                ("japan", "Rock", 1),
                ("mexico", "Latin", 1),
            ]
        );
        assert_eq!(shares.country_names(), vec!["japan", "mexico"]);

        // 5 classified tracks: Pop x2 (j-pop, latin pop), Other, Rock, Latin
        let global = shares
            .global_average
            .iter()
            .map(|c| (c.label.as_str(), c.count))
            .collect::<Vec<_>>();
        assert_eq!(
            global,
            vec![("Latin", 1), ("Other", 1), ("Pop", 2), ("Rock", 1)]
        );
        assert!(
            shares
                .global_average
                .iter()
                .all(|c| c.bucket == GLOBAL_AVERAGE)
        );
        assert!((shares.global_average[2].share - 0.4).abs() < 1e-12);
        assert_eq!(shares.rows().count(), 8);
    }
}
