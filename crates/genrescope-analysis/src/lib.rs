//! Data shaping for music catalog analysis
//!
//! This crate turns raw catalog exports (one JSON object per track) into
//! views a chart renderer can draw directly. It does no rendering itself.
//!
//! # Overview
//!
//! ## Genre Trend Workflow
//!
//! Normalize free-text genres and build a gap-free share series per year:
//!
//! 1. **Load Tracks** ([`track::TrackRecord`]): Deserialize the catalog export
//! 2. **Classify** ([`taxonomy::Taxonomy`]): Map each genre string onto a
//!    controlled label set using an ordered rule table
//! 3. **Aggregate** ([`share::aggregate_by_year`]): Count tracks per
//!    `(year, label)` and compute each label's share of its year
//! 4. **Complete** ([`completion::complete`]): Build the dense year × label
//!    grid, filling absent pairs by interpolation
//!
//! [`trend::genre_trend`] runs all four steps.
//!
//! ## Country Share Workflow
//!
//! [`country::CountryShares`] classifies chart tracks and computes each
//! label's share per country, plus a pooled global-average distribution.
//!
//! ## Feature Correlation Workflow
//!
//! [`correlation::build_correlation_panel`] partitions tracks into eras
//! ([`correlation::EraTable`]) and correlates audio features with a target
//! metric inside each era.
//!
//! # Configuration
//!
//! Taxonomies and era tables are values, not globals. Build them from JSON
//! ([`taxonomy::TaxonomyConfig`], [`correlation::EraConfig`]) or use the
//! built-in defaults, and pass them to each pipeline explicitly.
//!
//! # Examples
//!
//! ```
//! use genrescope_analysis::{
//!     taxonomy::{Taxonomy, TaxonomyPreset},
//!     track::TrackRecord,
//!     trend::{TrendOptions, genre_trend},
//! };
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let records: Vec<TrackRecord> = serde_json::from_str(
//!     r#"[
//!         { "Year": 1965, "Genre": "Motown Soul" },
//!         { "Year": 1967, "Genre": "Psychedelic Rock" },
//!         { "Year": 1967, "Genre": "Soul" }
//!     ]"#,
//! )?;
//!
//! let taxonomy = Taxonomy::preset(TaxonomyPreset::Century);
//! let options = TrendOptions {
//!     range: 1965..=1967,
//!     ..TrendOptions::default()
//! };
//! let trend = genre_trend(&records, &taxonomy, &options)?;
//!
//! for entry in &trend.series {
//!     println!("{} {:<6} {:.2}", entry.bucket, entry.label, entry.share);
//! }
//! # Ok(())
//! # }
//! ```

pub mod completion;
pub mod correlation;
pub mod country;
pub mod share;
pub mod taxonomy;
pub mod track;
pub mod trend;
