//! Genre trend command
//!
//! Classifies every track, aggregates label shares per year, and completes the
//! series over the requested range so a stacked-area chart can be drawn
//! without holes.

use std::path::PathBuf;

use anyhow::Context;
use genrescope_analysis::{
    completion::SeriesEntry,
    taxonomy::TaxonomyPreset,
    trend::{DEFAULT_END_YEAR, DEFAULT_START_YEAR, GenreTrend, TrendOptions, genre_trend},
};
use genrescope_stats::interpolation::InterpolationPolicy;

use crate::util::{self, TaxonomyArg};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GenreTrendsArg {
    /// Path to the tracks JSON file
    pub tracks: PathBuf,

    #[clap(flatten)]
    pub taxonomy: TaxonomyArg,

    /// First year of the series
    #[arg(long, default_value_t = DEFAULT_START_YEAR)]
    pub start: i32,

    /// Last year of the series (inclusive)
    #[arg(long, default_value_t = DEFAULT_END_YEAR)]
    pub end: i32,

    /// How to fill years without observations (linear, zero)
    #[arg(long, default_value = "linear")]
    pub interpolation: InterpolationPolicy,

    /// Output file path for the JSON result
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Also write the completed series as CSV to this path
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

pub(crate) fn run(arg: &GenreTrendsArg) -> anyhow::Result<()> {
    let taxonomy = arg.taxonomy.load(TaxonomyPreset::Century)?;
    let tracks = util::read_tracks_file(&arg.tracks)?;

    let options = TrendOptions {
        range: arg.start..=arg.end,
        interpolation: arg.interpolation,
    };
    tracing::info!(
        "Computing genre trend for {}-{} ({:?} interpolation)...",
        arg.start,
        arg.end,
        arg.interpolation
    );
    let trend =
        genre_trend(&tracks, &taxonomy, &options).context("Failed to compute genre trend")?;
    tracing::info!(
        "Classified {} of {} tracks into {} series entries",
        trend.track_count,
        tracks.len(),
        trend.series.len()
    );

    print_summary(&trend);

    if let Some(path) = &arg.csv {
        util::save_csv(
            path,
            "year,label,share,observed",
            trend.series.iter().map(csv_row),
        )?;
    }
    util::save_json(&trend, arg.output.as_deref())?;

    Ok(())
}

fn csv_row(entry: &SeriesEntry) -> Vec<String> {
    vec![
        entry.bucket.to_string(),
        entry.label.to_string(),
        entry.share.to_string(),
        entry.observed.to_string(),
    ]
}

/// Print each label's mean share and the number of observed years
#[expect(clippy::cast_precision_loss)]
fn print_summary(trend: &GenreTrend) {
    let years = (trend.start..=trend.end).count();
    let mut labels: Vec<(&str, f64, usize)> = vec![];
    for entry in &trend.series {
        let index = match labels.iter().position(|(l, ..)| *l == entry.label.as_str()) {
            Some(index) => index,
            None => {
                labels.push((entry.label.as_str(), 0.0, 0));
                labels.len() - 1
            }
        };
        labels[index].1 += entry.share;
        labels[index].2 += usize::from(entry.observed);
    }

    eprintln!("Genre Trend {}-{}", trend.start, trend.end);
    eprintln!("==========================================");
    eprintln!("{:<24} {:>10} {:>10}", "Label", "Mean", "Observed");
    for (label, total, observed) in labels {
        eprintln!(
            "{label:<24} {:>9.1}% {observed:>5}/{years}",
            100.0 * total / years as f64
        );
    }
}
