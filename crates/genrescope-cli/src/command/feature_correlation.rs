//! Feature correlation command
//!
//! Partitions tracks into eras and correlates each audio feature with the
//! target metric inside every era.

use std::path::PathBuf;

use genrescope_analysis::correlation::{
    CorrelationPanel, DEFAULT_FEATURES, DEFAULT_TARGET, EraCorrelationCell, build_correlation_panel,
};
use genrescope_stats::correlation::Correlation;

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct FeatureCorrelationArg {
    /// Path to the tracks JSON file
    pub tracks: PathBuf,

    /// Path to an era table JSON file (defaults to three eras from 1970 to 2020)
    #[arg(long)]
    pub eras_file: Option<PathBuf>,

    /// Feature fields to correlate (comma-separated)
    #[arg(long, value_delimiter = ',', default_values = DEFAULT_FEATURES)]
    pub features: Vec<String>,

    /// Target metric field
    #[arg(long, default_value = DEFAULT_TARGET)]
    pub target: String,

    /// Output file path for the JSON result
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Also write the correlation cells as CSV to this path
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

pub(crate) fn run(arg: &FeatureCorrelationArg) -> anyhow::Result<()> {
    let eras = util::load_era_table(arg.eras_file.as_deref())?;
    let tracks = util::read_tracks_file(&arg.tracks)?;

    tracing::info!(
        "Correlating {} features with {} across {} eras...",
        arg.features.len(),
        arg.target,
        eras.eras().len()
    );
    let panel = build_correlation_panel(&tracks, &eras, &arg.features, &arg.target);
    let undefined = panel
        .cells
        .iter()
        .filter(|cell| !cell.correlation.is_defined())
        .count();
    if undefined > 0 {
        tracing::warn!("{undefined} of {} correlations are undefined", panel.cells.len());
    }

    print_matrix(&panel);

    if let Some(path) = &arg.csv {
        util::save_csv(
            path,
            "era,feature,correlation,status,paired_count",
            panel.cells.iter().map(csv_row),
        )?;
    }
    util::save_json(&panel, arg.output.as_deref())?;

    Ok(())
}

fn csv_row(cell: &EraCorrelationCell) -> Vec<String> {
    let (value, status) = match cell.correlation {
        Correlation::Defined { value } => (value.to_string(), "defined".to_owned()),
        Correlation::Undefined { reason } => (String::new(), format!("undefined: {reason}")),
    };
    vec![
        cell.era.clone(),
        cell.feature.clone(),
        value,
        status,
        cell.paired_count.to_string(),
    ]
}

/// Print the era × feature matrix, `n/a` for undefined cells
fn print_matrix(panel: &CorrelationPanel) {
    eprintln!("Correlation with {}", panel.target);
    eprintln!("==========================================");
    for summary in &panel.eras {
        eprint!("{} ({} tracks", summary.era, summary.track_count);
        if let Some(stats) = &summary.target {
            eprint!(", mean {} {:.1}", panel.target, stats.mean);
        }
        eprintln!(")");
        for cell in panel.cells.iter().filter(|cell| cell.era == summary.era) {
            match cell.correlation.value() {
                Some(value) => eprintln!("  {:<20} {value:>7.3}", cell.feature),
                None => eprintln!("  {:<20} {:>7}", cell.feature, "n/a"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use genrescope_stats::correlation::UndefinedReason;

    use super::*;

    #[test]
    fn test_csv_row() {
        let defined = EraCorrelationCell {
            era: "1990-2009 (Transition Era)".to_owned(),
            feature: "energy".to_owned(),
            correlation: Correlation::Defined { value: 0.5 },
            paired_count: 12,
        };
        assert_eq!(
            csv_row(&defined),
            vec!["1990-2009 (Transition Era)", "energy", "0.5", "defined", "12"]
        );

        let undefined = EraCorrelationCell {
            correlation: Correlation::Undefined {
                reason: UndefinedReason::ZeroVariance,
            },
            ..defined
        };
        assert_eq!(
            csv_row(&undefined),
            vec![
                "1990-2009 (Transition Era)",
                "energy",
                "",
                "undefined: zero variance",
                "12"
            ]
        );
    }
}
