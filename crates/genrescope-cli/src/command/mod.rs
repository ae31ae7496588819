use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use self::{
    country_shares::CountrySharesArg,
    feature_correlation::FeatureCorrelationArg,
    genre_trends::GenreTrendsArg,
    taxonomy::{ClassifyArg, ShowTaxonomyArg},
};

mod country_shares;
mod feature_correlation;
mod genre_trends;
mod taxonomy;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log debug events (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// What to compute
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Per-year genre shares as a gap-free series
    GenreTrends(#[clap(flatten)] GenreTrendsArg),
    /// Per-country genre shares with a global-average row
    CountryShares(#[clap(flatten)] CountrySharesArg),
    /// Per-era correlation of audio features with a target metric
    FeatureCorrelation(#[clap(flatten)] FeatureCorrelationArg),
    /// Classify genre strings
    Classify(#[clap(flatten)] ClassifyArg),
    /// Print a taxonomy rule table as JSON
    Taxonomy(#[clap(flatten)] ShowTaxonomyArg),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_tracing(args.verbose);
    match args.mode {
        Mode::GenreTrends(arg) => genre_trends::run(&arg)?,
        Mode::CountryShares(arg) => country_shares::run(&arg)?,
        Mode::FeatureCorrelation(arg) => feature_correlation::run(&arg)?,
        Mode::Classify(arg) => taxonomy::run_classify(&arg)?,
        Mode::Taxonomy(arg) => taxonomy::run_show(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_genre_trends() {
        let args = CommandArgs::try_parse_from([
            "genrescope",
            "genre-trends",
            "tracks.json",
            "--start",
            "1950",
            "--interpolation",
            "zero",
            "-v",
        ])
        .unwrap();
        assert!(args.verbose);
        let Mode::GenreTrends(arg) = args.mode else {
            panic!("unexpected mode");
        };
        assert_eq!(arg.start, 1950);
        assert_eq!(arg.end, genrescope_analysis::trend::DEFAULT_END_YEAR);
    }

    #[test]
    fn test_taxonomy_file_conflicts_with_preset() {
        let result = CommandArgs::try_parse_from([
            "genrescope",
            "classify",
            "--taxonomy",
            "global",
            "--taxonomy-file",
            "rules.json",
            "pop",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_feature_list_is_comma_separated() {
        let args = CommandArgs::try_parse_from([
            "genrescope",
            "feature-correlation",
            "tracks.json",
            "--features",
            "energy,tempo",
        ])
        .unwrap();
        let Mode::FeatureCorrelation(arg) = args.mode else {
            panic!("unexpected mode");
        };
        assert_eq!(arg.features, vec!["energy", "tempo"]);
        assert_eq!(arg.target, "popularity");
    }
}
