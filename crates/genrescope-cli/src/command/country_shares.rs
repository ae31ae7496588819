//! Country share command
//!
//! Classifies chart tracks with the global taxonomy (by default) and reports
//! each label's share per country alongside the pooled global average.

use std::path::PathBuf;

use genrescope_analysis::{country::CountryShares, share::ShareCell, taxonomy::TaxonomyPreset};

use crate::util::{self, TaxonomyArg};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CountrySharesArg {
    /// Path to the chart tracks JSON file
    pub tracks: PathBuf,

    #[clap(flatten)]
    pub taxonomy: TaxonomyArg,

    /// Output file path for the JSON result
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Also write all rows, global average last, as CSV to this path
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

pub(crate) fn run(arg: &CountrySharesArg) -> anyhow::Result<()> {
    let taxonomy = arg.taxonomy.load(TaxonomyPreset::Global)?;
    let tracks = util::read_tracks_file(&arg.tracks)?;

    tracing::info!("Computing country shares...");
    let shares = CountryShares::from_records(&tracks, &taxonomy);
    tracing::info!(
        "Computed shares for {} countries",
        shares.country_names().len()
    );

    print_dominant_labels(&shares);

    if let Some(path) = &arg.csv {
        util::save_csv(path, "country,label,count,share", shares.rows().map(csv_row))?;
    }
    util::save_json(&shares, arg.output.as_deref())?;

    Ok(())
}

fn csv_row(cell: &ShareCell<String>) -> Vec<String> {
    vec![
        cell.bucket.clone(),
        cell.label.to_string(),
        cell.count.to_string(),
        cell.share.to_string(),
    ]
}

/// Print the largest label of every country, then of the global average
fn print_dominant_labels(shares: &CountryShares) {
    let mut dominant: Vec<&ShareCell<String>> = vec![];
    for cell in shares.rows() {
        match dominant.last_mut() {
            Some(top) if top.bucket == cell.bucket => {
                if cell.share > top.share {
                    *top = cell;
                }
            }
            _ => dominant.push(cell),
        }
    }

    eprintln!("Dominant Label per Country");
    eprintln!("==========================================");
    eprintln!("{:<24} {:<24} {:>8}", "Country", "Label", "Share");
    for cell in dominant {
        eprintln!(
            "{:<24} {:<24} {:>7.1}%",
            cell.bucket,
            cell.label.as_str(),
            100.0 * cell.share
        );
    }
}

#[cfg(test)]
mod tests {
    use genrescope_analysis::taxonomy::Label;

    use super::*;

    #[test]
    fn test_csv_row() {
        let cell = ShareCell {
            bucket: "south korea".to_owned(),
            label: Label::from("K-Pop"),
            count: 3,
            share: 0.06,
        };
        assert_eq!(csv_row(&cell), vec!["south korea", "K-Pop", "3", "0.06"]);
    }
}
