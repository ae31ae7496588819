//! Taxonomy inspection commands

use std::path::PathBuf;

use genrescope_analysis::taxonomy::{Taxonomy, TaxonomyPreset};
use serde::Serialize;

use crate::util::{self, TaxonomyArg};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ClassifyArg {
    #[clap(flatten)]
    pub taxonomy: TaxonomyArg,

    /// Genre strings to classify
    #[arg(required = true)]
    pub texts: Vec<String>,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ShowTaxonomyArg {
    #[clap(flatten)]
    pub taxonomy: TaxonomyArg,

    /// Output file path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Classification<'a> {
    text: &'a str,
    label: &'a str,
}

fn classify_all<'a>(taxonomy: &'a Taxonomy, texts: &'a [String]) -> Vec<Classification<'a>> {
    texts
        .iter()
        .map(|text| Classification {
            text,
            label: taxonomy.classify(text).as_str(),
        })
        .collect()
}

pub(crate) fn run_classify(arg: &ClassifyArg) -> anyhow::Result<()> {
    let taxonomy = arg.taxonomy.load(TaxonomyPreset::Century)?;
    let classifications = classify_all(&taxonomy, &arg.texts);
    util::save_json(&classifications, None)
}

pub(crate) fn run_show(arg: &ShowTaxonomyArg) -> anyhow::Result<()> {
    let taxonomy = arg.taxonomy.load(TaxonomyPreset::Century)?;
    tracing::info!(
        "Taxonomy has {} rules and {} labels (catch-all: {})",
        taxonomy.config().rules.len(),
        taxonomy.labels().len(),
        taxonomy.catch_all()
    );
    util::save_json(taxonomy.config(), arg.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_all() {
        let taxonomy = Taxonomy::preset(TaxonomyPreset::Century);
        let texts = ["Soft Rock, Pop", "", "polka"].map(str::to_owned);
        let labels = classify_all(&taxonomy, &texts)
            .into_iter()
            .map(|c| c.label)
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["Soft Rock", "Other", "Other"]);
    }
}
