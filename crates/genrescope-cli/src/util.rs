use std::{
    fmt::Write as _,
    fs::{self, File},
    io::{self, BufWriter, StdoutLock, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use genrescope_analysis::{
    correlation::{EraConfig, EraTable},
    taxonomy::{Taxonomy, TaxonomyConfig, TaxonomyPreset},
    track::TrackRecord,
};

/// Destination of a JSON result: the `--output` file if given, stdout otherwise
#[derive(Debug)]
enum Output {
    Stdout(StdoutLock<'static>),
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    fn create(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Output::Stdout(io::stdout().lock()));
        };
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path: path.to_owned(),
        })
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Output::Stdout(writer) => writer,
            Output::File { writer, .. } => writer,
        }
    }

    fn describe(&self) -> String {
        match self {
            Output::Stdout(_) => "stdout".to_owned(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }
}

/// Write `value` as pretty-printed JSON to `output_path`, or to stdout
pub fn save_json<T>(value: &T, output_path: Option<&Path>) -> anyhow::Result<()>
where
    T: serde::Serialize + ?Sized,
{
    let mut output = Output::create(output_path)?;
    let target = output.describe();
    let writer = output.writer();
    serde_json::to_writer_pretty(&mut *writer, value)
        .with_context(|| format!("Failed to write JSON to {target}"))?;
    writeln!(writer).with_context(|| format!("Failed to write JSON to {target}"))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush output to {target}"))?;

    if let Output::File { path, .. } = &output {
        tracing::info!("Saved JSON to {}", path.display());
    }
    Ok(())
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Read track records from a JSON array file
pub fn read_tracks_file<P>(path: P) -> anyhow::Result<Vec<TrackRecord>>
where
    P: AsRef<Path>,
{
    let tracks: Vec<TrackRecord> = read_json_file("tracks", &path)?;
    tracing::info!(
        "Loaded {} tracks from {}",
        tracks.len(),
        path.as_ref().display()
    );
    Ok(tracks)
}

/// Read and validate an era table
///
/// Without a path, the built-in three-era table is used.
pub fn load_era_table(path: Option<&Path>) -> anyhow::Result<EraTable> {
    let Some(path) = path else {
        return Ok(EraTable::default());
    };
    let config: EraConfig = read_json_file("eras", path)?;
    EraTable::from_config(config)
        .with_context(|| format!("Invalid era table: {}", path.display()))
}

/// Taxonomy selection shared by every subcommand that classifies genres
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TaxonomyArg {
    /// Built-in taxonomy (century, global) [default depends on the subcommand]
    #[arg(long, conflicts_with = "taxonomy_file")]
    pub taxonomy: Option<TaxonomyPreset>,

    /// Path to a custom taxonomy JSON file
    #[arg(long)]
    pub taxonomy_file: Option<PathBuf>,
}

impl TaxonomyArg {
    pub fn load(&self, default_preset: TaxonomyPreset) -> anyhow::Result<Taxonomy> {
        let Some(path) = &self.taxonomy_file else {
            return Ok(Taxonomy::preset(self.taxonomy.unwrap_or(default_preset)));
        };
        let config: TaxonomyConfig = read_json_file("taxonomy", path)?;
        let taxonomy = Taxonomy::new(config)
            .with_context(|| format!("Invalid taxonomy: {}", path.display()))?;
        tracing::info!(
            "Loaded taxonomy with {} labels from {}",
            taxonomy.labels().len(),
            path.display()
        );
        Ok(taxonomy)
    }
}

/// Quote a CSV field if it contains a separator, quote or line break
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

/// Write `rows` under `header` to a CSV file
pub fn save_csv<I>(path: &Path, header: &str, rows: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut csv_content = format!("{header}\n");
    for row in rows {
        let line = row
            .iter()
            .map(|field| csv_field(field))
            .collect::<Vec<_>>()
            .join(",");
        writeln!(&mut csv_content, "{line}").context("Failed to format CSV row")?;
    }

    fs::write(path, csv_content)
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    tracing::info!("Saved CSV to {}", path.display());

    Ok(())
}
