use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use doc_sentiment::classifier::{DeviceRequest, SentimentClassifierBuilder};
use doc_sentiment::config::{
    ScoringConfig, DEFAULT_ID_COLUMN, DEFAULT_INPUT, DEFAULT_MODEL, DEFAULT_OUTPUT,
    DEFAULT_PREVIEW_ROWS, DEFAULT_TEXT_COLUMN,
};
use doc_sentiment::pipeline;
use doc_sentiment::table::ScoredDocument;
use doc_sentiment::text::DEFAULT_MAX_CHARS;
use tracing_subscriber::EnvFilter;

/// Score the sentiment of every document in a CSV table.
#[derive(Parser, Debug)]
#[command(name = "doc-sentiment", version, about)]
struct Cli {
    /// Input table with id and text columns
    #[arg(long, env = "DOC_SENTIMENT_INPUT", default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Output table (doc_id, sentiment_score, sentiment_intensity)
    #[arg(long, env = "DOC_SENTIMENT_OUTPUT", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Hugging Face model id or local model directory
    #[arg(long, env = "DOC_SENTIMENT_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Hub revision (branch, tag or commit) to load
    #[arg(long, env = "DOC_SENTIMENT_REVISION")]
    revision: Option<String>,

    /// Maximum chunk length in characters
    #[arg(long, env = "DOC_SENTIMENT_MAX_CHARS", default_value_t = DEFAULT_MAX_CHARS)]
    max_chars: usize,

    /// Column holding document identifiers
    #[arg(long, env = "DOC_SENTIMENT_ID_COLUMN", default_value = DEFAULT_ID_COLUMN)]
    id_column: String,

    /// Column holding document text
    #[arg(long, env = "DOC_SENTIMENT_TEXT_COLUMN", default_value = DEFAULT_TEXT_COLUMN)]
    text_column: String,

    /// Input field delimiter (single ASCII character)
    #[arg(long, env = "DOC_SENTIMENT_DELIMITER", default_value_t = ',')]
    delimiter: char,

    /// Rows of output to print when done
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    preview_rows: usize,

    /// Run on this CUDA device instead of the CPU
    #[arg(long, env = "DOC_SENTIMENT_CUDA")]
    cuda: Option<usize>,

    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> Result<ScoringConfig> {
        anyhow::ensure!(
            self.delimiter.is_ascii(),
            "delimiter must be a single ASCII character, got {:?}",
            self.delimiter
        );

        Ok(ScoringConfig {
            input: self.input,
            output: self.output,
            model: self.model,
            revision: self.revision,
            max_chars: self.max_chars,
            id_column: self.id_column,
            text_column: self.text_column,
            delimiter: self.delimiter as u8,
            preview_rows: self.preview_rows,
            device: match self.cuda {
                Some(i) => DeviceRequest::Cuda(i),
                None => DeviceRequest::Cpu,
            },
        })
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("info")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_preview(rows: &[ScoredDocument], limit: usize) {
    if limit == 0 {
        return;
    }
    let id_width = rows
        .iter()
        .take(limit)
        .map(|r| r.doc_id.chars().count())
        .max()
        .unwrap_or(0)
        .max("doc_id".len());

    println!(
        "{:<id_width$}  {:>15}  {:>19}",
        "doc_id", "sentiment_score", "sentiment_intensity"
    );
    for row in rows.iter().take(limit) {
        println!(
            "{:<id_width$}  {:>15.6}  {:>19.6}",
            row.doc_id, row.sentiment_score, row.sentiment_intensity
        );
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.into_config()?;

    let report = pipeline::run(&config, || {
        let mut builder = SentimentClassifierBuilder::new(&config.model).device(config.device);
        if let Some(revision) = &config.revision {
            builder = builder.revision(revision);
        }
        builder.build()
    })
    .with_context(|| {
        format!(
            "failed to score {} into {}",
            config.input.display(),
            config.output.display()
        )
    })?;

    print_preview(&report.rows, config.preview_rows);
    println!("Saved: {}", config.output.display());

    Ok(())
}
