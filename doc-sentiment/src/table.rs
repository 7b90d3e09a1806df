//! Reading document tables and writing score tables.

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::config::{ScoringConfig, DEFAULT_ID_COLUMN, DEFAULT_TEXT_COLUMN};
use crate::error::{Result, SentimentError};

/// One input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRow {
    /// Identifier, exactly as written in the input.
    pub doc_id: String,
    /// Text. `None` when the cell is empty or absent.
    pub body: Option<String>,
}

/// One output row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDocument {
    /// Identifier copied from the input.
    pub doc_id: String,
    /// Mean chunk polarity, in `[-1, 1]`.
    pub sentiment_score: f64,
    /// `|sentiment_score|`.
    pub sentiment_intensity: f64,
}

impl ScoredDocument {
    /// Output row for `doc_id` with intensity derived from `score`.
    pub fn new(doc_id: impl Into<String>, score: f64) -> Self {
        Self {
            doc_id: doc_id.into(),
            sentiment_score: score,
            sentiment_intensity: score.abs(),
        }
    }
}

/// Which columns to read and how the input is delimited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    /// Identifier column.
    pub id_column: String,
    /// Text column.
    pub text_column: String,
    /// Field delimiter.
    pub delimiter: u8,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            id_column: DEFAULT_ID_COLUMN.to_string(),
            text_column: DEFAULT_TEXT_COLUMN.to_string(),
            delimiter: b',',
        }
    }
}

impl From<&ScoringConfig> for TableOptions {
    fn from(config: &ScoringConfig) -> Self {
        Self {
            id_column: config.id_column.clone(),
            text_column: config.text_column.clone(),
            delimiter: config.delimiter,
        }
    }
}

fn column_index(headers: &StringRecord, column: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}') == column)
        .ok_or_else(|| SentimentError::MissingColumn {
            column: column.to_string(),
            found: headers.iter().collect::<Vec<_>>().join(", "),
        })
}

/// Load every document from the table at `path`.
///
/// Fails if the file cannot be opened or lacks either configured column.
/// Columns other than the id and text columns are ignored.
pub fn read_documents(path: &Path, options: &TableOptions) -> Result<Vec<DocumentRow>> {
    let file = File::open(path).map_err(|e| {
        SentimentError::Io(format!("Failed to open input '{}': {}", path.display(), e))
    })?;

    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .from_reader(file);

    let headers = reader.headers()?.clone();
    let id_idx = column_index(&headers, &options.id_column)?;
    let text_idx = column_index(&headers, &options.text_column)?;

    let mut documents = Vec::new();
    for record in reader.records() {
        let record = record?;
        let doc_id = record.get(id_idx).unwrap_or_default().to_string();
        let body = record
            .get(text_idx)
            .filter(|text| !text.is_empty())
            .map(str::to_string);
        documents.push(DocumentRow { doc_id, body });
    }

    tracing::info!(path = %path.display(), rows = documents.len(), "loaded input table");
    Ok(documents)
}

/// Write `rows` to `path` as `doc_id,sentiment_score,sentiment_intensity`.
///
/// The table is written to a temporary file beside `path` and moved into
/// place once complete, so `path` never holds a partial table.
pub fn write_scores(path: &Path, rows: &[ScoredDocument]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir).map_err(|e| {
        SentimentError::Io(format!(
            "Failed to create temporary file in '{}': {}",
            dir.display(),
            e
        ))
    })?;

    {
        // Header written by hand so an empty table still has one.
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(tmp.as_file());
        writer.write_record(["doc_id", "sentiment_score", "sentiment_intensity"])?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }

    tmp.persist(path).map_err(|e| {
        SentimentError::Io(format!(
            "Failed to write output '{}': {}",
            path.display(),
            e.error
        ))
    })?;

    tracing::info!(path = %path.display(), rows = rows.len(), "saved scores");
    Ok(())
}
