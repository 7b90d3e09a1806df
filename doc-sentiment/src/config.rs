//! Run configuration.

use std::path::PathBuf;

use crate::classifier::DeviceRequest;
use crate::error::{Result, SentimentError};
use crate::text::DEFAULT_MAX_CHARS;

/// Default input table.
pub const DEFAULT_INPUT: &str = "hespress_culture_body.csv";
/// Default output table.
pub const DEFAULT_OUTPUT: &str = "hespress_sentiment_transformer.csv";
/// Default sentiment model on the Hugging Face Hub.
pub const DEFAULT_MODEL: &str = "CAMeL-Lab/bert-base-arabic-camelbert-da-sentiment";
/// Default identifier column.
pub const DEFAULT_ID_COLUMN: &str = "doc_id";
/// Default text column.
pub const DEFAULT_TEXT_COLUMN: &str = "Body";
/// Rows printed after a run.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Everything one scoring run needs besides the classifier itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    /// Input table path.
    pub input: PathBuf,
    /// Output table path.
    pub output: PathBuf,
    /// Hugging Face model id or local model directory.
    pub model: String,
    /// Hub revision to pin.
    pub revision: Option<String>,
    /// Maximum chunk length in characters.
    pub max_chars: usize,
    /// Column holding document identifiers.
    pub id_column: String,
    /// Column holding document text.
    pub text_column: String,
    /// Field delimiter for the input table.
    pub delimiter: u8,
    /// Number of output rows to preview.
    pub preview_rows: usize,
    /// Inference device.
    pub device: DeviceRequest,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            model: DEFAULT_MODEL.to_string(),
            revision: None,
            max_chars: DEFAULT_MAX_CHARS,
            id_column: DEFAULT_ID_COLUMN.to_string(),
            text_column: DEFAULT_TEXT_COLUMN.to_string(),
            delimiter: b',',
            preview_rows: DEFAULT_PREVIEW_ROWS,
            device: DeviceRequest::Cpu,
        }
    }
}

impl ScoringConfig {
    /// Reject settings that cannot produce a valid run.
    pub fn validate(&self) -> Result<()> {
        if self.max_chars == 0 {
            return Err(SentimentError::Config(
                "max_chars must be at least 1".to_string(),
            ));
        }
        if self.id_column.is_empty() || self.text_column.is_empty() {
            return Err(SentimentError::Config(
                "column names must not be empty".to_string(),
            ));
        }
        if self.id_column == self.text_column {
            return Err(SentimentError::Config(format!(
                "id and text columns are both '{}'",
                self.id_column
            )));
        }
        if self.model.trim().is_empty() {
            return Err(SentimentError::Config("model must not be empty".to_string()));
        }
        Ok(())
    }
}
