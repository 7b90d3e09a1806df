//! Error types for this crate.
//!
//! All fallible operations return [`Result<T>`] which uses [`SentimentError`] as the error type.

use thiserror::Error;

/// A [`Result`](std::result::Result) alias using [`SentimentError`] as the error type.
pub type Result<T> = std::result::Result<T, SentimentError>;

/// The unified error type for all crate errors.
///
/// # Example
///
/// ```rust,no_run
/// use doc_sentiment::error::SentimentError;
///
/// fn handle_error(e: SentimentError) {
///     match &e {
///         SentimentError::MissingColumn { column, .. } => {
///             eprintln!("input table has no '{column}' column");
///         }
///         SentimentError::Download(_) => {
///             // Network issue - check connectivity or the model id
///         }
///         _ => eprintln!("{e}"),
///     }
/// }
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SentimentError {
    /// Invalid run configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The input table lacks a required column.
    #[error("Missing column '{column}' in input table (found: {found})")]
    MissingColumn {
        /// Column that was expected.
        column: String,
        /// Comma-separated headers that were present.
        found: String,
    },

    /// Malformed delimited input or output.
    #[error("{0}")]
    Table(String),

    /// File system failure.
    #[error("{0}")]
    Io(String),

    /// Network or download failure. Retry may help.
    #[error("{0}")]
    Download(String),

    /// Tokenization failure. Check input text or tokenizer files.
    #[error("{0}")]
    Tokenization(String),

    /// Device initialization failure. Fall back to CPU.
    #[error("{0}")]
    Device(String),

    /// Model files are present but not usable.
    #[error("{0}")]
    Model(String),

    /// Forward pass or tensor failure.
    #[error("{0}")]
    Inference(String),

    /// Internal error. Report if seen.
    #[error("{0}")]
    Unexpected(String),
}

impl From<hf_hub::api::sync::ApiError> for SentimentError {
    fn from(value: hf_hub::api::sync::ApiError) -> Self {
        SentimentError::Download(format!("HuggingFace API error: {}", value))
    }
}

impl From<candle_core::Error> for SentimentError {
    fn from(value: candle_core::Error) -> Self {
        SentimentError::Inference(value.to_string())
    }
}

impl From<csv::Error> for SentimentError {
    fn from(value: csv::Error) -> Self {
        SentimentError::Table(value.to_string())
    }
}

impl From<std::io::Error> for SentimentError {
    fn from(value: std::io::Error) -> Self {
        SentimentError::Io(value.to_string())
    }
}

impl From<serde_json::Error> for SentimentError {
    fn from(value: serde_json::Error) -> Self {
        SentimentError::Model(format!("Invalid model metadata: {}", value))
    }
}
