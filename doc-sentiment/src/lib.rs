//! Batch sentiment scoring for tables of text documents.
//!
//! Powered by [Candle](https://github.com/huggingface/candle). Each document is
//! whitespace-normalized, split into fixed-size character chunks, classified
//! chunk by chunk, and reduced to one signed score in `[-1, 1]`.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use doc_sentiment::classifier::SentimentClassifierBuilder;
//! use doc_sentiment::config::ScoringConfig;
//!
//! # fn main() -> doc_sentiment::error::Result<()> {
//! let config = ScoringConfig::default();
//!
//! // The model is only built once the input table has loaded.
//! let report = doc_sentiment::pipeline::run(&config, || {
//!     SentimentClassifierBuilder::new(&config.model).build()
//! })?;
//! for row in report.rows.iter().take(5) {
//!     println!("{}: {:.3}", row.doc_id, row.sentiment_score);
//! }
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod classifier;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod scorer;
pub mod scores;
pub mod stats;
pub mod table;
pub mod text;

pub use classifier::{SentimentClassifier, SentimentClassifierBuilder, TextClassifier};
pub use config::ScoringConfig;
pub use error::{Result, SentimentError};
pub use scores::{ClassifierOutput, LabelScore};
