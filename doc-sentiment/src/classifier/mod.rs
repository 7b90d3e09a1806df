//! Text classifiers that score chunks of a document.
//!
//! [`TextClassifier`] is the seam between scoring and inference. The crate ships
//! [`SentimentClassifier`], a local Candle model, and implements the trait for
//! plain closures so callers can plug in anything that returns a
//! [`ClassifierOutput`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use doc_sentiment::classifier::{SentimentClassifierBuilder, TextClassifier};
//!
//! # fn main() -> doc_sentiment::error::Result<()> {
//! let classifier =
//!     SentimentClassifierBuilder::new("CAMeL-Lab/bert-base-arabic-camelbert-da-sentiment")
//!         .build()?;
//!
//! let output = classifier.classify("الخدمة ممتازة")?;
//! println!("polarity: {:.2}", output.polarity());
//! # Ok(())
//! # }
//! ```
//!
//! # Supported Architectures
//!
//! The architecture is read from the model's `config.json`.
//!
//! | `model_type` | Head |
//! |--------------|------|
//! | `bert` | pooler + linear classifier |
//! | `modernbert` | Candle's `ModernBertForSequenceClassification` |

// ============ Internal API ============

pub(crate) mod builder;
pub(crate) mod loaders;
pub(crate) mod model;

// ============ Public API ============

pub use builder::SentimentClassifierBuilder;
pub use loaders::ModelSource;
pub use model::SentimentClassifier;

use crate::error::{Result, SentimentError};
use crate::scores::ClassifierOutput;
use candle_core::Device;

/// Classifies one chunk of text.
///
/// Implementations return every label they know about when they can; the
/// scorer reduces the result with [`ClassifierOutput::polarity`].
pub trait TextClassifier {
    /// Classify `text`.
    fn classify(&self, text: &str) -> Result<ClassifierOutput>;
}

impl<F> TextClassifier for F
where
    F: Fn(&str) -> Result<ClassifierOutput>,
{
    fn classify(&self, text: &str) -> Result<ClassifierOutput> {
        self(text)
    }
}

/// Where inference runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeviceRequest {
    /// CPU (default).
    #[default]
    Cpu,
    /// A CUDA GPU by ordinal. Requires the `cuda` feature.
    Cuda(usize),
}

impl DeviceRequest {
    pub(crate) fn resolve(self) -> Result<Device> {
        match self {
            DeviceRequest::Cpu => Ok(Device::Cpu),
            DeviceRequest::Cuda(i) => Device::new_cuda(i).map_err(|e| {
                SentimentError::Device(format!(
                    "Failed to init CUDA device {i}: {e}. Try CPU as fallback."
                ))
            }),
        }
    }
}

impl std::fmt::Display for DeviceRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceRequest::Cpu => write!(f, "cpu"),
            DeviceRequest::Cuda(i) => write!(f, "cuda:{i}"),
        }
    }
}
