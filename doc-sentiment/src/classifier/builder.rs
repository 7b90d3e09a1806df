use super::loaders::ModelSource;
use super::model::SentimentClassifier;
use super::DeviceRequest;
use crate::error::Result;

/// Builder for [`SentimentClassifier`].
///
/// # Examples
///
/// ```rust,no_run
/// use doc_sentiment::classifier::SentimentClassifierBuilder;
///
/// # fn main() -> doc_sentiment::error::Result<()> {
/// let classifier = SentimentClassifierBuilder::new("clapAI/modernBERT-base-multilingual-sentiment")
///     .revision("main")
///     .cuda(0)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SentimentClassifierBuilder {
    model: String,
    revision: Option<String>,
    device_request: DeviceRequest,
}

impl SentimentClassifierBuilder {
    /// Start from a Hugging Face model id or a local model directory.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            revision: None,
            device_request: DeviceRequest::Cpu,
        }
    }

    /// Pin a Hub branch, tag or commit. Ignored for local directories.
    pub fn revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = Some(revision.into());
        self
    }

    /// Use CPU for inference (default).
    pub fn cpu(mut self) -> Self {
        self.device_request = DeviceRequest::Cpu;
        self
    }

    /// Use a specific CUDA GPU for inference.
    pub fn cuda(mut self, index: usize) -> Self {
        self.device_request = DeviceRequest::Cuda(index);
        self
    }

    /// Use the given device.
    pub fn device(mut self, device_request: DeviceRequest) -> Self {
        self.device_request = device_request;
        self
    }

    /// The source this builder will load from.
    pub fn source(&self) -> ModelSource {
        ModelSource::detect(&self.model, self.revision.clone())
    }

    /// Download (if needed) and load the model and tokenizer.
    pub fn build(self) -> Result<SentimentClassifier> {
        let source = self.source();
        tracing::info!(model = %source, device = %self.device_request, "loading classifier");
        SentimentClassifier::load(source, self.device_request)
    }
}
