use candle_core::{DType, Device, IndexOp, Tensor, D};
use candle_nn::{linear, ops::softmax, Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use candle_transformers::models::modernbert::{
    ClassifierConfig, ClassifierPooling, Config as ModernBertConfig,
    ModernBertForSequenceClassification,
};
use std::collections::HashMap;
use std::path::PathBuf;
use tokenizers::Tokenizer;

use super::loaders::{load_tokenizer, ClassifierConfigJson, ModelSource};
use super::{DeviceRequest, TextClassifier};
use crate::error::{Result, SentimentError};
use crate::scores::{ClassifierOutput, LabelScore};

const DEFAULT_MAX_TOKENS: usize = 512;

/// BERT encoder with the standard `BertForSequenceClassification` head.
struct BertClassifier {
    bert: BertModel,
    pooler: Linear,
    classifier: Linear,
}

impl BertClassifier {
    fn load(
        vb: VarBuilder,
        config: &BertConfig,
        hidden_size: usize,
        num_labels: usize,
    ) -> Result<Self> {
        // BertModel::load resolves the "bert." prefix itself via config.model_type.
        let bert = BertModel::load(vb.clone(), config)?;
        let pooler = linear(hidden_size, hidden_size, vb.pp(pooler_prefix(&vb)))?;
        let classifier = linear(hidden_size, num_labels, vb.pp("classifier"))?;
        Ok(Self {
            bert,
            pooler,
            classifier,
        })
    }

    fn logits(&self, input_ids: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self
            .bert
            .forward(input_ids, &token_type_ids, Some(attention_mask))?;
        let cls = hidden.i((.., 0))?;
        let pooled = self.pooler.forward(&cls)?.tanh()?;
        Ok(self.classifier.forward(&pooled)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArchitectureKind {
    Bert,
    ModernBert,
}

enum Architecture {
    Bert(BertClassifier),
    ModernBert(ModernBertForSequenceClassification),
}

// Pooler weights sit beside the encoder: under "bert." in most checkpoints,
// at the root in headless exports.
fn pooler_prefix(vb: &VarBuilder) -> &'static str {
    if vb.contains_tensor("bert.pooler.dense.weight") {
        "bert.pooler.dense"
    } else {
        "pooler.dense"
    }
}

impl Architecture {
    /// Class probabilities, shape `(batch, num_labels)`.
    fn probabilities(&self, input_ids: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
        match self {
            Architecture::Bert(model) => {
                let logits = model.logits(input_ids, attention_mask)?;
                Ok(softmax(&logits, D::Minus1)?)
            }
            // Candle's ModernBERT head already ends in a softmax.
            Architecture::ModernBert(model) => Ok(model.forward(input_ids, attention_mask)?),
        }
    }
}

/// Local sequence-classification model returning probabilities for every label.
///
/// Construct with [`SentimentClassifierBuilder`](super::SentimentClassifierBuilder).
pub struct SentimentClassifier {
    model: Architecture,
    tokenizer: Tokenizer,
    labels: Vec<String>,
    device: Device,
    source: ModelSource,
}

impl SentimentClassifier {
    pub(crate) fn load(source: ModelSource, device_request: DeviceRequest) -> Result<Self> {
        let device = device_request.resolve()?;
        let files = source.open()?;

        let config_path = files.get("config.json")?;
        let config_str = std::fs::read_to_string(&config_path)?;
        let mut class_cfg: ClassifierConfigJson = serde_json::from_str(&config_str)?;
        let labels = class_cfg.labels()?;

        let kind = match class_cfg.model_type.as_deref() {
            Some("bert") => ArchitectureKind::Bert,
            Some("modernbert") => ArchitectureKind::ModernBert,
            other => {
                return Err(SentimentError::Model(format!(
                    "Unsupported model_type {:?} for '{}'. Supported: bert, modernbert",
                    other, source
                )))
            }
        };

        let weights_path = files.weights()?;
        let vb = var_builder(weights_path, &device)?;

        let model = match kind {
            ArchitectureKind::Bert => {
                let config: BertConfig = serde_json::from_str(&config_str)?;
                let hidden_size = class_cfg.hidden_size.ok_or_else(|| {
                    SentimentError::Model("config.json is missing hidden_size".to_string())
                })?;
                Architecture::Bert(BertClassifier::load(vb, &config, hidden_size, labels.len())?)
            }
            ArchitectureKind::ModernBert => {
                let mut config: ModernBertConfig = serde_json::from_str(&config_str)?;
                patch_modernbert_labels(&mut config, &labels, class_cfg.classifier_pooling.take());
                Architecture::ModernBert(ModernBertForSequenceClassification::load(vb, &config)?)
            }
        };

        let max_tokens = class_cfg
            .max_position_embeddings
            .unwrap_or(DEFAULT_MAX_TOKENS);
        let tokenizer = load_tokenizer(&files, max_tokens)?;

        tracing::info!(
            model = %source,
            device = %device_request,
            labels = ?labels,
            "classifier loaded"
        );

        Ok(Self {
            model,
            tokenizer,
            labels,
            device,
            source,
        })
    }

    fn encode(&self, text: &str) -> Result<(Tensor, Tensor)> {
        let tokens = self.tokenizer.encode(text, true).map_err(|e| {
            SentimentError::Tokenization(format!(
                "Tokenization failed on '{}': {}",
                &text.chars().take(50).collect::<String>(),
                e
            ))
        })?;

        let input_ids = Tensor::new(tokens.get_ids(), &self.device)?.unsqueeze(0)?;
        let attention_mask =
            Tensor::new(tokens.get_attention_mask(), &self.device)?.unsqueeze(0)?;
        Ok((input_ids, attention_mask))
    }

    /// Probabilities for every label, ordered by class index.
    pub fn predict_all(&self, text: &str) -> Result<Vec<LabelScore>> {
        let (input_ids, attention_mask) = self.encode(text)?;
        let probs = self
            .model
            .probabilities(&input_ids, &attention_mask)?
            .squeeze(0)?
            .to_vec1::<f32>()?;

        if probs.len() != self.labels.len() {
            return Err(SentimentError::Unexpected(format!(
                "Model produced {} scores for {} labels",
                probs.len(),
                self.labels.len()
            )));
        }

        Ok(self
            .labels
            .iter()
            .zip(probs)
            .map(|(label, score)| LabelScore::new(label.clone(), score))
            .collect())
    }

    /// Label names, ordered by class index.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Where the model was loaded from.
    pub fn source(&self) -> &ModelSource {
        &self.source
    }

    /// Returns the device (CPU/GPU) the model is running on.
    pub fn device(&self) -> &Device {
        &self.device
    }
}

impl TextClassifier for SentimentClassifier {
    fn classify(&self, text: &str) -> Result<ClassifierOutput> {
        Ok(ClassifierOutput::Flat(self.predict_all(text)?))
    }
}

fn var_builder(weights_path: PathBuf, device: &Device) -> Result<VarBuilder<'static>> {
    let vb = if weights_path.extension().is_some_and(|e| e == "safetensors") {
        unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? }
    } else {
        VarBuilder::from_pth(&weights_path, DType::F32, device)?
    };
    Ok(vb)
}

// Candle sizes the ModernBERT head from classifier_config, which many checkpoints
// omit or fail to deserialize (integer label2id values).
fn patch_modernbert_labels(
    config: &mut ModernBertConfig,
    labels: &[String],
    pooling: Option<ClassifierPooling>,
) {
    let existing = config.classifier_config.take();
    let keep = existing.as_ref().is_some_and(|c| {
        c.id2label.len() == labels.len()
            && pooling.as_ref().map_or(true, |p| *p == c.classifier_pooling)
    });
    if keep {
        config.classifier_config = existing;
        return;
    }

    let id2label: HashMap<String, String> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| (i.to_string(), label.clone()))
        .collect();
    let label2id: HashMap<String, String> = id2label
        .iter()
        .map(|(k, v)| (v.clone(), k.clone()))
        .collect();

    config.classifier_config = Some(ClassifierConfig {
        id2label,
        label2id,
        classifier_pooling: pooling
            .or(existing.map(|c| c.classifier_pooling))
            .unwrap_or_default(),
    });
}
