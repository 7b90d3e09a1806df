use candle_transformers::models::modernbert::ClassifierPooling;
use hf_hub::api::sync::{Api, ApiRepo};
use hf_hub::{Repo, RepoType};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokenizers::models::wordpiece::WordPiece;
use tokenizers::normalizers::bert::BertNormalizer;
use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
use tokenizers::processors::bert::BertProcessing;
use tokenizers::{Tokenizer, TruncationParams};

use crate::error::{Result, SentimentError};

/// Where model files come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// A Hugging Face Hub repository, optionally pinned to a revision.
    Hub {
        /// Repository id, e.g. `CAMeL-Lab/bert-base-arabic-camelbert-da-sentiment`.
        repo: String,
        /// Branch, tag or commit. `None` means `main`.
        revision: Option<String>,
    },
    /// A directory holding `config.json`, weights and tokenizer files.
    Local(PathBuf),
}

impl ModelSource {
    /// An existing directory is a local model; anything else is a Hub repo id.
    pub fn detect(model: &str, revision: Option<String>) -> Self {
        let path = Path::new(model);
        if path.is_dir() {
            ModelSource::Local(path.to_path_buf())
        } else {
            ModelSource::Hub {
                repo: model.to_string(),
                revision,
            }
        }
    }

    pub(crate) fn open(&self) -> Result<ModelFiles> {
        match self {
            ModelSource::Hub { repo, revision } => {
                let api = Api::new()?;
                let repo = match revision {
                    Some(rev) => Repo::with_revision(repo.clone(), RepoType::Model, rev.clone()),
                    None => Repo::new(repo.clone(), RepoType::Model),
                };
                Ok(ModelFiles::Hub(api.repo(repo)))
            }
            ModelSource::Local(dir) => Ok(ModelFiles::Local(dir.clone())),
        }
    }
}

impl std::fmt::Display for ModelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelSource::Hub {
                repo,
                revision: Some(rev),
            } => write!(f, "{repo}@{rev}"),
            ModelSource::Hub { repo, .. } => write!(f, "{repo}"),
            ModelSource::Local(dir) => write!(f, "{}", dir.display()),
        }
    }
}

pub(crate) enum ModelFiles {
    Hub(ApiRepo),
    Local(PathBuf),
}

impl ModelFiles {
    pub fn get(&self, filename: &str) -> Result<PathBuf> {
        match self {
            ModelFiles::Hub(repo) => Ok(repo.get(filename)?),
            ModelFiles::Local(dir) => {
                let path = dir.join(filename);
                if path.is_file() {
                    Ok(path)
                } else {
                    Err(SentimentError::Io(format!(
                        "Model file '{}' not found",
                        path.display()
                    )))
                }
            }
        }
    }

    pub fn weights(&self) -> Result<PathBuf> {
        match self.get("model.safetensors") {
            Ok(path) => Ok(path),
            Err(_) => {
                tracing::warn!("model.safetensors unavailable, falling back to pytorch_model.bin");
                self.get("pytorch_model.bin")
            }
        }
    }
}

/// Fields of `config.json` shared by every classifier architecture.
#[derive(Debug, Deserialize)]
pub(crate) struct ClassifierConfigJson {
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default)]
    pub id2label: HashMap<String, String>,
    #[serde(default)]
    pub label2id: HashMap<String, u32>,
    #[serde(default)]
    pub hidden_size: Option<usize>,
    #[serde(default)]
    pub max_position_embeddings: Option<usize>,
    /// ModernBERT head pooling (`cls` or `mean`).
    #[serde(default)]
    pub classifier_pooling: Option<ClassifierPooling>,
}

impl ClassifierConfigJson {
    /// Label names ordered by class index.
    pub fn labels(&self) -> Result<Vec<String>> {
        if !self.id2label.is_empty() {
            let mut labels: Vec<(usize, String)> = self
                .id2label
                .iter()
                .map(|(id, label)| {
                    id.parse::<usize>()
                        .map(|i| (i, label.clone()))
                        .map_err(|_| {
                            SentimentError::Model(format!("Non-numeric id2label key '{id}'"))
                        })
                })
                .collect::<Result<_>>()?;
            labels.sort_by_key(|(i, _)| *i);
            return Ok(labels.into_iter().map(|(_, label)| label).collect());
        }

        if !self.label2id.is_empty() {
            let mut labels: Vec<(&String, &u32)> = self.label2id.iter().collect();
            labels.sort_by_key(|(_, id)| **id);
            return Ok(labels.into_iter().map(|(label, _)| label.clone()).collect());
        }

        Err(SentimentError::Model(
            "config.json has neither id2label nor label2id".to_string(),
        ))
    }
}

#[derive(Debug, Default, Deserialize)]
struct TokenizerConfigJson {
    #[serde(default)]
    do_lower_case: Option<bool>,
}

/// Loads `tokenizer.json`, or builds a WordPiece tokenizer from `vocab.txt`.
pub(crate) fn load_tokenizer(files: &ModelFiles, max_length: usize) -> Result<Tokenizer> {
    let mut tokenizer = match files.get("tokenizer.json") {
        Ok(path) => {
            let path_str = path.display().to_string();
            Tokenizer::from_file(&path).map_err(|e| {
                SentimentError::Tokenization(format!(
                    "Failed to load tokenizer from '{}': {}",
                    path_str, e
                ))
            })?
        }
        Err(_) => {
            tracing::warn!("tokenizer.json unavailable, building WordPiece tokenizer from vocab.txt");
            wordpiece_tokenizer(files)?
        }
    };

    tokenizer
        .with_padding(None)
        .with_truncation(Some(TruncationParams {
            max_length,
            ..Default::default()
        }))
        .map_err(|e| SentimentError::Tokenization(format!("Failed to set truncation: {e}")))?;

    Ok(tokenizer)
}

fn wordpiece_tokenizer(files: &ModelFiles) -> Result<Tokenizer> {
    let vocab_path = files.get("vocab.txt")?;
    let lowercase = match files.get("tokenizer_config.json") {
        Ok(path) => {
            let cfg: TokenizerConfigJson = serde_json::from_str(&std::fs::read_to_string(path)?)?;
            cfg.do_lower_case.unwrap_or(false)
        }
        Err(_) => false,
    };

    let vocab_str = vocab_path.display().to_string();
    let wordpiece = WordPiece::from_file(&vocab_str)
        .unk_token("[UNK]".to_string())
        .build()
        .map_err(|e| {
            SentimentError::Tokenization(format!(
                "Failed to load WordPiece vocab from '{}': {}",
                vocab_str, e
            ))
        })?;

    let mut tokenizer = Tokenizer::new(wordpiece);
    let special = |token: &str| {
        tokenizer.token_to_id(token).ok_or_else(|| {
            SentimentError::Tokenization(format!("Vocabulary has no '{token}' token"))
        })
    };
    let sep = special("[SEP]")?;
    let cls = special("[CLS]")?;

    tokenizer
        .with_normalizer(Some(BertNormalizer::new(true, true, None, lowercase)))
        .with_pre_tokenizer(Some(BertPreTokenizer))
        .with_post_processor(Some(BertProcessing::new(
            ("[SEP]".to_string(), sep),
            ("[CLS]".to_string(), cls),
        )));

    Ok(tokenizer)
}
