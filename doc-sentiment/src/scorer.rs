//! Per-document scoring: chunk, classify each chunk, average.

use crate::classifier::TextClassifier;
use crate::error::Result;
use crate::text::{chunk_text, DEFAULT_MAX_CHARS};

/// Score of one document together with how many chunks produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentScore {
    /// Mean chunk polarity, in `[-1, 1]`.
    pub score: f64,
    /// Number of chunks classified. Zero for empty documents.
    pub chunks: usize,
}

/// Scores whole documents with a borrowed classifier.
///
/// # Examples
///
/// ```
/// use doc_sentiment::scorer::DocumentScorer;
/// use doc_sentiment::scores::{ClassifierOutput, LabelScore};
///
/// # fn main() -> doc_sentiment::error::Result<()> {
/// let classifier = |_: &str| -> doc_sentiment::Result<ClassifierOutput> {
///     Ok(ClassifierOutput::Single(LabelScore::new("positive", 0.5)))
/// };
/// let scorer = DocumentScorer::new(&classifier);
///
/// assert_eq!(scorer.score(None)?, 0.0);
/// assert!((scorer.score(Some("short text"))? - 0.5).abs() < 1e-9);
/// # Ok(())
/// # }
/// ```
pub struct DocumentScorer<'a, C: TextClassifier + ?Sized> {
    classifier: &'a C,
    max_chars: usize,
}

impl<'a, C: TextClassifier + ?Sized> DocumentScorer<'a, C> {
    /// Scorer with the default chunk length.
    pub fn new(classifier: &'a C) -> Self {
        Self {
            classifier,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    /// Set the maximum chunk length in characters.
    pub fn max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Mean polarity over the chunks of `body`; 0 when there is no text.
    pub fn score(&self, body: Option<&str>) -> Result<f64> {
        Ok(self.score_detailed(body)?.score)
    }

    /// Like [`DocumentScorer::score`], also reporting the chunk count.
    pub fn score_detailed(&self, body: Option<&str>) -> Result<DocumentScore> {
        let chunks = chunk_text(body, self.max_chars);
        if chunks.is_empty() {
            return Ok(DocumentScore {
                score: 0.0,
                chunks: 0,
            });
        }

        let mut total = 0.0;
        for chunk in &chunks {
            total += self.classifier.classify(chunk)?.polarity();
        }

        Ok(DocumentScore {
            score: total / chunks.len() as f64,
            chunks: chunks.len(),
        })
    }
}

/// Score one document with `classifier`, chunking at `max_chars`.
pub fn score_document<C: TextClassifier + ?Sized>(
    classifier: &C,
    body: Option<&str>,
    max_chars: usize,
) -> Result<f64> {
    DocumentScorer::new(classifier).max_chars(max_chars).score(body)
}
