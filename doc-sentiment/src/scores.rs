//! Reduction of classifier output to one signed polarity score.
//!
//! Text classifiers disagree on output shape: some return the top label only,
//! some a list of every label, some that list wrapped in another list.
//! [`ClassifierOutput`] names each shape and [`ClassifierOutput::polarity`]
//! turns any of them into `P(positive) - P(negative)`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A label with its probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    /// Label name as reported by the model.
    pub label: String,
    /// Probability (0.0 to 1.0).
    pub score: f32,
}

impl LabelScore {
    /// Create a label score.
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// One classification result, in whichever shape the classifier produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierOutput {
    /// A single label (top-1 output).
    Single(LabelScore),
    /// Scores for several labels.
    Flat(Vec<LabelScore>),
    /// Scores for several labels, wrapped in an outer list.
    Nested(Vec<LabelScore>),
    /// Anything that is not a recognizable label/score structure.
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Polarity {
    Positive,
    Negative,
    Neutral,
}

// Substring match: "impossible" is positive. Kept for parity with existing score files.
fn polarity_of(label: &str) -> Polarity {
    if label.contains("pos") {
        Polarity::Positive
    } else if label.contains("neg") {
        Polarity::Negative
    } else {
        Polarity::Neutral
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

fn polarity_of_list(scores: &[LabelScore]) -> f64 {
    // Insertion-ordered: a repeated label keeps its first position, takes its last value.
    let mut by_label: Vec<(String, f64)> = Vec::with_capacity(scores.len());
    for entry in scores {
        let label = entry.label.to_lowercase();
        let score = f64::from(entry.score);
        match by_label.iter_mut().find(|(l, _)| *l == label) {
            Some(slot) => slot.1 = score,
            None => by_label.push((label, score)),
        }
    }

    let mut pos = 0.0;
    let mut neg = 0.0;
    for (label, score) in &by_label {
        match polarity_of(label) {
            Polarity::Positive => pos = *score,
            Polarity::Negative => neg = *score,
            Polarity::Neutral => {}
        }
    }
    pos - neg
}

impl ClassifierOutput {
    /// Signed polarity `P(positive) - P(negative)`, always finite and in `[-1, 1]`.
    ///
    /// Neutral and unrecognized labels contribute nothing. Unknown shapes and
    /// empty lists score 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use doc_sentiment::scores::{ClassifierOutput, LabelScore};
    ///
    /// let single = ClassifierOutput::Single(LabelScore::new("NEG", 0.4));
    /// assert!((single.polarity() + 0.4).abs() < 1e-6);
    ///
    /// let all = ClassifierOutput::Flat(vec![
    ///     LabelScore::new("pos", 0.7),
    ///     LabelScore::new("neg", 0.1),
    /// ]);
    /// assert!((all.polarity() - 0.6).abs() < 1e-6);
    /// ```
    pub fn polarity(&self) -> f64 {
        let raw = match self {
            ClassifierOutput::Single(entry) => {
                let score = f64::from(entry.score);
                match polarity_of(&entry.label.to_lowercase()) {
                    Polarity::Positive => score,
                    Polarity::Negative => -score,
                    Polarity::Neutral => 0.0,
                }
            }
            ClassifierOutput::Flat(scores) | ClassifierOutput::Nested(scores) => {
                polarity_of_list(scores)
            }
            ClassifierOutput::Unknown => 0.0,
        };
        clamp_unit(raw)
    }

    /// Interpret Transformers-style JSON classifier output.
    ///
    /// An object is a single result, an array of objects is a flat result, and
    /// an array whose first element is an array is nested (only that first
    /// inner array is read). Anything else is [`ClassifierOutput::Unknown`].
    ///
    /// # Examples
    ///
    /// ```
    /// use doc_sentiment::scores::ClassifierOutput;
    /// use serde_json::json;
    ///
    /// let out = ClassifierOutput::from_json(&json!([[
    ///     {"label": "positive", "score": 0.2},
    ///     {"label": "negative", "score": 0.7}
    /// ]]));
    /// assert!(matches!(out, ClassifierOutput::Nested(_)));
    /// assert!((out.polarity() + 0.5).abs() < 1e-6);
    /// ```
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(_) => match label_score_from_json(value) {
                Some(entry) => ClassifierOutput::Single(entry),
                None => ClassifierOutput::Unknown,
            },
            Value::Array(items) => match items.first() {
                None => ClassifierOutput::Flat(Vec::new()),
                Some(Value::Array(inner)) => match label_scores_from_json(inner) {
                    Some(scores) => ClassifierOutput::Nested(scores),
                    None => ClassifierOutput::Unknown,
                },
                Some(_) => match label_scores_from_json(items) {
                    Some(scores) => ClassifierOutput::Flat(scores),
                    None => ClassifierOutput::Unknown,
                },
            },
            _ => ClassifierOutput::Unknown,
        }
    }
}

fn label_scores_from_json(items: &[Value]) -> Option<Vec<LabelScore>> {
    items.iter().map(label_score_from_json).collect()
}

fn label_score_from_json(value: &Value) -> Option<LabelScore> {
    let object = value.as_object()?;

    let label = match object.get("label") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    let score = match object.get("score") {
        None => 0.0,
        Some(v) => v.as_f64()? as f32,
    };

    Some(LabelScore { label, score })
}
