//! Load, score, save.

use crate::classifier::TextClassifier;
use crate::config::ScoringConfig;
use crate::error::Result;
use crate::scorer::DocumentScorer;
use crate::stats::RunStats;
use crate::table::{self, DocumentRow, ScoredDocument, TableOptions};

/// Log a progress line every this many documents.
const PROGRESS_EVERY: usize = 100;

/// Result of a scoring run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// One row per input document, in input order.
    pub rows: Vec<ScoredDocument>,
    /// Execution statistics.
    pub stats: RunStats,
}

/// Score every document in order.
///
/// Stops at the first classifier error; nothing is returned for documents
/// already scored.
pub fn score_documents<C: TextClassifier + ?Sized>(
    classifier: &C,
    documents: &[DocumentRow],
    max_chars: usize,
) -> Result<RunReport> {
    let scorer = DocumentScorer::new(classifier).max_chars(max_chars);
    let mut stats = RunStats::start();
    let mut rows = Vec::with_capacity(documents.len());

    for (i, doc) in documents.iter().enumerate() {
        let result = scorer.score_detailed(doc.body.as_deref())?;
        stats.record_document(result.chunks);
        tracing::debug!(
            doc_id = %doc.doc_id,
            chunks = result.chunks,
            score = result.score,
            "scored document"
        );
        rows.push(ScoredDocument::new(doc.doc_id.clone(), result.score));

        if (i + 1) % PROGRESS_EVERY == 0 {
            tracing::info!(done = i + 1, total = documents.len(), "scoring");
        }
    }

    let stats = stats.finish();
    tracing::info!(
        documents = stats.documents,
        empty = stats.empty_documents,
        chunks = stats.chunks_classified,
        elapsed_ms = stats.total_time.as_millis() as u64,
        "scoring finished"
    );

    Ok(RunReport { rows, stats })
}

/// Run the whole pipeline described by `config`.
///
/// `load_classifier` is called only once the input table has been read, so a
/// bad configuration or input never triggers a model download. The output
/// file is written only after every document has been scored.
pub fn run<C, F>(config: &ScoringConfig, load_classifier: F) -> Result<RunReport>
where
    C: TextClassifier,
    F: FnOnce() -> Result<C>,
{
    config.validate()?;
    let documents = table::read_documents(&config.input, &TableOptions::from(config))?;
    let classifier = load_classifier()?;
    let report = score_documents(&classifier, &documents, config.max_chars)?;
    table::write_scores(&config.output, &report.rows)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SentimentError;
    use crate::scores::{ClassifierOutput, LabelScore};

    fn doc(id: &str, body: Option<&str>) -> DocumentRow {
        DocumentRow {
            doc_id: id.to_string(),
            body: body.map(str::to_string),
        }
    }

    #[test]
    fn keeps_input_order_and_derives_intensity() {
        let classifier = |text: &str| -> Result<ClassifierOutput> {
            let label = if text.starts_with("bad") {
                "negative"
            } else {
                "positive"
            };
            Ok(ClassifierOutput::Single(LabelScore::new(label, 0.75)))
        };
        let docs = vec![
            doc("b", Some("bad day")),
            doc("a", Some("good day")),
            doc("c", None),
        ];

        let report = score_documents(&classifier, &docs, 900).unwrap();
        let ids: Vec<_> = report.rows.iter().map(|r| r.doc_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(report.rows[0].sentiment_score, -0.75);
        assert_eq!(report.rows[0].sentiment_intensity, 0.75);
        assert_eq!(report.rows[1].sentiment_score, 0.75);
        assert_eq!(report.rows[2].sentiment_score, 0.0);

        assert_eq!(report.stats.documents, 3);
        assert_eq!(report.stats.empty_documents, 1);
        assert_eq!(report.stats.chunks_classified, 2);
    }

    #[test]
    fn first_failure_aborts() {
        let classifier = |text: &str| -> Result<ClassifierOutput> {
            if text == "boom" {
                Err(SentimentError::Inference("forward failed".into()))
            } else {
                Ok(ClassifierOutput::Unknown)
            }
        };
        let docs = vec![doc("1", Some("fine")), doc("2", Some("boom"))];

        assert!(score_documents(&classifier, &docs, 900).is_err());
    }
}
