use doc_sentiment::classifier::TextClassifier;
use doc_sentiment::config::ScoringConfig;
use doc_sentiment::error::{Result, SentimentError};
use doc_sentiment::pipeline;
use doc_sentiment::scores::{ClassifierOutput, LabelScore};
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;
use tempfile::tempdir;

/// Clones share the call counter.
#[derive(Clone)]
struct FixedClassifier {
    score: f32,
    calls: Rc<Cell<usize>>,
}

impl FixedClassifier {
    fn new(score: f32) -> Self {
        Self {
            score,
            calls: Rc::new(Cell::new(0)),
        }
    }
}

impl TextClassifier for FixedClassifier {
    fn classify(&self, _text: &str) -> Result<ClassifierOutput> {
        self.calls.set(self.calls.get() + 1);
        Ok(ClassifierOutput::Single(LabelScore::new("positive", self.score)))
    }
}

fn config_in(dir: &Path, input: &str) -> ScoringConfig {
    let input_path = dir.join("docs.csv");
    std::fs::write(&input_path, input).unwrap();
    ScoringConfig {
        input: input_path,
        output: dir.join("scores.csv"),
        ..Default::default()
    }
}

fn read_output(path: &Path) -> Vec<(String, f64, f64)> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(
        headers,
        vec!["doc_id", "sentiment_score", "sentiment_intensity"]
    );
    reader
        .records()
        .map(|r| {
            let r = r.unwrap();
            (
                r[0].to_string(),
                r[1].parse().unwrap(),
                r[2].parse().unwrap(),
            )
        })
        .collect()
}

#[test]
fn empty_short_and_missing_bodies() -> Result<()> {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path(), "doc_id,Body\n1,\"\"\n2,short text\n3,\n");
    let classifier = FixedClassifier::new(0.5);

    let report = pipeline::run(&config, || Ok(classifier.clone()))?;

    let scores: Vec<f64> = report.rows.iter().map(|r| r.sentiment_score).collect();
    let intensities: Vec<f64> = report.rows.iter().map(|r| r.sentiment_intensity).collect();
    assert_eq!(scores, vec![0.0, 0.5, 0.0]);
    assert_eq!(intensities, vec![0.0, 0.5, 0.0]);
    assert_eq!(classifier.calls.get(), 1);

    assert_eq!(
        read_output(&config.output),
        vec![
            ("1".to_string(), 0.0, 0.0),
            ("2".to_string(), 0.5, 0.5),
            ("3".to_string(), 0.0, 0.0),
        ]
    );
    Ok(())
}

#[test]
fn long_documents_average_their_chunks() -> Result<()> {
    let dir = tempdir().unwrap();
    let body = format!("{}{}", "a".repeat(900), "b".repeat(450));
    let config = config_in(dir.path(), &format!("doc_id,Body\nlong,{body}\n"));

    let classifier = |text: &str| -> Result<ClassifierOutput> {
        let output = if text.starts_with('a') {
            ClassifierOutput::Flat(vec![
                LabelScore::new("positive", 0.7),
                LabelScore::new("negative", 0.1),
                LabelScore::new("neutral", 0.2),
            ])
        } else {
            ClassifierOutput::Nested(vec![
                LabelScore::new("positive", 0.1),
                LabelScore::new("negative", 0.3),
            ])
        };
        Ok(output)
    };

    let report = pipeline::run(&config, || Ok(classifier))?;

    assert_eq!(report.stats.chunks_classified, 2);
    assert!((report.rows[0].sentiment_score - 0.2).abs() < 1e-6);
    assert!((report.rows[0].sentiment_intensity - 0.2).abs() < 1e-6);
    Ok(())
}

#[test]
fn negative_scores_have_positive_intensity() -> Result<()> {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path(), "doc_id,Body,extra\nx,awful,1\n");
    let classifier = |_: &str| -> Result<ClassifierOutput> {
        Ok(ClassifierOutput::Single(LabelScore::new("NEGATIVE", 0.8)))
    };

    let report = pipeline::run(&config, || Ok(classifier))?;

    assert!((report.rows[0].sentiment_score + 0.8).abs() < 1e-6);
    assert!((report.rows[0].sentiment_intensity - 0.8).abs() < 1e-6);
    Ok(())
}

#[test]
fn missing_column_fails_before_scoring() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path(), "id,Body\n1,text\n");
    let loaded = Cell::new(false);

    let err = pipeline::run(&config, || {
        loaded.set(true);
        Ok(FixedClassifier::new(0.5))
    })
    .unwrap_err();

    assert!(matches!(
        err,
        SentimentError::MissingColumn { ref column, .. } if column == "doc_id"
    ));
    assert!(!loaded.get(), "classifier was loaded before the input was validated");
    assert!(!config.output.exists());
}

#[test]
fn classifier_load_failure_writes_nothing() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path(), "doc_id,Body
1,text
");

    let err = pipeline::run(&config, || -> Result<FixedClassifier> {
        Err(SentimentError::Download("repo not found".into()))
    })
    .unwrap_err();

    assert!(matches!(err, SentimentError::Download(_)));
    assert!(!config.output.exists());
}

#[test]
fn classifier_failure_writes_nothing() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path(), "doc_id,Body\n1,fine\n2,explode\n");
    let classifier = |text: &str| -> Result<ClassifierOutput> {
        if text == "explode" {
            Err(SentimentError::Inference("out of memory".into()))
        } else {
            Ok(ClassifierOutput::Unknown)
        }
    };

    let err = pipeline::run(&config, || Ok(classifier)).unwrap_err();

    assert!(matches!(err, SentimentError::Inference(_)));
    assert!(!config.output.exists());
}

#[test]
fn existing_output_is_replaced_whole() -> Result<()> {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path(), "doc_id,Body\n7,hello\n");
    std::fs::write(&config.output, "stale,data\n1,2\n3,4\n5,6\n").unwrap();

    pipeline::run(&config, || Ok(FixedClassifier::new(0.25)))?;

    assert_eq!(read_output(&config.output), vec![("7".to_string(), 0.25, 0.25)]);
    Ok(())
}

#[test]
fn invalid_config_is_rejected() {
    let dir = tempdir().unwrap();
    let config = ScoringConfig {
        max_chars: 0,
        ..config_in(dir.path(), "doc_id,Body\n1,x\n")
    };

    let loaded = Cell::new(false);

    let err = pipeline::run(&config, || {
        loaded.set(true);
        Ok(FixedClassifier::new(0.5))
    })
    .unwrap_err();
    assert!(matches!(err, SentimentError::Config(_)));
    assert!(!loaded.get());
}
