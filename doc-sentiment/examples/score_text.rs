use doc_sentiment::classifier::{SentimentClassifierBuilder, TextClassifier};
use doc_sentiment::config::DEFAULT_MODEL;
use doc_sentiment::error::Result;
use doc_sentiment::scorer::DocumentScorer;

fn main() -> Result<()> {
    println!("Building classifier...");

    let classifier = SentimentClassifierBuilder::new(DEFAULT_MODEL).build()?;

    println!("Classifier built successfully.");

    let text = "المهرجان كان رائعا والتنظيم ممتاز";

    let output = classifier.classify(text)?;
    println!("\n=== Chunk Classification ===");
    println!("Text: \"{}\"", text);
    println!("Output: {:?}", output);
    println!("Polarity: {:.4}", output.polarity());

    println!("\n=== Document Scores ===");
    let scorer = DocumentScorer::new(&classifier).max_chars(900);
    let documents = [
        Some("عرض مسرحي جميل ومؤثر"),
        Some("تأجيل الحفل بدون أي تفسير، تجربة مخيبة"),
        None,
    ];
    for body in documents {
        let score = scorer.score(body)?;
        println!("{:?} -> {:.4}", body, score);
    }

    Ok(())
}
