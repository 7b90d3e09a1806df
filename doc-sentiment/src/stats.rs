//! Run statistics.

use std::time::{Duration, Instant};

/// Statistics for one scoring run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    /// Total scoring time.
    pub total_time: Duration,
    /// Number of documents scored.
    pub documents: usize,
    /// Documents with no text after normalization (scored 0 without inference).
    pub empty_documents: usize,
    /// Number of classifier calls.
    pub chunks_classified: usize,
}

impl RunStats {
    pub(crate) fn start() -> RunStatsBuilder {
        RunStatsBuilder {
            start_time: Instant::now(),
            documents: 0,
            empty_documents: 0,
            chunks_classified: 0,
        }
    }

    /// Documents per second over the whole run.
    pub fn documents_per_second(&self) -> f64 {
        let secs = self.total_time.as_secs_f64();
        if secs > 0.0 {
            self.documents as f64 / secs
        } else {
            0.0
        }
    }
}

/// Tracks timing from creation to [`RunStatsBuilder::finish`].
pub(crate) struct RunStatsBuilder {
    start_time: Instant,
    documents: usize,
    empty_documents: usize,
    chunks_classified: usize,
}

impl RunStatsBuilder {
    pub fn record_document(&mut self, chunks: usize) {
        self.documents += 1;
        if chunks == 0 {
            self.empty_documents += 1;
        }
        self.chunks_classified += chunks;
    }

    pub fn finish(self) -> RunStats {
        RunStats {
            total_time: self.start_time.elapsed(),
            documents: self.documents,
            empty_documents: self.empty_documents,
            chunks_classified: self.chunks_classified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_documents_and_chunks() {
        let mut builder = RunStats::start();
        builder.record_document(3);
        builder.record_document(0);
        builder.record_document(1);
        let stats = builder.finish();

        assert_eq!(stats.documents, 3);
        assert_eq!(stats.empty_documents, 1);
        assert_eq!(stats.chunks_classified, 4);
    }

    #[test]
    fn rate_is_zero_without_elapsed_time() {
        let stats = RunStats {
            documents: 10,
            ..Default::default()
        };
        assert_eq!(stats.documents_per_second(), 0.0);

        let stats = RunStats {
            documents: 10,
            total_time: Duration::from_secs(2),
            ..Default::default()
        };
        assert!((stats.documents_per_second() - 5.0).abs() < 1e-9);
    }
}
