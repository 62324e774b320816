//! Parallel conversion of many documents with one engine.

use crate::engine::{ConvertedMarkup, MarkupEngine};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// A single document to convert.
#[derive(Debug, Clone)]
pub struct BatchInput {
    /// Document identifier (typically the file path).
    pub id: String,
    /// Markup source.
    pub source: String,
}

impl BatchInput {
    /// Creates an input from an id and its source.
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
        }
    }
}

/// Result for a single document in a batch.
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Identifier matching the input.
    pub id: String,
    /// Conversion result (present on success).
    pub result: Option<ConvertedMarkup>,
    /// Error message (present on failure).
    pub error: Option<String>,
}

/// Statistics for a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatchStats {
    /// Number of inputs handed in.
    pub total: usize,
    /// Number of successful conversions.
    pub succeeded: usize,
    /// Number of failed conversions.
    pub failed: usize,
    /// Wall-clock processing time in milliseconds.
    pub processing_time_ms: f64,
}

/// Options for batch processing.
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    /// Maximum number of worker threads. Defaults to rayon's global pool.
    pub max_threads: Option<usize>,
    /// Keep converting after a failure. When false, inputs are converted in
    /// order and the batch stops at the first failure.
    pub continue_on_error: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_threads: None,
            continue_on_error: true,
        }
    }
}

/// Results in input order, plus statistics.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Per-document results.
    pub results: Vec<BatchResult>,
    /// Processing statistics.
    pub stats: BatchStats,
}

/// Converts every input with `engine`.
pub fn convert_batch(
    engine: &dyn MarkupEngine,
    inputs: &[BatchInput],
    options: &BatchOptions,
) -> BatchOutcome {
    let start = Instant::now();
    let succeeded = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    let pool = options.max_threads.and_then(|threads| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|err| log::warn!("falling back to the global thread pool: {err}"))
            .ok()
    });

    let process_input = |input: &BatchInput| -> BatchResult {
        match engine.convert(&input.source) {
            Ok(converted) => {
                succeeded.fetch_add(1, Ordering::Relaxed);
                BatchResult {
                    id: input.id.clone(),
                    result: Some(converted),
                    error: None,
                }
            }
            Err(err) => {
                failed.fetch_add(1, Ordering::Relaxed);
                log::warn!("{} conversion of {} failed: {err}", engine.name(), input.id);
                BatchResult {
                    id: input.id.clone(),
                    result: None,
                    error: Some(err.to_string()),
                }
            }
        }
    };

    let run = || -> Vec<BatchResult> {
        if options.continue_on_error {
            inputs.par_iter().map(&process_input).collect()
        } else {
            let mut results = Vec::with_capacity(inputs.len());
            for input in inputs {
                let result = process_input(input);
                let stop = result.error.is_some();
                results.push(result);
                if stop {
                    break;
                }
            }
            results
        }
    };

    let results = match &pool {
        Some(pool) => pool.install(run),
        None => run(),
    };

    let stats = BatchStats {
        total: inputs.len(),
        succeeded: succeeded.load(Ordering::Relaxed),
        failed: failed.load(Ordering::Relaxed),
        processing_time_ms: start.elapsed().as_secs_f64() * 1000.0,
    };
    log::debug!(
        "batch of {} finished: {} ok, {} failed in {:.1}ms",
        stats.total,
        stats.succeeded,
        stats.failed,
        stats.processing_time_ms
    );

    BatchOutcome { results, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MarkdownMarkup, RenderError};
    use markups_core::SourceLocation;

    /// Markdown, except that sources mentioning "reject" fail.
    struct Picky(MarkdownMarkup);

    impl MarkupEngine for Picky {
        fn name(&self) -> &'static str {
            "Picky"
        }

        fn file_extensions(&self) -> &'static [&'static str] {
            &[".picky"]
        }

        fn convert(&self, text: &str) -> Result<ConvertedMarkup, RenderError> {
            if text.contains("reject") {
                return Err(RenderError::Markdown {
                    message: "rejected".to_string(),
                    location: SourceLocation::new(1, 1),
                });
            }
            self.0.convert(text)
        }
    }

    fn engine() -> Picky {
        Picky(MarkdownMarkup::default())
    }

    fn inputs() -> Vec<BatchInput> {
        vec![
            BatchInput::new("a.md", "\"one\""),
            BatchInput::new("b.md", "reject me"),
            BatchInput::new("c.md", "three -- four"),
        ]
    }

    #[test]
    fn converts_in_input_order() {
        let engine = engine();
        let outcome = convert_batch(&engine, &inputs(), &BatchOptions::default());

        let ids: Vec<&str> = outcome.results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a.md", "b.md", "c.md"]);
        assert_eq!(
            outcome.results[0].result.as_ref().map(|c| c.body.as_str()),
            Some("<p>“one”</p>\n")
        );
        assert_eq!(
            outcome.results[1].error.as_deref(),
            Some("Markdown error at 1:1: rejected")
        );
        assert_eq!(outcome.stats.total, 3);
        assert_eq!(outcome.stats.succeeded, 2);
        assert_eq!(outcome.stats.failed, 1);
    }

    #[test]
    fn stops_at_first_failure_when_asked() {
        let engine = engine();
        let options = BatchOptions {
            max_threads: Some(2),
            continue_on_error: false,
        };
        let outcome = convert_batch(&engine, &inputs(), &options);

        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.stats.succeeded, 1);
        assert_eq!(outcome.stats.failed, 1);
        assert_eq!(outcome.stats.total, 3);
    }

    #[test]
    fn empty_batch() {
        let engine = engine();
        let outcome = convert_batch(&engine, &[], &BatchOptions::default());
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.stats.total, 0);
    }
}
