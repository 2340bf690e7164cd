//! Batch runner: applies a [`Pipeline`] to a collection of messages.
//!
//! Messages whose content is empty after normalization are dropped; messages
//! whose normalization fails are logged with their identity and skipped. The
//! batch itself never fails.
//!
//! ## Execution modes
//! - [`ExecutionMode::Sequential`]: one message after another, in input order.
//!   This is the reference behavior.
//! - [`ExecutionMode::Parallel`]: stages 1–8 run sequentially, stage 9 (the
//!   linguistic analysis) is fanned out over a bounded worker pool, then
//!   stages 10–12 run sequentially over the results re-associated with their
//!   input index. Output order and content are identical to sequential mode.

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Deserialize;

use crate::{error::Result, message::ChatMessage, pipeline::Pipeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    #[default]
    Sequential,
    Parallel,
}

/// Outcome of one batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Kept messages with rewritten content, in input order.
    pub messages: Vec<ChatMessage>,
    /// Messages whose content normalized to nothing.
    pub dropped: usize,
    /// Messages skipped because a stage failed.
    pub failed: usize,
    pub elapsed: Duration,
}

pub struct BatchRunner<'p> {
    pipeline: &'p Pipeline,
    mode: ExecutionMode,
    workers: usize,
}

impl<'p> BatchRunner<'p> {
    /// Sequential runner.
    pub fn new(pipeline: &'p Pipeline) -> Self {
        Self { pipeline, mode: ExecutionMode::Sequential, workers: 1 }
    }

    /// Select the execution mode. `workers` defaults to the number of logical
    /// CPUs when `None`.
    pub fn with_mode(mut self, mode: ExecutionMode, workers: Option<usize>) -> Self {
        self.mode = mode;
        self.workers = workers.unwrap_or_else(num_cpus::get).max(1);
        self
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Normalize `messages` and return the non-empty ones, in input order.
    pub fn run(&self, messages: Vec<ChatMessage>) -> Vec<ChatMessage> {
        self.run_with_report(messages).messages
    }

    /// Like [`run`](Self::run), also reporting dropped and failed counts and
    /// elapsed time.
    pub fn run_with_report(&self, messages: Vec<ChatMessage>) -> BatchReport {
        if messages.is_empty() {
            info!("No chat message yet.");
            return BatchReport::default();
        }

        info!("Pre-processing started... ({} messages)", messages.len());
        let start = Instant::now();

        let outcomes = match self.effective_mode() {
            ExecutionMode::Sequential => self.process_sequential(&messages),
            ExecutionMode::Parallel => self.process_parallel(&messages),
        };

        let mut report = BatchReport::default();
        for (mut message, outcome) in messages.into_iter().zip(outcomes) {
            match outcome {
                Ok(content) if content.trim().is_empty() => {
                    debug!("Dropping empty message ({})", message.identity());
                    report.dropped += 1;
                }
                Ok(content) => {
                    message.content = content;
                    report.messages.push(message);
                }
                Err(err) => {
                    warn!("Skipping message ({}): {}", message.identity(), err);
                    report.failed += 1;
                }
            }
        }

        report.elapsed = start.elapsed();
        info!(
            "Pre-processing finished. {} seconds (kept {}, dropped {}, failed {})",
            report.elapsed.as_secs_f64(),
            report.messages.len(),
            report.dropped,
            report.failed
        );
        report
    }

    fn effective_mode(&self) -> ExecutionMode {
        if self.mode == ExecutionMode::Parallel && !self.pipeline.processor().is_reentrant() {
            warn!("Linguistic engine is not reentrant; running sequentially");
            return ExecutionMode::Sequential;
        }
        self.mode
    }

    fn process_sequential(&self, messages: &[ChatMessage]) -> Vec<Result<String>> {
        messages.iter().map(|m| self.pipeline.process(&m.content)).collect()
    }

    fn process_parallel(&self, messages: &[ChatMessage]) -> Vec<Result<String>> {
        let pool = match rayon::ThreadPoolBuilder::new().num_threads(self.workers).build() {
            Ok(pool) => pool,
            Err(err) => {
                warn!("Cannot start {} workers ({}); running sequentially", self.workers, err);
                return self.process_sequential(messages);
            }
        };

        let prepared: Vec<Result<String>> =
            messages.iter().map(|m| self.pipeline.prepare(&m.content)).collect();

        // Indexed collect keeps input order whatever order the workers finish in.
        let analyzed: Vec<Result<String>> = pool.install(|| {
            prepared
                .into_par_iter()
                .map(|p| p.and_then(|text| self.pipeline.analyze(&text)))
                .collect()
        });

        analyzed.into_iter().map(|a| a.map(|text| self.pipeline.finish(&text))).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stopwords::StopWordPolicy;

    fn pipeline() -> Pipeline {
        Pipeline::builder()
            .stop_word_policy(StopWordPolicy::new(Vec::<String>::new(), ["tidak"]))
            .build()
            .unwrap()
    }

    fn messages(contents: &[&str]) -> Vec<ChatMessage> {
        contents.iter().enumerate().map(|(i, c)| ChatMessage::new(format!("m{}", i), *c)).collect()
    }

    #[test]
    fn test_empty_batch() {
        let p = pipeline();
        let report = BatchRunner::new(&p).run_with_report(Vec::new());
        assert!(report.messages.is_empty());
        assert_eq!(report.dropped + report.failed, 0);
    }

    #[test]
    fn test_drops_empty_content() {
        let p = pipeline();
        let report = BatchRunner::new(&p)
            .run_with_report(messages(&["Barang bagus", "http://x.co 123", "tidak suka"]));
        assert_eq!(report.dropped, 1);
        let contents: Vec<_> = report.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["barang bagus", "tidak_suka"]);
        assert_eq!(report.messages[1].name, "m2");
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let p = pipeline();
        let input = messages(&["Halo KAK!!", "www.toko.com", "Saya tidak suka", "ok 100%"]);
        let sequential = BatchRunner::new(&p).run(input.clone());
        let parallel =
            BatchRunner::new(&p).with_mode(ExecutionMode::Parallel, Some(3)).run(input);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_workers_default_to_cpus() {
        let p = pipeline();
        let runner = BatchRunner::new(&p).with_mode(ExecutionMode::Parallel, None);
        assert_eq!(runner.workers(), num_cpus::get().max(1));
        assert_eq!(runner.mode(), ExecutionMode::Parallel);
    }
}
