//! Sequential chunk pipeline
//!
//! Chunks a document, processes the chunks one at a time in index order
//! and reports each outcome to a [`ProgressSink`] as soon as it exists.

use crate::chunking::TextChunker;
use crate::config::{ExtractorConfig, FailurePolicy};
use crate::error::ExtractorError;
use crate::processor::ChunkProcessor;
use crate::types::{AbortReason, PipelineEvent, PipelineReport, PipelineState, ProgressSink};
use bidscope_domain::{CompletionBackend, Document, RunId, TextSource};
use std::path::Path;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Drives one document through chunking, prompting and parsing
///
/// A runner is reusable: every call to [`run`](Self::run) starts from
/// `Idle` and ends in `Completed` or `Aborted`.
pub struct PipelineRunner<B> {
    processor: ChunkProcessor<B>,
    chunker: TextChunker,
    failure_policy: FailurePolicy,
    state: PipelineState,
}

impl<B> PipelineRunner<B>
where
    B: CompletionBackend + Send + Sync + 'static,
    B::Error: std::fmt::Display,
{
    /// Create a runner
    ///
    /// # Errors
    ///
    /// Returns `ExtractorError::Config` if the configuration does not validate.
    pub fn new(backend: B, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;

        Ok(Self {
            processor: ChunkProcessor::new(backend, &config),
            chunker: TextChunker::new(config.chunk_size),
            failure_policy: config.failure_policy,
            state: PipelineState::Idle,
        })
    }

    /// Override the per-call timeout
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.processor = self.processor.with_call_timeout(call_timeout);
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Process an already-extracted document
    ///
    /// Emits `Started` once, then one `Chunk` or `ChunkFailed` event per
    /// attempted chunk, in index order. A document with no words emits
    /// nothing and ends `Aborted(NoExtractableText)`. Cancellation is
    /// checked before each chunk; a call already in flight is not interrupted.
    pub async fn run<S>(
        &mut self,
        document: &Document,
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> PipelineReport
    where
        S: ProgressSink + ?Sized,
    {
        let start_time = Instant::now();
        let run_id = RunId::new();
        self.state = PipelineState::Idle;

        let chunks = self.chunker.chunk(document);
        let total_chunks = chunks.len();

        let mut report = PipelineReport {
            run_id,
            state: PipelineState::Idle,
            total_chunks,
            succeeded: 0,
            parse_failures: 0,
            failed_chunks: Vec::new(),
            processing_time_ms: 0,
        };

        if chunks.is_empty() {
            error!(
                "Run {}: no extractable text in '{}'",
                run_id,
                document.source_id()
            );
            return self.finish(
                report,
                PipelineState::Aborted(AbortReason::NoExtractableText),
                start_time,
            );
        }

        info!(
            "Run {}: '{}' split into {} chunks of up to {} words",
            run_id,
            document.source_id(),
            total_chunks,
            self.chunker.chunk_size()
        );
        self.state = PipelineState::Running;
        sink.emit(PipelineEvent::Started {
            run_id,
            total_chunks,
        });

        for chunk in &chunks {
            if cancel.is_cancelled() {
                warn!(
                    "Run {}: cancelled before chunk {}/{}",
                    run_id,
                    chunk.chunk_index + 1,
                    total_chunks
                );
                return self.finish(
                    report,
                    PipelineState::Aborted(AbortReason::Cancelled),
                    start_time,
                );
            }

            debug!("Run {}: processing chunk {}/{}", run_id, chunk.chunk_index + 1, total_chunks);

            match self.processor.process(chunk).await {
                Ok(result) => {
                    report.succeeded += 1;
                    if !result.is_parsed() {
                        report.parse_failures += 1;
                    }
                    sink.emit(PipelineEvent::Chunk(result));
                }
                Err(e) => {
                    warn!(
                        "Run {}: chunk {}/{} failed: {}",
                        run_id,
                        chunk.chunk_index + 1,
                        total_chunks,
                        e
                    );
                    report.failed_chunks.push(chunk.chunk_index);
                    sink.emit(PipelineEvent::ChunkFailed {
                        chunk_index: chunk.chunk_index,
                        total_chunks,
                        error: e.to_string(),
                    });

                    if self.failure_policy == FailurePolicy::HaltOnError {
                        error!("Run {}: halting after chunk {} failed", run_id, chunk.chunk_index);
                        return self.finish(
                            report,
                            PipelineState::Aborted(AbortReason::ChunkFailed {
                                chunk_index: chunk.chunk_index,
                            }),
                            start_time,
                        );
                    }
                }
            }
        }

        self.finish(report, PipelineState::Completed, start_time)
    }

    /// Extract a file's text with `source`, then [`run`](Self::run) it
    ///
    /// # Errors
    ///
    /// Returns `ExtractorError::Extraction` if the text cannot be obtained.
    /// Nothing is emitted in that case and the runner ends
    /// `Aborted(ExtractionFailed)`.
    pub async fn run_source<T, S>(
        &mut self,
        source: &T,
        path: &Path,
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> Result<PipelineReport, ExtractorError>
    where
        T: TextSource,
        T::Error: std::fmt::Display,
        S: ProgressSink + ?Sized,
    {
        let document = match source.extract_text(path) {
            Ok(document) => document,
            Err(e) => {
                error!("Failed to extract text from {}: {}", path.display(), e);
                self.state = PipelineState::Aborted(AbortReason::ExtractionFailed);
                return Err(ExtractorError::Extraction(e.to_string()));
            }
        };

        info!(
            "Extracted {} words from {}",
            document.word_count(),
            path.display()
        );
        Ok(self.run(&document, sink, cancel).await)
    }

    fn finish(
        &mut self,
        mut report: PipelineReport,
        state: PipelineState,
        start_time: Instant,
    ) -> PipelineReport {
        self.state = state;
        report.state = state;
        report.processing_time_ms = start_time.elapsed().as_millis() as u64;

        if state == PipelineState::Completed {
            info!(
                "Run {} completed: {}/{} chunks, {} unparsed, {} failed in {}ms",
                report.run_id,
                report.succeeded,
                report.total_chunks,
                report.parse_failures,
                report.failed_chunks.len(),
                report.processing_time_ms
            );
        } else {
            info!(
                "Run {} aborted ({:?}) after {} of {} chunks",
                report.run_id,
                state,
                report.succeeded + report.failed_chunks.len(),
                report.total_chunks
            );
        }

        report
    }
}
