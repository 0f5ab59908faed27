//! Result, event and report types for extraction runs

use bidscope_domain::RunId;
use serde::Serialize;
use serde_json::Value;

/// Outcome of processing one chunk
///
/// Serializes to the progress-stream shape
/// `{chunkIndex, chunkText, answer, answer_json, totalChunks}`;
/// `answer_json` is `null` when the reply was not valid JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    /// 0-based chunk position
    #[serde(rename = "chunkIndex")]
    pub chunk_index: usize,

    /// Text sent to the backend
    #[serde(rename = "chunkText")]
    pub chunk_text: String,

    /// Backend reply, verbatim apart from surrounding whitespace
    #[serde(rename = "answer")]
    pub raw_answer_text: String,

    /// Decoded reply, absent on parse failure
    #[serde(rename = "answer_json")]
    pub parsed_answer: Option<Value>,

    /// Why decoding failed, if it did
    #[serde(skip)]
    pub parse_failure: Option<String>,

    /// Number of chunks in the document
    #[serde(rename = "totalChunks")]
    pub total_chunks: usize,
}

impl ExtractionResult {
    /// True when the reply decoded as JSON
    pub fn is_parsed(&self) -> bool {
        self.parsed_answer.is_some()
    }
}

/// Something the runner reports to its caller while a run is in progress
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// Chunking done; sent once before any chunk is processed
    Started {
        /// Run identifier
        run_id: RunId,
        /// Number of chunks that will be processed
        total_chunks: usize,
    },

    /// A chunk was processed
    Chunk(ExtractionResult),

    /// A chunk's backend call failed; no result exists for it
    ChunkFailed {
        /// Index of the failed chunk
        chunk_index: usize,
        /// Number of chunks in the document
        total_chunks: usize,
        /// Failure description
        error: String,
    },
}

/// Receives events as a run progresses
///
/// Implemented for every `FnMut(PipelineEvent)`.
pub trait ProgressSink {
    /// Handle one event
    fn emit(&mut self, event: PipelineEvent);
}

impl<F> ProgressSink for F
where
    F: FnMut(PipelineEvent),
{
    fn emit(&mut self, event: PipelineEvent) {
        self(event)
    }
}

/// Why a run ended early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The document text could not be obtained
    ExtractionFailed,
    /// The document produced no chunks
    NoExtractableText,
    /// A chunk failed under the halt-on-error policy
    ChunkFailed {
        /// Index of the failed chunk
        chunk_index: usize,
    },
    /// The run was cancelled at a chunk boundary
    Cancelled,
}

/// Runner lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    /// Not started
    #[default]
    Idle,
    /// Processing chunks
    Running,
    /// Every chunk was attempted
    Completed,
    /// Ended before the last chunk
    Aborted(AbortReason),
}

impl PipelineState {
    /// True for `Completed` and `Aborted`
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Completed | PipelineState::Aborted(_))
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    /// Run identifier
    pub run_id: RunId,

    /// Terminal state
    pub state: PipelineState,

    /// Number of chunks the document was split into
    pub total_chunks: usize,

    /// Chunks that produced a result
    pub succeeded: usize,

    /// Results whose reply was not valid JSON
    pub parse_failures: usize,

    /// Indices of chunks whose backend call failed
    pub failed_chunks: Vec<usize>,

    /// Wall-clock duration in milliseconds
    pub processing_time_ms: u64,
}

impl PipelineReport {
    /// True when the run reached `Completed`
    pub fn is_completed(&self) -> bool {
        self.state == PipelineState::Completed
    }
}
