//! Bidscope Extractor
//!
//! Turns RFP text into per-chunk construction cost estimates using an LLM.
//!
//! # Overview
//!
//! A document is split into fixed-size word windows. Each window is wrapped
//! in an estimator prompt, sent to a [`CompletionBackend`](bidscope_domain::CompletionBackend),
//! and the reply is decoded as JSON. Results are handed to a
//! [`ProgressSink`] one at a time, in chunk order, as soon as each exists.
//!
//! # Architecture
//!
//! ```text
//! Document → TextChunker → PromptBuilder → Backend → parse_answer → ProgressSink
//! ```
//!
//! # Key Features
//!
//! - **Word-window chunking**: deterministic, order-preserving, lossless
//! - **Schema-driven prompts**: detailed and compact estimator schemas
//! - **Lenient parsing**: code fences stripped; unparseable replies kept verbatim
//! - **Failure policy**: skip a failed chunk or halt the run
//! - **Cancellation**: checked between chunks
//!
//! # Example Usage
//!
//! ```no_run
//! use bidscope_domain::Document;
//! use bidscope_extractor::{ExtractorConfig, PipelineEvent, PipelineRunner};
//! use bidscope_llm::MockProvider;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"{"total_bid": 40000}"#);
//! let mut runner = PipelineRunner::new(llm, ExtractorConfig::default())?;
//!
//! let document = Document::new("rfp.txt", "Replace 12,000 SF of roofing at the fire station.");
//! let mut sink = |event: PipelineEvent| {
//!     if let PipelineEvent::Chunk(result) = event {
//!         println!("{}", serde_json::to_string(&result).unwrap());
//!     }
//! };
//!
//! let report = runner
//!     .run(&document, &mut sink, &CancellationToken::new())
//!     .await;
//! println!("{} of {} chunks", report.succeeded, report.total_chunks);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod chunking;
mod config;
mod error;
mod parser;
mod pipeline;
mod processor;
mod prompt;
mod summary;
mod types;


pub use chunking::TextChunker;
pub use config::{
    ExtractorConfig, FailurePolicy, SchemaKind, DEFAULT_MODEL, DEFAULT_SYSTEM_INSTRUCTION,
};
pub use error::ExtractorError;
pub use parser::{parse_answer, ParseFailure};
pub use pipeline::PipelineRunner;
pub use processor::ChunkProcessor;
pub use prompt::{ExtractionSchema, PromptBuilder, SchemaSection};
pub use summary::BidSummary;
pub use types::{
    AbortReason, ExtractionResult, PipelineEvent, PipelineReport, PipelineState, ProgressSink,
};
