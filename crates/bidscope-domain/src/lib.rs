//! Bidscope Domain Layer
//!
//! Core model and trait seams for turning long RFP documents into
//! per-chunk structured cost estimates.
//!
//! ## Key Concepts
//!
//! - **Document**: the raw text of one source file
//! - **Chunk**: a bounded, order-preserving slice of a document
//! - **RunId**: identifies one pipeline run in logs
//! - **CompletionBackend**: the text-generation service called once per chunk
//! - **TextSource**: obtains document text from a file
//!
//! ## Architecture
//!
//! This crate performs no I/O. Backends and sources are implemented in
//! `bidscope-llm` and `bidscope-source`; the pipeline lives in
//! `bidscope-extractor`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod run;
pub mod traits;

// Re-exports for convenience
pub use document::{Chunk, Document};
pub use run::RunId;
pub use traits::{CompletionBackend, CompletionRequest, TextSource};
