//! Bidscope document sources
//!
//! Turns files on disk into [`Document`](bidscope_domain::Document)s for
//! the extraction pipeline.
//!
//! # Sources
//!
//! - [`PdfTextSource`]: text layer of a PDF, page by page
//! - [`PlainTextSource`]: UTF-8 text and markdown files
//! - [`FileTextSource`]: picks one of the above by file extension and
//!   optionally cleans the result
//!
//! Pages without a text layer are skipped; OCR is not performed here.
//!
//! # Example
//!
//! ```no_run
//! use bidscope_domain::TextSource;
//! use bidscope_source::FileTextSource;
//! use std::path::Path;
//!
//! let source = FileTextSource::new().with_cleaning(true);
//! let document = source.extract_text(Path::new("rfp.pdf")).unwrap();
//! println!("{} words", document.word_count());
//! ```

#![warn(missing_docs)]

mod clean;
mod error;
mod file;
mod pdf;
mod screen;

pub use clean::clean_extracted_text;
pub use error::{Result, SourceError};
pub use file::{FileTextSource, PlainTextSource};
pub use pdf::PdfTextSource;
pub use screen::RfpScreen;
