//! Bidscope CLI library.
//!
//! Configuration loading, logging setup, the JSON-lines progress stream and
//! the document-to-stream flow behind the `bidscope` binary.

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod output;

pub use cli::Cli;
pub use config::Config;
pub use error::{CliError, Result};
pub use extract::{execute, load_document, Outcome};
pub use output::JsonLinesSink;
