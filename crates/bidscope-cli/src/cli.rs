//! Command-line argument definitions.

use bidscope_extractor::SchemaKind;
use clap::Parser;
use std::path::PathBuf;

/// Bidscope - stream per-chunk cost estimates for an RFP document.
///
/// Writes one JSON object per processed chunk to stdout. Logs go to stderr.
#[derive(Debug, Parser)]
#[command(name = "bidscope")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// RFP document (.pdf, .txt or .md)
    pub document: PathBuf,

    /// Configuration file path (default: ~/.bidscope/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// API key for the chat-completions endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Chat-completions endpoint base URL
    #[arg(long, env = "BIDSCOPE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Words per chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Extraction schema
    #[arg(short, long, value_enum)]
    pub schema: Option<SchemaArg>,

    /// Model identifier
    #[arg(short, long)]
    pub model: Option<String>,

    /// Stop at the first chunk whose backend call fails
    #[arg(long)]
    pub halt_on_error: bool,

    /// Strip dot leaders, page markers and non-printable characters first
    #[arg(long)]
    pub clean: bool,

    /// Write the chunk listing to this file before processing
    #[arg(long, value_name = "FILE")]
    pub dump_chunks: Option<PathBuf>,

    /// Write the summed cost estimate to this file as JSON
    #[arg(long, value_name = "FILE")]
    pub summary: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Schema argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SchemaArg {
    /// Every section with reasoning, evidence and cost explanations
    Detailed,
    /// Every section, costs only
    Compact,
}

impl From<SchemaArg> for SchemaKind {
    fn from(schema: SchemaArg) -> Self {
        match schema {
            SchemaArg::Detailed => SchemaKind::Detailed,
            SchemaArg::Compact => SchemaKind::Compact,
        }
    }
}
