//! Document in, JSON lines out.

use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;
use crate::output::{write_chunk_dump, write_summary, JsonLinesSink};
use bidscope_domain::{CompletionBackend, Document, TextSource};
use bidscope_extractor::{BidSummary, PipelineReport, PipelineRunner, TextChunker};
use bidscope_source::{FileTextSource, RfpScreen};
use std::io::Write;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// What a finished invocation produced.
#[derive(Debug)]
pub struct Outcome {
    /// Runner report
    pub report: PipelineReport,
    /// Costs summed over the streamed results
    pub summary: BidSummary,
    /// Failed chunks missing from the stream
    pub omitted_chunks: Vec<usize>,
    /// True if writing the progress stream failed
    pub output_broken: bool,
}

impl Outcome {
    /// Process exit code: 0 only for a completed run with intact output.
    pub fn exit_code(&self) -> i32 {
        if self.report.is_completed() && !self.output_broken {
            0
        } else {
            1
        }
    }
}

/// Read the document named on the command line.
pub fn load_document(cli: &Cli) -> Result<Document> {
    let source = FileTextSource::new().with_cleaning(cli.clean);
    let document = source.extract_text(&cli.document)?;
    info!(
        "Read {} words from {}",
        document.word_count(),
        cli.document.display()
    );
    Ok(document)
}

/// Stream per-chunk estimates for `document` to `out`.
///
/// Writes the chunk listing and summary files when the command line asks
/// for them. Neither the RFP screen nor an empty document is an error here;
/// both show up in the returned report and the logs.
pub async fn execute<B, W>(
    cli: &Cli,
    config: &Config,
    document: &Document,
    backend: B,
    out: W,
    cancel: &CancellationToken,
) -> Result<Outcome>
where
    B: CompletionBackend + Send + Sync + 'static,
    B::Error: std::fmt::Display,
    W: Write,
{
    if !RfpScreen::default().screen(document) {
        warn!(
            "{} does not look like an RFP; continuing anyway",
            document.source_id()
        );
    }

    if let Some(path) = &cli.dump_chunks {
        let chunks = TextChunker::new(config.extractor.chunk_size).chunk(document);
        let filename = cli
            .document
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| document.source_id().to_string());
        write_chunk_dump(path, &filename, &chunks)?;
    }

    let mut runner = PipelineRunner::new(backend, config.extractor.clone())?;
    let mut sink = JsonLinesSink::new(out, cancel.clone());
    let report = runner.run(document, &mut sink, cancel).await;

    let summary = sink.summary().clone();
    if let Some(path) = &cli.summary {
        write_summary(path, &summary)?;
    }

    let omitted_chunks = sink.omitted_chunks().to_vec();
    if !omitted_chunks.is_empty() {
        warn!(
            "{} of {} chunks failed and are missing from the output: {:?}",
            omitted_chunks.len(),
            report.total_chunks,
            omitted_chunks
        );
    }

    Ok(Outcome {
        report,
        summary,
        omitted_chunks,
        output_broken: sink.is_broken(),
    })
}
