//! Progress stream and file output for the CLI.

use crate::error::Result;
use bidscope_domain::Chunk;
use bidscope_extractor::{BidSummary, PipelineEvent, ProgressSink};
use std::fs;
use std::io::Write;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Writes each chunk result as one compact JSON line.
///
/// Lines are flushed as they are written. A write failure cancels the run
/// through `cancel`; later results are dropped. Failed chunks write
/// nothing and are only recorded.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    cancel: CancellationToken,
    summary: BidSummary,
    omitted: Vec<usize>,
    broken: bool,
}

impl<W: Write> JsonLinesSink<W> {
    /// Create a sink over `writer`.
    pub fn new(writer: W, cancel: CancellationToken) -> Self {
        Self {
            writer,
            cancel,
            summary: BidSummary::default(),
            omitted: Vec::new(),
            broken: false,
        }
    }

    /// Costs summed over every result seen so far.
    pub fn summary(&self) -> &BidSummary {
        &self.summary
    }

    /// Indices of failed chunks left out of the stream.
    pub fn omitted_chunks(&self) -> &[usize] {
        &self.omitted
    }

    /// True once a write has failed.
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Consume the sink, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()
    }
}

impl<W: Write> ProgressSink for JsonLinesSink<W> {
    fn emit(&mut self, event: PipelineEvent) {
        match event {
            PipelineEvent::Started {
                run_id,
                total_chunks,
            } => {
                info!("Run {}: streaming {} chunks", run_id, total_chunks);
            }
            PipelineEvent::Chunk(result) => {
                self.summary.add(&result);
                if self.broken {
                    return;
                }

                let written = serde_json::to_string(&result)
                    .map_err(std::io::Error::from)
                    .and_then(|line| self.write_line(&line));
                if let Err(e) = written {
                    error!("Failed to write chunk {}: {}", result.chunk_index, e);
                    self.broken = true;
                    self.cancel.cancel();
                }
            }
            PipelineEvent::ChunkFailed { chunk_index, .. } => {
                debug!("Chunk {} failed, leaving it out of the stream", chunk_index);
                self.omitted.push(chunk_index);
            }
        }
    }
}

/// Render chunks in the `FILENAME: … | CHUNK_ID: …` listing format.
pub fn format_chunk_dump(filename: &str, chunks: &[Chunk]) -> String {
    let rule = "-".repeat(80);
    let mut out = String::new();
    for chunk in chunks {
        out.push_str(&format!(
            "FILENAME: {} | CHUNK_ID: {}\n{}\n{}\n",
            filename, chunk.chunk_index, chunk.text, rule
        ));
    }
    out
}

/// Write the chunk listing to `path`.
pub fn write_chunk_dump(path: &Path, filename: &str, chunks: &[Chunk]) -> Result<()> {
    fs::write(path, format_chunk_dump(filename, chunks))?;
    info!("Wrote {} chunks to {}", chunks.len(), path.display());
    Ok(())
}

/// Write the summary to `path` as pretty JSON.
pub fn write_summary(path: &Path, summary: &BidSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json)?;
    info!(
        "Wrote summary to {} (total bid {:.2})",
        path.display(),
        summary.total_bid
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidscope_extractor::ExtractionResult;
    use serde_json::{json, Value};

    fn result(index: usize, answer: Option<Value>) -> ExtractionResult {
        ExtractionResult {
            chunk_index: index,
            chunk_text: format!("chunk {}", index),
            raw_answer_text: "raw".to_string(),
            parsed_answer: answer,
            parse_failure: None,
            total_chunks: 2,
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_one_line_per_chunk() {
        let mut sink = JsonLinesSink::new(Vec::new(), CancellationToken::new());
        sink.emit(PipelineEvent::Chunk(result(0, Some(json!({"total_bid": 5})))));
        sink.emit(PipelineEvent::ChunkFailed {
            chunk_index: 1,
            total_chunks: 2,
            error: "boom".to_string(),
        });

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 1);

        let value: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["chunkIndex"], 0);
        assert_eq!(value["chunkText"], "chunk 0");
        assert_eq!(value["answer"], "raw");
        assert_eq!(value["answer_json"]["total_bid"], 5);
        assert_eq!(value["totalChunks"], 2);
    }

    #[test]
    fn test_failed_chunk_writes_nothing() {
        let mut sink = JsonLinesSink::new(Vec::new(), CancellationToken::new());
        sink.emit(PipelineEvent::ChunkFailed {
            chunk_index: 3,
            total_chunks: 4,
            error: "Backend call timed out after 20ms".to_string(),
        });

        assert_eq!(sink.omitted_chunks(), &[3]);
        assert_eq!(sink.summary().chunks_seen, 0);
        assert!(!sink.is_broken());
        assert!(sink.into_inner().is_empty());
    }

    #[test]
    fn test_sink_accumulates_summary() {
        let mut sink = JsonLinesSink::new(Vec::new(), CancellationToken::new());
        sink.emit(PipelineEvent::Chunk(result(0, Some(json!({"total_bid": 5})))));
        sink.emit(PipelineEvent::Chunk(result(1, None)));

        assert_eq!(sink.summary().chunks_seen, 2);
        assert_eq!(sink.summary().chunks_parsed, 1);
        assert_eq!(sink.summary().total_bid, 5.0);
    }

    #[test]
    fn test_write_failure_cancels_run() {
        let cancel = CancellationToken::new();
        let mut sink = JsonLinesSink::new(BrokenPipe, cancel.clone());
        sink.emit(PipelineEvent::Chunk(result(0, None)));

        assert!(sink.is_broken());
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn test_chunk_dump_format() {
        let chunks = vec![Chunk::new(0, "a b", 2), Chunk::new(1, "c", 2)];
        let dump = format_chunk_dump("rfp.pdf", &chunks);
        let rule = "-".repeat(80);
        assert_eq!(
            dump,
            format!(
                "FILENAME: rfp.pdf | CHUNK_ID: 0\na b\n{rule}\nFILENAME: rfp.pdf | CHUNK_ID: 1\nc\n{rule}\n"
            )
        );
    }

    #[test]
    fn test_write_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let summary = BidSummary::from_results(&[result(
            0,
            Some(json!({"section_costs": {"labor": 100}, "total_bid": 100})),
        )]);

        write_summary(&path, &summary).unwrap();
        let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["total_bid"], 100.0);
        assert_eq!(value["section_costs"]["labor"], 100.0);
        assert_eq!(value["chunks_parsed"], 1);
    }
}
