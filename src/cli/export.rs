//! Export subcommand for kanban-board CLI
//!
//! Writes every board, with its columns, tasks and subtasks nested in display
//! order, as pretty-printed JSON.

use anyhow::Result;
use clap::Args;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

use crate::types::BoardTree;

/// Snapshot format version, bumped when the JSON layout changes.
pub const EXPORT_FORMAT_VERSION: u32 = 1;

/// Arguments for the export subcommand
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Output file path (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Force gzip compression (auto-detected from .gz extension otherwise)
    #[arg(long)]
    pub gzip: bool,
}

impl ExportArgs {
    /// Explicit --gzip wins; otherwise compress when the output file ends in `.gz`.
    pub fn should_compress(&self) -> bool {
        self.gzip
            || self
                .output
                .as_ref()
                .and_then(|p| p.extension())
                .is_some_and(|ext| ext == "gz")
    }
}

/// Top-level export document.
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub version: u32,
    pub exported_at: String,
    pub boards: &'a [BoardTree],
}

impl<'a> Snapshot<'a> {
    pub fn new(boards: &'a [BoardTree]) -> Self {
        Self {
            version: EXPORT_FORMAT_VERSION,
            exported_at: chrono::Utc::now().to_rfc3339(),
            boards,
        }
    }
}

/// Serialize the snapshot into `writer`, gzipped when `compress` is set.
pub fn write_snapshot<W: Write>(boards: &[BoardTree], compress: bool, writer: W) -> Result<()> {
    let json = serde_json::to_string_pretty(&Snapshot::new(boards))?;
    if compress {
        let mut encoder = GzEncoder::new(writer, Compression::default());
        encoder.write_all(json.as_bytes())?;
        encoder.finish()?.flush()?;
    } else {
        let mut writer = writer;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    Ok(())
}
