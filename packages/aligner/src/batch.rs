//! Multi-file runs into one output dataset.
//!
//! Files are processed one after another through a single [`Canonicalizer`],
//! so deduplication spans the whole dataset. A failing input file is recorded
//! in the summary and the batch moves on; only output errors abort.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{AlignConfig, LanguageSpec};
use crate::emitter::{Canonicalizer, Origin, RecordWriter};
use crate::error::{AlignerError, Result};
use crate::tabular::read_term_rows;
use crate::tmx::{read_tmx, TmxMode};
use crate::treaty::align_treaty_file;
use crate::types::AlignedPair;

/// Kind of input files in a batch.
#[derive(Debug, Clone)]
pub enum InputKind {
    /// Bilingual treaty XML.
    Treaty(AlignConfig),

    /// TMX translation memories.
    Tmx {
        source: LanguageSpec,
        target: LanguageSpec,
        mode: TmxMode,
    },

    /// Flat term lists (CSV or TSV).
    TermList,
}

/// Outcome of one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,

    /// Pairs or rows offered to the canonicalizer.
    pub pairs: usize,

    /// Records written from this file.
    pub records: usize,

    /// Error message if the file failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileOutcome {
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub files: Vec<FileOutcome>,
    pub records: usize,
    pub duplicates: usize,
}

impl BatchSummary {
    /// Files that failed, in input order.
    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files.iter().filter(|f| f.is_failure())
    }
}

/// Run a batch over `paths`, writing records as they are produced.
///
/// `on_file` is called before each file is processed.
pub fn run_batch<W, F>(
    paths: &[PathBuf],
    kind: &InputKind,
    canonicalizer: &mut Canonicalizer,
    writer: &mut RecordWriter<W>,
    mut on_file: F,
) -> Result<BatchSummary>
where
    W: Write,
    F: FnMut(&Path),
{
    let mut summary = BatchSummary::default();

    for path in paths {
        on_file(path);
        let duplicates_before = canonicalizer.duplicates().len();

        let outcome = match process_file(path, kind, canonicalizer, writer) {
            Ok((pairs, records)) => FileOutcome {
                path: path.clone(),
                pairs,
                records,
                error: None,
            },
            Err(FileError::Output(e)) => return Err(e),
            Err(FileError::Input(e)) => {
                tracing::warn!(file = %path.display(), error = %e, "Skipping file");
                FileOutcome {
                    path: path.clone(),
                    pairs: 0,
                    records: 0,
                    error: Some(e.to_string()),
                }
            }
        };

        summary.records += outcome.records;
        summary.duplicates += canonicalizer.duplicates().len() - duplicates_before;
        summary.files.push(outcome);
    }

    tracing::info!(
        files = summary.files.len(),
        failed = summary.failures().count(),
        records = summary.records,
        duplicates = summary.duplicates,
        "Batch complete"
    );

    Ok(summary)
}

/// Splits per-file input failures from output failures that end the batch.
enum FileError {
    Input(AlignerError),
    Output(AlignerError),
}

fn process_file<W: Write>(
    path: &Path,
    kind: &InputKind,
    canonicalizer: &mut Canonicalizer,
    writer: &mut RecordWriter<W>,
) -> std::result::Result<(usize, usize), FileError> {
    match kind {
        InputKind::Treaty(config) => {
            let alignment = align_treaty_file(path, config).map_err(FileError::Input)?;
            let origin = Origin::from_path(path, alignment.document_id);
            write_pairs(&alignment.pairs, &origin, canonicalizer, writer)
        }
        InputKind::Tmx {
            source,
            target,
            mode,
        } => {
            let extraction = read_tmx(path, source, target, *mode).map_err(FileError::Input)?;
            let origin = Origin::from_path(path, None);
            write_pairs(&extraction.pairs, &origin, canonicalizer, writer)
        }
        InputKind::TermList => {
            let rows = read_term_rows(path).map_err(FileError::Input)?;
            let origin = Origin::from_path(path, None);
            let mut records = 0;
            for (i, row) in rows.iter().enumerate() {
                if let Some(record) = canonicalizer.emit_row(row, &origin, i + 1) {
                    writer.write(&record).map_err(FileError::Output)?;
                    records += 1;
                }
            }
            Ok((rows.len(), records))
        }
    }
}

fn write_pairs<W: Write>(
    pairs: &[AlignedPair],
    origin: &Origin,
    canonicalizer: &mut Canonicalizer,
    writer: &mut RecordWriter<W>,
) -> std::result::Result<(usize, usize), FileError> {
    let mut records = 0;
    for (i, pair) in pairs.iter().enumerate() {
        if let Some(record) = canonicalizer.emit(pair, origin, i + 1) {
            writer.write(&record).map_err(FileError::Output)?;
            records += 1;
        }
    }
    Ok((pairs.len(), records))
}
