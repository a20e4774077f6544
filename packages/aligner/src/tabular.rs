//! Flat term lists (CSV or TSV).
//!
//! Rows deserialize into [`TermRow`]. Both the legacy dictionary columns
//! (`source`, `lang-source`, `sme-reviewed`, ...) and the canonical record
//! columns (`source_text`, `lang_source`, `reviewed_flag`, ...) are accepted,
//! so a dataset written by this crate can be read back for validation.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::encoding::decode_bytes;
use crate::error::Result;
use crate::xml::clean_text;

/// One row of a flat term list. Absent columns are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TermRow {
    pub id: String,

    #[serde(alias = "source")]
    pub source_text: String,

    #[serde(alias = "lang-source")]
    pub lang_source: String,

    #[serde(alias = "target")]
    pub target_text: String,

    #[serde(alias = "lang-target")]
    pub lang_target: String,

    #[serde(alias = "translator")]
    pub author: String,

    pub license: String,

    #[serde(alias = "sme-reviewed")]
    pub reviewed_flag: String,

    #[serde(alias = "premium")]
    pub premium_flag: String,

    #[serde(alias = "lang-target-dict")]
    pub external_ref: String,
}

impl TermRow {
    /// Source and target text as used for pairing and deduplication.
    #[must_use]
    pub fn texts(&self) -> (String, String) {
        (clean_text(&self.source_text), clean_text(&self.target_text))
    }
}

/// Pick the delimiter from the header line: tab if it holds a tab, else comma.
///
/// # Examples
/// ```
/// use lexlink_aligner::tabular::detect_delimiter;
///
/// assert_eq!(detect_delimiter("id\tsource\ttarget"), b'\t');
/// assert_eq!(detect_delimiter("id,source,target"), b',');
/// ```
#[must_use]
pub fn detect_delimiter(header: &str) -> u8 {
    if header.contains('\t') {
        b'\t'
    } else {
        b','
    }
}

/// Read a term list file. The file is decoded like any other input.
pub fn read_term_rows(path: &Path) -> Result<Vec<TermRow>> {
    let context = path.display().to_string();
    let bytes = std::fs::read(path)?;
    let decoded = decode_bytes(&bytes, &context)?;

    let rows = parse_term_rows(decoded.text.as_bytes())?;
    tracing::info!(file = %context, rows = rows.len(), "Read term list");
    Ok(rows)
}

/// Parse term rows from text with a header line.
pub fn parse_term_rows<R: Read>(mut reader: R) -> Result<Vec<TermRow>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    let header = text.lines().next().unwrap_or_default();
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(header))
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    // Short rows are padded to the header width so missing trailing columns
    // deserialize as empty strings instead of failing the file.
    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let mut record = result?;
        record.truncate(headers.len());
        while record.len() < headers.len() {
            record.push_field("");
        }
        let row: TermRow = record.deserialize(Some(&headers))?;
        rows.push(row);
    }
    Ok(rows)
}
