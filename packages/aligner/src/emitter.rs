//! Canonicalization of aligned pairs into the persisted record stream.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use uuid::Uuid;

use crate::config::{flag_str, DictionaryProfile, OUTPUT_DATE_FORMAT};
use crate::error::{AlignerError, Result};
use crate::tabular::TermRow;
use crate::types::{AlignedPair, CanonicalRecord, DuplicateEntry, PairType, Provenance};

/// Column order of the canonical record stream.
pub const CANONICAL_COLUMNS: [&str; 10] = [
    "id",
    "source_text",
    "lang_source",
    "target_text",
    "lang_target",
    "author",
    "license",
    "reviewed_flag",
    "premium_flag",
    "external_ref",
];

/// Columns appended in the extended layout.
pub const EXTENDED_COLUMNS: [&str; 9] = [
    "pair_type",
    "reference",
    "source_file",
    "document_id",
    "extraction_date",
    "legal_domain",
    "locator",
    "translation_date",
    "unit_file",
];

/// Where a batch of pairs came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Origin {
    pub source_file: String,
    pub document_id: String,
}

impl Origin {
    /// Origin of pairs read from `path`, with an optional document id.
    #[must_use]
    pub fn from_path(path: &Path, document_id: Option<String>) -> Self {
        Self {
            source_file: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            document_id: document_id.unwrap_or_default(),
        }
    }
}

/// Turns aligned pairs into canonical records for one output dataset.
///
/// The seen-set lives here and nowhere else: one canonicalizer per dataset,
/// first occurrence of a `(source_text, target_text)` pair wins.
pub struct Canonicalizer {
    source_lang: String,
    target_lang: String,
    profile: DictionaryProfile,
    extraction_date: String,
    seen: HashMap<(String, String), (String, usize)>,
    offered: usize,
    duplicates: Vec<DuplicateEntry>,
}

impl Canonicalizer {
    /// Create a canonicalizer writing the given language codes.
    #[must_use]
    pub fn new(
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
        profile: DictionaryProfile,
    ) -> Self {
        Self {
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            profile,
            extraction_date: chrono::Local::now().format(OUTPUT_DATE_FORMAT).to_string(),
            seen: HashMap::new(),
            offered: 0,
            duplicates: Vec::new(),
        }
    }

    /// Override the extraction date written to provenance.
    #[must_use]
    pub fn with_extraction_date(mut self, date: impl Into<String>) -> Self {
        self.extraction_date = date.into();
        self
    }

    /// Canonicalize one aligned pair, found at the 1-based `position` of
    /// its file.
    ///
    /// Returns `None` if the pair duplicates an earlier one; the duplicate is
    /// recorded in [`Canonicalizer::duplicates`].
    pub fn emit(
        &mut self,
        pair: &AlignedPair,
        origin: &Origin,
        position: usize,
    ) -> Option<CanonicalRecord> {
        self.admit(&pair.source_text, &pair.target_text, &pair.reference, origin, position)?;

        let segment = pair.segment.as_ref();
        let author = self
            .profile_author()
            .or_else(|| segment.and_then(|s| s.creator.clone()))
            .unwrap_or_default();
        let document_id = if origin.document_id.is_empty() {
            segment.and_then(|s| s.project.clone()).unwrap_or_default()
        } else {
            origin.document_id.clone()
        };

        let provenance = Provenance {
            author,
            document_id,
            locator: pair.locator.clone().unwrap_or_default(),
            translation_date: segment.and_then(|s| s.created.clone()).unwrap_or_default(),
            unit_file: segment.and_then(|s| s.file_name.clone()).unwrap_or_default(),
            ..self.provenance(origin)
        };

        Some(self.record(
            &pair.source_text,
            &pair.target_text,
            Some(pair.pair_type),
            &pair.reference,
            provenance,
        ))
    }

    /// Canonicalize one row of a flat term list, `position` being its
    /// 1-based data row number.
    ///
    /// Row provenance is kept where present; the profile fills the gaps.
    /// Rows with an empty side are skipped and return `None` without being
    /// recorded as duplicates.
    pub fn emit_row(
        &mut self,
        row: &TermRow,
        origin: &Origin,
        position: usize,
    ) -> Option<CanonicalRecord> {
        let (source_text, target_text) = row.texts();
        if source_text.is_empty() || target_text.is_empty() {
            tracing::debug!(row = position, "Skipping row with empty term");
            return None;
        }
        self.admit(&source_text, &target_text, &row.id, origin, position)?;

        let base = self.provenance(origin);
        let provenance = Provenance {
            author: or_default(&row.author, base.author),
            license: or_default(&row.license, base.license),
            reviewed_flag: or_default(&row.reviewed_flag, base.reviewed_flag),
            premium_flag: or_default(&row.premium_flag, base.premium_flag),
            external_ref: or_default(&row.external_ref, base.external_ref),
            ..base
        };

        Some(self.record(&source_text, &target_text, None, "", provenance))
    }

    /// Duplicates recorded so far, in input order.
    #[must_use]
    pub fn duplicates(&self) -> &[DuplicateEntry] {
        &self.duplicates
    }

    /// Number of pairs offered so far, duplicates included.
    #[must_use]
    pub fn seen_count(&self) -> usize {
        self.offered
    }

    /// Consume the canonicalizer, returning the duplicate report.
    #[must_use]
    pub fn into_duplicates(self) -> Vec<DuplicateEntry> {
        self.duplicates
    }

    /// Check the seen-set, remembering where each pair first occurred.
    fn admit(
        &mut self,
        source_text: &str,
        target_text: &str,
        reference: &str,
        origin: &Origin,
        position: usize,
    ) -> Option<()> {
        self.offered += 1;
        let key = (source_text.to_string(), target_text.to_string());

        if let Some((first_file, first)) = self.seen.get(&key) {
            tracing::debug!(
                file = %origin.source_file,
                position,
                duplicate_of = first,
                "Discarding duplicate pair"
            );
            self.duplicates.push(DuplicateEntry {
                source_file: origin.source_file.clone(),
                position,
                reference: reference.to_string(),
                duplicate_of_file: first_file.clone(),
                duplicate_of: *first,
                source_text: key.0,
                target_text: key.1,
            });
            return None;
        }

        self.seen.insert(key, (origin.source_file.clone(), position));
        Some(())
    }

    fn profile_author(&self) -> Option<String> {
        Some(self.profile.author.clone()).filter(|a| !a.is_empty())
    }

    fn provenance(&self, origin: &Origin) -> Provenance {
        Provenance {
            author: self.profile.author.clone(),
            license: self.profile.license.clone(),
            reviewed_flag: flag_str(self.profile.reviewed).to_string(),
            premium_flag: flag_str(self.profile.premium).to_string(),
            external_ref: self.profile.external_ref.clone(),
            source_file: origin.source_file.clone(),
            document_id: origin.document_id.clone(),
            extraction_date: self.extraction_date.clone(),
            legal_domain: self.profile.legal_domain.clone(),
            ..Provenance::default()
        }
    }

    fn record(
        &self,
        source_text: &str,
        target_text: &str,
        pair_type: Option<PairType>,
        reference: &str,
        provenance: Provenance,
    ) -> CanonicalRecord {
        CanonicalRecord {
            id: Uuid::new_v4(),
            source_lang: self.source_lang.clone(),
            target_lang: self.target_lang.clone(),
            source_text: source_text.to_string(),
            target_text: target_text.to_string(),
            pair_type,
            reference: reference.to_string(),
            provenance,
        }
    }
}

fn or_default(value: &str, default: String) -> String {
    if value.is_empty() {
        default
    } else {
        value.to_string()
    }
}

/// Column layout of the written record stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// The ten canonical columns.
    #[default]
    Canonical,

    /// Canonical columns followed by pair type, reference, origin and
    /// unit metadata.
    Extended,
}

/// Writes canonical records as delimited text with a header row.
pub struct RecordWriter<W: Write> {
    inner: csv::Writer<W>,
    layout: Layout,
}

impl<W: Write> RecordWriter<W> {
    /// Create a writer and write the header row.
    pub fn new(writer: W, delimiter: u8, layout: Layout) -> Result<Self> {
        let mut inner = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);

        let mut header: Vec<&str> = CANONICAL_COLUMNS.to_vec();
        if layout == Layout::Extended {
            header.extend(EXTENDED_COLUMNS);
        }
        inner.write_record(&header)?;

        Ok(Self { inner, layout })
    }

    /// Write one record.
    pub fn write(&mut self, record: &CanonicalRecord) -> Result<()> {
        let id = record.id.to_string();
        let p = &record.provenance;
        let mut row: Vec<&str> = vec![
            id.as_str(),
            record.source_text.as_str(),
            record.source_lang.as_str(),
            record.target_text.as_str(),
            record.target_lang.as_str(),
            p.author.as_str(),
            p.license.as_str(),
            p.reviewed_flag.as_str(),
            p.premium_flag.as_str(),
            p.external_ref.as_str(),
        ];
        if self.layout == Layout::Extended {
            row.extend([
                record.pair_type.map(|t| t.as_str()).unwrap_or_default(),
                record.reference.as_str(),
                p.source_file.as_str(),
                p.document_id.as_str(),
                p.extraction_date.as_str(),
                p.legal_domain.as_str(),
                p.locator.as_str(),
                p.translation_date.as_str(),
                p.unit_file.as_str(),
            ]);
        }
        self.inner.write_record(&row)?;
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.inner.flush()?;
        self.inner
            .into_inner()
            .map_err(|e| AlignerError::Io(e.into_error()))
    }
}
