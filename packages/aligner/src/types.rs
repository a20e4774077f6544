//! Core data types for the aligner.
//!
//! Units and variants are transient per extraction run, aligned pairs are
//! consumed immediately by the canonicalizer, and canonical records are the
//! only values that are persisted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::label::{normalize_label, LabelKey};

/// Kind of structural unit in a legal document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Chapter (hoofdstuk).
    Chapter,

    /// Article (artikel).
    Article,

    /// Paragraph (al).
    Paragraph,
}

impl UnitKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chapter => "chapter",
            Self::Article => "article",
            Self::Paragraph => "paragraph",
        }
    }
}

/// One chapter or article in one language variant of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralUnit {
    pub kind: UnitKind,

    /// Raw display label, e.g. "Artikel 5". Not assumed unique.
    pub label: String,

    /// Numeral extracted from `label`, used only for matching.
    normalized_key: Option<LabelKey>,

    /// Heading text, empty if absent.
    pub title: String,

    /// Paragraph leaf texts in document order.
    pub children: Vec<String>,

    /// BWB `bwb-ng-variabel-deel` locator, if present.
    pub variable_part: Option<String>,
}

impl StructuralUnit {
    /// Create a unit. The normalized key is derived from the label here and
    /// never recomputed.
    #[must_use]
    pub fn new(kind: UnitKind, label: impl Into<String>, title: impl Into<String>) -> Self {
        let label = label.into();
        let normalized_key = normalize_label(&label);
        Self {
            kind,
            label,
            normalized_key,
            title: title.into(),
            children: Vec::new(),
            variable_part: None,
        }
    }

    /// Set the paragraph leaves.
    #[must_use]
    pub fn with_children(mut self, children: Vec<String>) -> Self {
        self.children = children;
        self
    }

    /// Set the BWB locator.
    #[must_use]
    pub fn with_variable_part(mut self, variable_part: Option<String>) -> Self {
        self.variable_part = variable_part;
        self
    }

    #[must_use]
    pub fn normalized_key(&self) -> Option<LabelKey> {
        self.normalized_key
    }
}

/// One language's rendering of a single source document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentVariant {
    pub language_tag: String,

    /// Units in document order.
    pub units: Vec<StructuralUnit>,
}

impl DocumentVariant {
    #[must_use]
    pub fn new(language_tag: impl Into<String>) -> Self {
        Self {
            language_tag: language_tag.into(),
            units: Vec::new(),
        }
    }

    /// Whether no units were extracted (e.g. the variant root was absent).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Iterate over units of one kind in document order.
    pub fn units_of_kind(&self, kind: UnitKind) -> impl Iterator<Item = &StructuralUnit> {
        self.units.iter().filter(move |u| u.kind == kind)
    }

    /// Count units of one kind.
    #[must_use]
    pub fn count(&self, kind: UnitKind) -> usize {
        self.units_of_kind(kind).count()
    }
}

/// Type of an aligned pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairType {
    ChapterTitle,
    ArticleTitle,
    Paragraph,
    Term,
    Sentence,
}

impl PairType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChapterTitle => "chapter_title",
            Self::ArticleTitle => "article_title",
            Self::Paragraph => "paragraph",
            Self::Term => "term",
            Self::Sentence => "sentence",
        }
    }
}

/// Metadata carried by translation-memory segment pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentMeta {
    /// Translation unit identifier (`tuid`).
    pub unit_id: String,

    /// Creator of the target segment, falling back to the source segment.
    pub creator: Option<String>,

    /// Creation date as `YYYY-MM-DD`, or the raw value if unparseable.
    pub created: Option<String>,

    /// `x-project` property.
    pub project: Option<String>,

    /// `x-filename` property.
    pub file_name: Option<String>,
}

/// A matched (source, target) correspondence between two variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedPair {
    pub pair_type: PairType,

    /// Human-readable locator, e.g. "Artikel 5 para 2".
    pub reference: String,

    pub source_text: String,
    pub target_text: String,

    /// BWB locator of the source unit, for treaty pairs.
    pub locator: Option<String>,

    /// Present for translation-memory pairs.
    pub segment: Option<SegmentMeta>,
}

impl AlignedPair {
    /// Create a pair, or `None` if either side is empty after trimming.
    #[must_use]
    pub fn new(
        pair_type: PairType,
        reference: impl Into<String>,
        source_text: &str,
        target_text: &str,
    ) -> Option<Self> {
        let source_text = source_text.trim();
        let target_text = target_text.trim();
        if source_text.is_empty() || target_text.is_empty() {
            return None;
        }
        Some(Self {
            pair_type,
            reference: reference.into(),
            source_text: source_text.to_string(),
            target_text: target_text.to_string(),
            locator: None,
            segment: None,
        })
    }

    /// Attach the source unit's BWB locator.
    #[must_use]
    pub fn with_locator(mut self, locator: Option<String>) -> Self {
        self.locator = locator;
        self
    }

    /// Attach translation-memory metadata.
    #[must_use]
    pub fn with_segment(mut self, segment: SegmentMeta) -> Self {
        self.segment = Some(segment);
        self
    }
}

/// Provenance metadata attached to a record. Opaque to the core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub author: String,
    pub license: String,
    pub reviewed_flag: String,
    pub premium_flag: String,

    /// External dictionary reference, empty when not populated.
    pub external_ref: String,

    pub source_file: String,

    /// Identifier of the source document (e.g. a BWB id).
    pub document_id: String,

    /// Extraction date as `YYYY-MM-DD`.
    pub extraction_date: String,

    pub legal_domain: String,

    /// BWB `bwb-ng-variabel-deel` of the source unit.
    pub locator: String,

    /// Creation date of the translation-memory segment.
    pub translation_date: String,

    /// Document a translation-memory unit was translated from (`x-filename`).
    pub unit_file: String,
}

/// The persisted output unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRecord {
    /// Freshly generated, never reused.
    pub id: Uuid,
    pub source_lang: String,
    pub target_lang: String,
    pub source_text: String,
    pub target_text: String,
    pub pair_type: Option<PairType>,
    pub reference: String,
    pub provenance: Provenance,
}

/// An exact duplicate discarded during canonicalization.
///
/// Positions are 1-based within their file: the data row for term lists,
/// the extracted pair otherwise. Skipped rows still take up a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateEntry {
    pub source_file: String,
    pub position: usize,

    /// Locator of the discarded pair (unit id or article reference).
    pub reference: String,

    pub duplicate_of_file: String,
    pub duplicate_of: usize,

    pub source_text: String,
    pub target_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_unit_key_computed_from_label() {
        let unit = StructuralUnit::new(UnitKind::Article, "Artikel 5", "Inwoner");
        assert_eq!(unit.normalized_key(), Some(LabelKey::new(5)));

        let unit = StructuralUnit::new(UnitKind::Chapter, "Slotbepalingen", "");
        assert_eq!(unit.normalized_key(), None);
    }

    #[test]
    fn test_document_variant_units_of_kind() {
        let mut variant = DocumentVariant::new("nl");
        assert!(variant.is_empty());
        variant.units.push(StructuralUnit::new(UnitKind::Chapter, "Hoofdstuk I", "A"));
        variant.units.push(StructuralUnit::new(UnitKind::Article, "Artikel 1", "B"));
        variant.units.push(StructuralUnit::new(UnitKind::Article, "Artikel 2", "C"));

        assert_eq!(variant.count(UnitKind::Chapter), 1);
        assert_eq!(variant.count(UnitKind::Article), 2);
        let labels: Vec<_> = variant
            .units_of_kind(UnitKind::Article)
            .map(|u| u.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Artikel 1", "Artikel 2"]);
    }

    #[test]
    fn test_aligned_pair_rejects_empty_side() {
        assert!(AlignedPair::new(PairType::Term, "", "inwoner", "  ").is_none());
        assert!(AlignedPair::new(PairType::Term, "", "", "ansässig").is_none());

        let pair = AlignedPair::new(PairType::Term, "1", " inwoner ", "ansässig").unwrap();
        assert_eq!(pair.source_text, "inwoner");
        assert!(pair.segment.is_none());
    }

    #[test]
    fn test_pair_type_as_str_matches_serde() {
        for pair_type in [
            PairType::ChapterTitle,
            PairType::ArticleTitle,
            PairType::Paragraph,
            PairType::Term,
            PairType::Sentence,
        ] {
            let json = serde_json::to_string(&pair_type).unwrap();
            assert_eq!(json, format!("\"{}\"", pair_type.as_str()));
        }
    }
}
