//! Segment extraction from TMX (Translation Memory eXchange) files.
//!
//! Each `<tu>` holds already-parallel segments, one `<tuv>` per language, so
//! no structural walk is needed: a unit yields a pair when both languages of
//! interest carry non-empty text.

use std::path::Path;

use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};

use crate::config::{LanguageSpec, OUTPUT_DATE_FORMAT, TMX_DATE_FORMAT};
use crate::encoding::decode_bytes;
use crate::error::{AlignerError, Result};
use crate::types::{AlignedPair, PairType, SegmentMeta};
use crate::xml::{
    clean_text, collect_text, find_child, find_children, get_attribute, has_tag, xml_lang,
};

/// Inline elements holding native formatting codes rather than text.
const INLINE_CODE_TAGS: [&str; 4] = ["bpt", "ept", "it", "ph"];

/// What the translation units of a file contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TmxMode {
    /// Glossary entries (terms).
    Terms,

    /// Full sentence translations.
    Sentences,
}

impl TmxMode {
    #[must_use]
    pub fn pair_type(&self) -> PairType {
        match self {
            Self::Terms => PairType::Term,
            Self::Sentences => PairType::Sentence,
        }
    }
}

/// Tool provenance from the TMX header. Logged, not interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TmxHeader {
    pub creation_tool: String,
    pub creation_tool_version: String,
}

/// Result of extracting one TMX file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TmxExtraction {
    pub header: TmxHeader,

    /// Number of `<tu>` elements in the body.
    pub units: usize,

    /// Units dropped because a language was absent or empty.
    pub dropped: usize,

    pub pairs: Vec<AlignedPair>,
}

/// One selected segment within a translation unit.
struct Segment {
    text: String,
    creator: Option<String>,
    created: Option<String>,
}

/// Read, decode and extract a TMX file.
pub fn read_tmx(
    path: &Path,
    source: &LanguageSpec,
    target: &LanguageSpec,
    mode: TmxMode,
) -> Result<TmxExtraction> {
    let context = path.display().to_string();
    let bytes = std::fs::read(path)?;
    let decoded = decode_bytes(&bytes, &context)?;
    tracing::debug!(file = %context, encoding = decoded.encoding, "Decoded TMX");

    let doc = Document::parse(&decoded.text)?;
    extract_segment_pairs(&doc, source, target, mode, &context)
}

/// Extract segment pairs from a parsed TMX document.
///
/// Within a unit the first `<tuv>` per language wins. Units lacking either
/// language (or with empty text) are dropped without error: a unit may hold
/// only other languages, or be mid-edit with one side filled in.
pub fn extract_segment_pairs(
    doc: &Document<'_>,
    source: &LanguageSpec,
    target: &LanguageSpec,
    mode: TmxMode,
    context: &str,
) -> Result<TmxExtraction> {
    let root = doc.root_element();
    let header = parse_header(root);
    tracing::debug!(
        tool = %header.creation_tool,
        version = %header.creation_tool_version,
        "TMX header"
    );

    let body = find_child(root, "body").ok_or_else(|| AlignerError::MissingElement {
        element: "body".to_string(),
        context: context.to_string(),
    })?;

    let mut units = 0;
    let mut pairs = Vec::new();

    for tu in find_children(body, "tu") {
        units += 1;
        if let Some(pair) = extract_unit(tu, source, target, mode) {
            pairs.push(pair);
        }
    }

    let dropped = units - pairs.len();
    tracing::info!(
        file = %context,
        units,
        pairs = pairs.len(),
        dropped,
        "Extracted TMX segments"
    );

    Ok(TmxExtraction {
        header,
        units,
        dropped,
        pairs,
    })
}

fn parse_header(root: Node<'_, '_>) -> TmxHeader {
    let Some(header) = find_child(root, "header") else {
        return TmxHeader::default();
    };
    TmxHeader {
        creation_tool: get_attribute(header, "creationtool")
            .unwrap_or("Unknown")
            .to_string(),
        creation_tool_version: get_attribute(header, "creationtoolversion")
            .unwrap_or_default()
            .to_string(),
    }
}

fn extract_unit(
    tu: Node<'_, '_>,
    source: &LanguageSpec,
    target: &LanguageSpec,
    mode: TmxMode,
) -> Option<AlignedPair> {
    let unit_id = get_attribute(tu, "tuid").unwrap_or_default().to_string();

    let mut source_seg: Option<Segment> = None;
    let mut target_seg: Option<Segment> = None;

    for tuv in find_children(tu, "tuv") {
        let Some(lang) = xml_lang(tuv) else {
            continue;
        };
        let Some(seg) = find_child(tuv, "seg") else {
            continue;
        };

        let slot = if source.matches(lang) {
            &mut source_seg
        } else if target.matches(lang) {
            &mut target_seg
        } else {
            continue;
        };

        if slot.is_none() {
            *slot = Some(Segment {
                text: segment_text(seg),
                creator: non_empty_attribute(tuv, "creationid"),
                created: non_empty_attribute(tuv, "creationdate").map(|d| format_tmx_date(&d)),
            });
        }
    }

    let (source_seg, target_seg) = (source_seg?, target_seg?);
    let pair = AlignedPair::new(
        mode.pair_type(),
        unit_id.clone(),
        &source_seg.text,
        &target_seg.text,
    );
    if pair.is_none() {
        tracing::trace!(tuid = %unit_id, "Dropping unit with empty segment");
    }

    let meta = SegmentMeta {
        unit_id,
        creator: target_seg.creator.or(source_seg.creator),
        created: target_seg.created.or(source_seg.created),
        project: prop_value(tu, "x-project"),
        file_name: prop_value(tu, "x-filename"),
    };

    pair.map(|p| p.with_segment(meta))
}

/// Text of a `<seg>`, leaving out the content of inline code elements.
fn segment_text(seg: Node<'_, '_>) -> String {
    let raw: String = seg
        .descendants()
        .filter(|n| n.is_text())
        .filter(|n| {
            !n.ancestors()
                .take_while(|a| *a != seg)
                .any(|a| INLINE_CODE_TAGS.iter().any(|tag| has_tag(a, tag)))
        })
        .filter_map(|n| n.text())
        .collect();
    clean_text(&raw)
}

/// Value of the first `<prop type="...">` child with non-empty text.
fn prop_value(tu: Node<'_, '_>, prop_type: &str) -> Option<String> {
    find_children(tu, "prop")
        .find(|p| get_attribute(*p, "type") == Some(prop_type))
        .map(collect_text)
        .filter(|s| !s.is_empty())
}

fn non_empty_attribute(node: Node<'_, '_>, name: &str) -> Option<String> {
    get_attribute(node, name)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Render a TMX creation date (`20250225T143122Z`) as `YYYY-MM-DD`.
///
/// Values in any other form pass through unchanged.
///
/// # Examples
/// ```
/// use lexlink_aligner::tmx::format_tmx_date;
///
/// assert_eq!(format_tmx_date("20250225T143122Z"), "2025-02-25");
/// assert_eq!(format_tmx_date("last week"), "last week");
/// ```
#[must_use]
pub fn format_tmx_date(raw: &str) -> String {
    chrono::NaiveDateTime::parse_from_str(raw, TMX_DATE_FORMAT)
        .map(|dt| dt.format(OUTPUT_DATE_FORMAT).to_string())
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn nl() -> LanguageSpec {
        LanguageSpec::new("nl-nl").unwrap()
    }

    fn en() -> LanguageSpec {
        LanguageSpec::new("en-gb").unwrap()
    }

    fn extract(xml: &str, mode: TmxMode) -> Result<TmxExtraction> {
        let doc = Document::parse(xml).unwrap();
        extract_segment_pairs(&doc, &nl(), &en(), mode, "test.tmx")
    }

    #[test]
    fn test_extract_basic_unit_with_metadata() {
        let xml = r#"<tmx version="1.4">
  <header creationtool="SDL Language Platform" creationtoolversion="8.1" srclang="nl"/>
  <body>
    <tu tuid="17">
      <prop type="x-project">Rv 2025</prop>
      <prop type="x-filename">boek1.docx</prop>
      <tuv xml:lang="nl" creationid="JV" creationdate="20250225T143122Z"><seg>dagvaarding</seg></tuv>
      <tuv xml:lang="en-GB" creationid="FB" creationdate="20250226T090000Z"><seg>writ of summons</seg></tuv>
    </tu>
  </body>
</tmx>"#;

        let extraction = extract(xml, TmxMode::Terms).unwrap();
        assert_eq!(extraction.header.creation_tool, "SDL Language Platform");
        assert_eq!(extraction.header.creation_tool_version, "8.1");
        assert_eq!(extraction.units, 1);
        assert_eq!(extraction.dropped, 0);

        let pair = &extraction.pairs[0];
        assert_eq!(pair.pair_type, PairType::Term);
        assert_eq!(pair.reference, "17");
        assert_eq!(pair.source_text, "dagvaarding");
        assert_eq!(pair.target_text, "writ of summons");
        assert_eq!(
            pair.segment,
            Some(SegmentMeta {
                unit_id: "17".to_string(),
                creator: Some("FB".to_string()),
                created: Some("2025-02-26".to_string()),
                project: Some("Rv 2025".to_string()),
                file_name: Some("boek1.docx".to_string()),
            })
        );
    }

    #[test]
    fn test_units_missing_a_language_are_dropped() {
        let xml = r#"<tmx><body>
    <tu tuid="1"><tuv xml:lang="nl"><seg>beslag</seg></tuv><tuv xml:lang="en"><seg>attachment</seg></tuv></tu>
    <tu tuid="2"><tuv xml:lang="nl"><seg>verzet</seg></tuv></tu>
    <tu tuid="3"><tuv xml:lang="nl"><seg>hoger beroep</seg></tuv><tuv xml:lang="de"><seg>Berufung</seg></tuv></tu>
    <tu tuid="4"><tuv xml:lang="nl"><seg>cassatie</seg></tuv><tuv xml:lang="en-gb"><seg> </seg></tuv></tu>
</body></tmx>"#;

        let extraction = extract(xml, TmxMode::Terms).unwrap();
        assert_eq!(extraction.units, 4);
        assert_eq!(extraction.pairs.len(), 1);
        assert_eq!(extraction.dropped, 3);
        assert_eq!(extraction.pairs[0].target_text, "attachment");
    }

    #[test]
    fn test_first_segment_per_language_wins() {
        let xml = r#"<tmx><body>
    <tu tuid="9">
      <tuv xml:lang="en-gb"><seg>first</seg></tuv>
      <tuv xml:lang="nl"><seg>eerste</seg></tuv>
      <tuv xml:lang="en"><seg>second</seg></tuv>
      <tuv xml:lang="nl"><seg>tweede</seg></tuv>
    </tu>
</body></tmx>"#;

        let extraction = extract(xml, TmxMode::Sentences).unwrap();
        assert_eq!(extraction.pairs.len(), 1);
        assert_eq!(extraction.pairs[0].source_text, "eerste");
        assert_eq!(extraction.pairs[0].target_text, "first");
        assert_eq!(extraction.pairs[0].pair_type, PairType::Sentence);
    }

    #[test]
    fn test_segment_inline_markup_and_whitespace() {
        let xml = r#"<tmx><body>
    <tu><tuv xml:lang="nl"><seg>de  <bpt i="1">&lt;b&gt;</bpt>rechter<ept i="1">&lt;/b&gt;</ept></seg></tuv>
        <tuv xml:lang="en"><seg>the
            court</seg></tuv></tu>
</body></tmx>"#;

        let extraction = extract(xml, TmxMode::Terms).unwrap();
        assert_eq!(extraction.pairs[0].source_text, "de rechter");
        assert_eq!(extraction.pairs[0].target_text, "the court");
        assert_eq!(extraction.pairs[0].reference, "");
    }

    #[test]
    fn test_missing_body_is_error() {
        let err = extract(r#"<tmx><header/></tmx>"#, TmxMode::Terms).unwrap_err();
        assert!(matches!(err, AlignerError::MissingElement { ref element, .. } if element == "body"));
    }

    #[test]
    fn test_missing_header_defaults() {
        let extraction = extract(r#"<tmx><body/></tmx>"#, TmxMode::Terms).unwrap();
        assert_eq!(extraction.header, TmxHeader::default());
        assert_eq!(extraction.units, 0);
    }

    #[test]
    fn test_creator_falls_back_to_source() {
        let xml = r#"<tmx><body>
    <tu><tuv xml:lang="nl" creationid="JV" creationdate="2025"><seg>vonnis</seg></tuv>
        <tuv xml:lang="en"><seg>judgment</seg></tuv></tu>
</body></tmx>"#;

        let extraction = extract(xml, TmxMode::Terms).unwrap();
        let meta = extraction.pairs[0].segment.clone().unwrap();
        assert_eq!(meta.creator.as_deref(), Some("JV"));
        assert_eq!(meta.created.as_deref(), Some("2025"));
        assert_eq!(meta.project, None);
    }

    #[test]
    fn test_tmx_mode_pair_type() {
        assert_eq!(TmxMode::Terms.pair_type(), PairType::Term);
        assert_eq!(TmxMode::Sentences.pair_type(), PairType::Sentence);
    }
}
