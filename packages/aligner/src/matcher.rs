//! Cross-variant matching of structural units.
//!
//! Units are paired by the numeral in their label, never by title text:
//! titles are rendered in different word orders across languages and say
//! nothing about structural correspondence.
//!
//! Known limitation: when several secondary units share a key (renumbered
//! or malformed input), the first one in document order wins and the
//! ambiguity is not reported.

use serde::Serialize;

use crate::label::LabelKey;
use crate::types::{AlignedPair, DocumentVariant, PairType, StructuralUnit, UnitKind};

/// Counters describing one alignment run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlignmentReport {
    pub chapters_matched: usize,
    pub articles_matched: usize,

    /// Labels of primary units with a key but no counterpart.
    pub unmatched: Vec<String>,

    /// Primary units whose label holds no numeral.
    pub unkeyed: usize,

    pub paragraph_pairs: usize,

    /// Paragraphs dropped because the other article had fewer.
    pub excess_paragraphs: usize,
}

/// Result of aligning two variants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alignment {
    /// Chapter titles, then article titles, then paragraphs; document order
    /// within each group.
    pub pairs: Vec<AlignedPair>,
    pub report: AlignmentReport,
}

/// Find the first secondary unit of `kind` whose key equals `key`.
///
/// O(m) per lookup; unit counts per document are small enough that no index
/// is needed.
#[must_use]
pub fn find_counterpart(
    secondary: &DocumentVariant,
    kind: UnitKind,
    key: LabelKey,
) -> Option<&StructuralUnit> {
    secondary
        .units_of_kind(kind)
        .find(|unit| unit.normalized_key() == Some(key))
}

/// Align a primary (source-language) variant with a secondary variant.
///
/// Chapters and articles are matched independently: a failed chapter match
/// never prevents article matching.
#[must_use]
pub fn align_variants(primary: &DocumentVariant, secondary: &DocumentVariant) -> Alignment {
    let mut report = AlignmentReport::default();
    let mut pairs = Vec::new();

    let chapters = match_kind(primary, secondary, UnitKind::Chapter, &mut report);
    report.chapters_matched = chapters.len();
    pairs.extend(title_pairs(&chapters, PairType::ChapterTitle));

    let articles = match_kind(primary, secondary, UnitKind::Article, &mut report);
    report.articles_matched = articles.len();
    pairs.extend(title_pairs(&articles, PairType::ArticleTitle));

    for (source, target) in &articles {
        let (paragraphs, excess) = pair_paragraphs(source, target);
        report.paragraph_pairs += paragraphs.len();
        report.excess_paragraphs += excess;
        pairs.extend(paragraphs);
    }

    tracing::debug!(
        chapters = report.chapters_matched,
        articles = report.articles_matched,
        unmatched = report.unmatched.len(),
        paragraphs = report.paragraph_pairs,
        excess_paragraphs = report.excess_paragraphs,
        "Aligned variants"
    );

    Alignment { pairs, report }
}

/// Pair every keyed primary unit of `kind` with its counterpart.
fn match_kind<'a>(
    primary: &'a DocumentVariant,
    secondary: &'a DocumentVariant,
    kind: UnitKind,
    report: &mut AlignmentReport,
) -> Vec<(&'a StructuralUnit, &'a StructuralUnit)> {
    let mut matched = Vec::new();

    for unit in primary.units_of_kind(kind) {
        let Some(key) = unit.normalized_key() else {
            report.unkeyed += 1;
            continue;
        };

        match find_counterpart(secondary, kind, key) {
            Some(counterpart) => matched.push((unit, counterpart)),
            None => {
                tracing::debug!(label = %unit.label, kind = kind.as_str(), "No counterpart");
                report.unmatched.push(unit.label.clone());
            }
        }
    }

    matched
}

/// Emit title pairs for matched units where both titles are non-empty.
fn title_pairs(
    matched: &[(&StructuralUnit, &StructuralUnit)],
    pair_type: PairType,
) -> Vec<AlignedPair> {
    matched
        .iter()
        .filter_map(|(source, target)| {
            AlignedPair::new(pair_type, source.label.clone(), &source.title, &target.title)
                .map(|p| p.with_locator(source.variable_part.clone()))
        })
        .collect()
}

/// Pair the paragraphs of two matched articles by position.
///
/// The i-th source paragraph pairs with the i-th target paragraph, up to the
/// shorter sequence. This holds only because official-language renderings
/// of legal texts keep paragraph order; no content similarity is used.
///
/// Returns the pairs and the number of excess paragraphs on either side.
#[must_use]
pub fn pair_paragraphs(
    source: &StructuralUnit,
    target: &StructuralUnit,
) -> (Vec<AlignedPair>, usize) {
    let excess = source.children.len().abs_diff(target.children.len());
    if excess > 0 {
        tracing::debug!(
            label = %source.label,
            source = source.children.len(),
            target = target.children.len(),
            "Paragraph count differs, dropping excess"
        );
    }

    let pairs = source
        .children
        .iter()
        .zip(&target.children)
        .enumerate()
        .filter_map(|(i, (s, t))| {
            AlignedPair::new(
                PairType::Paragraph,
                format!("{} para {}", source.label, i + 1),
                s,
                t,
            )
            .map(|p| p.with_locator(source.variable_part.clone()))
        })
        .collect();

    (pairs, excess)
}
