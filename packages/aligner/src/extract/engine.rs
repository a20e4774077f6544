//! Extraction engine that walks a variant subtree using the unit registry.

use roxmltree::{Document, Node};

use super::registry::UnitRegistry;
use super::types::UnitSpec;
use crate::config::{LanguageSpec, DEFAULT_MIN_FRAGMENT_LEN};
use crate::types::{DocumentVariant, StructuralUnit, UnitKind};
use crate::xml::{
    clean_text, collect_text, descendants_with_tag, find_by_path, get_attribute, get_tag_name,
    has_tag, xml_lang,
};

/// Find the wrapper element holding one language variant.
///
/// The first `tag` element (in document order) whose language matches wins.
pub fn find_variant<'a, 'input>(
    doc: &'a Document<'input>,
    tag: &str,
    language: &LanguageSpec,
) -> Option<Node<'a, 'input>> {
    doc.descendants().find(|n| {
        has_tag(*n, tag)
            && xml_lang(*n).is_some_and(|lang| language.matches(lang))
    })
}

/// Extractor producing a [`DocumentVariant`] from a variant subtree.
///
/// Traversal is depth-first pre-order over element children, so units appear
/// in document order: a chapter precedes the articles it contains, and
/// articles precede those that follow them in the source. Positional
/// paragraph pairing relies on this order.
pub struct DocumentExtractor {
    registry: UnitRegistry,
    min_fragment_len: usize,
}

impl DocumentExtractor {
    /// Create a new extractor.
    #[must_use]
    pub fn new(registry: UnitRegistry) -> Self {
        Self {
            registry,
            min_fragment_len: DEFAULT_MIN_FRAGMENT_LEN,
        }
    }

    /// Set the minimum paragraph fragment length (in characters).
    #[must_use]
    pub fn with_min_fragment_len(mut self, len: usize) -> Self {
        self.min_fragment_len = len;
        self
    }

    /// Extract the variant whose wrapper matches `language`.
    ///
    /// Returns an empty variant if no such wrapper exists; the caller decides
    /// whether that is a missing-variant condition.
    pub fn extract_variant(
        &self,
        doc: &Document<'_>,
        variant_tag: &str,
        language: &LanguageSpec,
    ) -> DocumentVariant {
        match find_variant(doc, variant_tag, language) {
            Some(root) => self.extract(root, &language.code),
            None => {
                tracing::debug!(
                    tag = %variant_tag,
                    language = %language.code,
                    "Variant root not found"
                );
                DocumentVariant::new(language.code.clone())
            }
        }
    }

    /// Extract all units below `root`, regardless of nesting depth.
    pub fn extract(&self, root: Node<'_, '_>, language_tag: &str) -> DocumentVariant {
        let mut variant = DocumentVariant::new(language_tag);
        self.walk(root, &mut variant.units);

        tracing::debug!(
            language = %language_tag,
            chapters = variant.count(UnitKind::Chapter),
            articles = variant.count(UnitKind::Article),
            "Extracted variant"
        );

        variant
    }

    fn walk(&self, node: Node<'_, '_>, units: &mut Vec<StructuralUnit>) {
        for child in node.children().filter(Node::is_element) {
            if let Some(spec) = self.registry.get_spec(get_tag_name(child)) {
                units.push(self.build_unit(child, spec));
            }
            self.walk(child, units);
        }
    }

    fn build_unit(&self, node: Node<'_, '_>, spec: &UnitSpec) -> StructuralUnit {
        let title = spec
            .title_path
            .as_deref()
            .and_then(|path| find_by_path(node, path))
            .map(collect_text)
            .unwrap_or_default();

        let paragraphs = spec
            .paragraph_tag
            .as_deref()
            .map(|tag| self.collect_paragraphs(node, tag))
            .unwrap_or_default();

        let variable_part = get_attribute(node, "bwb-ng-variabel-deel").map(str::to_string);

        StructuralUnit::new(spec.kind, unit_label(node), title)
            .with_children(paragraphs)
            .with_variable_part(variable_part)
    }

    /// Collect minimal paragraph leaves (those not containing another
    /// paragraph) and drop fragments shorter than the minimum length.
    fn collect_paragraphs(&self, node: Node<'_, '_>, tag: &str) -> Vec<String> {
        descendants_with_tag(node, tag)
            .filter(|leaf| descendants_with_tag(*leaf, tag).next().is_none())
            .map(collect_text)
            .filter(|text| text.chars().count() >= self.min_fragment_len)
            .collect()
    }
}

/// Label of a unit: the `label` attribute, or `kop/label` + `kop/nr`.
fn unit_label(node: Node<'_, '_>) -> String {
    if let Some(label) = get_attribute(node, "label") {
        return clean_text(label);
    }

    let parts: Vec<String> = ["kop/label", "kop/nr"]
        .iter()
        .filter_map(|path| find_by_path(node, path))
        .map(collect_text)
        .filter(|s| !s.is_empty())
        .collect();
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::create_treaty_registry;
    use crate::label::LabelKey;

    fn extractor() -> DocumentExtractor {
        DocumentExtractor::new(create_treaty_registry())
    }

    const NESTED: &str = r#"<verdrag xml:lang="nl">
        <hoofdstuk label="Hoofdstuk I">
            <kop><label>Hoofdstuk</label><nr>I</nr><titel>Reikwijdte van het verdrag</titel></kop>
            <artikel label="Artikel 1" bwb-ng-variabel-deel="/HoofdstukI/Artikel1">
                <kop><label>Artikel</label><nr>1</nr><titel>Personen op wie het verdrag van toepassing is</titel></kop>
                <al>Dit verdrag is van toepassing op personen.</al>
            </artikel>
        </hoofdstuk>
        <deel>
            <afdeling>
                <artikel label="Artikel 2">
                    <kop><titel>Belastingen   waarop het
                        verdrag van toepassing is</titel></kop>
                    <lid>
                        <lidnr>1.</lidnr>
                        <al>Dit verdrag is van toepassing op belastingen naar het inkomen.</al>
                    </lid>
                    <lid>
                        <lidnr>2.</lidnr>
                        <al>2.</al>
                        <al>Als belastingen naar het inkomen worden beschouwd alle belastingen.</al>
                    </lid>
                </artikel>
            </afdeling>
        </deel>
    </verdrag>"#;

    #[test]
    fn test_extract_collects_units_at_any_depth_in_order() {
        let doc = Document::parse(NESTED).unwrap();
        let variant = extractor().extract(doc.root_element(), "nl-nl");

        let labels: Vec<_> = variant.units.iter().map(|u| u.label.as_str()).collect();
        assert_eq!(labels, vec!["Hoofdstuk I", "Artikel 1", "Artikel 2"]);
        assert_eq!(variant.language_tag, "nl-nl");
        assert_eq!(variant.units[0].kind, UnitKind::Chapter);
        assert_eq!(variant.units[0].normalized_key(), Some(LabelKey::new(1)));
    }

    #[test]
    fn test_extract_titles_are_normalized() {
        let doc = Document::parse(NESTED).unwrap();
        let variant = extractor().extract(doc.root_element(), "nl-nl");

        assert_eq!(variant.units[0].title, "Reikwijdte van het verdrag");
        assert_eq!(
            variant.units[2].title,
            "Belastingen waarop het verdrag van toepassing is"
        );
    }

    #[test]
    fn test_extract_paragraphs_drop_short_fragments() {
        let doc = Document::parse(NESTED).unwrap();
        let variant = extractor().extract(doc.root_element(), "nl-nl");

        assert_eq!(
            variant.units[2].children,
            vec![
                "Dit verdrag is van toepassing op belastingen naar het inkomen.",
                "Als belastingen naar het inkomen worden beschouwd alle belastingen.",
            ]
        );
        // Chapters do not collect paragraphs of their articles.
        assert!(variant.units[0].children.is_empty());
    }

    #[test]
    fn test_extract_min_fragment_len_configurable() {
        let doc = Document::parse(NESTED).unwrap();
        let variant = extractor()
            .with_min_fragment_len(1)
            .extract(doc.root_element(), "nl-nl");

        assert_eq!(variant.units[2].children.len(), 3);
        assert_eq!(variant.units[2].children[1], "2.");
    }

    #[test]
    fn test_extract_variable_part() {
        let doc = Document::parse(NESTED).unwrap();
        let variant = extractor().extract(doc.root_element(), "nl-nl");

        assert_eq!(
            variant.units[1].variable_part.as_deref(),
            Some("/HoofdstukI/Artikel1")
        );
        assert_eq!(variant.units[2].variable_part, None);
    }

    #[test]
    fn test_label_falls_back_to_kop() {
        let xml = r#"<verdrag><artikel><kop><label>Article</label><nr>7</nr></kop></artikel></verdrag>"#;
        let doc = Document::parse(xml).unwrap();
        let variant = extractor().extract(doc.root_element(), "fr-fr");

        assert_eq!(variant.units[0].label, "Article 7");
        assert_eq!(variant.units[0].normalized_key(), Some(LabelKey::new(7)));
        assert_eq!(variant.units[0].title, "");
    }

    #[test]
    fn test_extract_variant_missing_root_is_empty() {
        let doc = Document::parse(r#"<root><verdrag xml:lang="nl"/></root>"#).unwrap();
        let fr = LanguageSpec::new("fr-fr").unwrap();

        let variant = extractor().extract_variant(&doc, "verdrag", &fr);
        assert!(variant.is_empty());
        assert_eq!(variant.language_tag, "fr-fr");
    }

    #[test]
    fn test_find_variant_matches_alias() {
        let xml = r#"<root>
            <verdrag xml:lang="nl"><artikel label="Artikel 1"/></verdrag>
            <verdrag xml:lang="fr"><artikel label="Article 1"/></verdrag>
        </root>"#;
        let doc = Document::parse(xml).unwrap();
        let fr = LanguageSpec::new("fr-fr").unwrap();

        let node = find_variant(&doc, "verdrag", &fr).unwrap();
        assert_eq!(xml_lang(node), Some("fr"));
    }
}
