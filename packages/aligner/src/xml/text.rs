//! Text normalization for extracted content.
//!
//! Every text that reaches matching or deduplication passes through
//! [`clean_text`], so two renderings of the same string always compare equal.

use roxmltree::Node;
use unicode_normalization::UnicodeNormalization;

/// Collapse whitespace runs to single spaces, trim, and apply Unicode NFC.
///
/// # Examples
/// ```
/// use lexlink_aligner::xml::clean_text;
///
/// assert_eq!(clean_text("  vaste\n\t inrichting "), "vaste inrichting");
/// ```
#[must_use]
pub fn clean_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .nfc()
        .collect()
}

/// Concatenate all descendant text nodes in document order and clean them.
///
/// Inline markup contributes its text without inserting separators, so
/// `Hello <nadruk>world</nadruk>!` yields `Hello world!`. Text nodes that are
/// only split by an empty element join directly: `regel<br/>volgende` yields
/// `regelvolgende`.
#[must_use]
pub fn collect_text(node: Node<'_, '_>) -> String {
    let raw: String = node
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    clean_text(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    #[test]
    fn test_clean_text_collapses_and_trims() {
        assert_eq!(clean_text("a  b\n\nc"), "a b c");
        assert_eq!(clean_text("   "), "");
        assert_eq!(clean_text("\u{a0}Abkommen\u{a0}"), "Abkommen");
    }

    #[test]
    fn test_clean_text_nfc() {
        // "e" followed by a combining diaeresis composes to "ë".
        assert_eq!(clean_text("bee\u{308}indiging"), "beëindiging");
    }

    #[test]
    fn test_collect_text_inline_markup() {
        let xml = "<al>Hello <nadruk>world</nadruk>!</al>";
        let doc = Document::parse(xml).unwrap();
        assert_eq!(collect_text(doc.root_element()), "Hello world!");
    }

    #[test]
    fn test_collect_text_nested_blocks() {
        let xml = "<titel>\n  Personen\n  <extref>op wie</extref>\n  het verdrag van toepassing is\n</titel>";
        let doc = Document::parse(xml).unwrap();
        assert_eq!(
            collect_text(doc.root_element()),
            "Personen op wie het verdrag van toepassing is"
        );
    }

    #[test]
    fn test_collect_text_joins_without_separator() {
        let doc = Document::parse("<al>regel<br/>volgende</al>").unwrap();
        assert_eq!(collect_text(doc.root_element()), "regelvolgende");

        let doc = Document::parse("<al>ver<nadruk>drag</nadruk></al>").unwrap();
        assert_eq!(collect_text(doc.root_element()), "verdrag");
    }

    #[test]
    fn test_collect_text_empty_element() {
        let doc = Document::parse("<titel/>").unwrap();
        assert_eq!(collect_text(doc.root_element()), "");
    }
}
