//! XML utility functions for navigating and extracting data from DOM trees.

use roxmltree::Node;

use crate::config::XML_NAMESPACE;

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use lexlink_aligner::xml::get_tag_name;
///
/// let xml = r#"<root><artikel>text</artikel></root>"#;
/// let doc = Document::parse(xml).unwrap();
/// let artikel = doc.root_element().first_element_child().unwrap();
/// assert_eq!(get_tag_name(artikel), "artikel");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Find the first child element with the given tag name.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use lexlink_aligner::xml::find_child;
///
/// let xml = r#"<tu><prop/><tuv/></tu>"#;
/// let doc = Document::parse(xml).unwrap();
/// let tu = doc.root_element();
///
/// assert!(find_child(tu, "tuv").is_some());
/// assert!(find_child(tu, "seg").is_none());
/// ```
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| has_tag(*child, tag))
}

/// Find all child elements with the given tag name.
pub fn find_children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| has_tag(*child, tag))
}

/// Find all descendant elements with the given tag name, in document order.
///
/// The node itself is not included.
pub fn descendants_with_tag<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.descendants()
        .skip(1)
        .filter(move |n| has_tag(*n, tag))
}

/// Find a descendant element matching a path of tag names.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use lexlink_aligner::xml::find_by_path;
///
/// let xml = r#"<artikel><kop><titel>Inwoner</titel></kop></artikel>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// let titel = find_by_path(doc.root_element(), "kop/titel");
/// assert_eq!(titel.and_then(|n| n.text()), Some("Inwoner"));
/// ```
pub fn find_by_path<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Option<Node<'a, 'input>> {
    let mut current = node;

    for part in path.split('/') {
        current = find_child(current, part)?;
    }

    Some(current)
}

/// Get an attribute value from a node.
pub fn get_attribute<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name)
}

/// Check if a node has a specific tag name.
pub fn has_tag(node: Node<'_, '_>, tag: &str) -> bool {
    node.is_element() && get_tag_name(node) == tag
}

/// Get the language of an element.
///
/// Reads `xml:lang`, falling back to a plain `lang` attribute used by
/// TMX 1.1 files.
pub fn xml_lang<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.attribute((XML_NAMESPACE, "lang"))
        .or_else(|| node.attribute("lang"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
