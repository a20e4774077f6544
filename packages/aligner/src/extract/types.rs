//! Types for the extraction system.

use crate::types::UnitKind;

/// Declarative specification of an element that forms a structural unit.
#[derive(Debug, Clone)]
pub struct UnitSpec {
    /// XML tag name (without namespace).
    pub tag: String,

    /// Kind of unit this element produces.
    pub kind: UnitKind,

    /// Path to the element holding the heading text.
    pub title_path: Option<String>,

    /// Tag of the paragraph leaves to collect, if any.
    pub paragraph_tag: Option<String>,
}

impl UnitSpec {
    /// Create a new unit specification.
    #[must_use]
    pub fn new(tag: impl Into<String>, kind: UnitKind) -> Self {
        Self {
            tag: tag.into(),
            kind,
            title_path: None,
            paragraph_tag: None,
        }
    }

    /// Set the title path.
    #[must_use]
    pub fn with_title_path(mut self, path: impl Into<String>) -> Self {
        self.title_path = Some(path.into());
        self
    }

    /// Set the paragraph leaf tag.
    #[must_use]
    pub fn with_paragraph_tag(mut self, tag: impl Into<String>) -> Self {
        self.paragraph_tag = Some(tag.into());
        self
    }
}
