//! Error types for the aligner.
//!
//! Only conditions the caller must act on are errors. A unit without a
//! counterpart or a duplicate pair is an expected outcome and is reported
//! through the alignment and duplicate reports instead.

use thiserror::Error;

/// Main error type for the aligner library.
#[derive(Debug, Error)]
pub enum AlignerError {
    /// One of the two required language variants is absent from a document.
    #[error("Missing '{language}' variant in {context}")]
    MissingVariant { language: String, context: String },

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// Input bytes could not be decoded, even after encoding detection.
    #[error("Could not decode {context} (tried {encoding})")]
    Decode { context: String, encoding: String },

    /// Missing required XML element.
    #[error("Missing required XML element: {element} in {context}")]
    MissingElement { element: String, context: String },

    /// Invalid language tag.
    #[error("Invalid language tag: '{0}'. Expected an ISO-style code (e.g., nl, nl-nl, en-gb)")]
    InvalidLanguageTag(String),

    /// Invalid BWB identifier.
    #[error("Invalid BWB ID format: '{0}'. Expected BWBRXXXXXXX or BWBVXXXXXXX (e.g., BWBV0004110)")]
    InvalidBwbId(String),

    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl AlignerError {
    /// Whether this error is the named missing-variant outcome.
    #[must_use]
    pub fn is_missing_variant(&self) -> bool {
        matches!(self, Self::MissingVariant { .. })
    }
}

/// Result type alias for aligner operations.
pub type Result<T> = std::result::Result<T, AlignerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_variant_display() {
        let err = AlignerError::MissingVariant {
            language: "fr".to_string(),
            context: "BWBV0004110.xml".to_string(),
        };
        assert_eq!(err.to_string(), "Missing 'fr' variant in BWBV0004110.xml");
        assert!(err.is_missing_variant());
    }

    #[test]
    fn test_missing_element_display() {
        let err = AlignerError::MissingElement {
            element: "body".to_string(),
            context: "glossary.tmx".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing required XML element: body in glossary.tmx"
        );
        assert!(!err.is_missing_variant());
    }

    #[test]
    fn test_invalid_language_tag_display() {
        let err = AlignerError::InvalidLanguageTag("dutch!".to_string());
        assert!(err.to_string().contains("dutch!"));
        assert!(err.to_string().contains("en-gb"));
    }
}
