//! Bilingual treaty alignment service that ties the components together.

use std::path::Path;

use roxmltree::Document;

use crate::config::{bwb_id_from_file_name, AlignConfig};
use crate::encoding::decode_bytes;
use crate::error::{AlignerError, Result};
use crate::extract::{create_treaty_registry, find_variant, DocumentExtractor};
use crate::matcher::{align_variants, AlignmentReport};
use crate::types::AlignedPair;

/// Aligned pairs of one treaty file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreatyAlignment {
    pub pairs: Vec<AlignedPair>,
    pub report: AlignmentReport,

    /// BWB identifier derived from the file name, if it has one.
    pub document_id: Option<String>,
}

/// Read a treaty file and align its two language variants.
///
/// # Arguments
/// * `path` - Treaty XML holding one wrapper element per language
/// * `config` - Language pair and extraction settings
///
/// # Returns
/// The aligned pairs, or [`AlignerError::MissingVariant`] if either language
/// is absent from the file.
pub fn align_treaty_file(path: &Path, config: &AlignConfig) -> Result<TreatyAlignment> {
    let context = path.display().to_string();
    let bytes = std::fs::read(path)?;
    let decoded = decode_bytes(&bytes, &context)?;

    let mut alignment = align_treaty(&decoded.text, config, &context)?;
    alignment.document_id = bwb_id_from_file_name(path);
    Ok(alignment)
}

/// Align the two language variants of a treaty given as XML text.
///
/// `context` names the input in errors and logs.
pub fn align_treaty(xml: &str, config: &AlignConfig, context: &str) -> Result<TreatyAlignment> {
    let doc = Document::parse(xml)?;

    for language in [&config.source, &config.target] {
        if find_variant(&doc, &config.variant_tag, language).is_none() {
            tracing::warn!(file = %context, language = %language.code, "Missing variant");
            return Err(AlignerError::MissingVariant {
                language: language.code.clone(),
                context: context.to_string(),
            });
        }
    }

    let extractor =
        DocumentExtractor::new(create_treaty_registry()).with_min_fragment_len(config.min_fragment_len);
    let primary = extractor.extract_variant(&doc, &config.variant_tag, &config.source);
    let secondary = extractor.extract_variant(&doc, &config.variant_tag, &config.target);

    for variant in [&primary, &secondary] {
        if variant.is_empty() {
            tracing::warn!(file = %context, language = %variant.language_tag, "Variant has no units");
            return Err(AlignerError::MissingVariant {
                language: variant.language_tag.clone(),
                context: context.to_string(),
            });
        }
    }

    let alignment = align_variants(&primary, &secondary);
    tracing::info!(
        file = %context,
        pairs = alignment.pairs.len(),
        chapters = alignment.report.chapters_matched,
        articles = alignment.report.articles_matched,
        unmatched = alignment.report.unmatched.len(),
        "Aligned treaty"
    );

    Ok(TreatyAlignment {
        pairs: alignment.pairs,
        report: alignment.report,
        document_id: None,
    })
}
