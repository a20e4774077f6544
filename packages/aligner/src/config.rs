//! Configuration constants, validation functions and run configuration.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AlignerError, Result};

/// Namespace of the `xml:lang` attribute.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Default minimum length (in characters) of a paragraph fragment.
///
/// Shorter fragments are page numbers, list markers or stray punctuation.
pub const DEFAULT_MIN_FRAGMENT_LEN: usize = 5;

/// Tag name of the per-language wrapper element in bilingual treaty XML.
pub const DEFAULT_VARIANT_TAG: &str = "verdrag";

/// Creation date format used by TMX (`20250225T143122Z`).
pub const TMX_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Date format written to the record stream.
pub const OUTPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Language tag pattern: a 2-3 letter primary subtag with optional subtags.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static LANGUAGE_TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{2,8})*$").expect("valid regex")
});

/// BWB ID pattern: BWBR (regulation) or BWBV (treaty) followed by 7 digits.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static BWB_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^BWB[RV]\d{7}$").expect("valid regex"));

/// Validate a language tag.
///
/// # Examples
/// ```
/// use lexlink_aligner::config::validate_language_tag;
///
/// assert!(validate_language_tag("nl-nl").is_ok());
/// assert!(validate_language_tag("en").is_ok());
/// assert!(validate_language_tag("dutch!").is_err());
/// ```
pub fn validate_language_tag(tag: &str) -> Result<()> {
    if LANGUAGE_TAG_PATTERN.is_match(tag) {
        Ok(())
    } else {
        Err(AlignerError::InvalidLanguageTag(tag.to_string()))
    }
}

/// Validate a BWB identifier.
pub fn validate_bwb_id(bwb_id: &str) -> Result<()> {
    if BWB_ID_PATTERN.is_match(bwb_id) {
        Ok(())
    } else {
        Err(AlignerError::InvalidBwbId(bwb_id.to_string()))
    }
}

/// Derive the BWB identifier from a repository file name.
///
/// Repository files are named `<bwb-id>_<date>_<version>.xml`.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use lexlink_aligner::config::bwb_id_from_file_name;
///
/// let path = Path::new("treaty/BWBV0004110_2005-07-24_0.xml");
/// assert_eq!(bwb_id_from_file_name(path), Some("BWBV0004110".to_string()));
/// assert_eq!(bwb_id_from_file_name(Path::new("notes.xml")), None);
/// ```
#[must_use]
pub fn bwb_id_from_file_name(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let candidate = stem.split('_').next()?;
    validate_bwb_id(candidate).ok()?;
    Some(candidate.to_string())
}

/// A language of interest with the tags that identify it in source markup.
///
/// `code` is written to the record stream; `aliases` are compared
/// case-insensitively against `xml:lang` values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSpec {
    pub code: String,
    pub aliases: Vec<String>,
}

impl LanguageSpec {
    /// Create a language spec from a code, accepting the code itself and its
    /// primary subtag (`en-gb` also matches `en`).
    pub fn new(code: &str) -> Result<Self> {
        validate_language_tag(code)?;
        let code = code.to_lowercase();
        let mut aliases = vec![code.clone()];
        if let Some((primary, _)) = code.split_once('-') {
            aliases.push(primary.to_string());
        }
        Ok(Self { code, aliases })
    }

    /// Add further tags that identify this language.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for alias in aliases {
            let alias = alias.as_ref();
            validate_language_tag(alias)?;
            let alias = alias.to_lowercase();
            if !self.aliases.contains(&alias) {
                self.aliases.push(alias);
            }
        }
        Ok(self)
    }

    /// Check whether a markup language tag denotes this language.
    #[must_use]
    pub fn matches(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.aliases.iter().any(|a| a.eq_ignore_ascii_case(tag))
    }
}

/// Configuration for one alignment run.
#[derive(Debug, Clone)]
pub struct AlignConfig {
    /// Primary (source) language.
    pub source: LanguageSpec,

    /// Secondary (target) language.
    pub target: LanguageSpec,

    /// Paragraph fragments shorter than this many characters are discarded.
    pub min_fragment_len: usize,

    /// Tag name of the per-language wrapper element.
    pub variant_tag: String,
}

impl AlignConfig {
    /// Create a configuration for a language pair with default settings.
    #[must_use]
    pub fn new(source: LanguageSpec, target: LanguageSpec) -> Self {
        Self {
            source,
            target,
            min_fragment_len: DEFAULT_MIN_FRAGMENT_LEN,
            variant_tag: DEFAULT_VARIANT_TAG.to_string(),
        }
    }

    /// Set the minimum paragraph fragment length.
    #[must_use]
    pub fn with_min_fragment_len(mut self, len: usize) -> Self {
        self.min_fragment_len = len;
        self
    }

    /// Set the wrapper element tag.
    #[must_use]
    pub fn with_variant_tag(mut self, tag: impl Into<String>) -> Self {
        self.variant_tag = tag.into();
        self
    }
}

/// Provenance defaults for one dictionary, loadable from YAML.
///
/// ```yaml
/// author: van Gassen
/// license: All rights reserved
/// reviewed: true
/// legal_domain: tax_treaty
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryProfile {
    pub author: String,
    pub license: String,
    pub reviewed: bool,
    pub premium: bool,
    pub external_ref: String,
    pub legal_domain: String,
}

impl Default for DictionaryProfile {
    fn default() -> Self {
        Self {
            author: String::new(),
            license: "All rights reserved".to_string(),
            reviewed: false,
            premium: false,
            external_ref: String::new(),
            legal_domain: String::new(),
        }
    }
}

impl DictionaryProfile {
    /// Parse a profile from YAML text. Absent keys keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load a profile from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }
}

/// Render a boolean flag the way the record stream spells it.
#[must_use]
pub fn flag_str(flag: bool) -> &'static str {
    if flag {
        "TRUE"
    } else {
        "FALSE"
    }
}
