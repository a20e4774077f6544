//! LexLink Aligner - Extract bilingual legal term and sentence pairs.
//!
//! This crate aligns the language variants of bilingual treaty XML by
//! structure (chapter and article numbers), extracts segment pairs from TMX
//! translation memories, and canonicalizes the pairs into a deduplicated
//! dictionary record stream with fresh identifiers.
//!
//! # Example
//!
//! ```
//! use lexlink_aligner::config::{AlignConfig, LanguageSpec};
//! use lexlink_aligner::treaty::align_treaty;
//!
//! let xml = r#"<verdragtekst>
//!   <verdrag xml:lang="nl"><artikel label="Artikel 1"><kop><titel>Personen</titel></kop></artikel></verdrag>
//!   <verdrag xml:lang="fr"><artikel label="Article 1"><kop><titel>Personnes visées</titel></kop></artikel></verdrag>
//! </verdragtekst>"#;
//!
//! let config = AlignConfig::new(LanguageSpec::new("nl-nl")?, LanguageSpec::new("fr-fr")?);
//! let alignment = align_treaty(xml, &config, "example")?;
//! assert_eq!(alignment.pairs[0].target_text, "Personnes visées");
//! # Ok::<(), lexlink_aligner::AlignerError>(())
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants, validation, run configuration and dictionary profiles
//! - [`types`]: Core data types (units, variants, pairs, records)
//! - [`error`]: Error types and Result alias
//! - [`encoding`]: Strict and fallback decoding of input bytes
//! - [`xml`]: XML navigation and text normalization
//! - [`label`]: Numeral keys from unit labels
//! - [`extract`]: Document model extraction from treaty XML
//! - [`matcher`]: Cross-variant matching and paragraph pairing
//! - [`treaty`]: Treaty alignment service
//! - [`tmx`]: Segment extraction from translation memories
//! - [`tabular`]: Flat term lists
//! - [`emitter`]: Canonicalization and record writing
//! - [`validate`]: Dataset validation
//! - [`batch`]: Multi-file runs
//! - [`cli`]: Command-line interface

pub mod batch;
pub mod cli;
pub mod config;
pub mod emitter;
pub mod encoding;
pub mod error;
pub mod extract;
pub mod label;
pub mod matcher;
pub mod tabular;
pub mod tmx;
pub mod treaty;
pub mod types;
pub mod validate;
pub mod xml;

// Re-export main functions
pub use matcher::align_variants;
pub use treaty::{align_treaty, align_treaty_file};

// Re-export commonly used items
pub use config::{AlignConfig, DictionaryProfile, LanguageSpec};
pub use emitter::{Canonicalizer, RecordWriter};
pub use error::{AlignerError, Result};
pub use types::{AlignedPair, CanonicalRecord, DocumentVariant, PairType, StructuralUnit, UnitKind};
