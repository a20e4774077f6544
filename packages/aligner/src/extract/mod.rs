//! Document model extraction for hierarchical legal documents.
//!
//! Turns one language variant of a treaty into a flat, document-ordered list
//! of structural units (chapters and articles with their paragraphs).

mod config;
mod engine;
mod registry;
mod types;

pub use config::create_treaty_registry;
pub use engine::{find_variant, DocumentExtractor};
pub use registry::UnitRegistry;
pub use types::UnitSpec;
