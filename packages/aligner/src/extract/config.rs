//! Configuration for the BWB treaty hierarchy.

use super::registry::UnitRegistry;
use super::types::UnitSpec;
use crate::types::UnitKind;

/// Create the unit registry for BWB treaty documents.
///
/// ```text
/// verdrag (xml:lang="nl")
/// └── ... (deel, titeldeel, afdeling: not units, walked through)
///     └── hoofdstuk label="Hoofdstuk I"     -> Chapter
///         ├── kop/titel
///         └── artikel label="Artikel 1"    -> Article
///             ├── kop/titel
///             └── lid / lijst / li
///                 └── al                    -> paragraph leaf
/// ```
#[must_use]
pub fn create_treaty_registry() -> UnitRegistry {
    let mut registry = UnitRegistry::new();

    registry.register(UnitSpec::new("hoofdstuk", UnitKind::Chapter).with_title_path("kop/titel"));

    registry.register(
        UnitSpec::new("artikel", UnitKind::Article)
            .with_title_path("kop/titel")
            .with_paragraph_tag("al"),
    );

    registry
}
