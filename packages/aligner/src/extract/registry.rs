//! Registry of unit specifications.

use std::collections::HashMap;

use super::types::UnitSpec;

/// Registry mapping tag names to unit specifications.
pub struct UnitRegistry {
    specs: HashMap<String, UnitSpec>,
}

impl UnitRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            specs: HashMap::new(),
        }
    }

    /// Register a unit specification, replacing any previous one for the tag.
    pub fn register(&mut self, spec: UnitSpec) {
        self.specs.insert(spec.tag.clone(), spec);
    }

    /// Get the specification for a tag.
    #[must_use]
    pub fn get_spec(&self, tag: &str) -> Option<&UnitSpec> {
        self.specs.get(tag)
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}
