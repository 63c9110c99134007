use serde::{Deserialize, Serialize};

/// One imported symbol of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binding {
    /// The exported symbol, or the sentinels `default` / `*`.
    pub name: String,
    /// The name bound in the importing file.
    pub alias: String,
    /// True when nothing is bound and only the module's side effects are consumed.
    pub side_effects_only: bool,
}

impl Binding {
    pub fn new(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
            side_effects_only: false,
        }
    }

    pub fn side_effect(specifier: &str) -> Self {
        Self {
            name: specifier.to_owned(),
            alias: specifier.to_owned(),
            side_effects_only: true,
        }
    }
}

/// A file → file import relationship for a single binding.
///
/// Serialized with the attribute names the graph store uses
/// (`in`, `from`, `item`, `as`, `sideEffectsOnly`). All five fields form the
/// edge identity used for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImportEdge {
    /// Canonical id of the importing file.
    #[serde(rename = "in")]
    pub importer: String,
    /// Canonical id (or external specifier) of the imported module.
    #[serde(rename = "from")]
    pub imported: String,
    #[serde(rename = "item")]
    pub name: String,
    #[serde(rename = "as")]
    pub alias: String,
    #[serde(rename = "sideEffectsOnly")]
    pub side_effects_only: bool,
}

impl ImportEdge {
    pub fn new(importer: &str, imported: &str, binding: Binding) -> Self {
        Self {
            importer: importer.to_owned(),
            imported: imported.to_owned(),
            name: binding.name,
            alias: binding.alias,
            side_effects_only: binding.side_effects_only,
        }
    }
}
