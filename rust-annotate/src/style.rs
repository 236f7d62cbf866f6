//! Entity kind → display style table.
//!
//! The table is plain configuration: a renderer reads the label for the
//! tooltip and the three class keys for background, text and border.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::entity::EntityKind;
use crate::error::AnnotateResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleEntry {
    pub label: String,
    pub background: String,
    pub text: String,
    pub border: String,
}

impl StyleEntry {
    pub fn new(label: &str, background: &str, text: &str, border: &str) -> Self {
        Self {
            label: label.to_string(),
            background: background.to_string(),
            text: text.to_string(),
            border: border.to_string(),
        }
    }
}

lazy_static! {
    static ref DEFAULT_STYLES: HashMap<EntityKind, StyleEntry> = {
        let mut styles = HashMap::new();
        styles.insert(EntityKind::Project, StyleEntry::new("Project", "bg-blue-100", "text-blue-800", "border-blue-300"));
        styles.insert(EntityKind::Blocker, StyleEntry::new("Blocker", "bg-red-100", "text-red-800", "border-red-300"));
        styles.insert(EntityKind::Skill, StyleEntry::new("Skill", "bg-green-100", "text-green-800", "border-green-300"));
        styles.insert(EntityKind::Pattern, StyleEntry::new("Pattern", "bg-purple-100", "text-purple-800", "border-purple-300"));
        styles.insert(EntityKind::Emotion, StyleEntry::new("Emotion", "bg-pink-100", "text-pink-800", "border-pink-300"));
        styles.insert(EntityKind::Tool, StyleEntry::new("Tool", "bg-amber-100", "text-amber-800", "border-amber-300"));
        styles.insert(EntityKind::Person, StyleEntry::new("Person", "bg-indigo-100", "text-indigo-800", "border-indigo-300"));
        styles.insert(EntityKind::Goal, StyleEntry::new("Goal", "bg-teal-100", "text-teal-800", "border-teal-300"));
        styles.insert(EntityKind::Unclassified, StyleEntry::new("Entity", "bg-gray-100", "text-gray-800", "border-gray-300"));
        styles
    };
}

/// Immutable kind → style mapping.
///
/// Lookups never fail: kinds without an entry resolve to the
/// `Unclassified` entry, and if that is missing too, to the built-in
/// default entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleTable {
    entries: HashMap<EntityKind, StyleEntry>,
}

impl Default for StyleTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_STYLES.clone(),
        }
    }
}

impl StyleTable {
    /// A table with no entries; every lookup yields the built-in default.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Copy of this table with `entry` registered for `kind`.
    pub fn with(mut self, kind: EntityKind, entry: StyleEntry) -> Self {
        self.entries.insert(kind, entry);
        self
    }

    /// This table with every entry of `overrides` laid over it.
    pub fn merged(mut self, overrides: StyleTable) -> Self {
        self.entries.extend(overrides.entries);
        self
    }

    /// Built-in table overlaid with the entries in a JSON object keyed by
    /// kind tag, e.g. `{"project": {"label": "Initiative", ...}}`.
    pub fn from_json(json: &str) -> AnnotateResult<Self> {
        let overrides: StyleTable = serde_json::from_str(json)?;
        Ok(Self::default().merged(overrides))
    }

    pub fn from_path(path: impl AsRef<Path>) -> AnnotateResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn get(&self, kind: EntityKind) -> &StyleEntry {
        self.entries
            .get(&kind)
            .or_else(|| self.entries.get(&EntityKind::Unclassified))
            .unwrap_or(&DEFAULT_STYLES[&EntityKind::Unclassified])
    }

    pub fn contains(&self, kind: EntityKind) -> bool {
        self.entries.contains_key(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_default_style() {
        let table = StyleTable::default();
        for kind in EntityKind::ALL {
            assert!(table.contains(kind), "missing style for {kind}");
        }
        assert_eq!(table.get(EntityKind::Project).label, "Project");
        assert_eq!(table.get(EntityKind::Unclassified).label, "Entity");
    }

    #[test]
    fn test_missing_kind_falls_back_to_default_entry() {
        let custom = StyleEntry::new("Thing", "bg-x", "text-x", "border-x");
        let table = StyleTable::empty().with(EntityKind::Unclassified, custom.clone());
        assert_eq!(table.get(EntityKind::Tool), &custom);

        let bare = StyleTable::empty();
        assert_eq!(bare.get(EntityKind::Goal).label, "Entity");
    }

    #[test]
    fn test_from_json_overlays_defaults() {
        let json = r#"{
            "project": {"label": "Initiative", "background": "bg-sky-50", "text": "text-sky-900", "border": "border-sky-200"},
            "default": {"label": "Other", "background": "bg-zinc-50", "text": "text-zinc-900", "border": "border-zinc-200"}
        }"#;
        let table = StyleTable::from_json(json).unwrap();
        assert_eq!(table.get(EntityKind::Project).label, "Initiative");
        assert_eq!(table.get(EntityKind::Unclassified).label, "Other");
        assert_eq!(table.get(EntityKind::Skill).label, "Skill");
    }

    #[test]
    fn test_merged_keeps_unlisted_entries() {
        let overrides = StyleTable::empty().with(
            EntityKind::Tool,
            StyleEntry::new("Gear", "bg-x", "text-x", "border-x"),
        );
        let table = StyleTable::default().merged(overrides);
        assert_eq!(table.get(EntityKind::Tool).label, "Gear");
        assert_eq!(table.get(EntityKind::Person).label, "Person");
        assert_eq!(table.get(EntityKind::Unclassified).label, "Entity");
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(StyleTable::from_json("not json").is_err());
        assert!(StyleTable::from_json(r#"{"spaceship": {"label": "x"}}"#).is_err());
    }

    #[test]
    fn test_serializes_with_kind_tags() {
        let json = serde_json::to_value(StyleTable::default()).unwrap();
        assert_eq!(json["default"]["label"], "Entity");
        assert_eq!(json["person"]["border"], "border-indigo-300");
    }
}
