//! Entity records harvested from a knowledge-base excerpt.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// ENTITY KIND
// =============================================================================

/// Classification of an entity.
///
/// The set is closed; any tag the context uses that is not listed here
/// resolves to [`EntityKind::Unclassified`], which serializes as `"default"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Project,
    Blocker,
    Skill,
    Pattern,
    Emotion,
    Tool,
    Person,
    Goal,
    #[default]
    #[serde(rename = "default")]
    Unclassified,
}

impl EntityKind {
    pub const ALL: [EntityKind; 9] = [
        EntityKind::Project,
        EntityKind::Blocker,
        EntityKind::Skill,
        EntityKind::Pattern,
        EntityKind::Emotion,
        EntityKind::Tool,
        EntityKind::Person,
        EntityKind::Goal,
        EntityKind::Unclassified,
    ];

    /// Resolve a free-form type tag. Case and surrounding whitespace are ignored.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "project" => EntityKind::Project,
            "blocker" => EntityKind::Blocker,
            "skill" => EntityKind::Skill,
            "pattern" => EntityKind::Pattern,
            "emotion" => EntityKind::Emotion,
            "tool" => EntityKind::Tool,
            "person" => EntityKind::Person,
            "goal" => EntityKind::Goal,
            _ => EntityKind::Unclassified,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            EntityKind::Project => "project",
            EntityKind::Blocker => "blocker",
            EntityKind::Skill => "skill",
            EntityKind::Pattern => "pattern",
            EntityKind::Emotion => "emotion",
            EntityKind::Tool => "tool",
            EntityKind::Person => "person",
            EntityKind::Goal => "goal",
            EntityKind::Unclassified => "default",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

// =============================================================================
// ENTITY RECORD
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Surface form as written in the context.
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
}

impl EntityRecord {
    pub fn new(name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Key used for case-insensitive identity.
    pub fn key(&self) -> String {
        normalize_name(&self.name)
    }

    pub fn is_named(&self, text: &str) -> bool {
        self.key() == normalize_name(text)
    }
}

pub(crate) fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_tag() {
        assert_eq!(EntityKind::from_tag("project"), EntityKind::Project);
        assert_eq!(EntityKind::from_tag("  Person "), EntityKind::Person);
        assert_eq!(EntityKind::from_tag("BLOCKER"), EntityKind::Blocker);
        assert_eq!(EntityKind::from_tag("spaceship"), EntityKind::Unclassified);
        assert_eq!(EntityKind::from_tag(""), EntityKind::Unclassified);
    }

    #[test]
    fn test_kind_tags_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::from_tag(kind.as_tag()), kind);
        }
    }

    #[test]
    fn test_record_serializes_type_field() {
        let record = EntityRecord::new("Launch", EntityKind::Unclassified);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["name"], "Launch");
        assert_eq!(json["type"], "default");
    }

    #[test]
    fn test_is_named_ignores_case() {
        let record = EntityRecord::new("Aurora", EntityKind::Project);
        assert!(record.is_named("AURORA"));
        assert!(record.is_named("aurora"));
        assert!(!record.is_named("Aurora Borealis"));
    }
}
