//! Segments display text into literal and entity spans.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::{EntityKind, EntityRecord};
use crate::matcher::{CompiledMatcher, EntityMatch};
use crate::style::{StyleEntry, StyleTable};

// =============================================================================
// DATA STRUCTURES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "span", rename_all = "lowercase")]
pub enum Span {
    Literal {
        text: String,
    },
    Entity {
        /// Matched substring, in the display text's casing.
        text: String,
        #[serde(rename = "type")]
        kind: EntityKind,
        style: StyleEntry,
    },
}

impl Span {
    pub fn literal(text: impl Into<String>) -> Self {
        Span::Literal { text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            Span::Literal { text } | Span::Entity { text, .. } => text,
        }
    }

    pub fn kind(&self) -> Option<EntityKind> {
        match self {
            Span::Literal { .. } => None,
            Span::Entity { kind, .. } => Some(*kind),
        }
    }

    pub fn is_entity(&self) -> bool {
        matches!(self, Span::Entity { .. })
    }
}

/// Joins span text back into the original display text.
pub fn reassemble(spans: &[Span]) -> String {
    spans.iter().map(Span::text).collect()
}

// =============================================================================
// SEGMENTATION
// =============================================================================

/// Kind of the entity behind a match.
///
/// When `entities` is the list the matcher was compiled from, the group
/// index is authoritative: the regex engine's case folding already decided
/// the match. Otherwise look the compiled name up in the caller's list, then
/// the matched text, then give up with `Unclassified`.
fn classify(
    found: &EntityMatch<'_>,
    matcher: &CompiledMatcher,
    entities: &[EntityRecord],
    aligned: bool,
) -> EntityKind {
    if aligned {
        return entities
            .get(found.entity)
            .map_or(EntityKind::Unclassified, |record| record.kind);
    }

    let compiled_key = matcher.key(found.entity);
    entities
        .iter()
        .find(|record| compiled_key == Some(record.key().as_str()))
        .or_else(|| entities.iter().find(|record| record.is_named(found.text)))
        .map_or(EntityKind::Unclassified, |record| record.kind)
}

/// Split `display_text` into spans using a compiled matcher.
///
/// Never fails. Empty text yields no spans; text without matches yields a
/// single literal span. Concatenating the spans' text always gives back
/// `display_text`.
pub fn segment(
    display_text: &str,
    matcher: &CompiledMatcher,
    entities: &[EntityRecord],
    styles: &StyleTable,
) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut last_end = 0;
    let aligned = matcher.compiled_from(entities);

    for found in matcher.find_iter(display_text) {
        if found.start > last_end {
            spans.push(Span::literal(&display_text[last_end..found.start]));
        }

        let kind = classify(&found, matcher, entities, aligned);
        spans.push(Span::Entity {
            text: found.text.to_string(),
            kind,
            style: styles.get(kind).clone(),
        });

        last_end = found.end;
    }

    if last_end < display_text.len() {
        spans.push(Span::literal(&display_text[last_end..]));
    }

    debug!(
        spans = spans.len(),
        entities = spans.iter().filter(|s| s.is_entity()).count(),
        "display text segmented"
    );

    spans
}

// =============================================================================
// TESTS
// =============================================================================
