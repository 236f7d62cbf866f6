//! Entity extraction from a knowledge-base excerpt.
//!
//! Two passes over the same context, sharing one de-duplication set:
//!
//! 1. `Entity: <name> (<type>)` declarations, in order of appearance.
//! 2. `<source> → <RELATION_KIND> → <target>` lines; endpoints not seen yet
//!    become unclassified entities.
//!
//! Declarations always run first, so their classification wins.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, trace};

use crate::entity::{normalize_name, EntityKind, EntityRecord};

// =============================================================================
// REGEX PATTERNS (compiled once)
// =============================================================================

lazy_static! {
    // Entity: Aurora (project)
    static ref DECLARATION_RE: Regex = Regex::new(
        r"Entity:[ \t]*([^(\r\n]*)\(([^)\r\n]*)\)"
    ).unwrap();

    // The " → BLOCKS → " between two endpoints
    static ref RELATION_RE: Regex = Regex::new(r"\s*(?:→|->)\s*[A-Z_]+\s*(?:→|->)\s*").unwrap();

    static ref ARROW_RE: Regex = Regex::new(r"→|->").unwrap();

    // "- ", "* ", "• " bullets and an "Entity:" label in front of an endpoint
    static ref ENDPOINT_PREFIX_RE: Regex = Regex::new(r"^\s*(?:[-*•]\s+)?(?:Entity:\s*)?").unwrap();

    // Trailing "(person)" annotation, possibly unclosed
    static ref ENDPOINT_ANNOTATION_RE: Regex = Regex::new(r"\s*\([^()]*\)?\s*$").unwrap();
}

/// Relationship endpoints must be longer than this many characters.
const MIN_ENDPOINT_CHARS: usize = 2;

// =============================================================================
// EXTRACTION
// =============================================================================

/// Ordered, case-insensitively unique entity list under construction.
#[derive(Debug, Default)]
struct EntitySet {
    records: Vec<EntityRecord>,
    seen: HashSet<String>,
}

impl EntitySet {
    fn insert(&mut self, name: &str, kind: EntityKind) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        if !self.seen.insert(normalize_name(name)) {
            trace!(name, "duplicate entity skipped");
            return false;
        }
        self.records.push(EntityRecord::new(name, kind));
        true
    }
}

fn extract_declarations(context: &str, entities: &mut EntitySet) {
    for cap in DECLARATION_RE.captures_iter(context) {
        let name = cap.get(1).map_or("", |m| m.as_str()).trim();
        let tag = cap.get(2).map_or("", |m| m.as_str()).trim();

        if name.is_empty() || tag.is_empty() {
            trace!(name, tag, "empty declaration capture discarded");
            continue;
        }

        entities.insert(name, EntityKind::from_tag(tag));
    }
}

fn clean_endpoint(raw: &str) -> &str {
    let raw = ENDPOINT_PREFIX_RE.find(raw).map_or(raw, |m| &raw[m.end()..]);
    let raw = ENDPOINT_ANNOTATION_RE.find(raw).map_or(raw, |m| &raw[..m.start()]);
    raw.trim()
}

/// Endpoints of every `→ KIND →` hop on a line, left to right.
///
/// `A → OWNS → B → NEEDS → C` yields `A`, `B`, `C`. The outer endpoints stop
/// at any further bare arrow.
fn relationship_endpoints(line: &str) -> Vec<&str> {
    let hops: Vec<_> = RELATION_RE.find_iter(line).collect();
    let (Some(first), Some(last)) = (hops.first(), hops.last()) else {
        return Vec::new();
    };

    let head = &line[..first.start()];
    let tail = &line[last.end()..];

    let mut endpoints = Vec::with_capacity(hops.len() + 1);
    endpoints.push(ARROW_RE.split(head).last().unwrap_or(head));
    endpoints.extend(hops.windows(2).map(|pair| &line[pair[0].end()..pair[1].start()]));
    endpoints.push(ARROW_RE.split(tail).next().unwrap_or(tail));

    endpoints.into_iter().map(clean_endpoint).collect()
}

fn extract_relationships(context: &str, entities: &mut EntitySet) {
    for line in context.lines() {
        for name in relationship_endpoints(line) {
            if name.chars().count() <= MIN_ENDPOINT_CHARS {
                trace!(name, "relationship endpoint too short");
                continue;
            }
            entities.insert(name, EntityKind::Unclassified);
        }
    }
}

/// Extract the canonical entity list from a context string.
///
/// Never fails: empty or unstructured context yields an empty list.
pub fn extract(context: &str) -> Vec<EntityRecord> {
    let mut entities = EntitySet::default();

    extract_declarations(context, &mut entities);
    let declared = entities.records.len();
    extract_relationships(context, &mut entities);

    debug!(
        declared,
        harvested = entities.records.len() - declared,
        "entities extracted"
    );

    entities.records
}

// =============================================================================
// TESTS
// =============================================================================
