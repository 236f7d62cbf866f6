//! Compiles an entity list into one case-insensitive, whole-word matcher.

use regex::{Captures, Regex, RegexBuilder};
use tracing::debug;

use crate::entity::EntityRecord;
use crate::error::{AnnotateError, AnnotateResult};

/// A single alternation over every usable entity name.
///
/// Each name sits in its own capture group, in extraction order. The regex
/// engine is leftmost-first, so when several names could match at the same
/// position the earliest-declared one wins and matches never overlap.
#[derive(Debug, Clone)]
pub struct CompiledMatcher {
    regex: Regex,
    /// Capture group `i + 1` matched `entities[sources[i]]`.
    sources: Vec<usize>,
    /// Case-insensitive keys of the full list the matcher was built from.
    keys: Vec<String>,
}

/// One match in the display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityMatch<'t> {
    pub start: usize,
    pub end: usize,
    pub text: &'t str,
    /// Index into the entity list the matcher was compiled from.
    pub entity: usize,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Escaped alternative for one name, guarded by `\b` on each side that
/// starts or ends with a word character.
fn alternative(name: &str) -> String {
    let mut pattern = String::from("(");
    if name.chars().next().is_some_and(is_word_char) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(name));
    if name.chars().last().is_some_and(is_word_char) {
        pattern.push_str(r"\b");
    }
    pattern.push(')');
    pattern
}

/// Build a matcher over `entities`.
///
/// Records with blank names are skipped. Fails with
/// [`AnnotateError::NoEntities`] when nothing usable is left.
pub fn compile(entities: &[EntityRecord]) -> AnnotateResult<CompiledMatcher> {
    let mut alternatives = Vec::with_capacity(entities.len());
    let mut sources = Vec::with_capacity(entities.len());

    for (index, entity) in entities.iter().enumerate() {
        let name = entity.name.trim();
        if name.is_empty() {
            continue;
        }
        alternatives.push(alternative(name));
        sources.push(index);
    }

    if alternatives.is_empty() {
        return Err(AnnotateError::NoEntities);
    }

    let regex = RegexBuilder::new(&alternatives.join("|"))
        .case_insensitive(true)
        .build()?;

    debug!(alternatives = sources.len(), "matcher compiled");

    Ok(CompiledMatcher {
        regex,
        sources,
        keys: entities.iter().map(EntityRecord::key).collect(),
    })
}

impl CompiledMatcher {
    /// Number of names in the alternation.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Whether `entities` lines up with the list this matcher was compiled
    /// from, so that [`EntityMatch::entity`] indexes straight into it.
    pub fn compiled_from(&self, entities: &[EntityRecord]) -> bool {
        self.keys.len() == entities.len()
            && self.keys.iter().zip(entities).all(|(key, record)| *key == record.key())
    }

    /// Case-insensitive key of the compiled entity at `index`.
    pub fn key(&self, index: usize) -> Option<&str> {
        self.keys.get(index).map(String::as_str)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Non-overlapping matches, left to right.
    pub fn find_iter<'m, 't>(&'m self, text: &'t str) -> impl Iterator<Item = EntityMatch<'t>> + 'm
    where
        't: 'm,
    {
        self.regex
            .captures_iter(text)
            .filter_map(move |caps| self.resolve(&caps))
    }

    fn resolve<'t>(&self, caps: &Captures<'t>) -> Option<EntityMatch<'t>> {
        let (group, m) = caps
            .iter()
            .skip(1)
            .enumerate()
            .find_map(|(group, m)| m.map(|m| (group, m)))?;

        Some(EntityMatch {
            start: m.start(),
            end: m.end(),
            text: m.as_str(),
            entity: self.sources[group],
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
