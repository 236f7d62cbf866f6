//! Knowledge-graph annotation engine
//!
//! Highlights the entities a knowledge-base excerpt talks about wherever
//! they appear in a piece of display text.
//!
//! Architecture:
//! ```text
//! [context string]
//!       ↓ extract      (declarations, then relationship endpoints)
//! [Vec<EntityRecord>]
//!       ↓ compile      (escaped, whole-word, case-insensitive alternation)
//! [CompiledMatcher] + [display text]
//!       ↓ segment      (+ StyleTable)
//! [Vec<Span>]          literal / entity, lossless
//! ```
//!
//! Everything is pure and synchronous. A compiled matcher is immutable and
//! can be shared across threads; the batch helpers fan out with rayon.

pub mod entity;
pub mod error;
pub mod extract;
pub mod matcher;
pub mod segment;
pub mod style;

pub use entity::{EntityKind, EntityRecord};
pub use error::{AnnotateError, AnnotateResult};
pub use extract::extract;
pub use matcher::{compile, CompiledMatcher, EntityMatch};
pub use segment::{reassemble, segment, Span};
pub use style::{StyleEntry, StyleTable};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

// =============================================================================
// DATA STRUCTURES
// =============================================================================

/// Full result of annotating one display text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    pub entities: Vec<EntityRecord>,
    pub spans: Vec<Span>,
    /// Number of entity spans.
    pub count: usize,
    pub processing_time_ms: u64,
}

/// Every message of a transcript annotated against one shared context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub entities: Vec<EntityRecord>,
    pub messages: Vec<Vec<Span>>,
}

/// Matcher prepared from one context, ready to segment any number of texts.
#[derive(Debug, Clone)]
pub struct PreparedContext {
    pub entities: Vec<EntityRecord>,
    matcher: Option<CompiledMatcher>,
}

impl PreparedContext {
    pub fn matcher(&self) -> Option<&CompiledMatcher> {
        self.matcher.as_ref()
    }
}

// =============================================================================
// ANNOTATOR
// =============================================================================

/// Segmenter bundled with its style table.
#[derive(Debug, Clone, Default)]
pub struct Annotator {
    styles: StyleTable,
}

impl Annotator {
    pub fn new(styles: StyleTable) -> Self {
        Self { styles }
    }

    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    /// Extract and compile once. A context with no usable entities yields no
    /// matcher, and every text segmented against it stays one literal span.
    pub fn prepare(&self, context_text: &str) -> PreparedContext {
        let entities = extract(context_text);

        let matcher = if entities.is_empty() {
            None
        } else {
            match compile(&entities) {
                Ok(matcher) => Some(matcher),
                Err(err) => {
                    warn!(error = %err, entities = entities.len(), "matcher unavailable, leaving text unannotated");
                    None
                }
            }
        };

        PreparedContext { entities, matcher }
    }

    pub fn segment(&self, display_text: &str, prepared: &PreparedContext) -> Vec<Span> {
        match &prepared.matcher {
            Some(matcher) => segment(display_text, matcher, &prepared.entities, &self.styles),
            None if display_text.is_empty() => Vec::new(),
            None => vec![Span::literal(display_text)],
        }
    }

    pub fn build_annotations(&self, context_text: &str, display_text: &str) -> Vec<Span> {
        let prepared = self.prepare(context_text);
        self.segment(display_text, &prepared)
    }

    pub fn annotate(&self, context_text: &str, display_text: &str) -> Annotation {
        let start = std::time::Instant::now();

        let prepared = self.prepare(context_text);
        let spans = self.segment(display_text, &prepared);
        let count = spans.iter().filter(|s| s.is_entity()).count();

        Annotation {
            entities: prepared.entities,
            spans,
            count,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Annotate every message of a transcript against one shared context,
    /// extracting and compiling once.
    pub fn annotate_transcript<S>(&self, context_text: &str, messages: &[S]) -> Transcript
    where
        S: AsRef<str> + Sync,
    {
        let prepared = self.prepare(context_text);
        let messages = messages
            .par_iter()
            .map(|message| self.segment(message.as_ref(), &prepared))
            .collect();

        Transcript {
            entities: prepared.entities,
            messages,
        }
    }

    /// Spans only, for callers that do not need the entity list.
    pub fn annotate_messages<S>(&self, context_text: &str, messages: &[S]) -> Vec<Vec<Span>>
    where
        S: AsRef<str> + Sync,
    {
        self.annotate_transcript(context_text, messages).messages
    }

    /// Annotate independent (context, display text) pairs in parallel.
    pub fn annotate_batch(&self, requests: &[(&str, &str)]) -> Vec<Annotation> {
        requests
            .par_iter()
            .map(|(context, text)| self.annotate(context, text))
            .collect()
    }
}

/// Annotate `display_text` with the entities found in `context_text`, using
/// the built-in style table.
pub fn build_annotations(context_text: &str, display_text: &str) -> Vec<Span> {
    Annotator::default().build_annotations(context_text, display_text)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const CONTEXT: &str = "Entity: Aurora (project)\nEntity: Rust (skill)\nAurora → BLOCKS → Launch";

    #[test]
    fn test_no_entity_fallback() {
        let spans = build_annotations("", "Nothing to highlight.");
        assert_eq!(spans, vec![Span::literal("Nothing to highlight.")]);

        let spans = build_annotations("unstructured notes", "Aurora");
        assert_eq!(spans, vec![Span::literal("Aurora")]);
    }

    #[test]
    fn test_empty_display_text() {
        assert!(build_annotations("", "").is_empty());
        assert!(build_annotations(CONTEXT, "").is_empty());
    }

    #[test]
    fn test_prepare_without_entities_has_no_matcher() {
        let prepared = Annotator::default().prepare("nothing here");
        assert!(prepared.entities.is_empty());
        assert!(prepared.matcher().is_none());
    }

    #[test]
    fn test_annotate_summary() {
        let result = Annotator::default().annotate(CONTEXT, "Aurora needs Rust before launch.");
        assert_eq!(result.entities.len(), 3);
        assert_eq!(result.count, 3);
        assert_eq!(reassemble(&result.spans), "Aurora needs Rust before launch.");
    }

    #[test]
    fn test_custom_style_table() {
        let styles = StyleTable::default().with(
            EntityKind::Project,
            StyleEntry::new("Initiative", "bg-sky-50", "text-sky-900", "border-sky-200"),
        );
        let spans = Annotator::new(styles).build_annotations(CONTEXT, "Aurora");
        match &spans[0] {
            Span::Entity { style, .. } => assert_eq!(style.label, "Initiative"),
            other => panic!("expected entity span, got {other:?}"),
        }
    }

    #[test]
    fn test_annotate_messages_keeps_order() {
        let messages = ["Aurora slipped.", "", "Nothing.", "Launch is Tuesday."];
        let result = Annotator::default().annotate_messages(CONTEXT, &messages);

        assert_eq!(result.len(), 4);
        assert_eq!(result[0][0].kind(), Some(EntityKind::Project));
        assert!(result[1].is_empty());
        assert_eq!(result[2], vec![Span::literal("Nothing.")]);
        assert_eq!(result[3][0].kind(), Some(EntityKind::Unclassified));
        for (spans, message) in result.iter().zip(messages) {
            assert_eq!(reassemble(spans), message);
        }
    }

    #[test]
    fn test_annotate_transcript_returns_entities() {
        let messages = vec!["Launch waits on aurora".to_string(), String::new()];
        let transcript = Annotator::default().annotate_transcript(CONTEXT, &messages);

        assert_eq!(transcript.entities.len(), 3);
        assert_eq!(transcript.messages.len(), 2);
        assert_eq!(transcript.messages[0][2].text(), "aurora");
        assert_eq!(transcript.messages[0][2].kind(), Some(EntityKind::Project));
        assert!(transcript.messages[1].is_empty());
    }

    #[test]
    fn test_annotate_batch() {
        let requests = [(CONTEXT, "Rust rocks"), ("", "plain"), ("Entity: Maya (person)", "ask maya")];
        let results = Annotator::default().annotate_batch(&requests);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].count, 1);
        assert_eq!(results[1].count, 0);
        assert_eq!(results[1].spans, vec![Span::literal("plain")]);
        assert_eq!(results[2].spans[1].text(), "maya");
        assert_eq!(results[2].spans[1].kind(), Some(EntityKind::Person));
    }
}
