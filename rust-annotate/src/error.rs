use thiserror::Error;

/// Failures surfaced by the annotation engine.
///
/// Only compilation and style-table loading can fail; extraction and
/// segmentation always degrade to a usable result.
#[derive(Error, Debug)]
pub enum AnnotateError {
    /// No usable entity names, so there is nothing to match.
    #[error("no entities to compile into a matcher")]
    NoEntities,

    /// The regex engine rejected the generated alternation.
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Style table JSON could not be parsed.
    #[error("style table error: {0}")]
    StyleTable(#[from] serde_json::Error),

    /// Style table file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AnnotateResult<T> = Result<T, AnnotateError>;
