//! Typed error taxonomy for the pipeline (§7).
//!
//! Each public stage returns its own `thiserror` enum; node/edge constructors
//! return [`ValidationError`], which the parser lifts into [`ParseError`].

use thiserror::Error;

/// Failures from validated `Node`/`Edge` constructors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A field the constructor rejected with a reason.
    #[error("invalid field `{field}`: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },
    /// A numeric field outside its permitted `[min, max]` range.
    #[error("`{field}` out of range: {value} not in [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    /// A required field was empty or absent.
    #[error("missing required field `{0}`")]
    RequiredField(&'static str),
}

/// Failures from [`crate::parse`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Malformed outline syntax.
    #[error("syntax error: {0}")]
    Syntax(String),
    /// A style/annotation token could not be extracted.
    #[error("token extraction failed: {0}")]
    TokenExtraction(String),
    /// A node or edge produced during parsing failed validation.
    #[error("invalid structure: {0}")]
    InvalidStructure(#[from] ValidationError),
}

/// Failures from [`crate::serialize`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SerializeError {
    /// A node could not be emitted.
    #[error("invalid node `{id}`: {reason}")]
    InvalidNode { id: String, reason: String },
    /// An edge referenced a node that does not exist.
    #[error("invalid edge `{id}`: unknown node `{node}`")]
    InvalidEdge { id: String, node: String },
    /// A node could not be reached from any root (cycle or orphan).
    #[error("circular or unreachable reference at `{0}`")]
    CircularReference(String),
}

/// Failures from [`crate::apply_layout`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// A node lacked the measured size required before placement.
    #[error("node `{0}` is missing its measured size")]
    MissingMeasuredSize(String),
    /// The graph contains a cycle, so levels cannot be computed.
    #[error("circular dependency in the graph")]
    CircularDependency,
    /// The requested layout directive was not a known layout type.
    #[error("invalid layout type")]
    InvalidLayoutType,
}
