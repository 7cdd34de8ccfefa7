use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const MAX_HEADER_LEVEL: u8 = 6;
pub const MAX_LIST_LEVEL: u8 = 5;

/// Which placement algorithm the document asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    #[default]
    Radial,
    Horizontal,
}

impl LayoutType {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "radial" => Some(Self::Radial),
            "horizontal" => Some(Self::Horizontal),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Radial => "radial",
            Self::Horizontal => "horizontal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Rendered extent of a node, supplied by the caller after a first paint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// Content kind of a node. Levels are 1-based: list depth caps at
/// [`MAX_LIST_LEVEL`], heading depth at [`MAX_HEADER_LEVEL`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    Text { level: u8 },
    Header { level: u8 },
    Code { language: String, expanded: bool },
    Image { image_url: String, alt_text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    /// Display text, already stripped of style annotations.
    pub content: String,
    /// Raw space-separated style token names; resolution is deferred to
    /// [`crate::style::parse_tokens`].
    pub style: String,
    /// Top-left corner, zero until the layout engine runs.
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub measured_size: Option<Size>,
    /// Shared by nodes between the same pair of horizontal-rule separators.
    #[serde(default)]
    pub group_id: Option<String>,
}

impl Node {
    fn base(id: String, kind: NodeKind, content: String, style: String) -> Result<Self, ValidationError> {
        if id.is_empty() {
            return Err(ValidationError::RequiredField("id"));
        }
        Ok(Self {
            id,
            kind,
            content,
            style,
            position: Point::default(),
            measured_size: None,
            group_id: None,
        })
    }

    pub fn text(id: String, content: String, style: String, level: u8) -> Result<Self, ValidationError> {
        if level == 0 || level > MAX_LIST_LEVEL {
            return Err(ValidationError::OutOfRange {
                field: "list level",
                value: i64::from(level),
                min: 1,
                max: i64::from(MAX_LIST_LEVEL),
            });
        }
        Self::base(id, NodeKind::Text { level }, content, style)
    }

    pub fn header(id: String, content: String, style: String, level: u8) -> Result<Self, ValidationError> {
        if level == 0 || level > MAX_HEADER_LEVEL {
            return Err(ValidationError::OutOfRange {
                field: "header level",
                value: i64::from(level),
                min: 1,
                max: i64::from(MAX_HEADER_LEVEL),
            });
        }
        Self::base(id, NodeKind::Header { level }, content, style)
    }

    pub fn code(id: String, content: String, style: String, language: String) -> Result<Self, ValidationError> {
        Self::base(
            id,
            NodeKind::Code {
                language,
                expanded: true,
            },
            content,
            style,
        )
    }

    pub fn image(id: String, image_url: String, alt_text: String, style: String) -> Result<Self, ValidationError> {
        if image_url.is_empty() {
            return Err(ValidationError::RequiredField("image_url"));
        }
        let content = alt_text.clone();
        Self::base(id, NodeKind::Image { image_url, alt_text }, content, style)
    }
}

/// Directed parent -> child edge, derived solely from nesting structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(id: String, source: String, target: String) -> Result<Self, ValidationError> {
        if id.is_empty() {
            return Err(ValidationError::RequiredField("id"));
        }
        if source.is_empty() {
            return Err(ValidationError::RequiredField("source"));
        }
        if target.is_empty() {
            return Err(ValidationError::RequiredField("target"));
        }
        if source == target {
            return Err(ValidationError::InvalidField {
                field: "edge",
                reason: format!("self-loop on `{source}`"),
            });
        }
        Ok(Self { id, source, target })
    }
}

/// Output of one [`crate::parser::parse`] call. Nodes and edges are created
/// fresh per call; prior graphs are never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parsed {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub layout: LayoutType,
}
