use std::io::Write;

use serde::Serialize;

use crate::ir::{Edge, LayoutType, Node, NodeKind};
use crate::style::{StyleObject, TokenDefs, parse_tokens};

/// Stable JSON view of a graph, flattened for external tooling. Positions and
/// sizes are included as-is; unpositioned graphs dump zeros.
#[derive(Debug, Serialize)]
pub struct GraphDump {
    pub layout: String,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub kind: String,
    pub content: String,
    pub style: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_style: Option<StyleObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub x: f32,
    pub y: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl GraphDump {
    pub fn from_graph(
        nodes: &[Node],
        edges: &[Edge],
        layout: LayoutType,
        token_defs: Option<&TokenDefs>,
    ) -> Self {
        let nodes = nodes
            .iter()
            .map(|node| {
                let (kind, level, language, image_url) = match &node.kind {
                    NodeKind::Text { level } => ("text", Some(*level), None, None),
                    NodeKind::Header { level } => ("header", Some(*level), None, None),
                    NodeKind::Code { language, .. } => {
                        ("code", None, Some(language.clone()), None)
                    }
                    NodeKind::Image { image_url, .. } => {
                        ("image", None, None, Some(image_url.clone()))
                    }
                };
                NodeDump {
                    id: node.id.clone(),
                    kind: kind.to_string(),
                    content: node.content.clone(),
                    style: node.style.clone(),
                    resolved_style: token_defs.map(|defs| parse_tokens(&node.style, defs)),
                    level,
                    language,
                    image_url,
                    x: node.position.x,
                    y: node.position.y,
                    width: node.measured_size.map(|s| s.width),
                    height: node.measured_size.map(|s| s.height),
                    group: node.group_id.clone(),
                }
            })
            .collect();
        let edges = edges
            .iter()
            .map(|edge| EdgeDump {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
            })
            .collect();
        GraphDump {
            layout: layout.as_str().to_string(),
            nodes,
            edges,
        }
    }
}

pub fn write_graph_dump<W: Write>(writer: W, dump: &GraphDump) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(writer, dump)?;
    Ok(())
}
