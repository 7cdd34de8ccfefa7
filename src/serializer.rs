use std::collections::{HashMap, HashSet};

use crate::error::SerializeError;
use crate::ir::{Edge, LayoutType, Node, NodeKind};
use crate::style::format_annotation;

/// Emits the outline text equivalent of a graph: the parser's inverse.
///
/// Roots are grouped by `group_id` and separated by horizontal rules; each
/// root's subtree is walked depth-first along outgoing edges in insertion
/// order. Normal content never fails; only malformed caller-built graphs do.
pub fn serialize(
    nodes: &[Node],
    edges: &[Edge],
    layout: LayoutType,
) -> Result<String, SerializeError> {
    let mut by_id: HashMap<&str, &Node> = HashMap::with_capacity(nodes.len());
    for node in nodes {
        if node.id.is_empty() {
            return Err(SerializeError::InvalidNode {
                id: node.id.clone(),
                reason: "empty id".into(),
            });
        }
        if by_id.insert(node.id.as_str(), node).is_some() {
            return Err(SerializeError::InvalidNode {
                id: node.id.clone(),
                reason: "duplicate id".into(),
            });
        }
    }

    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut has_incoming: HashSet<&str> = HashSet::new();
    for edge in edges {
        if !by_id.contains_key(edge.source.as_str()) {
            return Err(SerializeError::InvalidEdge {
                id: edge.id.clone(),
                node: edge.source.clone(),
            });
        }
        if !by_id.contains_key(edge.target.as_str()) {
            return Err(SerializeError::InvalidEdge {
                id: edge.id.clone(),
                node: edge.target.clone(),
            });
        }
        children
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
        has_incoming.insert(edge.target.as_str());
    }

    // Roots grouped by group_id in first-appearance order; the ungrouped set
    // is the implicit first group.
    let mut group_order: Vec<Option<&str>> = Vec::new();
    let mut groups: HashMap<Option<&str>, Vec<&Node>> = HashMap::new();
    for node in nodes {
        if has_incoming.contains(node.id.as_str()) {
            continue;
        }
        let key = node.group_id.as_deref();
        if !groups.contains_key(&key) {
            group_order.push(key);
        }
        groups.entry(key).or_default().push(node);
    }

    let mut lines: Vec<String> = vec![format!("<!-- layout: {} -->", layout.as_str()), String::new()];
    let mut visited: HashSet<&str> = HashSet::new();
    for (idx, key) in group_order.iter().enumerate() {
        if idx > 0 {
            // Surrounding blank lines keep the rule from re-lexing as a
            // setext underline of the preceding paragraph.
            push_separated(&mut lines, "---".to_string());
            lines.push(String::new());
        }
        for &root in &groups[key] {
            emit_subtree(root, &by_id, &children, &mut visited, &mut lines);
        }
    }

    if let Some(stranded) = nodes.iter().find(|n| !visited.contains(n.id.as_str())) {
        return Err(SerializeError::CircularReference(stranded.id.clone()));
    }

    let mut out = lines.join("\n");
    out.truncate(out.trim_end().len());
    out.push('\n');
    Ok(out)
}

fn emit_subtree<'a>(
    node: &'a Node,
    by_id: &HashMap<&'a str, &'a Node>,
    children: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    lines: &mut Vec<String>,
) {
    // Defensive against caller-made cycles: a revisit is skipped, not an error.
    if !visited.insert(node.id.as_str()) {
        return;
    }
    let suffix = format_annotation(&node.style);
    match &node.kind {
        NodeKind::Header { level } => {
            lines.push(format!(
                "{} {}{}",
                "#".repeat(*level as usize),
                node.content,
                suffix
            ));
        }
        NodeKind::Text { level } => {
            lines.push(format!(
                "{}- {}{}",
                "  ".repeat((*level - 1) as usize),
                node.content,
                suffix
            ));
        }
        NodeKind::Code { language, .. } => {
            push_separated(lines, format!("```{language}{suffix}"));
            for line in node.content.lines() {
                lines.push(line.to_string());
            }
            lines.push("```".to_string());
        }
        NodeKind::Image {
            image_url,
            alt_text,
        } => {
            push_separated(lines, format!("![{alt_text}]({image_url}){suffix}"));
        }
    }
    for child in children.get(node.id.as_str()).into_iter().flatten() {
        emit_subtree(by_id[child], by_id, children, visited, lines);
    }
}

/// Pushes a line that needs a blank line before it to survive re-lexing.
fn push_separated(lines: &mut Vec<String>, line: String) {
    if lines.last().is_some_and(|prev| !prev.is_empty()) {
        lines.push(String::new());
    }
    lines.push(line);
}
