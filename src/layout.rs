use std::collections::{HashMap, VecDeque};

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::ir::{Edge, LayoutType, Node};

mod horizontal;
mod radial;

/// Assigns a position to every node using the default configuration.
///
/// Returns a fresh node vector in input order with only `position` changed;
/// the input is never mutated. Every node must already carry `measured_size`.
pub fn apply_layout(
    nodes: &[Node],
    edges: &[Edge],
    layout: LayoutType,
) -> Result<Vec<Node>, LayoutError> {
    apply_layout_with(nodes, edges, layout, &LayoutConfig::default())
}

pub fn apply_layout_with(
    nodes: &[Node],
    edges: &[Edge],
    layout: LayoutType,
    config: &LayoutConfig,
) -> Result<Vec<Node>, LayoutError> {
    // Fail fast, before any position is computed.
    for node in nodes {
        if node.measured_size.is_none() {
            return Err(LayoutError::MissingMeasuredSize(node.id.clone()));
        }
    }
    let levels = compute_levels(nodes, edges)?;
    let mut placed = nodes.to_vec();
    match layout {
        LayoutType::Radial => radial::place(&mut placed, &levels, &config.radial),
        LayoutType::Horizontal => horizontal::place(&mut placed, &levels, &config.horizontal),
    }
    Ok(placed)
}

/// Breadth-first level per node, all roots traversed simultaneously: roots are
/// level 0, children of a level-k node are level k+1. Unreached nodes default
/// to level 0.
fn compute_levels(nodes: &[Node], edges: &[Edge]) -> Result<Vec<usize>, LayoutError> {
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.id.as_str(), idx))
        .collect();
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut has_incoming = vec![false; nodes.len()];
    for edge in edges {
        let (Some(&source), Some(&target)) = (
            index.get(edge.source.as_str()),
            index.get(edge.target.as_str()),
        ) else {
            continue;
        };
        outgoing[source].push(target);
        has_incoming[target] = true;
    }

    let mut levels = vec![0usize; nodes.len()];
    let mut queue: VecDeque<usize> = (0..nodes.len()).filter(|&i| !has_incoming[i]).collect();
    if queue.is_empty() && !nodes.is_empty() {
        // Every node has a parent; only a caller-made edge cycle can do this.
        return Err(LayoutError::CircularDependency);
    }
    let mut seen = vec![false; nodes.len()];
    for &root in &queue {
        seen[root] = true;
    }
    while let Some(current) = queue.pop_front() {
        for &child in &outgoing[current] {
            if !seen[child] {
                seen[child] = true;
                levels[child] = levels[current] + 1;
                queue.push_back(child);
            }
        }
    }
    Ok(levels)
}

fn measured(node: &Node) -> crate::ir::Size {
    node.measured_size.unwrap_or(crate::ir::Size {
        width: 0.0,
        height: 0.0,
    })
}

/// Node indices grouped by level in document order; index k holds level k.
fn level_buckets(levels: &[usize]) -> Vec<Vec<usize>> {
    let depth = levels.iter().copied().max().map_or(0, |max| max + 1);
    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); depth];
    for (idx, &level) in levels.iter().enumerate() {
        buckets[level].push(idx);
    }
    buckets
}
