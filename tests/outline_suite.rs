use std::collections::{HashMap, HashSet, VecDeque};
use std::f32::consts::TAU;
use std::path::Path;

use mindmark::{
    Edge, LayoutConfig, LayoutType, Node, Parsed, apply_layout, apply_layout_with, parse,
    serialize,
};

// Keep this list explicit so new fixtures must be added intentionally.
const FIXTURES: [&str; 6] = [
    "basic.md",
    "nested.md",
    "groups.md",
    "blocks.md",
    "horizontal.md",
    "styled.md",
];

fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("fixture missing: {name}"))
}

fn content_of<'a>(parsed: &'a Parsed, id: &str) -> &'a str {
    &parsed
        .nodes
        .iter()
        .find(|n| n.id == id)
        .expect("edge endpoint exists")
        .content
}

/// Edge topology keyed by node content; fixture contents are unique.
fn topology(parsed: &Parsed) -> HashSet<(String, String)> {
    parsed
        .edges
        .iter()
        .map(|e| {
            (
                content_of(parsed, &e.source).to_string(),
                content_of(parsed, &e.target).to_string(),
            )
        })
        .collect()
}

fn with_sizes(nodes: &[Node]) -> Vec<Node> {
    nodes
        .iter()
        .cloned()
        .enumerate()
        .map(|(idx, mut node)| {
            // Deterministic but uneven, to stress per-node packing.
            node.measured_size = Some(mindmark::Size {
                width: 80.0 + 15.0 * (idx % 4) as f32,
                height: 30.0 + 10.0 * (idx % 3) as f32,
            });
            node
        })
        .collect()
}

fn bfs_levels(nodes: &[Node], edges: &[Edge]) -> Vec<usize> {
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();
    let mut outgoing = vec![Vec::new(); nodes.len()];
    let mut has_incoming = vec![false; nodes.len()];
    for edge in edges {
        let (source, target) = (index[edge.source.as_str()], index[edge.target.as_str()]);
        outgoing[source].push(target);
        has_incoming[target] = true;
    }
    let mut levels = vec![0usize; nodes.len()];
    let mut queue: VecDeque<usize> = (0..nodes.len()).filter(|&i| !has_incoming[i]).collect();
    let mut seen: HashSet<usize> = queue.iter().copied().collect();
    while let Some(current) = queue.pop_front() {
        for &child in &outgoing[current] {
            if seen.insert(child) {
                levels[child] = levels[current] + 1;
                queue.push_back(child);
            }
        }
    }
    levels
}

#[test]
fn round_trip_all_fixtures() {
    for name in FIXTURES {
        let input = load_fixture(name);
        let first = parse(&input).unwrap_or_else(|e| panic!("{name}: parse failed: {e}"));
        let emitted = serialize(&first.nodes, &first.edges, first.layout)
            .unwrap_or_else(|e| panic!("{name}: serialize failed: {e}"));
        let second = parse(&emitted).unwrap_or_else(|e| panic!("{name}: re-parse failed: {e}"));

        assert_eq!(first.layout, second.layout, "{name}: layout drifted");
        assert_eq!(
            first.nodes.len(),
            second.nodes.len(),
            "{name}: node count drifted"
        );
        for (a, b) in first.nodes.iter().zip(&second.nodes) {
            assert_eq!(a.kind, b.kind, "{name}: kind drifted for `{}`", a.content);
            assert_eq!(a.content, b.content, "{name}: content drifted");
            assert_eq!(a.style, b.style, "{name}: style drifted for `{}`", a.content);
        }
        assert_eq!(topology(&first), topology(&second), "{name}: edges drifted");

        // Group partition survives even though group ids regenerate.
        let partition = |parsed: &Parsed| -> Vec<Vec<String>> {
            let mut order: Vec<Option<String>> = Vec::new();
            let mut members: HashMap<Option<String>, Vec<String>> = HashMap::new();
            for node in &parsed.nodes {
                if !members.contains_key(&node.group_id) {
                    order.push(node.group_id.clone());
                }
                members
                    .entry(node.group_id.clone())
                    .or_default()
                    .push(node.content.clone());
            }
            order.into_iter().map(|key| members.remove(&key).unwrap()).collect()
        };
        assert_eq!(partition(&first), partition(&second), "{name}: groups drifted");

        // A second round trip is a fixed point.
        let emitted_again = serialize(&second.nodes, &second.edges, second.layout).unwrap();
        assert_eq!(emitted, emitted_again, "{name}: serializer not stable");
    }
}

#[test]
fn radial_rings_respect_the_circumference_bound() {
    let config = LayoutConfig::default();
    for name in FIXTURES {
        let parsed = parse(&load_fixture(name)).unwrap();
        if parsed.nodes.is_empty() {
            continue;
        }
        let nodes = with_sizes(&parsed.nodes);
        let placed = apply_layout(&nodes, &parsed.edges, LayoutType::Radial).unwrap();
        let levels = bfs_levels(&placed, &parsed.edges);
        let max_level = levels.iter().copied().max().unwrap_or(0);
        for level in 1..=max_level {
            let ring: Vec<&Node> = placed
                .iter()
                .zip(&levels)
                .filter(|&(_, &l)| l == level)
                .map(|(n, _)| n)
                .collect();
            let required: f32 = ring
                .iter()
                .map(|n| n.measured_size.unwrap().width + config.radial.sibling_padding)
                .sum::<f32>()
                / TAU;
            for node in &ring {
                let size = node.measured_size.unwrap();
                let cx = node.position.x + size.width / 2.0;
                let cy = node.position.y + size.height / 2.0;
                let radius = ((cx - config.radial.center_x).powi(2)
                    + (cy - config.radial.center_y).powi(2))
                .sqrt();
                assert!(
                    radius >= required - 0.01,
                    "{name}: level {level} radius {radius} below bound {required}"
                );
            }
        }
    }
}

#[test]
fn horizontal_columns_never_overlap() {
    let config = LayoutConfig::default();
    for name in FIXTURES {
        let parsed = parse(&load_fixture(name)).unwrap();
        if parsed.nodes.is_empty() {
            continue;
        }
        let nodes = with_sizes(&parsed.nodes);
        let placed =
            apply_layout_with(&nodes, &parsed.edges, LayoutType::Horizontal, &config).unwrap();
        let levels = bfs_levels(&placed, &parsed.edges);
        let max_level = levels.iter().copied().max().unwrap_or(0);
        for level in 0..=max_level {
            let mut column: Vec<&Node> = placed
                .iter()
                .zip(&levels)
                .filter(|&(_, &l)| l == level)
                .map(|(n, _)| n)
                .collect();
            column.sort_by(|a, b| a.position.y.total_cmp(&b.position.y));
            for pair in column.windows(2) {
                let gap = pair[1].position.y - pair[0].position.y;
                let needed =
                    pair[0].measured_size.unwrap().height + config.horizontal.row_padding;
                assert!(
                    gap >= needed - 0.01,
                    "{name}: column {level} gap {gap} below {needed}"
                );
            }
        }
    }
}

#[test]
fn layout_is_deterministic_across_calls() {
    for name in FIXTURES {
        let parsed = parse(&load_fixture(name)).unwrap();
        let nodes = with_sizes(&parsed.nodes);
        for layout in [LayoutType::Radial, LayoutType::Horizontal] {
            let first = apply_layout(&nodes, &parsed.edges, layout).unwrap();
            let second = apply_layout(&nodes, &parsed.edges, layout).unwrap();
            for (a, b) in first.iter().zip(&second) {
                assert_eq!(a.position, b.position, "{name}: unstable positions");
            }
        }
    }
}
