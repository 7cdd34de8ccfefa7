use std::f32::consts::{FRAC_PI_2, TAU};

use crate::config::RadialConfig;
use crate::ir::{Node, Point};

use super::{level_buckets, measured};

/// Radial placement: roots at the center, each deeper level on a ring whose
/// radius is the larger of a size-based minimum step and the radius needed to
/// fit the ring's node widths without overlap.
pub(super) fn place(nodes: &mut [Node], levels: &[usize], cfg: &RadialConfig) {
    let buckets = level_buckets(levels);
    let Some(roots) = buckets.first() else {
        return;
    };

    let mut radius = if roots.len() == 1 {
        center_node(&mut nodes[roots[0]], cfg.center_x, cfg.center_y);
        0.0
    } else {
        place_ring(nodes, roots, cfg, cfg.multi_root_radius);
        cfg.multi_root_radius
    };

    for window in buckets.windows(2) {
        let (parents, ring) = (&window[0], &window[1]);
        if ring.is_empty() {
            continue;
        }
        let parent_extent = average_extent(nodes, parents);
        let circumference: f32 = ring
            .iter()
            .map(|&idx| measured(&nodes[idx]).width + cfg.sibling_padding)
            .sum();
        // Never below the size-based minimum, never denser than the ring can
        // hold: the collision-avoidance invariant.
        radius = (radius + parent_extent * cfg.level_gap_multiplier).max(circumference / TAU);
        place_ring(nodes, ring, cfg, radius);
    }
}

/// Equal angular steps around the center, starting at the top (-90 degrees)
/// for visual stability.
fn place_ring(nodes: &mut [Node], ring: &[usize], cfg: &RadialConfig, radius: f32) {
    let step = TAU / ring.len() as f32;
    for (slot, &idx) in ring.iter().enumerate() {
        let angle = -FRAC_PI_2 + step * slot as f32;
        center_node(
            &mut nodes[idx],
            cfg.center_x + radius * angle.cos(),
            cfg.center_y + radius * angle.sin(),
        );
    }
}

fn center_node(node: &mut Node, cx: f32, cy: f32) {
    let size = measured(node);
    node.position = Point {
        x: cx - size.width / 2.0,
        y: cy - size.height / 2.0,
    };
}

fn average_extent(nodes: &[Node], indices: &[usize]) -> f32 {
    if indices.is_empty() {
        return 0.0;
    }
    let total: f32 = indices
        .iter()
        .map(|&idx| {
            let size = measured(&nodes[idx]);
            (size.width + size.height) / 2.0
        })
        .sum();
    total / indices.len() as f32
}
