use crate::config::HorizontalConfig;
use crate::ir::{Node, Point};

use super::{level_buckets, measured};

/// Horizontal placement: levels are columns. Each column advances by the
/// previous column's average width times the gap multiplier; within a column
/// nodes pack top-down by their actual heights, so vertical overlap is
/// impossible regardless of size variance.
pub(super) fn place(nodes: &mut [Node], levels: &[usize], cfg: &HorizontalConfig) {
    let buckets = level_buckets(levels);
    let mut x = cfg.origin_x;
    let mut prev_avg_width = 0.0;
    for (level, column) in buckets.iter().enumerate() {
        if level > 0 {
            x += prev_avg_width * cfg.column_gap_multiplier;
        }
        let mut y = cfg.origin_y;
        for &idx in column {
            let size = measured(&nodes[idx]);
            nodes[idx].position = Point { x, y };
            y += size.height + cfg.row_padding;
        }
        prev_avg_width = average_width(nodes, column);
    }
}

fn average_width(nodes: &[Node], indices: &[usize]) -> f32 {
    if indices.is_empty() {
        return 0.0;
    }
    let total: f32 = indices.iter().map(|&idx| measured(&nodes[idx]).width).sum();
    total / indices.len() as f32
}
