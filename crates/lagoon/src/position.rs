//! Coordinate assignment.
//!
//! Works purely in top-to-bottom space: every rank is stacked below the
//! previous one (`ranksep` apart), nodes within a rank advance along x
//! (`nodesep` apart) and each rank is centered on the widest rank. The
//! rankdir transform happens afterwards in `coordinate_system`.

use crate::util;
use crate::LayoutGraph;

pub fn position(g: &mut LayoutGraph) {
    let layering = util::build_layer_matrix(g);
    if layering.is_empty() {
        return;
    }

    let nodesep = g.graph().nodesep;
    let ranksep = g.graph().ranksep;

    let size = |g: &LayoutGraph, id: &str| -> (f64, f64) {
        g.node(id).map(|n| (n.width, n.height)).unwrap_or((0.0, 0.0))
    };

    let mut rank_heights: Vec<f64> = Vec::with_capacity(layering.len());
    let mut rank_widths: Vec<f64> = Vec::with_capacity(layering.len());
    for ids in &layering {
        let mut h: f64 = 0.0;
        let mut w: f64 = 0.0;
        for (i, id) in ids.iter().enumerate() {
            let (nw, nh) = size(g, id);
            h = h.max(nh);
            w += nw;
            if i + 1 < ids.len() {
                w += nodesep;
            }
        }
        rank_heights.push(h);
        rank_widths.push(w);
    }
    let max_rank_width = rank_widths.iter().copied().fold(0.0_f64, f64::max);

    let mut y_cursor: f64 = 0.0;
    for (rank_idx, ids) in layering.iter().enumerate() {
        let rank_h = rank_heights[rank_idx];
        let y = y_cursor + rank_h / 2.0;

        let mut x_cursor = (max_rank_width - rank_widths[rank_idx]) / 2.0;
        for id in ids {
            let (nw, _) = size(g, id);
            let x = x_cursor + nw / 2.0;
            if let Some(n) = g.node_mut(id) {
                n.x = Some(x);
                n.y = Some(y);
            }
            x_cursor += nw + nodesep;
        }

        y_cursor += rank_h + ranksep;
    }
}

/// Shifts all centers so the drawing's top-left corner lands at the origin.
pub fn translate_to_origin(g: &mut LayoutGraph) {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    for id in g.node_ids() {
        if let Some(n) = g.node(&id) {
            if let (Some(x), Some(y)) = (n.x, n.y) {
                min_x = min_x.min(x - n.width / 2.0);
                min_y = min_y.min(y - n.height / 2.0);
            }
        }
    }
    if !min_x.is_finite() || !min_y.is_finite() {
        return;
    }
    for id in g.node_ids() {
        if let Some(n) = g.node_mut(&id) {
            if let Some(x) = n.x {
                n.x = Some(x - min_x);
            }
            if let Some(y) = n.y {
                n.y = Some(y - min_y);
            }
        }
    }
}
