//! Rank assignment.
//!
//! Longest-path ranking: sinks sit at rank 0 and every edge `v -> w` must
//! satisfy `rank(w) - rank(v) >= minlen`. Ranks come out non-positive and are
//! shifted afterwards so the smallest rank is 0.

use crate::LayoutGraph;
use rustc_hash::FxHashMap;

pub fn rank(g: &mut LayoutGraph) {
    fn dfs(v: &str, g: &mut LayoutGraph, visited: &mut FxHashMap<String, i32>) -> i32 {
        if let Some(&rank) = visited.get(v) {
            return rank;
        }
        // Mark before recursing so an unexpected residual cycle cannot loop.
        visited.insert(v.to_string(), 0);

        let mut rank: Option<i32> = None;
        for e in g.out_edges(v, None) {
            if e.v == e.w {
                continue;
            }
            let minlen = g.edge_by_key(&e).map(|l| l.minlen as i32).unwrap_or(1);
            let candidate = dfs(&e.w, g, visited) - minlen;
            rank = Some(match rank {
                Some(current) => current.min(candidate),
                None => candidate,
            });
        }

        let rank = rank.unwrap_or(0);
        if let Some(label) = g.node_mut(v) {
            label.rank = Some(rank);
        }
        visited.insert(v.to_string(), rank);
        rank
    }

    let mut visited: FxHashMap<String, i32> = FxHashMap::default();
    for v in g.sources() {
        dfs(&v, g, &mut visited);
    }
    // Nodes on a residual cycle have no source above them; rank them too.
    for v in g.node_ids() {
        if !visited.contains_key(&v) {
            dfs(&v, g, &mut visited);
        }
    }
}

/// Shifts all ranks so the minimum rank is 0.
pub fn normalize(g: &mut LayoutGraph) {
    let mut min_rank: i32 = i32::MAX;
    for v in g.node_ids() {
        if let Some(rank) = g.node(&v).and_then(|n| n.rank) {
            min_rank = min_rank.min(rank);
        }
    }
    if min_rank == i32::MAX {
        return;
    }
    for v in g.node_ids() {
        if let Some(n) = g.node_mut(&v) {
            if let Some(rank) = n.rank {
                n.rank = Some(rank - min_rank);
            }
        }
    }
}
