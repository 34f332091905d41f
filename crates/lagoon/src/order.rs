//! In-rank ordering.
//!
//! Barycenter sweeps over the layer matrix: alternating downward and upward
//! passes reorder each rank by the mean position of its neighbors in the
//! already-ordered direction. The layering with the fewest edge crossings
//! seen across all sweeps wins, so a bad late sweep can never regress the
//! result.

use crate::util;
use crate::LayoutGraph;
use rustc_hash::FxHashMap;

const SWEEPS: usize = 4;

pub fn order(g: &mut LayoutGraph) {
    init_order(g);

    let mut best = util::build_layer_matrix(g);
    if best.len() < 2 {
        return;
    }
    let mut best_cc = cross_count(g, &best);
    let mut layering = best.clone();

    for i in 0..SWEEPS {
        if best_cc == 0 {
            break;
        }
        if i % 2 == 0 {
            sweep(g, &mut layering, Direction::Down);
        } else {
            sweep(g, &mut layering, Direction::Up);
        }
        let cc = cross_count(g, &layering);
        if cc < best_cc {
            best_cc = cc;
            best = layering.clone();
        }
    }

    assign_order(g, &best);
}

/// Seeds `order` with each node's position within its rank, in insertion
/// order, so the sweeps start from a deterministic layering.
fn init_order(g: &mut LayoutGraph) {
    let mut counts: FxHashMap<i32, usize> = FxHashMap::default();
    for id in g.node_ids() {
        let Some(rank) = g.node(&id).and_then(|n| n.rank) else {
            continue;
        };
        let slot = counts.entry(rank).or_insert(0);
        if let Some(n) = g.node_mut(&id) {
            n.order = Some(*slot);
        }
        *slot += 1;
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Direction {
    Down,
    Up,
}

fn sweep(g: &LayoutGraph, layering: &mut [Vec<String>], direction: Direction) {
    let ranks: Vec<usize> = match direction {
        Direction::Down => (1..layering.len()).collect(),
        Direction::Up => (0..layering.len().saturating_sub(1)).rev().collect(),
    };

    for r in ranks {
        let positions = positions_of(layering);
        let layer = &mut layering[r];

        // Mean neighbor position; nodes without neighbors keep their slot.
        let mut keyed: Vec<(f64, usize, String)> = layer
            .iter()
            .enumerate()
            .map(|(idx, id)| {
                let neighbors = match direction {
                    Direction::Down => g.predecessors(id),
                    Direction::Up => g.successors(id),
                };
                let coords: Vec<f64> = neighbors
                    .iter()
                    .filter(|n| *n != id)
                    .filter_map(|n| positions.get(n.as_str()).map(|&p| p as f64))
                    .collect();
                let barycenter = if coords.is_empty() {
                    idx as f64
                } else {
                    coords.iter().sum::<f64>() / coords.len() as f64
                };
                (barycenter, idx, id.clone())
            })
            .collect();

        keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal).then(a.1.cmp(&b.1)));
        *layer = keyed.into_iter().map(|(_, _, id)| id).collect();
    }
}

fn positions_of(layering: &[Vec<String>]) -> FxHashMap<String, usize> {
    let mut positions: FxHashMap<String, usize> = FxHashMap::default();
    for layer in layering {
        for (idx, id) in layer.iter().enumerate() {
            positions.insert(id.clone(), idx);
        }
    }
    positions
}

/// Counts crossings between edges that share the same rank span.
pub fn cross_count(g: &LayoutGraph, layering: &[Vec<String>]) -> usize {
    let positions = positions_of(layering);
    let rank_of: FxHashMap<String, i32> = {
        let mut m = FxHashMap::default();
        for id in g.node_ids() {
            if let Some(rank) = g.node(&id).and_then(|n| n.rank) {
                m.insert(id, rank);
            }
        }
        m
    };

    let mut spans: FxHashMap<(i32, i32), Vec<(usize, usize)>> = FxHashMap::default();
    for e in g.edges() {
        if e.v == e.w {
            continue;
        }
        let (Some(&rv), Some(&rw)) = (rank_of.get(&e.v), rank_of.get(&e.w)) else {
            continue;
        };
        let (Some(&pv), Some(&pw)) = (positions.get(&e.v), positions.get(&e.w)) else {
            continue;
        };
        spans.entry((rv, rw)).or_default().push((pv, pw));
    }

    let mut crossings = 0;
    for pairs in spans.values() {
        for i in 0..pairs.len() {
            for j in (i + 1)..pairs.len() {
                let (a0, a1) = pairs[i];
                let (b0, b1) = pairs[j];
                if (a0 < b0 && a1 > b1) || (a0 > b0 && a1 < b1) {
                    crossings += 1;
                }
            }
        }
    }
    crossings
}

fn assign_order(g: &mut LayoutGraph, layering: &[Vec<String>]) {
    for layer in layering {
        for (idx, id) in layer.iter().enumerate() {
            if let Some(n) = g.node_mut(id) {
                n.order = Some(idx);
            }
        }
    }
}
