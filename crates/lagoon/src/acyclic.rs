//! Cycle removal.
//!
//! Ranking requires a DAG, so every edge in the feedback arc set is reversed
//! before the pipeline runs and flipped back afterwards. Reversed edges are
//! re-inserted under a fresh name so a forward edge between the same pair is
//! not clobbered.

use crate::graph::EdgeKey;
use crate::LayoutGraph;
use rustc_hash::FxHashSet;

pub fn run(g: &mut LayoutGraph) {
    for e in dfs_fas(g) {
        let Some(mut label) = g.remove_edge_key(&e) else {
            continue;
        };
        label.forward_name = e.name.clone();
        label.reversed = true;

        let name = unique_rev_name(g, &e.w, &e.v);
        g.set_edge_named(e.w, e.v, Some(name), label);
    }
}

pub fn undo(g: &mut LayoutGraph) {
    for e in g.edge_keys() {
        let reversed = g.edge_by_key(&e).is_some_and(|l| l.reversed);
        if !reversed {
            continue;
        }
        let Some(mut label) = g.remove_edge_key(&e) else {
            continue;
        };
        let forward_name = label.forward_name.take();
        label.reversed = false;
        g.set_edge_named(e.w, e.v, forward_name, label);
    }
}

fn unique_rev_name(g: &LayoutGraph, v: &str, w: &str) -> String {
    for i in 1usize.. {
        let candidate = format!("rev{i}");
        if !g.has_edge(v, w, Some(&candidate)) {
            return candidate;
        }
    }
    unreachable!()
}

fn dfs_fas(g: &LayoutGraph) -> Vec<EdgeKey> {
    let mut fas: Vec<EdgeKey> = Vec::new();
    let mut stack: FxHashSet<String> = FxHashSet::default();
    let mut visited: FxHashSet<String> = FxHashSet::default();

    fn dfs(
        g: &LayoutGraph,
        v: &str,
        visited: &mut FxHashSet<String>,
        stack: &mut FxHashSet<String>,
        fas: &mut Vec<EdgeKey>,
    ) {
        if !visited.insert(v.to_string()) {
            return;
        }
        stack.insert(v.to_string());
        for e in g.out_edges(v, None) {
            // Reversing a self-loop does not make the graph acyclic, and
            // self-loops must not constrain rank assignment.
            if e.v == e.w {
                continue;
            }
            if stack.contains(&e.w) {
                fas.push(e);
            } else {
                dfs(g, &e.w, visited, stack, fas);
            }
        }
        stack.remove(v);
    }

    for v in g.node_ids() {
        dfs(g, &v, &mut visited, &mut stack, &mut fas);
    }
    fas
}
