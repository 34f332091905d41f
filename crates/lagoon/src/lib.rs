#![forbid(unsafe_code)]

//! Deterministic layered graph layout.
//!
//! The pipeline runs the classic phases in order: cycle removal, rank
//! assignment, in-rank ordering, coordinate assignment. Coordinates are
//! computed in top-to-bottom space and transformed afterwards for the other
//! rank directions, so every phase reasons about a single orientation.

pub mod graph;

pub mod acyclic;
pub mod order;
pub mod position;
pub mod rank;

pub use graph::{EdgeKey, Graph};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RankDir {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphLabel {
    pub rankdir: RankDir,
    pub nodesep: f64,
    pub ranksep: f64,
}

impl Default for GraphLabel {
    fn default() -> Self {
        Self {
            rankdir: RankDir::TB,
            nodesep: 50.0,
            ranksep: 50.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeLabel {
    pub width: f64,
    pub height: f64,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub rank: Option<i32>,
    pub order: Option<usize>,
}

impl NodeLabel {
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeLabel {
    pub minlen: usize,
    pub weight: f64,
    pub reversed: bool,
    pub forward_name: Option<String>,
}

impl Default for EdgeLabel {
    fn default() -> Self {
        Self {
            minlen: 1,
            weight: 1.0,
            reversed: false,
            forward_name: None,
        }
    }
}

pub type LayoutGraph = Graph<NodeLabel, EdgeLabel, GraphLabel>;

/// Assigns a center coordinate to every node of `g`.
///
/// The graph label's `rankdir` decides which axis ranks advance along;
/// `nodesep` separates nodes within a rank and `ranksep` separates ranks.
/// The result is translated so the top-left corner of the drawing is at the
/// origin. Edge directions and names are restored before returning, even for
/// edges that were reversed to break cycles.
pub fn layout(g: &mut LayoutGraph) {
    if g.node_count() == 0 {
        return;
    }

    acyclic::run(g);
    coordinate_system::adjust(g);

    rank::rank(g);
    rank::normalize(g);
    order::order(g);
    position::position(g);

    coordinate_system::undo(g);
    position::translate_to_origin(g);
    acyclic::undo(g);
}

mod coordinate_system {
    use super::{LayoutGraph, RankDir};

    pub fn adjust(g: &mut LayoutGraph) {
        match g.graph().rankdir {
            RankDir::LR | RankDir::RL => swap_width_height(g),
            RankDir::TB | RankDir::BT => {}
        }
    }

    pub fn undo(g: &mut LayoutGraph) {
        match g.graph().rankdir {
            RankDir::BT | RankDir::RL => reverse_y(g),
            RankDir::TB | RankDir::LR => {}
        }

        match g.graph().rankdir {
            RankDir::LR | RankDir::RL => {
                swap_xy(g);
                swap_width_height(g);
            }
            RankDir::TB | RankDir::BT => {}
        }
    }

    fn swap_width_height(g: &mut LayoutGraph) {
        for id in g.node_ids() {
            if let Some(n) = g.node_mut(&id) {
                (n.width, n.height) = (n.height, n.width);
            }
        }
    }

    fn reverse_y(g: &mut LayoutGraph) {
        for id in g.node_ids() {
            if let Some(n) = g.node_mut(&id) {
                if let Some(y) = n.y {
                    n.y = Some(-y);
                }
            }
        }
    }

    fn swap_xy(g: &mut LayoutGraph) {
        for id in g.node_ids() {
            if let Some(n) = g.node_mut(&id) {
                if let (Some(x), Some(y)) = (n.x, n.y) {
                    n.x = Some(y);
                    n.y = Some(x);
                }
            }
        }
    }
}

pub(crate) mod util {
    use super::NodeLabel;
    use crate::graph::Graph;

    /// Nodes grouped by rank and sorted by their `order` field; rank 0 first.
    pub fn build_layer_matrix<E, G>(g: &Graph<NodeLabel, E, G>) -> Vec<Vec<String>> {
        let mut max_rank: i32 = i32::MIN;
        for id in g.node_ids() {
            if let Some(rank) = g.node(&id).and_then(|n| n.rank) {
                max_rank = max_rank.max(rank);
            }
        }
        if max_rank == i32::MIN {
            return Vec::new();
        }

        let mut layers: Vec<Vec<(usize, String)>> = vec![Vec::new(); (max_rank + 1).max(0) as usize];
        for id in g.node_ids() {
            let Some(node) = g.node(&id) else { continue };
            let Some(rank) = node.rank else { continue };
            if rank < 0 {
                continue;
            }
            let order = node.order.unwrap_or(usize::MAX);
            layers[rank as usize].push((order, id));
        }

        layers
            .into_iter()
            .map(|mut layer| {
                layer.sort_by_key(|(o, _)| *o);
                layer.into_iter().map(|(_, id)| id).collect()
            })
            .collect()
    }
}
