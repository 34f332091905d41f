//! Position assignment for built graphs.
//!
//! Flat documents go through `lagoon` in one pass. Documents with containers
//! use the zone-aware multi-pass: top-level containers and free roots are
//! laid out together, then each container's direct children are laid out in
//! isolation, the container grows to fit them and the children are
//! re-expressed relative to the container's top-left corner (consumers treat
//! a child's position as parent-relative once `parentId` is set).

use crate::model::{Direction, GraphEdge, GraphNode, Position};
use crate::registry::BlockTypeRegistry;
use rustc_hash::FxHashSet;
use tracing::debug;

pub const DEFAULT_NODE_SPACING: f64 = 50.0;
pub const DEFAULT_RANK_SPACING: f64 = 100.0;
const DEFAULT_ZONE_PADDING: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub direction: Direction,
    pub node_spacing: f64,
    pub rank_spacing: f64,
}

impl LayoutOptions {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            node_spacing: DEFAULT_NODE_SPACING,
            rank_spacing: DEFAULT_RANK_SPACING,
        }
    }
}

/// Assigns a position to every node; container sizes may grow to fit their
/// children. Pure: the input slices are not modified.
pub fn layout(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    blocks: &BlockTypeRegistry,
    options: &LayoutOptions,
) -> Vec<GraphNode> {
    let has_zones = nodes.iter().any(|node| {
        node.parent_id.is_some() || blocks.get(&node.block_type).is_some_and(|def| def.is_group)
    });

    if has_zones {
        zone_aware_layout(nodes, edges, blocks, options)
    } else {
        flat_layout(nodes, edges, options)
    }
}

/// Single layered pass over every node. Center coordinates from the layout
/// graph are converted to top-left positions using each node's own size.
fn flat_layout(nodes: &[GraphNode], edges: &[GraphEdge], options: &LayoutOptions) -> Vec<GraphNode> {
    let mut g = lagoon::LayoutGraph::with_graph(lagoon::GraphLabel {
        rankdir: options.direction.rankdir(),
        nodesep: options.node_spacing,
        ranksep: options.rank_spacing,
    });

    for node in nodes {
        g.set_node(
            node.id.clone(),
            lagoon::NodeLabel::sized(node.size.width, node.size.height),
        );
    }

    for edge in edges {
        if g.has_node(&edge.source) && g.has_node(&edge.target) {
            g.set_edge_named(
                edge.source.clone(),
                edge.target.clone(),
                Some(edge.id.clone()),
                lagoon::EdgeLabel::default(),
            );
        }
    }

    // Without edges there is nothing to rank against; a synthetic chain
    // forces a direction-consistent arrangement.
    if edges.is_empty() && nodes.len() > 1 {
        for pair in nodes.windows(2) {
            g.set_edge_with_label(
                pair[0].id.clone(),
                pair[1].id.clone(),
                lagoon::EdgeLabel::default(),
            );
        }
    }

    lagoon::layout(&mut g);

    nodes
        .iter()
        .map(|node| {
            let mut node = node.clone();
            if let Some(label) = g.node(&node.id) {
                if let (Some(x), Some(y)) = (label.x, label.y) {
                    node.position = Position::new(
                        x - node.size.width / 2.0,
                        y - node.size.height / 2.0,
                    );
                }
            }
            node
        })
        .collect()
}

fn zone_aware_layout(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    blocks: &BlockTypeRegistry,
    options: &LayoutOptions,
) -> Vec<GraphNode> {
    let is_group =
        |node: &GraphNode| blocks.get(&node.block_type).is_some_and(|def| def.is_group);

    let containers: Vec<&GraphNode> = nodes
        .iter()
        .filter(|n| is_group(n) && n.parent_id.is_none())
        .collect();
    let children: Vec<&GraphNode> = nodes.iter().filter(|n| n.parent_id.is_some()).collect();
    let free_roots: Vec<&GraphNode> = nodes
        .iter()
        .filter(|n| n.parent_id.is_none() && !is_group(n))
        .collect();

    debug!(
        containers = containers.len(),
        children = children.len(),
        free_roots = free_roots.len(),
        "zone-aware layout"
    );

    // Pass 1: containers and free roots together, restricted to edges that
    // stay within that top-level set.
    let top_level: Vec<GraphNode> = containers
        .iter()
        .chain(free_roots.iter())
        .map(|n| (*n).clone())
        .collect();
    let top_ids: FxHashSet<&str> = top_level.iter().map(|n| n.id.as_str()).collect();
    let top_edges: Vec<GraphEdge> = edges
        .iter()
        .filter(|e| top_ids.contains(e.source.as_str()) && top_ids.contains(e.target.as_str()))
        .cloned()
        .collect();

    let laid_top = flat_layout(&top_level, &top_edges, options);
    let (mut laid_containers, laid_roots): (Vec<GraphNode>, Vec<GraphNode>) =
        laid_top.into_iter().partition(|n| is_group(n));

    // Pass 2: each top-level container's direct children in isolation. A
    // container nested inside another container is laid out above as a peer
    // of its siblings; its own children pass through untouched below.
    let mut laid_children: Vec<GraphNode> = Vec::new();
    let mut placed: FxHashSet<String> = FxHashSet::default();

    for container in &mut laid_containers {
        let zone_children: Vec<GraphNode> = children
            .iter()
            .filter(|c| c.parent_id.as_deref() == Some(container.id.as_str()))
            .map(|c| {
                let mut c = (*c).clone();
                c.position = Position::ORIGIN;
                c
            })
            .collect();
        if zone_children.is_empty() {
            continue;
        }

        let zone_direction = container
            .data
            .get("direction")
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse().ok())
            .unwrap_or(options.direction);
        let padding = container
            .data
            .get("padding")
            .and_then(|v| v.as_f64())
            .unwrap_or(DEFAULT_ZONE_PADDING);

        let child_ids: FxHashSet<&str> = zone_children.iter().map(|n| n.id.as_str()).collect();
        let zone_edges: Vec<GraphEdge> = edges
            .iter()
            .filter(|e| {
                child_ids.contains(e.source.as_str()) && child_ids.contains(e.target.as_str())
            })
            .cloned()
            .collect();

        let mut laid = flat_layout(
            &zone_children,
            &zone_edges,
            &LayoutOptions {
                direction: zone_direction,
                ..*options
            },
        );

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for child in &laid {
            min_x = min_x.min(child.position.x);
            min_y = min_y.min(child.position.y);
            max_x = max_x.max(child.position.x + child.size.width);
            max_y = max_y.max(child.position.y + child.size.height);
        }
        if !min_x.is_finite() {
            continue;
        }

        // Grow the container to hold the children plus padding on each side,
        // never shrinking below its current size.
        container.size.width = container.size.width.max(max_x - min_x + padding * 2.0);
        container.size.height = container.size.height.max(max_y - min_y + padding * 2.0);

        // Re-express children relative to the container's top-left corner.
        for child in &mut laid {
            child.position.x += padding - min_x;
            child.position.y += padding - min_y;
            placed.insert(child.id.clone());
        }
        laid_children.extend(laid);
    }

    // Children whose parent is itself nested are not covered by the
    // container pass; they pass through with their original data intact.
    let leftover: Vec<GraphNode> = children
        .iter()
        .filter(|c| !placed.contains(&c.id))
        .map(|c| (*c).clone())
        .collect();

    let mut result = laid_containers;
    result.extend(laid_roots);
    result.extend(laid_children);
    result.extend(leftover);
    result
}
