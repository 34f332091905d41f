//! Ordered patch application.
//!
//! Each operation sees the cumulative result of the ones before it. Apply is
//! the committed path: the caller has already validated, so the first
//! violated precondition aborts with an error.

use super::ops::{PatchOp, PatchedGraph};
use crate::ast::{AstNode, CustomPropertyValue};
use crate::error::{Error, Result};
use crate::model::{Direction, EdgeShape, GraphEdge, GraphNode, PropertyMap};
use crate::Engine;
use std::sync::Arc;
use tracing::debug;

/// Replacement for the default `update` merge; receives the node after
/// lookup and the update's property payloads.
pub type UpdateTransform =
    Arc<dyn Fn(&mut GraphNode, &PropertyMap, &[CustomPropertyValue]) + Send + Sync>;

#[derive(Clone, Default)]
pub struct ApplyOptions {
    /// Direction used for handle ends on edges created by `connect`.
    pub direction: Direction,
    pub update_transform: Option<UpdateTransform>,
}

impl ApplyOptions {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            update_transform: None,
        }
    }

    pub fn with_update_transform(
        mut self,
        transform: impl Fn(&mut GraphNode, &PropertyMap, &[CustomPropertyValue]) + Send + Sync + 'static,
    ) -> Self {
        self.update_transform = Some(Arc::new(transform));
        self
    }
}

impl std::fmt::Debug for ApplyOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplyOptions")
            .field("direction", &self.direction)
            .field(
                "update_transform",
                &self.update_transform.as_ref().map(|_| "<fn>"),
            )
            .finish()
    }
}

pub(crate) fn apply(
    engine: &Engine,
    operations: &[PatchOp],
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    options: &ApplyOptions,
) -> Result<PatchedGraph> {
    let mut nodes = nodes;
    let mut edges = edges;

    debug!(operations = operations.len(), "applying patch");

    for op in operations {
        match op {
            PatchOp::Update {
                target_id,
                properties,
                custom_properties,
            } => {
                let node = find_node_mut(&mut nodes, target_id, "update")?;
                match &options.update_transform {
                    Some(transform) => transform(node, properties, custom_properties),
                    None => default_update(node, properties, custom_properties),
                }
            }
            PatchOp::Delete { target_id } => {
                nodes.retain(|n| n.id != *target_id);
                edges.retain(|e| e.source != *target_id && e.target != *target_id);
            }
            PatchOp::Add {
                target_id,
                node_type,
                label,
                properties,
                custom_properties,
            } => {
                if nodes.iter().any(|n| n.id == *target_id) {
                    return Err(Error::NodeAlreadyExists {
                        id: target_id.clone(),
                    });
                }
                let node = engine.build_node(&AstNode {
                    id: target_id.clone(),
                    block_type: node_type.clone(),
                    label: label.clone(),
                    properties: properties.clone(),
                    custom_properties: custom_properties.clone(),
                    parent_id: None,
                })?;
                nodes.push(node);
            }
            PatchOp::Connect {
                target_id,
                to,
                label,
                edge_data,
            } => {
                connect(&mut edges, target_id, to, label, edge_data, options.direction);
            }
            PatchOp::Disconnect { target_id, to } => match to {
                Some(to) => {
                    edges.retain(|e| !(e.source == *target_id && e.target == *to));
                }
                None => {
                    edges.retain(|e| e.source != *target_id);
                }
            },
            PatchOp::Move {
                target_id,
                position,
            } => {
                let node = find_node_mut(&mut nodes, target_id, "move")?;
                node.position = *position;
            }
            PatchOp::Resize { target_id, size } => {
                if size.width <= 0.0 || size.height <= 0.0 {
                    return Err(Error::NonPositiveSize {
                        width: size.width,
                        height: size.height,
                    });
                }
                let node = find_node_mut(&mut nodes, target_id, "resize")?;
                node.size = *size;
            }
        }
    }

    Ok(PatchedGraph { nodes, edges })
}

fn find_node_mut<'a>(
    nodes: &'a mut [GraphNode],
    id: &str,
    operation: &'static str,
) -> Result<&'a mut GraphNode> {
    nodes
        .iter_mut()
        .find(|n| n.id == id)
        .ok_or_else(|| Error::PatchTargetMissing {
            id: id.to_string(),
            operation,
        })
}

/// Default update: merge properties into the node's data, upsert custom
/// property entries by schema id.
fn default_update(
    node: &mut GraphNode,
    properties: &PropertyMap,
    custom_properties: &[CustomPropertyValue],
) {
    for (key, value) in properties {
        node.data.insert(key.clone(), value.clone());
    }

    if custom_properties.is_empty() {
        return;
    }
    let entries = node
        .data
        .entry("customProperties")
        .or_insert_with(|| serde_json::Value::Array(Vec::new()));
    let Some(entries) = entries.as_array_mut() else {
        return;
    };
    for custom in custom_properties {
        let entry = serde_json::json!({
            "schemaId": custom.schema_id,
            "value": custom.value.payload(),
        });
        let existing = entries
            .iter_mut()
            .find(|e| e.get("schemaId").and_then(|v| v.as_str()) == Some(custom.schema_id.as_str()));
        match existing {
            Some(slot) => *slot = entry,
            None => entries.push(entry),
        }
    }
}

/// `connect` updates label/data on an existing edge between the pair, or
/// creates a new edge with direction-appropriate handle ends.
fn connect(
    edges: &mut Vec<GraphEdge>,
    source: &str,
    target: &str,
    label: &Option<String>,
    edge_data: &PropertyMap,
    direction: Direction,
) {
    if let Some(edge) = edges
        .iter_mut()
        .find(|e| e.source == source && e.target == target)
    {
        if label.is_some() {
            edge.label = label.clone();
        }
        for (key, value) in edge_data {
            edge.data.insert(key.clone(), value.clone());
        }
        return;
    }

    let (source_handle, target_handle) = match direction {
        Direction::LR => ("right", "left"),
        Direction::RL => ("left", "right"),
        Direction::TB => ("bottom", "top"),
        Direction::BT => ("top", "bottom"),
    };

    edges.push(GraphEdge {
        id: format!("{source}-{target}"),
        source: source.to_string(),
        target: target.to_string(),
        label: label.clone(),
        start_label: None,
        end_label: None,
        shape: EdgeShape::Default,
        style: None,
        marker_start: None,
        marker_end: None,
        source_handle: Some(source_handle.to_string()),
        target_handle: Some(target_handle.to_string()),
        data: edge_data.clone(),
    });
}
