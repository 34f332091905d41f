//! Typed patch operations and the validation report.

use crate::ast::CustomPropertyValue;
use crate::model::{Position, PropertyMap, Size};
use serde::{Deserialize, Serialize};

/// One mutation against the current graph state, in the order the patch
/// script declared it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PatchOp {
    Add {
        #[serde(rename = "targetId")]
        target_id: String,
        #[serde(rename = "nodeType")]
        node_type: String,
        label: String,
        #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
        properties: PropertyMap,
        #[serde(
            default,
            rename = "customProperties",
            skip_serializing_if = "Vec::is_empty"
        )]
        custom_properties: Vec<CustomPropertyValue>,
    },
    Update {
        #[serde(rename = "targetId")]
        target_id: String,
        #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
        properties: PropertyMap,
        #[serde(
            default,
            rename = "customProperties",
            skip_serializing_if = "Vec::is_empty"
        )]
        custom_properties: Vec<CustomPropertyValue>,
    },
    Delete {
        #[serde(rename = "targetId")]
        target_id: String,
    },
    Connect {
        #[serde(rename = "targetId")]
        target_id: String,
        to: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(
            default,
            rename = "edgeData",
            skip_serializing_if = "PropertyMap::is_empty"
        )]
        edge_data: PropertyMap,
    },
    Disconnect {
        #[serde(rename = "targetId")]
        target_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<String>,
    },
    Move {
        #[serde(rename = "targetId")]
        target_id: String,
        position: Position,
    },
    Resize {
        #[serde(rename = "targetId")]
        target_id: String,
        size: Size,
    },
}

impl PatchOp {
    pub fn target_id(&self) -> &str {
        match self {
            PatchOp::Add { target_id, .. }
            | PatchOp::Update { target_id, .. }
            | PatchOp::Delete { target_id }
            | PatchOp::Connect { target_id, .. }
            | PatchOp::Disconnect { target_id, .. }
            | PatchOp::Move { target_id, .. }
            | PatchOp::Resize { target_id, .. } => target_id,
        }
    }
}

/// One precondition violation found by `validate_patch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchViolation {
    pub operation: PatchOp,
    pub message: String,
}

/// Validation is non-throwing and reports every violation; the caller
/// decides how to surface them before anything mutates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchValidation {
    pub valid: bool,
    pub errors: Vec<PatchViolation>,
}

/// Result of applying a patch batch: the caller-owned collections, updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchedGraph {
    pub nodes: Vec<crate::model::GraphNode>,
    pub edges: Vec<crate::model::GraphEdge>,
}
