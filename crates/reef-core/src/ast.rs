//! Semantic tree produced by the document visitor.

use crate::model::{Direction, PropertyMap};
use crate::schema::CustomPropertySchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasAst {
    pub direction: Direction,
    pub schemas: Vec<CustomPropertySchema>,
    pub nodes: Vec<AstNode>,
    pub edges: Vec<AstEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstNode {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: String,
    pub label: String,
    pub properties: PropertyMap,
    #[serde(
        default,
        rename = "customProperties",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub custom_properties: Vec<CustomPropertyValue>,
    #[serde(default, rename = "parentId", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstEdge {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, rename = "startLabel", skip_serializing_if = "Option::is_none")]
    pub start_label: Option<String>,
    #[serde(default, rename = "endLabel", skip_serializing_if = "Option::is_none")]
    pub end_label: Option<String>,
    #[serde(default, rename = "edgeType", skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<String>,
    #[serde(
        default,
        rename = "edgeData",
        skip_serializing_if = "PropertyMap::is_empty"
    )]
    pub edge_data: PropertyMap,
}

/// A `$`-property occurrence on a node: which schema it references and the
/// value it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomPropertyValue {
    #[serde(rename = "schemaId")]
    pub schema_id: String,
    pub value: CustomValue,
}

/// Either a plain value (`$priority: "high"`) or an inline type-function call
/// (`$rating: number(3, {min: 1, max: 5})`) that also implies a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomValue {
    TypeFunction {
        #[serde(rename = "typeName")]
        type_name: String,
        value: serde_json::Value,
        #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
        options: PropertyMap,
    },
    Plain(serde_json::Value),
}

impl CustomValue {
    /// The carried value, regardless of representation.
    pub fn payload(&self) -> &serde_json::Value {
        match self {
            CustomValue::TypeFunction { value, .. } => value,
            CustomValue::Plain(value) => value,
        }
    }
}
