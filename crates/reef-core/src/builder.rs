//! Semantic tree → graph construction.
//!
//! Merges registry defaults with declared properties, validates against the
//! type's property schema and free-form validator, resolves custom-property
//! schemas (declared or inline) and checks containment. Patch `@add` routes
//! through the same node construction path.

use crate::ast::{AstEdge, AstNode, CanvasAst, CustomValue};
use crate::error::{Error, Result};
use crate::model::{GraphEdge, GraphNode, Position, PropertyMap};
use crate::registry::{BlockTypeRegistry, EdgeTypeRegistry};
use crate::schema::{
    ConstraintKind, CustomPropertyKind, CustomPropertySchema, PropertyConstraint, SchemaValidation,
};
use crate::EngineOptions;
use indexmap::IndexMap;
use rustc_hash::FxHashSet;

pub(crate) struct GraphBuilder<'a> {
    blocks: &'a BlockTypeRegistry,
    edges: &'a EdgeTypeRegistry,
    options: &'a EngineOptions,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(
        blocks: &'a BlockTypeRegistry,
        edges: &'a EdgeTypeRegistry,
        options: &'a EngineOptions,
    ) -> Self {
        Self {
            blocks,
            edges,
            options,
        }
    }

    pub fn build(&self, ast: &CanvasAst) -> Result<(Vec<GraphNode>, Vec<GraphEdge>)> {
        let schema_map = self.schema_map(ast);

        let mut nodes: Vec<GraphNode> = Vec::with_capacity(ast.nodes.len());
        for ast_node in &ast.nodes {
            nodes.push(self.build_node(ast_node, &schema_map)?);
        }

        let mut edges: Vec<GraphEdge> = Vec::with_capacity(ast.edges.len());
        for (index, ast_edge) in ast.edges.iter().enumerate() {
            edges.push(self.build_edge(ast_edge, index)?);
        }

        self.validate_edge_endpoints(&nodes, &edges)?;
        self.validate_containment(&nodes)?;

        Ok((nodes, edges))
    }

    /// Declared `@schema` entries plus inline schemas synthesized from
    /// type-function custom values; first sighting of an inline id wins.
    fn schema_map(&self, ast: &CanvasAst) -> IndexMap<String, CustomPropertySchema> {
        let mut map: IndexMap<String, CustomPropertySchema> = IndexMap::new();
        for schema in &ast.schemas {
            map.insert(schema.id.clone(), schema.clone());
        }
        for schema in extract_inline_schemas(&ast.nodes) {
            map.entry(schema.id.clone()).or_insert(schema);
        }
        map
    }

    pub fn build_node(
        &self,
        ast_node: &AstNode,
        schema_map: &IndexMap<String, CustomPropertySchema>,
    ) -> Result<GraphNode> {
        let type_def = self.blocks.get(&ast_node.block_type).ok_or_else(|| {
            Error::UnknownBlockType {
                name: ast_node.block_type.clone(),
                available: available(self.blocks.list()),
            }
        })?;

        // Declared values win over type defaults; no key is lost from either
        // side.
        let mut data = type_def.default_properties.clone();
        for (key, value) in &ast_node.properties {
            data.insert(key.clone(), value.clone());
        }

        if let Some(property_schema) = &type_def.property_schema {
            self.validate_property_schema(property_schema, &data, ast_node)?;
        }

        if let Some(validate) = &type_def.validate {
            if !validate(&data) {
                return Err(Error::ValidationFailed {
                    block_id: ast_node.id.clone(),
                    block_type: ast_node.block_type.clone(),
                });
            }
        }

        let mut custom_entries: Vec<serde_json::Value> = Vec::new();
        for custom in &ast_node.custom_properties {
            let schema = schema_map.get(&custom.schema_id).ok_or_else(|| {
                Error::UnknownCustomPropertySchema {
                    schema_id: custom.schema_id.clone(),
                    block_id: ast_node.id.clone(),
                }
            })?;

            let value = custom.value.payload();
            validate_custom_value(schema, value, &ast_node.id)?;

            custom_entries.push(serde_json::json!({
                "schemaId": custom.schema_id,
                "value": value,
            }));
        }
        if !custom_entries.is_empty() {
            data.insert(
                "customProperties".into(),
                serde_json::Value::Array(custom_entries),
            );
        }

        if ast_node.parent_id.is_some() && !data.contains_key("extent") {
            if let Some(extent) = self.options.default_extent {
                data.insert("extent".into(), extent.to_value());
            }
        }

        Ok(GraphNode {
            id: ast_node.id.clone(),
            block_type: ast_node.block_type.clone(),
            position: Position::ORIGIN,
            size: type_def.default_size,
            data,
            parent_id: ast_node.parent_id.clone(),
        })
    }

    fn build_edge(&self, ast_edge: &AstEdge, index: usize) -> Result<GraphEdge> {
        let mut shape = Default::default();
        let mut style = None;
        let mut marker_start: Option<serde_json::Value> = None;
        let mut marker_end: Option<serde_json::Value> = None;
        let mut data = PropertyMap::new();
        let mut edge_schema: Option<&IndexMap<String, PropertyConstraint>> = None;

        if let Some(edge_type) = &ast_edge.edge_type {
            let type_def = self
                .edges
                .get(edge_type)
                .ok_or_else(|| Error::UnknownEdgeType {
                    name: edge_type.clone(),
                    available: available(self.edges.list()),
                })?;
            shape = type_def.default_shape;
            style = type_def.default_style.clone();
            data = type_def.default_data.clone();
            edge_schema = type_def.edge_property_schema.as_ref();
            marker_start = data.remove("markerStart");
            marker_end = data.remove("markerEnd");
        }

        // Edge-level data overrides type defaults; markers declared in the
        // DSL win over the edge type's.
        for (key, value) in &ast_edge.edge_data {
            data.insert(key.clone(), value.clone());
        }
        if let Some(marker) = data.remove("markerStart") {
            marker_start = Some(marker);
        }
        if let Some(marker) = data.remove("markerEnd") {
            marker_end = Some(marker);
        }

        if let Some(schema) = edge_schema {
            for (property, constraint) in schema {
                let Some(value) = data.get(property) else {
                    continue;
                };
                if let Err(message) = check_constraint(constraint, value) {
                    return Err(Error::EdgePropertyValidation {
                        src: ast_edge.source.clone(),
                        target: ast_edge.target.clone(),
                        edge_type: ast_edge.edge_type.clone().unwrap_or_default(),
                        property: property.clone(),
                        message,
                    });
                }
            }
        }

        Ok(GraphEdge {
            id: format!("edge-{}-{}-{}", ast_edge.source, ast_edge.target, index),
            source: ast_edge.source.clone(),
            target: ast_edge.target.clone(),
            label: ast_edge.label.clone(),
            start_label: ast_edge.start_label.clone(),
            end_label: ast_edge.end_label.clone(),
            shape,
            style,
            marker_start,
            marker_end,
            source_handle: None,
            target_handle: None,
            data,
        })
    }

    fn validate_edge_endpoints(&self, nodes: &[GraphNode], edges: &[GraphEdge]) -> Result<()> {
        let ids: FxHashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        for edge in edges {
            for node in [&edge.source, &edge.target] {
                if !ids.contains(node.as_str()) {
                    return Err(Error::UnknownEdgeNode {
                        src: edge.source.clone(),
                        target: edge.target.clone(),
                        node: node.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Every `parentId` must name a built node whose block type is a group.
    fn validate_containment(&self, nodes: &[GraphNode]) -> Result<()> {
        let by_id: IndexMap<&str, &GraphNode> =
            nodes.iter().map(|n| (n.id.as_str(), n)).collect();

        for node in nodes {
            let Some(parent_id) = &node.parent_id else {
                continue;
            };
            let Some(parent) = by_id.get(parent_id.as_str()) else {
                return Err(Error::UnknownParent {
                    node_id: node.id.clone(),
                    parent_id: parent_id.clone(),
                });
            };
            let is_group = self
                .blocks
                .get(&parent.block_type)
                .is_some_and(|def| def.is_group);
            if !is_group {
                return Err(Error::InvalidParent {
                    node_id: node.id.clone(),
                    parent_id: parent_id.clone(),
                    parent_type: parent.block_type.clone(),
                });
            }
        }
        Ok(())
    }

    fn validate_property_schema(
        &self,
        property_schema: &IndexMap<String, PropertyConstraint>,
        data: &PropertyMap,
        ast_node: &AstNode,
    ) -> Result<()> {
        for (property, constraint) in property_schema {
            // Absent properties are optional.
            let Some(value) = data.get(property) else {
                continue;
            };
            if let Err(message) = check_constraint(constraint, value) {
                return Err(Error::PropertyValidation {
                    block_id: ast_node.id.clone(),
                    block_type: ast_node.block_type.clone(),
                    property: property.clone(),
                    message,
                });
            }
        }
        Ok(())
    }
}

/// Checks one value against a `propertySchema` constraint, returning the
/// violation message on failure.
fn check_constraint(
    constraint: &PropertyConstraint,
    value: &serde_json::Value,
) -> std::result::Result<(), String> {
    match constraint.kind {
        ConstraintKind::Enum => {
            let allowed = constraint.allowed.as_deref().unwrap_or_default();
            let matches = value
                .as_str()
                .is_some_and(|s| allowed.iter().any(|a| a == s));
            if !matches {
                return Err(format!(
                    "invalid value `{value}`. Allowed values: {}",
                    allowed.join(", ")
                ));
            }
        }
        ConstraintKind::Number => {
            let Some(n) = value.as_f64() else {
                return Err(format!("must be a number, got `{value}`"));
            };
            if let Some(min) = constraint.min {
                if n < min {
                    return Err(format!("value {n} is less than minimum {min}"));
                }
            }
            if let Some(max) = constraint.max {
                if n > max {
                    return Err(format!("value {n} is greater than maximum {max}"));
                }
            }
        }
        ConstraintKind::String => {
            let Some(s) = value.as_str() else {
                return Err(format!("must be a string, got `{value}`"));
            };
            if let Some(pattern) = &constraint.pattern {
                let re = regex::Regex::new(pattern)
                    .map_err(|_| format!("invalid pattern `{pattern}`"))?;
                if !re.is_match(s) {
                    return Err(format!("value does not match pattern: {pattern}"));
                }
            }
        }
        ConstraintKind::Boolean => {
            if !value.is_boolean() {
                return Err(format!("must be a boolean, got `{value}`"));
            }
        }
    }
    Ok(())
}

/// Inline schemas implied by type-function custom values, in document order.
pub(crate) fn extract_inline_schemas(nodes: &[AstNode]) -> Vec<CustomPropertySchema> {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut schemas: Vec<CustomPropertySchema> = Vec::new();

    for node in nodes {
        for custom in &node.custom_properties {
            let CustomValue::TypeFunction {
                type_name, options, ..
            } = &custom.value
            else {
                continue;
            };
            if !seen.insert(custom.schema_id.clone()) {
                continue;
            }

            // Schema ids encode the property key: `inline_<key>_<typeName>`.
            let name = custom
                .schema_id
                .strip_prefix("inline_")
                .and_then(|rest| rest.strip_suffix(&format!("_{type_name}")))
                .unwrap_or(&custom.schema_id)
                .to_string();

            let validation = SchemaValidation {
                min: options.get("min").and_then(|v| v.as_f64()),
                max: options.get("max").and_then(|v| v.as_f64()),
                pattern: options
                    .get("pattern")
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
            };
            let option_values = options.get("options").and_then(|v| v.as_array()).map(|values| {
                values
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect::<Vec<_>>()
            });

            schemas.push(CustomPropertySchema {
                id: custom.schema_id.clone(),
                name,
                kind: CustomPropertyKind::parse(type_name),
                options: option_values,
                validation: (!validation.is_empty()).then_some(validation),
                default_value: None,
            });
        }
    }

    schemas
}

/// Type-checks a custom value against its schema.
fn validate_custom_value(
    schema: &CustomPropertySchema,
    value: &serde_json::Value,
    block_id: &str,
) -> Result<()> {
    let violation = |message: String| Error::CustomPropertyValidation {
        schema_id: schema.id.clone(),
        block_id: block_id.to_string(),
        message,
    };

    match schema.kind {
        CustomPropertyKind::Number => {
            let Some(n) = value.as_f64() else {
                return Err(violation(format!("expects a number, got `{value}`")));
            };
            if let Some(validation) = &schema.validation {
                if let Some(min) = validation.min {
                    if n < min {
                        return Err(violation(format!("value {n} is below minimum {min}")));
                    }
                }
                if let Some(max) = validation.max {
                    if n > max {
                        return Err(violation(format!("value {n} is above maximum {max}")));
                    }
                }
            }
        }
        CustomPropertyKind::Boolean => {
            if !value.is_boolean() {
                return Err(violation(format!("expects a boolean, got `{value}`")));
            }
        }
        CustomPropertyKind::Select => {
            if let Some(options) = &schema.options {
                let matches = value
                    .as_str()
                    .is_some_and(|s| options.iter().any(|o| o == s));
                if !matches {
                    return Err(violation(format!(
                        "value `{value}` is not in options: {}",
                        options.join(", ")
                    )));
                }
            }
        }
        CustomPropertyKind::Url => {
            if let Some(pattern) = schema.validation.as_ref().and_then(|v| v.pattern.as_deref()) {
                let re = regex::Regex::new(pattern)
                    .map_err(|_| violation(format!("invalid pattern `{pattern}`")))?;
                let matches = value.as_str().is_some_and(|s| re.is_match(s));
                if !matches {
                    return Err(violation("value does not match the URL pattern".into()));
                }
            }
        }
        CustomPropertyKind::Text
        | CustomPropertyKind::Multiselect
        | CustomPropertyKind::Date
        | CustomPropertyKind::Color => {}
    }

    Ok(())
}

fn available(names: Vec<String>) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}
