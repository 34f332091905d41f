//! Document CST → semantic tree.

use super::cst::{
    BlockCst, CustomValueCst, DocumentCst, EdgeAnnotation, EdgeCst, EntryCst, ItemCst, PropsCst,
    SchemaCst, ValueCst,
};
use crate::ast::{AstEdge, AstNode, CanvasAst, CustomPropertyValue, CustomValue};
use crate::model::PropertyMap;
use crate::schema::{CustomPropertyKind, CustomPropertySchema, SchemaValidation};

pub(crate) fn document_to_ast(cst: &DocumentCst) -> CanvasAst {
    let mut schemas: Vec<CustomPropertySchema> = Vec::new();
    let mut nodes: Vec<AstNode> = Vec::new();
    let mut edges: Vec<AstEdge> = Vec::new();

    walk_items(&cst.items, None, &mut schemas, &mut nodes, &mut edges);

    CanvasAst {
        direction: cst.direction,
        schemas,
        nodes,
        edges,
    }
}

fn walk_items(
    items: &[ItemCst],
    parent: Option<&str>,
    schemas: &mut Vec<CustomPropertySchema>,
    nodes: &mut Vec<AstNode>,
    edges: &mut Vec<AstEdge>,
) {
    for item in items {
        match item {
            ItemCst::Schema(schema) => schemas.push(visit_schema(schema)),
            ItemCst::Block(block) => visit_block(block, parent, schemas, nodes, edges),
            ItemCst::Edge(edge) => edges.push(visit_edge(edge)),
        }
    }
}

/// `@schema` fields are read off the flat property map: `name`, `type`,
/// `options`, `min`/`max`/`pattern` and `defaultValue`.
fn visit_schema(schema: &SchemaCst) -> CustomPropertySchema {
    let (properties, _custom) = split_props(&schema.props);

    let name = properties
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or(&schema.id)
        .to_string();
    let kind = properties
        .get("type")
        .and_then(|v| v.as_str())
        .map(CustomPropertyKind::parse)
        .unwrap_or_default();
    let options = properties.get("options").and_then(|v| v.as_array()).map(|values| {
        values
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect::<Vec<_>>()
    });

    let validation = SchemaValidation {
        min: properties.get("min").and_then(|v| v.as_f64()),
        max: properties.get("max").and_then(|v| v.as_f64()),
        pattern: properties
            .get("pattern")
            .and_then(|v| v.as_str())
            .map(str::to_string),
    };

    CustomPropertySchema {
        id: schema.id.clone(),
        name,
        kind,
        options,
        validation: (!validation.is_empty()).then_some(validation),
        default_value: properties.get("defaultValue").cloned(),
    }
}

fn visit_block(
    block: &BlockCst,
    parent: Option<&str>,
    schemas: &mut Vec<CustomPropertySchema>,
    nodes: &mut Vec<AstNode>,
    edges: &mut Vec<AstEdge>,
) {
    let (properties, custom_properties) = block
        .props
        .as_ref()
        .map(split_props)
        .unwrap_or_else(|| (PropertyMap::new(), Vec::new()));

    nodes.push(AstNode {
        id: block.id.clone(),
        block_type: block.block_type.clone(),
        label: block.label.clone().unwrap_or_else(|| block.id.clone()),
        properties,
        custom_properties,
        parent_id: parent.map(str::to_string),
    });

    walk_items(&block.children, Some(&block.id), schemas, nodes, edges);
}

fn visit_edge(edge: &EdgeCst) -> AstEdge {
    let mut label: Option<String> = None;
    let mut edge_type: Option<String> = None;
    match &edge.annotation {
        Some(EdgeAnnotation::Label(l)) => label = Some(l.clone()),
        Some(EdgeAnnotation::EdgeType(t)) => edge_type = Some(t.clone()),
        None => {}
    }

    let mut edge_data = edge
        .props
        .as_ref()
        .map(|props| split_props(props).0)
        .unwrap_or_default();

    // Label fields move out of the data map into dedicated fields so they are
    // not duplicated downstream.
    if label.is_none() {
        if let Some(l) = edge_data.get("label").and_then(|v| v.as_str()) {
            label = Some(l.to_string());
        }
    }
    if edge_data.get("label").is_some_and(|v| v.is_string()) {
        edge_data.remove("label");
    }
    let start_label = take_string(&mut edge_data, "startLabel");
    let end_label = take_string(&mut edge_data, "endLabel");

    AstEdge {
        source: edge.source.clone(),
        target: edge.target.clone(),
        label,
        start_label,
        end_label,
        edge_type,
        edge_data,
    }
}

fn take_string(map: &mut PropertyMap, key: &str) -> Option<String> {
    let value = map.get(key)?.as_str()?.to_string();
    map.remove(key);
    Some(value)
}

/// Splits a properties block into regular entries and `$`-prefixed custom
/// entries. A type-function call keys its synthesized schema as
/// `inline_<key>_<typeName>`; a plain custom value references the schema
/// named by the key itself. Shared with the patch visitor so both pipelines
/// feed the same validation downstream.
pub(crate) fn split_props(props: &PropsCst) -> (PropertyMap, Vec<CustomPropertyValue>) {
    let mut regular = PropertyMap::new();
    let mut custom: Vec<CustomPropertyValue> = Vec::new();

    for entry in &props.entries {
        match entry {
            EntryCst::Regular { key, value } => {
                regular.insert(key.clone(), value_to_json(value));
            }
            EntryCst::Custom { key, value } => match value {
                CustomValueCst::Plain(value) => custom.push(CustomPropertyValue {
                    schema_id: key.clone(),
                    value: CustomValue::Plain(value_to_json(value)),
                }),
                CustomValueCst::TypeFunction {
                    type_name,
                    value,
                    options,
                } => {
                    let mut option_map = PropertyMap::new();
                    for (name, value) in options {
                        option_map.insert(name.clone(), value_to_json(value));
                    }
                    custom.push(CustomPropertyValue {
                        schema_id: format!("inline_{key}_{type_name}"),
                        value: CustomValue::TypeFunction {
                            type_name: type_name.clone(),
                            value: value_to_json(value),
                            options: option_map,
                        },
                    });
                }
            },
        }
    }

    (regular, custom)
}

pub(crate) fn value_to_json(value: &ValueCst) -> serde_json::Value {
    match value {
        ValueCst::Str(s) | ValueCst::Ident(s) => serde_json::Value::String(s.clone()),
        ValueCst::Bool(b) => serde_json::Value::Bool(*b),
        ValueCst::Num(n) => number_to_json(*n),
        ValueCst::Array(values) => {
            serde_json::Value::Array(values.iter().map(value_to_json).collect())
        }
    }
}

/// Integral values become JSON integers, everything else a double.
fn number_to_json(n: f64) -> serde_json::Value {
    const MAX_SAFE: f64 = 9_007_199_254_740_992.0;
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}
