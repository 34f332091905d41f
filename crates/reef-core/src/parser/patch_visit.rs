//! Patch CST → operation list.
//!
//! Custom-property entries come out in the same `{schemaId, value}` shape the
//! document visitor produces, so patch additions run through the exact same
//! validation as document-declared nodes.

use super::cst::{CommandCst, PatchCst, PropsCst};
use super::visit::split_props;
use crate::ast::CustomPropertyValue;
use crate::error::SyntaxError;
use crate::model::{Position, PropertyMap, Size};
use crate::patch::PatchOp;

pub(crate) fn patch_to_ops(cst: &PatchCst) -> (Vec<PatchOp>, Vec<SyntaxError>) {
    let mut ops: Vec<PatchOp> = Vec::new();
    let mut errors: Vec<SyntaxError> = Vec::new();

    for command in &cst.commands {
        match command {
            CommandCst::Update { target, props } => {
                let (properties, custom_properties) = split_opt(props);
                ops.push(PatchOp::Update {
                    target_id: target.clone(),
                    properties,
                    custom_properties,
                });
            }
            CommandCst::Delete { target } => ops.push(PatchOp::Delete {
                target_id: target.clone(),
            }),
            CommandCst::Add {
                node_type,
                id,
                label,
                props,
            } => {
                let (properties, custom_properties) = split_opt(props);
                ops.push(PatchOp::Add {
                    target_id: id.clone(),
                    node_type: node_type.clone(),
                    label: label.clone(),
                    properties,
                    custom_properties,
                });
            }
            CommandCst::Connect {
                source,
                target,
                label,
                props,
            } => {
                let (edge_data, _) = split_opt(props);
                ops.push(PatchOp::Connect {
                    target_id: source.clone(),
                    to: target.clone(),
                    label: label.clone(),
                    edge_data,
                });
            }
            CommandCst::Disconnect { source, target } => ops.push(PatchOp::Disconnect {
                target_id: source.clone(),
                to: target.clone(),
            }),
            CommandCst::Move {
                target,
                props,
                line,
                column,
            } => {
                let (map, _) = split_props(props);
                match (number_field(&map, "x"), number_field(&map, "y")) {
                    (Some(x), Some(y)) => ops.push(PatchOp::Move {
                        target_id: target.clone(),
                        position: Position::new(x, y),
                    }),
                    _ => errors.push(SyntaxError::new(
                        "`@move` requires numeric `x` and `y`",
                        *line,
                        *column,
                    )),
                }
            }
            CommandCst::Resize {
                target,
                props,
                line,
                column,
            } => {
                let (map, _) = split_props(props);
                match (number_field(&map, "width"), number_field(&map, "height")) {
                    (Some(width), Some(height)) => ops.push(PatchOp::Resize {
                        target_id: target.clone(),
                        size: Size::new(width, height),
                    }),
                    _ => errors.push(SyntaxError::new(
                        "`@resize` requires numeric `width` and `height`",
                        *line,
                        *column,
                    )),
                }
            }
        }
    }

    (ops, errors)
}

fn split_opt(props: &Option<PropsCst>) -> (PropertyMap, Vec<CustomPropertyValue>) {
    props
        .as_ref()
        .map(split_props)
        .unwrap_or_else(|| (PropertyMap::new(), Vec::new()))
}

fn number_field(map: &PropertyMap, key: &str) -> Option<f64> {
    map.get(key).and_then(|v| v.as_f64())
}
