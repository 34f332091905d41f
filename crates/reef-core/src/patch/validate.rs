//! Non-throwing batch validation.
//!
//! Reports every violation instead of stopping at the first, so a caller can
//! surface the whole batch before deciding to mutate anything.

use super::ops::{PatchOp, PatchValidation, PatchViolation};
use crate::registry::BlockTypeRegistry;
use rustc_hash::FxHashSet;

pub(crate) fn validate(
    operations: &[PatchOp],
    current_node_ids: &[String],
    blocks: &BlockTypeRegistry,
) -> PatchValidation {
    let current: FxHashSet<&str> = current_node_ids.iter().map(String::as_str).collect();

    // Targets introduced by `add` in this batch are visible to later
    // operations in the same batch.
    let mut available: FxHashSet<&str> = current.clone();
    for op in operations {
        if let PatchOp::Add { target_id, .. } = op {
            available.insert(target_id.as_str());
        }
    }

    let mut errors: Vec<PatchViolation> = Vec::new();
    let mut violation = |op: &PatchOp, message: String| {
        errors.push(PatchViolation {
            operation: op.clone(),
            message,
        });
    };

    // Ids already claimed by an earlier `add` in this batch; a second `add`
    // of the same id is flagged on the later operation.
    let mut added_in_batch: FxHashSet<&str> = FxHashSet::default();

    for op in operations {
        match op {
            PatchOp::Update { target_id, .. } | PatchOp::Move { target_id, .. } => {
                if !available.contains(target_id.as_str()) {
                    violation(op, format!("Node \"{target_id}\" does not exist"));
                }
            }
            PatchOp::Resize { target_id, size } => {
                if !available.contains(target_id.as_str()) {
                    violation(op, format!("Node \"{target_id}\" does not exist"));
                }
                if size.width <= 0.0 || size.height <= 0.0 {
                    violation(
                        op,
                        format!(
                            "Size must be positive (got width: {}, height: {})",
                            size.width, size.height
                        ),
                    );
                }
            }
            // Deletions cannot target a node that only pends addition.
            PatchOp::Delete { target_id } => {
                if !current.contains(target_id.as_str()) {
                    violation(op, format!("Node \"{target_id}\" does not exist"));
                }
            }
            PatchOp::Disconnect { target_id, to } => {
                if !current.contains(target_id.as_str()) {
                    violation(op, format!("Source node \"{target_id}\" does not exist"));
                }
                if let Some(to) = to {
                    if !current.contains(to.as_str()) {
                        violation(op, format!("Target node \"{to}\" does not exist"));
                    }
                }
            }
            PatchOp::Add {
                target_id,
                node_type,
                ..
            } => {
                if !blocks.has(node_type) {
                    violation(op, format!("Block type \"{node_type}\" is not registered"));
                }
                if current.contains(target_id.as_str()) || !added_in_batch.insert(target_id.as_str())
                {
                    violation(op, format!("Node \"{target_id}\" already exists"));
                }
            }
            PatchOp::Connect { target_id, to, .. } => {
                if !available.contains(target_id.as_str()) {
                    violation(op, format!("Source node \"{target_id}\" does not exist"));
                }
                if !available.contains(to.as_str()) {
                    violation(op, format!("Target node \"{to}\" does not exist"));
                }
            }
        }
    }

    PatchValidation {
        valid: errors.is_empty(),
        errors,
    }
}
