//! Patch model: typed operations, batch validation and ordered application.

mod apply;
mod ops;
mod validate;

pub use apply::{ApplyOptions, UpdateTransform};
pub use ops::{PatchOp, PatchValidation, PatchViolation, PatchedGraph};

pub(crate) use apply::apply;
pub(crate) use validate::validate;
