use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// A single grammar violation with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {}, column {}",
            self.message, self.line, self.column
        )
    }
}

/// Every syntax error collected by one parse call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorList(pub Vec<SyntaxError>);

impl fmt::Display for SyntaxErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for err in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("Unexpected character `{found}` at line {line}, column {column}")]
    Lex {
        line: usize,
        column: usize,
        found: char,
    },

    #[error("Unterminated string literal at line {line}, column {column}")]
    UnterminatedString { line: usize, column: usize },

    #[error("Parse errors: {0}")]
    Syntax(SyntaxErrorList),

    #[error("{kind} type `{name}` is already registered")]
    AlreadyRegistered { kind: &'static str, name: String },

    #[error("Unknown block type `{name}`. Available types: {available}")]
    UnknownBlockType { name: String, available: String },

    #[error("Unknown edge type `{name}`. Available types: {available}")]
    UnknownEdgeType { name: String, available: String },

    #[error("Unknown custom property schema `{schema_id}` for block `{block_id}`")]
    UnknownCustomPropertySchema { schema_id: String, block_id: String },

    #[error("Property `{property}` of block `{block_id}` (type `{block_type}`): {message}")]
    PropertyValidation {
        block_id: String,
        block_type: String,
        property: String,
        message: String,
    },

    #[error("Custom property `{schema_id}` of block `{block_id}`: {message}")]
    CustomPropertyValidation {
        schema_id: String,
        block_id: String,
        message: String,
    },

    #[error("Property `{property}` of edge `{src} -> {target}` (type `{edge_type}`): {message}")]
    EdgePropertyValidation {
        src: String,
        target: String,
        edge_type: String,
        property: String,
        message: String,
    },

    #[error("Validation failed for block `{block_id}` of type `{block_type}`")]
    ValidationFailed {
        block_id: String,
        block_type: String,
    },

    #[error("Node `{node_id}` references non-existent parent `{parent_id}`")]
    UnknownParent { node_id: String, parent_id: String },

    #[error(
        "Node `{node_id}` has parent `{parent_id}` which is not a group type (type `{parent_type}`)"
    )]
    InvalidParent {
        node_id: String,
        parent_id: String,
        parent_type: String,
    },

    #[error("Edge `{src} -> {target}` references unknown node `{node}`")]
    UnknownEdgeNode {
        src: String,
        target: String,
        node: String,
    },

    #[error("Node `{id}` not found for {operation}")]
    PatchTargetMissing { id: String, operation: &'static str },

    #[error("Node `{id}` already exists")]
    NodeAlreadyExists { id: String },

    #[error("Size must be positive (got width: {width}, height: {height})")]
    NonPositiveSize { width: f64, height: f64 },
}

impl Error {
    pub(crate) fn syntax(errors: Vec<SyntaxError>) -> Self {
        Self::Syntax(SyntaxErrorList(errors))
    }
}
