#![forbid(unsafe_code)]

//! Canvas DSL compiler.
//!
//! Compiles a small textual language describing a labeled diagram (nodes,
//! edges, nested zones, typed custom properties) into a positioned graph,
//! and applies incremental mutations written in a second, smaller patch
//! language.
//!
//! Design goals:
//! - every parse call reports all syntax errors at once, not just the first
//! - deterministic output: the same document lays out identically every run
//! - registries are plain owned state on the engine, never process globals

pub mod ast;
pub mod error;
pub mod layout;
pub mod model;
pub mod patch;
pub mod registry;
pub mod schema;

mod builder;
mod parser;

pub use ast::{AstEdge, AstNode, CanvasAst, CustomPropertyValue, CustomValue};
pub use error::{Error, Result, SyntaxError, SyntaxErrorList};
pub use layout::LayoutOptions;
pub use model::{
    CanvasOutput, Direction, EdgeShape, EdgeStyle, Extent, GraphEdge, GraphNode, OutputMetadata,
    Position, PropertyMap, Size,
};
pub use patch::{
    ApplyOptions, PatchOp, PatchValidation, PatchViolation, PatchedGraph, UpdateTransform,
};
pub use registry::{BlockTypeRegistry, EdgeTypeRegistry};
pub use schema::{
    BlockTypeDefinition, ConstraintKind, CustomPropertyKind, CustomPropertySchema,
    EdgeTypeDefinition, PropertyConstraint, PropertyValidator, SchemaValidation,
};

use builder::GraphBuilder;
use tracing::debug;

/// Name reported in output metadata for the layout implementation.
pub const LAYOUT_ENGINE: &str = "lagoon";

#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    /// Extent injected into child node data when the DSL does not set one.
    pub default_extent: Option<Extent>,
}

/// Owner of the type registries and front door for every pipeline:
/// document parsing, graph building, layout, and the patch model.
///
/// Registries are configured once and treated as read-only during parsing;
/// everything else is a pure value-to-value transform, so one engine can
/// serve any number of independent documents.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    blocks: BlockTypeRegistry,
    edges: EdgeTypeRegistry,
    options: EngineOptions,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn register_block_type(&mut self, definition: BlockTypeDefinition) -> Result<()> {
        self.blocks.register(definition)
    }

    pub fn register_edge_type(&mut self, definition: EdgeTypeDefinition) -> Result<()> {
        self.edges.register(definition)
    }

    pub fn block_type(&self, name: &str) -> Option<&BlockTypeDefinition> {
        self.blocks.get(name)
    }

    pub fn edge_type(&self, name: &str) -> Option<&EdgeTypeDefinition> {
        self.edges.get(name)
    }

    pub fn has_block_type(&self, name: &str) -> bool {
        self.blocks.has(name)
    }

    pub fn has_edge_type(&self, name: &str) -> bool {
        self.edges.has(name)
    }

    pub fn list_block_types(&self) -> Vec<String> {
        self.blocks.list()
    }

    pub fn list_edge_types(&self) -> Vec<String> {
        self.edges.list()
    }

    pub fn block_registry(&self) -> &BlockTypeRegistry {
        &self.blocks
    }

    pub fn edge_registry(&self) -> &EdgeTypeRegistry {
        &self.edges
    }

    /// Parses a document into its semantic tree without building or layout.
    ///
    /// Lex errors short-circuit; grammar violations are collected and
    /// returned as one aggregated error, never a partial tree.
    pub fn parse(&self, text: &str) -> Result<CanvasAst> {
        let tokens = parser::lex::lex(text)?;
        let group_types = self.blocks.group_types();
        let (cst, errors) = parser::document::parse(&tokens, &group_types);
        if !errors.is_empty() {
            return Err(Error::syntax(errors));
        }
        Ok(parser::visit::document_to_ast(&cst))
    }

    /// Full pipeline: parse, build the graph against the registries, assign
    /// positions.
    pub fn parse_and_layout(&self, text: &str) -> Result<CanvasOutput> {
        let ast = self.parse(text)?;
        let builder = GraphBuilder::new(&self.blocks, &self.edges, &self.options);
        let (nodes, edges) = builder.build(&ast)?;
        debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            direction = %ast.direction,
            "built graph"
        );

        let laid_out = layout::layout(
            &nodes,
            &edges,
            &self.blocks,
            &LayoutOptions::new(ast.direction),
        );

        Ok(CanvasOutput {
            nodes: laid_out,
            edges,
            metadata: OutputMetadata {
                direction: ast.direction,
                layout_engine: LAYOUT_ENGINE.to_string(),
            },
        })
    }

    /// Parses patch text into the typed operation list.
    pub fn parse_patch(&self, text: &str) -> Result<Vec<PatchOp>> {
        let tokens = parser::lex::lex(text)?;
        let (cst, mut errors) = parser::patch::parse(&tokens);
        let (ops, visit_errors) = parser::patch_visit::patch_to_ops(&cst);
        errors.extend(visit_errors);
        if !errors.is_empty() {
            return Err(Error::syntax(errors));
        }
        Ok(ops)
    }

    /// Checks a batch against current node ids (plus ids pending addition in
    /// the same batch). Non-throwing: returns every violation.
    pub fn validate_patch(
        &self,
        operations: &[PatchOp],
        current_node_ids: &[String],
    ) -> PatchValidation {
        patch::validate(operations, current_node_ids, &self.blocks)
    }

    /// Applies a batch strictly in order over caller-owned collections. The
    /// first violated precondition aborts; validate first.
    pub fn apply_patch(
        &self,
        operations: &[PatchOp],
        nodes: Vec<GraphNode>,
        edges: Vec<GraphEdge>,
        options: &ApplyOptions,
    ) -> Result<PatchedGraph> {
        patch::apply(self, operations, nodes, edges, options)
    }

    /// Builds a single node through the same construction path as document
    /// building (defaults merge, schema validation, inline custom property
    /// schemas, extent policy). Used by patch `add`.
    pub fn build_node(&self, ast_node: &AstNode) -> Result<GraphNode> {
        let builder = GraphBuilder::new(&self.blocks, &self.edges, &self.options);
        let inline = builder::extract_inline_schemas(std::slice::from_ref(ast_node));
        let schema_map: indexmap::IndexMap<String, CustomPropertySchema> = inline
            .into_iter()
            .map(|schema| (schema.id.clone(), schema))
            .collect();
        builder.build_node(ast_node, &schema_map)
    }
}

#[cfg(test)]
mod tests;
