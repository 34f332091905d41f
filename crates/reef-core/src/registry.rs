//! Name-keyed stores for block and edge type definitions.
//!
//! Registries are configured once on an engine and treated as read-only by
//! every parse call; they are the only state shared across calls.

use crate::error::{Error, Result};
use crate::schema::{BlockTypeDefinition, EdgeTypeDefinition};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;

#[derive(Debug, Clone, Default)]
pub struct BlockTypeRegistry {
    types: IndexMap<String, BlockTypeDefinition>,
}

impl BlockTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, definition: BlockTypeDefinition) -> Result<()> {
        if self.types.contains_key(&definition.name) {
            return Err(Error::AlreadyRegistered {
                kind: "Block",
                name: definition.name,
            });
        }
        self.types.insert(definition.name.clone(), definition);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&BlockTypeDefinition> {
        self.types.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered type names in registration order.
    pub fn list(&self) -> Vec<String> {
        self.types.keys().cloned().collect()
    }

    /// Names of types with `is_group` set; the document parser needs these to
    /// decide which blocks open a nested body.
    pub fn group_types(&self) -> FxHashSet<String> {
        self.types
            .values()
            .filter(|def| def.is_group)
            .map(|def| def.name.clone())
            .collect()
    }

    pub fn clear(&mut self) {
        self.types.clear();
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct EdgeTypeRegistry {
    types: IndexMap<String, EdgeTypeDefinition>,
}

impl EdgeTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, definition: EdgeTypeDefinition) -> Result<()> {
        if self.types.contains_key(&definition.name) {
            return Err(Error::AlreadyRegistered {
                kind: "Edge",
                name: definition.name,
            });
        }
        self.types.insert(definition.name.clone(), definition);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&EdgeTypeDefinition> {
        self.types.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn list(&self) -> Vec<String> {
        self.types.keys().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.types.clear();
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
