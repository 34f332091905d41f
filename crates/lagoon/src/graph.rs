//! Directed multigraph container used by the layout passes.
//!
//! Node ids are strings and iteration follows insertion order, so repeated
//! layouts of the same input visit nodes and edges identically.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone)]
pub struct EdgeKey {
    pub v: String,
    pub w: String,
    pub name: Option<String>,
}

impl EdgeKey {
    pub fn new(
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<impl Into<String>>,
    ) -> Self {
        Self {
            v: v.into(),
            w: w.into(),
            name: name.map(Into::into),
        }
    }
}

impl PartialEq for EdgeKey {
    fn eq(&self, other: &Self) -> bool {
        self.v == other.v && self.w == other.w && self.name == other.name
    }
}

impl Eq for EdgeKey {}

impl Hash for EdgeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.v.hash(state);
        self.w.hash(state);
        self.name.hash(state);
    }
}

#[derive(Debug, Clone)]
struct EdgeEntry<E> {
    key: EdgeKey,
    label: E,
}

#[derive(Debug, Clone)]
pub struct Graph<N, E, G> {
    graph_label: G,
    nodes: IndexMap<String, N>,
    edges: Vec<EdgeEntry<E>>,
    edge_index: FxHashMap<EdgeKey, usize>,
}

impl<N, E, G> Graph<N, E, G>
where
    G: Default,
{
    pub fn new() -> Self {
        Self::with_graph(G::default())
    }
}

impl<N, E, G> Default for Graph<N, E, G>
where
    G: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E, G> Graph<N, E, G> {
    pub fn with_graph(label: G) -> Self {
        Self {
            graph_label: label,
            nodes: IndexMap::new(),
            edges: Vec::new(),
            edge_index: FxHashMap::default(),
        }
    }

    pub fn graph(&self) -> &G {
        &self.graph_label
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph_label
    }

    pub fn set_graph(&mut self, label: G) -> &mut Self {
        self.graph_label = label;
        self
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> &mut Self {
        self.nodes.insert(id.into(), label);
        self
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        self.nodes.get_mut(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeKey> {
        self.edges.iter().map(|e| &e.key)
    }

    pub fn edge_keys(&self) -> Vec<EdgeKey> {
        self.edges.iter().map(|e| e.key.clone()).collect()
    }

    /// Inserts or replaces the unnamed edge `v -> w`.
    pub fn set_edge_with_label(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        label: E,
    ) -> &mut Self {
        self.set_edge_named(v, w, None::<String>, label)
    }

    /// Inserts or replaces a named edge. Distinct names allow parallel edges
    /// between the same endpoint pair.
    pub fn set_edge_named(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<impl Into<String>>,
        label: E,
    ) -> &mut Self {
        let key = EdgeKey::new(v, w, name);
        if let Some(&idx) = self.edge_index.get(&key) {
            self.edges[idx].label = label;
            return self;
        }
        let idx = self.edges.len();
        self.edge_index.insert(key.clone(), idx);
        self.edges.push(EdgeEntry { key, label });
        self
    }

    pub fn has_edge(&self, v: &str, w: &str, name: Option<&str>) -> bool {
        let key = EdgeKey::new(v, w, name);
        self.edge_index.contains_key(&key)
    }

    pub fn edge(&self, v: &str, w: &str, name: Option<&str>) -> Option<&E> {
        let key = EdgeKey::new(v, w, name);
        self.edge_index.get(&key).map(|&idx| &self.edges[idx].label)
    }

    pub fn edge_mut(&mut self, v: &str, w: &str, name: Option<&str>) -> Option<&mut E> {
        let key = EdgeKey::new(v, w, name);
        self.edge_index
            .get(&key)
            .copied()
            .map(|idx| &mut self.edges[idx].label)
    }

    pub fn edge_by_key(&self, key: &EdgeKey) -> Option<&E> {
        self.edge_index.get(key).map(|&idx| &self.edges[idx].label)
    }

    pub fn edge_mut_by_key(&mut self, key: &EdgeKey) -> Option<&mut E> {
        self.edge_index
            .get(key)
            .copied()
            .map(|idx| &mut self.edges[idx].label)
    }

    pub fn remove_edge_key(&mut self, key: &EdgeKey) -> Option<E> {
        let idx = self.edge_index.remove(key)?;
        let entry = self.edges.remove(idx);
        // Indices after the removed slot shift down by one.
        for (_, slot) in self.edge_index.iter_mut() {
            if *slot > idx {
                *slot -= 1;
            }
        }
        Some(entry.label)
    }

    /// Outgoing edges of `v`, optionally restricted to those ending at `w`.
    pub fn out_edges(&self, v: &str, w: Option<&str>) -> Vec<EdgeKey> {
        self.edges
            .iter()
            .filter(|e| e.key.v == v && w.is_none_or(|w| e.key.w == w))
            .map(|e| e.key.clone())
            .collect()
    }

    /// Incoming edges of `v`, optionally restricted to those starting at `u`.
    pub fn in_edges(&self, v: &str, u: Option<&str>) -> Vec<EdgeKey> {
        self.edges
            .iter()
            .filter(|e| e.key.w == v && u.is_none_or(|u| e.key.v == u))
            .map(|e| e.key.clone())
            .collect()
    }

    /// Distinct successor ids of `v`, in first-edge order.
    pub fn successors(&self, v: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for e in &self.edges {
            if e.key.v == v && !out.iter().any(|w| w == &e.key.w) {
                out.push(e.key.w.clone());
            }
        }
        out
    }

    /// Distinct predecessor ids of `v`, in first-edge order.
    pub fn predecessors(&self, v: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for e in &self.edges {
            if e.key.w == v && !out.iter().any(|u| u == &e.key.v) {
                out.push(e.key.v.clone());
            }
        }
        out
    }

    /// Nodes with no incoming edges (self-loops excluded), in insertion order.
    pub fn sources(&self) -> Vec<String> {
        self.nodes
            .keys()
            .filter(|id| {
                !self
                    .edges
                    .iter()
                    .any(|e| e.key.w == **id && e.key.v != e.key.w)
            })
            .cloned()
            .collect()
    }

    /// Nodes with no outgoing edges (self-loops excluded), in insertion order.
    pub fn sinks(&self) -> Vec<String> {
        self.nodes
            .keys()
            .filter(|id| {
                !self
                    .edges
                    .iter()
                    .any(|e| e.key.v == **id && e.key.v != e.key.w)
            })
            .cloned()
            .collect()
    }
}
