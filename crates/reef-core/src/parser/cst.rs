//! Typed parse trees for both grammars.
//!
//! One node per grammar rule, holding the matched lexemes. Consumed only by
//! the visitors in this module's siblings; application code never sees these
//! types.

use crate::model::Direction;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DocumentCst {
    pub direction: Direction,
    pub items: Vec<ItemCst>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ItemCst {
    Schema(SchemaCst),
    Block(BlockCst),
    Edge(EdgeCst),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SchemaCst {
    pub id: String,
    pub props: PropsCst,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BlockCst {
    pub block_type: String,
    pub id: String,
    pub label: Option<String>,
    pub props: Option<PropsCst>,
    /// Non-empty only for group-typed blocks with an `@end`-terminated body.
    pub children: Vec<ItemCst>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EdgeCst {
    pub source: String,
    pub target: String,
    pub annotation: Option<EdgeAnnotation>,
    pub props: Option<PropsCst>,
}

/// The `: ...` suffix of an edge: a quoted label or an edge-type name.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EdgeAnnotation {
    Label(String),
    EdgeType(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct PropsCst {
    pub entries: Vec<EntryCst>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EntryCst {
    Regular { key: String, value: ValueCst },
    Custom { key: String, value: CustomValueCst },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ValueCst {
    Str(String),
    Num(f64),
    Bool(bool),
    Ident(String),
    Array(Vec<ValueCst>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CustomValueCst {
    Plain(ValueCst),
    TypeFunction {
        type_name: String,
        value: ValueCst,
        options: Vec<(String, ValueCst)>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PatchCst {
    pub commands: Vec<CommandCst>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CommandCst {
    Update {
        target: String,
        props: Option<PropsCst>,
    },
    Delete {
        target: String,
    },
    Add {
        node_type: String,
        id: String,
        label: String,
        props: Option<PropsCst>,
    },
    Connect {
        source: String,
        target: String,
        label: Option<String>,
        props: Option<PropsCst>,
    },
    Disconnect {
        source: String,
        target: Option<String>,
    },
    Move {
        target: String,
        props: PropsCst,
        line: usize,
        column: usize,
    },
    Resize {
        target: String,
        props: PropsCst,
        line: usize,
        column: usize,
    },
}
