//! Output-side data model: positioned nodes, edges and the result envelope.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Property bags keep declaration order (`serde_json` is built with
/// `preserve_order`), so merged data round-trips through JSON unchanged.
pub type PropertyMap = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    LR,
    RL,
    TB,
    BT,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::LR => "LR",
            Direction::RL => "RL",
            Direction::TB => "TB",
            Direction::BT => "BT",
        }
    }

    pub(crate) fn rankdir(&self) -> lagoon::RankDir {
        match self {
            Direction::LR => lagoon::RankDir::LR,
            Direction::RL => lagoon::RankDir::RL,
            Direction::TB => lagoon::RankDir::TB,
            Direction::BT => lagoon::RankDir::BT,
        }
    }
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "LR" => Ok(Direction::LR),
            "RL" => Ok(Direction::RL),
            "TB" => Ok(Direction::TB),
            "BT" => Ok(Direction::BT),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Movement constraint injected into child node data when the engine is
/// configured with a default extent policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extent {
    /// Constrain to the parent container's bounds.
    Parent,
    /// Constrain to an explicit `[[x1, y1], [x2, y2]]` range.
    Bounds([[f64; 2]; 2]),
}

impl Extent {
    pub(crate) fn to_value(self) -> serde_json::Value {
        match self {
            Extent::Parent => serde_json::Value::String("parent".into()),
            Extent::Bounds(bounds) => serde_json::json!(bounds),
        }
    }
}

impl Serialize for Extent {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Extent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match &value {
            serde_json::Value::String(s) if s == "parent" => Ok(Extent::Parent),
            serde_json::Value::Array(_) => {
                let bounds: [[f64; 2]; 2] =
                    serde_json::from_value(value).map_err(D::Error::custom)?;
                Ok(Extent::Bounds(bounds))
            }
            _ => Err(D::Error::custom(
                "expected \"parent\" or [[x1, y1], [x2, y2]]",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: String,
    pub position: Position,
    pub size: Size,
    pub data: PropertyMap,
    #[serde(default, rename = "parentId", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeShape {
    #[default]
    Default,
    Straight,
    Step,
    Smoothstep,
    Simplebezier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeStyle {
    pub stroke: String,
    #[serde(rename = "strokeWidth")]
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, rename = "startLabel", skip_serializing_if = "Option::is_none")]
    pub start_label: Option<String>,
    #[serde(default, rename = "endLabel", skip_serializing_if = "Option::is_none")]
    pub end_label: Option<String>,
    pub shape: EdgeShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<EdgeStyle>,
    /// Marker descriptors are opaque to the core: either a marker name or a
    /// renderer-specific config object.
    #[serde(
        default,
        rename = "markerStart",
        skip_serializing_if = "Option::is_none"
    )]
    pub marker_start: Option<serde_json::Value>,
    #[serde(default, rename = "markerEnd", skip_serializing_if = "Option::is_none")]
    pub marker_end: Option<serde_json::Value>,
    #[serde(
        default,
        rename = "sourceHandle",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_handle: Option<String>,
    #[serde(
        default,
        rename = "targetHandle",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_handle: Option<String>,
    pub data: PropertyMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputMetadata {
    pub direction: Direction,
    #[serde(rename = "layoutEngine")]
    pub layout_engine: String,
}

/// The compiled document: positioned nodes, resolved edges and metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasOutput {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub metadata: OutputMetadata,
}
