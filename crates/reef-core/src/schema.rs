//! Type definitions registered with the engine: block types, edge types and
//! custom property schemas.

use crate::model::{EdgeShape, EdgeStyle, PropertyMap, Size};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomPropertyKind {
    #[default]
    Text,
    Select,
    Multiselect,
    Number,
    Boolean,
    Date,
    Color,
    Url,
}

impl CustomPropertyKind {
    /// Lenient parse: unknown names fall back to `Text`.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "select" => Self::Select,
            "multiselect" => Self::Multiselect,
            "number" | "num" => Self::Number,
            "boolean" | "bool" => Self::Boolean,
            "date" => Self::Date,
            "color" => Self::Color,
            "url" => Self::Url,
            _ => Self::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl SchemaValidation {
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none() && self.pattern.is_none()
    }
}

/// Schema for a `$`-prefixed custom property, declared with `@schema` or
/// synthesized from an inline type-function call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomPropertySchema {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CustomPropertyKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<SchemaValidation>,
    #[serde(
        default,
        rename = "defaultValue",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintKind {
    Enum,
    Number,
    String,
    Boolean,
}

/// One entry of a block type's `propertySchema`: the constraint a declared
/// property value must satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyConstraint {
    #[serde(rename = "type")]
    pub kind: ConstraintKind,
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl PropertyConstraint {
    pub fn of(kind: ConstraintKind) -> Self {
        Self {
            kind,
            allowed: None,
            min: None,
            max: None,
            pattern: None,
        }
    }

    pub fn enumeration(values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            allowed: Some(values.into_iter().map(Into::into).collect()),
            ..Self::of(ConstraintKind::Enum)
        }
    }

    pub fn number_range(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            min,
            max,
            ..Self::of(ConstraintKind::Number)
        }
    }

    pub fn string_pattern(pattern: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
            ..Self::of(ConstraintKind::String)
        }
    }
}

/// Free-form predicate run against the merged property map after schema
/// validation passes.
pub type PropertyValidator = Arc<dyn Fn(&PropertyMap) -> bool + Send + Sync>;

#[derive(Clone, Serialize, Deserialize)]
pub struct BlockTypeDefinition {
    pub name: String,
    #[serde(default, rename = "defaultProperties")]
    pub default_properties: PropertyMap,
    #[serde(rename = "defaultSize")]
    pub default_size: Size,
    #[serde(default, rename = "isGroup")]
    pub is_group: bool,
    #[serde(
        default,
        rename = "propertySchema",
        skip_serializing_if = "Option::is_none"
    )]
    pub property_schema: Option<IndexMap<String, PropertyConstraint>>,
    #[serde(skip)]
    pub validate: Option<PropertyValidator>,
}

impl BlockTypeDefinition {
    pub fn new(name: impl Into<String>, default_size: Size) -> Self {
        Self {
            name: name.into(),
            default_properties: PropertyMap::new(),
            default_size,
            is_group: false,
            property_schema: None,
            validate: None,
        }
    }

    pub fn group(mut self) -> Self {
        self.is_group = true;
        self
    }

    pub fn with_default_properties(mut self, properties: PropertyMap) -> Self {
        self.default_properties = properties;
        self
    }

    pub fn with_property_schema<K, I>(mut self, schema: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, PropertyConstraint)>,
    {
        self.property_schema = Some(
            schema
                .into_iter()
                .map(|(name, constraint)| (name.into(), constraint))
                .collect(),
        );
        self
    }

    pub fn with_validator(
        mut self,
        validate: impl Fn(&PropertyMap) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.validate = Some(Arc::new(validate));
        self
    }
}

impl fmt::Debug for BlockTypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockTypeDefinition")
            .field("name", &self.name)
            .field("default_properties", &self.default_properties)
            .field("default_size", &self.default_size)
            .field("is_group", &self.is_group)
            .field("property_schema", &self.property_schema)
            .field("validate", &self.validate.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeTypeDefinition {
    pub name: String,
    #[serde(default, rename = "defaultShape")]
    pub default_shape: EdgeShape,
    #[serde(
        default,
        rename = "defaultStyle",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_style: Option<EdgeStyle>,
    /// May embed `markerStart`/`markerEnd` defaults; the builder pulls those
    /// out into the edge's dedicated marker fields.
    #[serde(default, rename = "defaultData")]
    pub default_data: PropertyMap,
    #[serde(
        default,
        rename = "edgePropertySchema",
        skip_serializing_if = "Option::is_none"
    )]
    pub edge_property_schema: Option<IndexMap<String, PropertyConstraint>>,
}

impl EdgeTypeDefinition {
    pub fn new(name: impl Into<String>, default_shape: EdgeShape) -> Self {
        Self {
            name: name.into(),
            default_shape,
            default_style: None,
            default_data: PropertyMap::new(),
            edge_property_schema: None,
        }
    }

    pub fn with_style(mut self, style: EdgeStyle) -> Self {
        self.default_style = Some(style);
        self
    }

    pub fn with_default_data(mut self, data: PropertyMap) -> Self {
        self.default_data = data;
        self
    }

    pub fn with_edge_property_schema<K, I>(mut self, schema: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, PropertyConstraint)>,
    {
        self.edge_property_schema = Some(
            schema
                .into_iter()
                .map(|(name, constraint)| (name.into(), constraint))
                .collect(),
        );
        self
    }
}
