//! Attribute kinds

use std::fmt;

/// The kind of a declared attribute
///
/// Primitive kinds and `Object`/`Array` are dispatched to the built-in kind
/// bundles. `SchemaRef` points at a registered schema and behaves like an
/// object. `Custom` names a bundle registered at start-up.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Boolean,
    Number,
    Integer,
    Float,
    Array,
    Object,
    SchemaRef,
    Custom(String),
}

impl Kind {
    /// Look up a primitive kind by name
    pub fn primitive(name: &str) -> Option<Kind> {
        match name {
            "string" => Some(Kind::String),
            "boolean" => Some(Kind::Boolean),
            "number" => Some(Kind::Number),
            "integer" => Some(Kind::Integer),
            "float" => Some(Kind::Float),
            _ => None,
        }
    }

    /// Kind name as used in messages and declarations
    pub fn name(&self) -> &str {
        match self {
            Kind::String => "string",
            Kind::Boolean => "boolean",
            Kind::Number => "number",
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::Array => "array",
            Kind::Object => "object",
            Kind::SchemaRef => "schema",
            Kind::Custom(name) => name,
        }
    }

    /// Name of the kind bundle the engines dispatch to
    pub fn bundle_name(&self) -> &str {
        match self {
            Kind::SchemaRef => "object",
            other => other.name(),
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Kind::String | Kind::Boolean | Kind::Number | Kind::Integer | Kind::Float
        )
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Kind::Number | Kind::Integer | Kind::Float)
    }

    /// Whether nodes of this kind carry declared children
    pub fn has_children(&self) -> bool {
        matches!(self, Kind::Object)
    }

    /// Whether nodes of this kind point at an element through `element_ref`
    pub fn needs_element(&self) -> bool {
        matches!(self, Kind::Array | Kind::SchemaRef)
    }

    pub fn supports_pattern(&self) -> bool {
        matches!(self, Kind::String | Kind::Custom(_))
    }

    pub fn supports_bounds(&self) -> bool {
        self.is_numeric() || matches!(self, Kind::String | Kind::Array | Kind::Custom(_))
    }

    pub fn supports_allowed(&self) -> bool {
        self.is_primitive() || matches!(self, Kind::Custom(_))
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
