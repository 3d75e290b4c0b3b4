//! Attribute node model
//!
//! An [`AttributeNode`] is the immutable descriptor of one declared field. A
//! registered schema is an object-kind node whose children describe its
//! fields. References between schemas are kept as names (`element_ref`) and
//! resolved against a [`Registry`](crate::Registry) on every traversal, so
//! node trees never own each other and recursive schemas stay finite.

use crate::error::{DefinitionError, DefinitionResult};
use crate::hook::{CustomValidator, Predicate};
use crate::kind::Kind;
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;

/// Name used for synthetic element nodes of primitive arrays
pub const ELEMENT_NODE_NAME: &str = "item";

/// A compiled pattern that must match the whole value
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{})$", source))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// The pattern as declared
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Options attached to a declared field
#[derive(Debug, Clone, Default)]
pub struct NodeOptions {
    /// Key read from the host value; defaults to the field name
    pub accessor: Option<String>,
    /// Primitive kind name or registered schema name, for array and schema kinds
    pub element_ref: Option<String>,
    pub pattern: Option<Pattern>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub allowed: Option<Vec<Value>>,
    pub condition: Option<Predicate>,
    pub required: bool,
    pub private: bool,
    pub deprecated: bool,
    pub default: Option<Value>,
    pub description: Option<String>,
    pub validators: Vec<CustomValidator>,
}

/// Declared field descriptor
#[derive(Debug, Clone)]
pub struct AttributeNode {
    name: String,
    kind: Kind,
    options: NodeOptions,
    children: Vec<Arc<AttributeNode>>,
}

impl AttributeNode {
    /// Construct a node, checking its name and that every option applies to its kind
    pub fn construct(name: impl Into<String>, kind: Kind, options: NodeOptions) -> DefinitionResult<Self> {
        let name = name.into();
        ensure_identifier(&name)?;
        if let Some(accessor) = &options.accessor {
            ensure_identifier(accessor)?;
        }
        if let Kind::Custom(custom) = &kind {
            ensure_identifier(custom)?;
        }
        check_options(&name, &kind, &options)?;

        Ok(Self {
            name,
            kind,
            options,
            children: Vec::new(),
        })
    }

    /// Construct an empty object node, the shape of every registered schema
    pub fn object(name: impl Into<String>) -> DefinitionResult<Self> {
        Self::construct(name, Kind::Object, NodeOptions::default())
    }

    /// Element node standing in for a primitive array element
    pub fn synthetic(kind: Kind) -> Self {
        Self {
            name: ELEMENT_NODE_NAME.to_string(),
            kind,
            options: NodeOptions::default(),
            children: Vec::new(),
        }
    }

    /// Object node built from children that were already validated
    pub(crate) fn from_children(name: impl Into<String>, children: Vec<Arc<AttributeNode>>) -> Self {
        Self {
            name: name.into(),
            kind: Kind::Object,
            options: NodeOptions::default(),
            children,
        }
    }

    /// Append a child, rejecting kinds without children and duplicate names
    pub fn add_child(&mut self, child: AttributeNode) -> DefinitionResult<()> {
        if !self.kind.has_children() {
            return Err(DefinitionError::invalid_option(
                &self.name,
                self.kind.name(),
                "children",
                "only object fields declare children",
            ));
        }
        if self.child(&child.name).is_some() {
            return Err(DefinitionError::DuplicateField {
                parent: self.name.clone(),
                field: child.name,
            });
        }
        self.children.push(Arc::new(child));
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn options(&self) -> &NodeOptions {
        &self.options
    }

    /// Key read from the host value
    pub fn accessor(&self) -> &str {
        self.options.accessor.as_deref().unwrap_or(&self.name)
    }

    pub fn element_ref(&self) -> Option<&str> {
        self.options.element_ref.as_deref()
    }

    /// Declared children in declaration order
    pub fn children(&self) -> &[Arc<AttributeNode>] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&Arc<AttributeNode>> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn is_required(&self) -> bool {
        self.options.required
    }

    pub fn is_private(&self) -> bool {
        self.options.private
    }

    pub fn is_conditional(&self) -> bool {
        self.options.condition.is_some()
    }
}

/// Check that a name is a plain identifier
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn ensure_identifier(name: &str) -> DefinitionResult<()> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(DefinitionError::InvalidIdentifier(name.to_string()))
    }
}

fn check_options(name: &str, kind: &Kind, options: &NodeOptions) -> DefinitionResult<()> {
    let invalid = |option: &str, reason: &str| -> DefinitionResult<()> {
        Err(DefinitionError::invalid_option(name, kind.name(), option, reason))
    };

    match (&options.element_ref, kind.needs_element()) {
        (None, true) => {
            return Err(DefinitionError::MissingElementRef {
                field: name.to_string(),
                kind: kind.name().to_string(),
            })
        }
        (Some(_), false) => return invalid("element_ref", "only array and schema fields reference elements"),
        (Some(element), true) => {
            ensure_identifier(element)?;
            if *kind == Kind::SchemaRef && Kind::primitive(element).is_some() {
                return invalid("element_ref", "schema fields must reference a registered schema");
            }
        }
        (None, false) => {}
    }

    if options.pattern.is_some() && !kind.supports_pattern() {
        return invalid("pattern", "patterns apply to string fields");
    }

    if options.min.is_some() || options.max.is_some() {
        if !kind.supports_bounds() {
            return invalid("min/max", "bounds apply to string, numeric and array fields");
        }
        for bound in options.min.iter().chain(options.max.iter()) {
            if !bound.is_finite() {
                return invalid("min/max", "bounds must be finite");
            }
        }
        if let (Some(min), Some(max)) = (options.min, options.max) {
            if min > max {
                return invalid("min/max", "min is greater than max");
            }
        }
    }

    if let Some(allowed) = &options.allowed {
        if !kind.supports_allowed() {
            return invalid("allowed", "allowed values apply to primitive fields");
        }
        if allowed.is_empty() {
            return invalid("allowed", "allowed values cannot be empty");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn string_field(name: &str) -> AttributeNode {
        AttributeNode::construct(name, Kind::String, NodeOptions::default()).unwrap()
    }

    #[test]
    fn test_construct_defaults_accessor_to_name() {
        let node = string_field("name");
        assert_eq!(node.accessor(), "name");
        assert!(node.children().is_empty());

        let aliased = AttributeNode::construct(
            "full_name",
            Kind::String,
            NodeOptions {
                accessor: Some("name".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(aliased.accessor(), "name");
    }

    #[test]
    fn test_invalid_identifiers_are_rejected() {
        for name in ["", "1st", "first name", "a-b"] {
            let result = AttributeNode::construct(name, Kind::String, NodeOptions::default());
            assert!(matches!(result, Err(DefinitionError::InvalidIdentifier(_))), "{name}");
        }
    }

    #[test]
    fn test_inapplicable_options_are_rejected() {
        let pattern = NodeOptions {
            pattern: Some(Pattern::new("[a-z]+").unwrap()),
            ..Default::default()
        };
        assert!(matches!(
            AttributeNode::construct("flag", Kind::Boolean, pattern),
            Err(DefinitionError::InvalidOption { .. })
        ));

        let bounds = NodeOptions {
            min: Some(5.0),
            max: Some(1.0),
            ..Default::default()
        };
        assert!(AttributeNode::construct("age", Kind::Integer, bounds).is_err());

        let allowed = NodeOptions {
            allowed: Some(vec![json!("a")]),
            ..Default::default()
        };
        assert!(AttributeNode::construct("meta", Kind::Object, allowed).is_err());
    }

    #[test]
    fn test_element_references() {
        let missing = AttributeNode::construct("friends", Kind::Array, NodeOptions::default());
        assert!(matches!(missing, Err(DefinitionError::MissingElementRef { .. })));

        let primitive_schema = NodeOptions {
            element_ref: Some("string".into()),
            ..Default::default()
        };
        assert!(AttributeNode::construct("leader", Kind::SchemaRef, primitive_schema).is_err());

        let stray = NodeOptions {
            element_ref: Some("hero".into()),
            ..Default::default()
        };
        assert!(AttributeNode::construct("name", Kind::String, stray).is_err());
    }

    #[test]
    fn test_add_child_rejects_duplicates() {
        let mut hero = AttributeNode::object("hero").unwrap();
        hero.add_child(string_field("name")).unwrap();
        let error = hero.add_child(string_field("name")).unwrap_err();
        assert_eq!(
            error,
            DefinitionError::DuplicateField {
                parent: "hero".into(),
                field: "name".into()
            }
        );

        let mut leaf = string_field("name");
        assert!(leaf.add_child(string_field("inner")).is_err());
    }

    #[test]
    fn test_pattern_matches_whole_value() {
        let pattern = Pattern::new("a|ab").unwrap();
        assert!(pattern.matches("ab"));
        assert!(!pattern.matches("abc"));
        assert_eq!(pattern.as_str(), "a|ab");
    }
}
