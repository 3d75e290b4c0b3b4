//! Declarative field and schema builders

use crate::error::{DefinitionError, DefinitionResult};
use crate::hook::{CustomValidator, Predicate};
use crate::kind::Kind;
use crate::node::{AttributeNode, NodeOptions, Pattern};
use serde_json::Value;

/// Builder for a single field declaration
///
/// Errors are collected until [`Field::build`], so declarations read as one
/// chained expression.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    kind: Kind,
    options: NodeOptions,
    pattern: Option<String>,
    children: Vec<Field>,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        Self {
            name: name.into(),
            kind,
            options: NodeOptions::default(),
            pattern: None,
            children: Vec::new(),
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, Kind::String)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, Kind::Boolean)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, Kind::Number)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, Kind::Integer)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, Kind::Float)
    }

    /// Array whose elements are a primitive kind or a registered schema
    pub fn array(name: impl Into<String>, element: impl Into<String>) -> Self {
        let mut field = Self::new(name, Kind::Array);
        field.options.element_ref = Some(element.into());
        field
    }

    /// Inline nested object; declare its fields with [`Field::child`]
    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, Kind::Object)
    }

    /// Field holding a registered schema
    pub fn schema_ref(name: impl Into<String>, schema: impl Into<String>) -> Self {
        let mut field = Self::new(name, Kind::SchemaRef);
        field.options.element_ref = Some(schema.into());
        field
    }

    /// Field of a kind provided by a registered bundle
    pub fn custom(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::new(name, Kind::Custom(kind.into()))
    }

    /// Read the value from a differently named member of the host
    pub fn accessor(mut self, accessor: impl Into<String>) -> Self {
        self.options.accessor = Some(accessor.into());
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.options.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.options.max = Some(max);
        self
    }

    pub fn allowed<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.options.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Only process the field when the predicate holds for its host
    pub fn when<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.options.condition = Some(Predicate::predicate(predicate));
        self
    }

    /// Only process the field when the named predicate holds for its host
    pub fn when_named(mut self, name: impl Into<String>) -> Self {
        self.options.condition = Some(Predicate::named(name));
        self
    }

    pub fn required(mut self) -> Self {
        self.options.required = true;
        self
    }

    /// Hide the field from serialized output
    pub fn private(mut self) -> Self {
        self.options.private = true;
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.options.deprecated = true;
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.options.default = Some(value.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.options.description = Some(description.into());
        self
    }

    pub fn validate_with<V>(mut self, validator: V) -> Self
    where
        V: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.options.validators.push(CustomValidator::validator(validator));
        self
    }

    pub fn validate_named(mut self, name: impl Into<String>) -> Self {
        self.options.validators.push(CustomValidator::named(name));
        self
    }

    /// Declare a nested field of an inline object
    pub fn child(mut self, field: Field) -> Self {
        self.children.push(field);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn build(self) -> DefinitionResult<AttributeNode> {
        let Field {
            name,
            kind,
            mut options,
            pattern,
            children,
        } = self;

        if let Some(source) = pattern {
            let compiled = Pattern::new(&source).map_err(|e| {
                DefinitionError::invalid_option(&name, kind.name(), "pattern", e.to_string())
            })?;
            options.pattern = Some(compiled);
        }

        let mut node = AttributeNode::construct(name, kind, options)?;
        for child in children {
            node.add_child(child.build()?)?;
        }
        Ok(node)
    }
}

/// Builder for a named schema: an object node with ordered fields
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    description: Option<String>,
    fields: Vec<Field>,
}

impl SchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> DefinitionResult<AttributeNode> {
        let options = NodeOptions {
            description: self.description,
            ..Default::default()
        };
        let mut node = AttributeNode::construct(self.name, Kind::Object, options)?;
        for field in self.fields {
            node.add_child(field.build()?)?;
        }
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_builder_keeps_declaration_order() {
        let hero = SchemaBuilder::new("hero")
            .description("A hero")
            .field(Field::string("name").min(4.0).required())
            .field(Field::array("friends", "hero"))
            .field(Field::integer("age").default(30))
            .build()
            .unwrap();

        let names: Vec<&str> = hero.children().iter().map(|c| c.name()).collect();
        assert_eq!(names, ["name", "friends", "age"]);
        assert_eq!(hero.options().description.as_deref(), Some("A hero"));
        assert!(hero.child("name").unwrap().is_required());
        assert_eq!(hero.child("friends").unwrap().element_ref(), Some("hero"));
        assert_eq!(hero.child("age").unwrap().options().default, Some(json!(30)));
    }

    #[test]
    fn test_nested_object_fields() {
        let node = Field::object("address")
            .child(Field::string("street"))
            .child(Field::string("city").allowed(["Oslo", "Bergen"]))
            .build()
            .unwrap();
        assert_eq!(node.children().len(), 2);
        assert_eq!(
            node.child("city").unwrap().options().allowed,
            Some(vec![json!("Oslo"), json!("Bergen")])
        );
    }

    #[test]
    fn test_builder_surfaces_definition_errors() {
        let duplicate = SchemaBuilder::new("hero")
            .field(Field::string("name"))
            .field(Field::string("name"))
            .build();
        assert!(matches!(duplicate, Err(DefinitionError::DuplicateField { .. })));

        let bad_pattern = Field::string("code").pattern("(unclosed").build();
        assert!(matches!(bad_pattern, Err(DefinitionError::InvalidOption { .. })));

        let child_on_leaf = Field::string("name").child(Field::string("inner")).build();
        assert!(child_on_leaf.is_err());
    }
}
