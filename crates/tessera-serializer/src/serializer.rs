//! Recursive serialization engine
//!
//! Output always has the full declared shape of the schema: every visible
//! field appears, in declaration order, whether or not the input supplied it.
//! No validation happens here. Values the kind cannot project degrade to
//! absent handling.

use serde::Serialize;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::sync::Arc;
use tessera_core::{host_value, AttributeNode, DefinitionResult, Kind, KindBundle, Registry};

/// Serializer bound to a registry
#[derive(Debug, Clone, Copy)]
pub struct Serializer<'r> {
    registry: &'r Registry,
}

impl<'r> Serializer<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Project `input` into the output shape of `node`
    ///
    /// A private root, or one whose condition fails against `input`, yields
    /// `null`. `Err` only signals a schema reference that is not registered
    /// when the traversal reaches it.
    pub fn serialize(&self, node: &AttributeNode, input: &Value) -> DefinitionResult<Value> {
        if !self.visible(node, input) {
            return Ok(Value::Null);
        }
        let candidate = self.present(input).map(Cow::Borrowed);
        self.visit(node, candidate)
    }

    /// Serialize against a registered schema
    pub fn serialize_schema(&self, name: &str, input: &Value) -> DefinitionResult<Value> {
        let schema = self.registry.resolve(name)?;
        self.serialize(&schema, input)
    }

    /// Serialize a typed host value by reading its members by name
    pub fn serialize_host<T: Serialize>(&self, name: &str, host: &T) -> DefinitionResult<Value> {
        match host_value(host) {
            Ok(input) => self.serialize_schema(name, &input),
            Err(e) => {
                tracing::warn!(schema = %name, error = %e, "Host value is not representable, serializing as absent");
                self.serialize_schema(name, &Value::Null)
            }
        }
    }

    /// Serialize many items against a registered schema
    pub fn serialize_many(&self, name: &str, items: &[Value]) -> DefinitionResult<Vec<Value>> {
        let schema = self.registry.resolve(name)?;
        items.iter().map(|item| self.serialize(&schema, item)).collect()
    }

    fn visible(&self, node: &AttributeNode, host: &Value) -> bool {
        if node.is_private() {
            return false;
        }
        match &node.options().condition {
            Some(condition) => self.registry.check_condition(condition, host),
            None => true,
        }
    }

    fn present<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        if self.registry.config().null_as_absent && value.is_null() {
            None
        } else {
            Some(value)
        }
    }

    fn absent(&self, node: &AttributeNode, bundle: Option<&Arc<dyn KindBundle>>) -> Value {
        node.options()
            .default
            .clone()
            .or_else(|| bundle.and_then(|bundle| bundle.empty_value()))
            .unwrap_or(Value::Null)
    }

    fn visit(&self, node: &AttributeNode, candidate: Option<Cow<'_, Value>>) -> DefinitionResult<Value> {
        let bundle = self.registry.bundle_for(node.kind());

        let Some(raw) = candidate else {
            return Ok(self.absent(node, bundle.as_ref()));
        };
        let projected = match &bundle {
            Some(bundle) => match bundle.project(&raw, self.registry.config()) {
                Some(projected) => projected,
                None => return Ok(self.absent(node, Some(bundle))),
            },
            None => Cow::Borrowed(raw.as_ref()),
        };

        match node.kind() {
            Kind::Object => Ok(Value::Object(self.visit_fields(node.children(), &projected)?)),
            Kind::SchemaRef => {
                let schema = self.registry.resolve_element(node)?;
                Ok(Value::Object(self.visit_fields(schema.children(), &projected)?))
            }
            Kind::Array => Ok(Value::Array(self.visit_items(node, &projected)?)),
            _ => Ok(projected.into_owned()),
        }
    }

    fn visit_fields(&self, fields: &[Arc<AttributeNode>], host: &Value) -> DefinitionResult<Map<String, Value>> {
        let mut output = Map::new();

        for field in fields {
            if !self.visible(field, host) {
                continue;
            }

            let candidate = self.registry.extract(field, host);
            output.insert(field.name().to_string(), self.visit(field, candidate)?);
        }

        Ok(output)
    }

    fn visit_items(&self, node: &AttributeNode, items: &Value) -> DefinitionResult<Vec<Value>> {
        let items = match items.as_array() {
            Some(items) if !items.is_empty() => items,
            _ => return Ok(Vec::new()),
        };

        let element = self.registry.resolve_element(node)?;
        items
            .iter()
            .map(|item| self.visit(&element, self.present(item).map(Cow::Borrowed)))
            .collect()
    }
}

/// Serialize `input` against `node` with the given registry
pub fn serialize(registry: &Registry, node: &AttributeNode, input: &Value) -> DefinitionResult<Value> {
    Serializer::new(registry).serialize(node, input)
}
