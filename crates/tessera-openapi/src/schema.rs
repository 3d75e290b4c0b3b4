use crate::{error::OpenApiResult, specification::Schema};
use std::sync::Arc;
use tessera_core::{AttributeNode, Kind, Registry};

/// Walks attribute nodes and produces descriptor schemas
///
/// Only structural metadata is read. Schema references are emitted as `$ref`
/// and never inlined, which keeps recursive schemas finite. Each reference is
/// checked against the registry so a dangling name fails generation.
pub struct SchemaGenerator<'r> {
    registry: &'r Registry,
}

impl<'r> SchemaGenerator<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Component schema for a registered schema
    pub fn generate_schema(&self, name: &str) -> OpenApiResult<Schema> {
        let node = self.registry.resolve(name)?;
        self.object_schema(&node)
    }

    /// Object schema for a node's children
    pub fn object_schema(&self, node: &AttributeNode) -> OpenApiResult<Schema> {
        let mut schema = self.fields_schema(node.children())?;
        schema.description = node.options().description.clone();
        Ok(schema)
    }

    /// Object schema for an explicit list of fields
    pub fn fields_schema(&self, fields: &[Arc<AttributeNode>]) -> OpenApiResult<Schema> {
        let mut schema = Schema::of_type("object");
        for field in fields {
            schema.properties.insert(field.name(), self.field_schema(field)?);
            // A conditional field may be skipped entirely, so it is never required
            if field.is_required() && !field.is_conditional() {
                schema.required.push(field.name().to_string());
            }
        }
        Ok(schema)
    }

    /// Schema for a single declared field
    pub fn field_schema(&self, node: &AttributeNode) -> OpenApiResult<Schema> {
        let mut schema = match node.kind() {
            Kind::Object => self.fields_schema(node.children())?,
            Kind::SchemaRef => {
                let target = self.reference_target(node)?;
                let reference = Schema::reference(&target);
                if has_metadata(node) {
                    Schema {
                        all_of: vec![reference],
                        ..Default::default()
                    }
                } else {
                    return Ok(reference);
                }
            }
            Kind::Array => {
                let mut schema = Schema::array_of(self.element_schema(node)?);
                schema.min_items = node.options().min.map(lower_count);
                schema.max_items = node.options().max.map(upper_count);
                schema
            }
            kind => self.scalar_schema(node, kind),
        };

        let options = node.options();
        schema.description = options.description.clone();
        schema.default = options.default.clone();
        schema.deprecated = options.deprecated.then_some(true);
        schema.write_only = options.private.then_some(true);
        Ok(schema)
    }

    fn scalar_schema(&self, node: &AttributeNode, kind: &Kind) -> Schema {
        let descriptor = self
            .registry
            .bundle_for(kind)
            .map(|bundle| bundle.descriptor_type())
            .unwrap_or_default();
        let options = node.options();

        let mut schema = Schema {
            schema_type: descriptor.schema_type.map(str::to_string),
            format: descriptor.format.map(str::to_string),
            pattern: options.pattern.as_ref().map(|pattern| pattern.as_str().to_string()),
            enum_values: options.allowed.clone().unwrap_or_default(),
            ..Default::default()
        };

        match descriptor.schema_type {
            Some("string") => {
                schema.min_length = options.min.map(lower_count);
                schema.max_length = options.max.map(upper_count);
            }
            Some("array") => {
                schema.min_items = options.min.map(lower_count);
                schema.max_items = options.max.map(upper_count);
            }
            _ => {
                schema.minimum = options.min;
                schema.maximum = options.max;
            }
        }
        schema
    }

    /// Items schema of an array field
    fn element_schema(&self, node: &AttributeNode) -> OpenApiResult<Schema> {
        let element = self.registry.resolve_element(node)?;
        match node.element_ref().and_then(Kind::primitive) {
            Some(kind) => Ok(self.scalar_schema(&element, &kind)),
            None => Ok(Schema::reference(node.element_ref().unwrap_or(element.name()))),
        }
    }

    /// Name of the schema a schema-ref field points at, checked against the registry
    fn reference_target(&self, node: &AttributeNode) -> OpenApiResult<String> {
        let target = self.registry.resolve_element(node)?;
        Ok(node.element_ref().unwrap_or(target.name()).to_string())
    }
}

fn has_metadata(node: &AttributeNode) -> bool {
    let options = node.options();
    options.description.is_some() || options.deprecated || options.default.is_some() || options.private
}

fn lower_count(bound: f64) -> u64 {
    bound.max(0.0).ceil() as u64
}

fn upper_count(bound: f64) -> u64 {
    bound.max(0.0).floor() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tessera_core::{DefinitionError, Field};

    fn to_json(schema: &Schema) -> serde_json::Value {
        serde_json::to_value(schema).unwrap()
    }

    #[test]
    fn test_recursive_schema_uses_references() {
        let registry = Registry::new();
        registry
            .define_schema("hero", |s| {
                s.description("A hero")
                    .field(Field::string("name").min(4.0).required())
                    .field(Field::array("friends", "hero"))
            })
            .unwrap();

        let schema = SchemaGenerator::new(&registry).generate_schema("hero").unwrap();
        assert_eq!(
            to_json(&schema),
            json!({
                "type": "object",
                "description": "A hero",
                "properties": {
                    "name": {"type": "string", "minLength": 4},
                    "friends": {"type": "array", "items": {"$ref": "#/components/schemas/hero"}}
                },
                "required": ["name"]
            })
        );
    }

    #[test]
    fn test_field_metadata() {
        let registry = Registry::new();
        registry
            .define_schema("address", |s| s.field(Field::string("city")))
            .unwrap();
        registry
            .define_schema("user", |s| {
                s.field(Field::integer("age").min(0.0).max(150.0).default(30))
                    .field(Field::string("role").allowed(["admin", "user"]).deprecated())
                    .field(Field::string("password").pattern("[a-z0-9]{8,}").private().required())
                    .field(Field::string("vat").required().when_named("is_company"))
                    .field(Field::schema_ref("home", "address"))
                    .field(Field::schema_ref("work", "address").description("Office address"))
                    .field(Field::array("tags", "string").max(5.0))
                    .field(Field::object("meta").child(Field::boolean("active")))
            })
            .unwrap();

        let schema = SchemaGenerator::new(&registry).generate_schema("user").unwrap();
        let properties = to_json(&schema)["properties"].clone();

        assert_eq!(
            properties["age"],
            json!({"type": "integer", "format": "int64", "default": 30, "minimum": 0.0, "maximum": 150.0})
        );
        assert_eq!(
            properties["role"],
            json!({"type": "string", "enum": ["admin", "user"], "deprecated": true})
        );
        assert_eq!(
            properties["password"],
            json!({"type": "string", "pattern": "[a-z0-9]{8,}", "writeOnly": true})
        );
        assert_eq!(properties["home"], json!({"$ref": "#/components/schemas/address"}));
        assert_eq!(
            properties["work"],
            json!({"description": "Office address", "allOf": [{"$ref": "#/components/schemas/address"}]})
        );
        assert_eq!(
            properties["tags"],
            json!({"type": "array", "items": {"type": "string"}, "maxItems": 5})
        );
        assert_eq!(
            properties["meta"],
            json!({"type": "object", "properties": {"active": {"type": "boolean"}}})
        );
        assert_eq!(schema.required, ["password"]);
    }

    #[test]
    fn test_dangling_reference_fails() {
        let registry = Registry::new();
        registry
            .define_schema("team", |s| s.field(Field::schema_ref("leader", "hero")))
            .unwrap();

        let error = SchemaGenerator::new(&registry).generate_schema("team").unwrap_err();
        assert!(matches!(
            error,
            crate::error::OpenApiError::Definition(DefinitionError::UnknownSchema { .. })
        ));
    }
}
