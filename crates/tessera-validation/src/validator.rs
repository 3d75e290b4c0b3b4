//! Recursive validation engine
//!
//! One pass over the input produces both the normalized value and the error
//! tree. Every field is visited regardless of earlier failures. Schema
//! references are resolved against the registry when the traversal reaches
//! them, so recursive schemas terminate on finite input.

use crate::error::{ErrorKey, ErrorTree, Outcome};
use crate::validators::{not_of_kind, secondary_rules, REQUIRED};
use serde_json::{Map, Value};
use std::borrow::Cow;
use tessera_core::{AttributeNode, DefinitionResult, Kind, Registry};

/// Validator bound to a registry
#[derive(Debug, Clone, Copy)]
pub struct Validator<'r> {
    registry: &'r Registry,
}

impl<'r> Validator<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Validate `input` against `node`
    ///
    /// A root whose condition fails against `input` is skipped entirely and
    /// yields a valid outcome with a `null` value.
    ///
    /// Validation failures are reported in the outcome; `Err` is reserved for
    /// definition errors such as a reference to a schema that is not
    /// registered when the traversal reaches it.
    pub fn validate(&self, node: &AttributeNode, input: &Value) -> DefinitionResult<Outcome> {
        let mut errors = ErrorTree::new();
        if let Some(condition) = &node.options().condition {
            if !self.registry.check_condition(condition, input) {
                tracing::debug!(node = %node.name(), "Skipped validation, condition not met");
                return Ok(Outcome {
                    value: Value::Null,
                    errors,
                });
            }
        }
        let candidate = self.present(input).map(Cow::Borrowed);
        let value = self.visit(node, candidate, &mut errors)?.unwrap_or(Value::Null);

        tracing::debug!(
            node = %node.name(),
            errors = errors.total_errors(),
            "Validated input"
        );
        Ok(Outcome { value, errors })
    }

    /// Validate against a registered schema
    pub fn validate_schema(&self, name: &str, input: &Value) -> DefinitionResult<Outcome> {
        let schema = self.registry.resolve(name)?;
        self.validate(&schema, input)
    }

    /// Validate against the effective parameters of an endpoint operation
    pub fn validate_params(
        &self,
        prefix: &str,
        operation: &str,
        input: &Value,
    ) -> DefinitionResult<Outcome> {
        let params = self.registry.effective_params(prefix, operation)?;
        self.validate(&params, input)
    }

    fn present<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        if self.registry.config().null_as_absent && value.is_null() {
            None
        } else {
            Some(value)
        }
    }

    /// Validate one node's candidate value, returning its output if any
    fn visit(
        &self,
        node: &AttributeNode,
        candidate: Option<Cow<'_, Value>>,
        errors: &mut ErrorTree,
    ) -> DefinitionResult<Option<Value>> {
        let bundle = self.registry.bundle_for(node.kind());

        let Some(raw) = candidate else {
            if node.is_required() {
                errors.push(REQUIRED);
                return Ok(node.options().default.clone());
            }
            return Ok(node
                .options()
                .default
                .clone()
                .or_else(|| bundle.as_ref().and_then(|bundle| bundle.empty_value())));
        };

        let coerced = match &bundle {
            Some(bundle) => match bundle.coerce(&raw, self.registry.config()) {
                Some(coerced) => coerced,
                None => {
                    // Secondary checks never run against a wrongly typed value
                    errors.push(not_of_kind(bundle.kind_name()));
                    return Ok(Some(raw.as_ref().clone()));
                }
            },
            None => Cow::Borrowed(raw.as_ref()),
        };

        for rule in secondary_rules(node, bundle.as_deref(), self.registry) {
            if let Err(message) = rule.validate(&coerced) {
                errors.push(message);
            }
        }

        let output = match node.kind() {
            Kind::Object => Value::Object(self.visit_fields(node.children(), &coerced, errors)?),
            Kind::SchemaRef => {
                let schema = self.registry.resolve_element(node)?;
                Value::Object(self.visit_fields(schema.children(), &coerced, errors)?)
            }
            Kind::Array => Value::Array(self.visit_items(node, &coerced, errors)?),
            _ => coerced.into_owned(),
        };
        Ok(Some(output))
    }

    fn visit_fields(
        &self,
        fields: &[std::sync::Arc<AttributeNode>],
        host: &Value,
        errors: &mut ErrorTree,
    ) -> DefinitionResult<Map<String, Value>> {
        let mut output = Map::new();

        for field in fields {
            if let Some(condition) = &field.options().condition {
                if !self.registry.check_condition(condition, host) {
                    continue;
                }
            }

            let mut field_errors = ErrorTree::new();
            let candidate = self.registry.extract(field, host);
            if let Some(value) = self.visit(field, candidate, &mut field_errors)? {
                output.insert(field.name().to_string(), value);
            }
            errors.insert(ErrorKey::Field(field.name().to_string()), field_errors);
        }

        Ok(output)
    }

    fn visit_items(
        &self,
        node: &AttributeNode,
        items: &Value,
        errors: &mut ErrorTree,
    ) -> DefinitionResult<Vec<Value>> {
        let items = match items.as_array() {
            Some(items) if !items.is_empty() => items,
            _ => return Ok(Vec::new()),
        };

        let element = self.registry.resolve_element(node)?;
        let mut output = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let mut item_errors = ErrorTree::new();
            let candidate = self.present(item).map(Cow::Borrowed);
            let value = self.visit(&element, candidate, &mut item_errors)?;
            output.push(value.unwrap_or(Value::Null));
            errors.insert(ErrorKey::Index(index), item_errors);
        }

        Ok(output)
    }
}

/// Validate `input` against `node` with the given registry
pub fn validate(registry: &Registry, node: &AttributeNode, input: &Value) -> DefinitionResult<Outcome> {
    Validator::new(registry).validate(node, input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tessera_core::{
        DefinitionError, EngineConfig, Field, Method, OperationDefinition, ParamsDirective,
        SchemaBuilder,
    };

    fn hero_registry() -> Registry {
        let registry = Registry::new();
        registry
            .define_schema("hero", |s| {
                s.field(Field::string("name").min(4.0).required())
                    .field(Field::array("friends", "hero"))
            })
            .unwrap();
        registry
    }

    #[test]
    fn test_hero_end_to_end() {
        let registry = hero_registry();
        let outcome = Validator::new(&registry)
            .validate_schema("hero", &json!({"name": "Th", "friends": [{"name": "Iron Man"}]}))
            .unwrap();

        assert_eq!(outcome.errors.to_value(), json!({"name": ["too short"]}));
        assert_eq!(
            outcome.value,
            json!({"name": "Th", "friends": [{"name": "Iron Man", "friends": []}]})
        );
        assert!(!outcome.is_valid());
    }

    #[test]
    fn test_required_and_default() {
        let registry = Registry::new();
        registry
            .define_schema("user", |s| {
                s.field(Field::string("email").required())
                    .field(Field::string("role").default("member"))
                    .field(Field::string("nickname"))
            })
            .unwrap();

        let outcome = validate(&registry, &registry.resolve("user").unwrap(), &json!({})).unwrap();
        assert_eq!(outcome.errors.messages_at("email"), ["is required"]);
        assert_eq!(outcome.value, json!({"role": "member"}));

        registry
            .define_schema("member", |s| s.field(Field::string("role").required().default("member")))
            .unwrap();
        let outcome = Validator::new(&registry).validate_schema("member", &json!({})).unwrap();
        assert_eq!(outcome.errors.to_value(), json!({"role": ["is required"]}));
        assert_eq!(outcome.value, json!({"role": "member"}));
    }

    #[test]
    fn test_root_condition_skips_validation() {
        let registry = Registry::new();
        let validator = Validator::new(&registry);

        let skipped = Field::string("nick").min(10.0).when(|_| false).build().unwrap();
        let outcome = validator.validate(&skipped, &json!("ab")).unwrap();
        assert!(outcome.is_valid());
        assert_eq!(outcome.value, Value::Null);

        let checked = Field::string("nick").min(10.0).when(|input| input.is_string()).build().unwrap();
        let outcome = validator.validate(&checked, &json!("ab")).unwrap();
        assert_eq!(outcome.errors.messages(), ["too short"]);
        assert_eq!(outcome.value, json!("ab"));
    }

    #[test]
    fn test_type_failure_stops_secondary_checks() {
        let registry = Registry::new();
        registry
            .define_schema("user", |s| s.field(Field::integer("age").min(18.0).required()))
            .unwrap();

        let outcome = Validator::new(&registry)
            .validate_schema("user", &json!({"age": "old"}))
            .unwrap();
        assert_eq!(outcome.errors.to_value(), json!({"age": ["is not integer"]}));
        assert_eq!(outcome.value, json!({"age": "old"}));

        let outcome = Validator::new(&registry)
            .validate_schema("user", &json!({"age": "17"}))
            .unwrap();
        assert_eq!(outcome.errors.to_value(), json!({"age": ["too small"]}));
        assert_eq!(outcome.value, json!({"age": 17}));
    }

    #[test]
    fn test_multiple_failures_coexist() {
        let registry = Registry::new();
        registry
            .define_schema("code", |s| {
                s.field(
                    Field::string("value")
                        .pattern("[a-z]+")
                        .max(3.0)
                        .validate_with(|_| Err("is reserved".to_string())),
                )
            })
            .unwrap();

        let outcome = Validator::new(&registry)
            .validate_schema("code", &json!({"value": "ABCD"}))
            .unwrap();
        assert_eq!(
            outcome.errors.messages_at("value"),
            ["is invalid", "too long", "is reserved"]
        );
    }

    #[test]
    fn test_array_errors_keep_input_positions() {
        let registry = Registry::new();
        registry
            .define_schema("tagged", |s| s.field(Field::array("tags", "string").max(3.0)))
            .unwrap();

        let outcome = Validator::new(&registry)
            .validate_schema("tagged", &json!({"tags": ["a", 2, "c", true]}))
            .unwrap();
        assert_eq!(
            outcome.errors.to_value(),
            json!({"tags": {"_self": ["too long"], "1": ["is not string"], "3": ["is not string"]}})
        );
        assert_eq!(outcome.value, json!({"tags": ["a", 2, "c", true]}));
    }

    #[test]
    fn test_nested_array_error_path() {
        let registry = hero_registry();
        let outcome = Validator::new(&registry)
            .validate_schema(
                "hero",
                &json!({"name": "Thor", "friends": [{"name": "Hulk"}, {"name": "Sif"}]}),
            )
            .unwrap();
        assert_eq!(
            outcome.errors.to_value(),
            json!({"friends": {"1": {"name": ["too short"]}}})
        );
        assert_eq!(outcome.errors.messages_at("friends.1.name"), ["too short"]);
    }

    #[test]
    fn test_conditions_skip_fields() {
        let registry = Registry::new();
        registry.register_predicate("is_company", |host| host["type"] == "company");
        registry
            .define_schema("customer", |s| {
                s.field(Field::string("type").required())
                    .field(Field::string("vat_number").required().when_named("is_company"))
                    .field(Field::string("birth_date").required().when(|host| host["type"] == "person"))
            })
            .unwrap();

        let outcome = Validator::new(&registry)
            .validate_schema("customer", &json!({"type": "company"}))
            .unwrap();
        assert_eq!(outcome.errors.to_value(), json!({"vat_number": ["is required"]}));
        assert_eq!(outcome.value, json!({"type": "company"}));
    }

    #[test]
    fn test_accessor_alias_and_schema_ref() {
        let registry = Registry::new();
        registry
            .define_schema("address", |s| s.field(Field::string("city").required()))
            .unwrap();
        registry
            .define_schema("person", |s| {
                s.field(Field::string("name").accessor("full_name"))
                    .field(Field::schema_ref("home", "address"))
            })
            .unwrap();

        let outcome = Validator::new(&registry)
            .validate_schema(
                "person",
                &json!({"full_name": "Jane Foster", "home": {"street": "Main"}, "extra": 1}),
            )
            .unwrap();
        assert_eq!(outcome.errors.to_value(), json!({"home": {"city": ["is required"]}}));
        assert_eq!(outcome.value, json!({"name": "Jane Foster", "home": {}}));

        let outcome = Validator::new(&registry)
            .validate_schema("person", &json!({"home": "nowhere"}))
            .unwrap();
        assert_eq!(outcome.errors.to_value(), json!({"home": ["is not object"]}));
    }

    #[test]
    fn test_unknown_reference_is_a_definition_error() {
        let registry = Registry::new();
        registry
            .define_schema("team", |s| s.field(Field::array("members", "hero")))
            .unwrap();
        let validator = Validator::new(&registry);

        // Nothing to resolve for an empty array
        assert!(validator.validate_schema("team", &json!({"members": []})).is_ok());
        assert_eq!(
            validator
                .validate_schema("team", &json!({"members": [{"name": "Thor"}]}))
                .unwrap_err(),
            DefinitionError::unknown_schema("hero")
        );
        assert!(matches!(
            validator.validate_schema("league", &json!({})),
            Err(DefinitionError::UnknownSchema { .. })
        ));
    }

    #[test]
    fn test_null_handling_follows_config() {
        let lenient = Registry::new();
        lenient
            .define_schema("user", |s| s.field(Field::string("name").required()))
            .unwrap();
        let outcome = Validator::new(&lenient)
            .validate_schema("user", &json!({"name": null}))
            .unwrap();
        assert_eq!(outcome.errors.to_value(), json!({"name": ["is required"]}));

        let strict = Registry::new().with_config(EngineConfig::strict());
        strict
            .define_schema("user", |s| s.field(Field::string("name").required()))
            .unwrap();
        let outcome = Validator::new(&strict)
            .validate_schema("user", &json!({"name": null}))
            .unwrap();
        assert_eq!(outcome.errors.to_value(), json!({"name": ["is not string"]}));
    }

    #[test]
    fn test_validate_params() {
        let registry = Registry::new();
        registry
            .define_endpoint("/heroes", |e| {
                e.default_params(
                    SchemaBuilder::new("hero_params")
                        .field(Field::string("name").required())
                        .field(Field::integer("power")),
                )
                .operation(
                    OperationDefinition::new("rename", Method::Patch, "/:id")
                        .params(ParamsDirective::only(["name"])),
                )
            })
            .unwrap();

        let outcome = Validator::new(&registry)
            .validate_params("/heroes", "rename", &json!({"power": 9}))
            .unwrap();
        assert_eq!(outcome.errors.to_value(), json!({"name": ["is required"]}));
        assert_eq!(outcome.value, json!({}));
    }
}
