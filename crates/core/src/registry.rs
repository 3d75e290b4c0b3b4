//! Schema and endpoint registry
//!
//! The registry is an explicit value handed to every engine call. Schemas are
//! stored by name and looked up on every traversal, never cached inside nodes,
//! so re-registering a name is observed by the very next lookup. Each lookup
//! takes a short read lock and returns an `Arc`, which keeps the node a
//! traversal is working on alive and consistent even if a writer replaces it
//! concurrently.

use crate::accessor::{Accessor, KeyedAccessor};
use crate::builder::SchemaBuilder;
use crate::bundle::{builtin_bundles, KindBundle};
use crate::config::EngineConfig;
use crate::endpoint::{compose_params, EndpointBuilder, EndpointDefinition};
use crate::error::{DefinitionError, DefinitionResult};
use crate::hook::{CustomValidator, Hook, Predicate, PredicateFn, ValidatorFn};
use crate::kind::Kind;
use crate::node::{is_identifier, AttributeNode};
use parking_lot::RwLock;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

/// Name to definition lookup table shared by the engines
pub struct Registry {
    schemas: RwLock<HashMap<String, Arc<AttributeNode>>>,
    endpoints: RwLock<HashMap<String, Arc<EndpointDefinition>>>,
    kinds: RwLock<HashMap<String, Arc<dyn KindBundle>>>,
    predicates: RwLock<HashMap<String, Arc<PredicateFn>>>,
    validators: RwLock<HashMap<String, Arc<ValidatorFn>>>,
    accessor: Arc<dyn Accessor>,
    config: EngineConfig,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("schemas", &self.schema_names())
            .field("endpoints", &self.endpoint_prefixes())
            .field("kinds", &self.kinds.read().len())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create an empty registry with the built-in kind bundles
    pub fn new() -> Self {
        let kinds = builtin_bundles()
            .iter()
            .map(|bundle| (bundle.kind_name().to_string(), Arc::clone(bundle)))
            .collect();

        Self {
            schemas: RwLock::new(HashMap::new()),
            endpoints: RwLock::new(HashMap::new()),
            kinds: RwLock::new(kinds),
            predicates: RwLock::new(HashMap::new()),
            validators: RwLock::new(HashMap::new()),
            accessor: Arc::new(KeyedAccessor),
            config: EngineConfig::default(),
        }
    }

    /// Replace the accessor used to read fields out of host values
    pub fn with_accessor<A: Accessor + 'static>(mut self, accessor: A) -> Self {
        self.accessor = Arc::new(accessor);
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn accessor(&self) -> &dyn Accessor {
        self.accessor.as_ref()
    }

    /// Register a schema, replacing any schema already registered under `name`
    pub fn register(&self, name: impl Into<String>, node: AttributeNode) -> DefinitionResult<()> {
        let name = name.into();
        if !is_identifier(&name) {
            return Err(DefinitionError::InvalidIdentifier(name));
        }
        if *node.kind() != Kind::Object {
            return Err(DefinitionError::invalid_option(
                &name,
                node.kind().name(),
                "kind",
                "registered schemas must be objects",
            ));
        }

        let fields = node.children().len();
        let previous = self.schemas.write().insert(name.clone(), Arc::new(node));
        if previous.is_some() {
            tracing::info!(schema = %name, fields, "Replaced schema");
        } else {
            tracing::debug!(schema = %name, fields, "Registered schema");
        }
        Ok(())
    }

    /// Build a schema declaration and register it under its builder name
    pub fn define_schema<F>(&self, name: &str, declare: F) -> DefinitionResult<()>
    where
        F: FnOnce(SchemaBuilder) -> SchemaBuilder,
    {
        let node = declare(SchemaBuilder::new(name)).build()?;
        self.register(name, node)
    }

    /// Look up a schema as registered at the time of the call
    pub fn resolve(&self, name: &str) -> DefinitionResult<Arc<AttributeNode>> {
        self.schemas
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| DefinitionError::unknown_schema(name))
    }

    /// Resolve the node an array or schema field points at
    ///
    /// Primitive element names resolve to a synthetic node of that kind;
    /// anything else resolves through [`Registry::resolve`].
    pub fn resolve_element(&self, node: &AttributeNode) -> DefinitionResult<Arc<AttributeNode>> {
        let element = node.element_ref().ok_or_else(|| DefinitionError::MissingElementRef {
            field: node.name().to_string(),
            kind: node.kind().name().to_string(),
        })?;

        match Kind::primitive(element) {
            Some(kind) => Ok(Arc::new(AttributeNode::synthetic(kind))),
            None => self.resolve(element),
        }
    }

    pub fn contains_schema(&self, name: &str) -> bool {
        self.schemas.read().contains_key(name)
    }

    /// Registered schema names, sorted
    pub fn schema_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Register an endpoint, replacing any endpoint with the same prefix
    pub fn register_endpoint(&self, endpoint: EndpointDefinition) -> DefinitionResult<()> {
        let prefix = endpoint.prefix().to_string();
        let operations = endpoint.operations().len();
        let previous = self.endpoints.write().insert(prefix.clone(), Arc::new(endpoint));
        if previous.is_some() {
            tracing::info!(endpoint = %prefix, operations, "Replaced endpoint");
        } else {
            tracing::debug!(endpoint = %prefix, operations, "Registered endpoint");
        }
        Ok(())
    }

    /// Build an endpoint declaration and register it
    pub fn define_endpoint<F>(&self, prefix: &str, declare: F) -> DefinitionResult<()>
    where
        F: FnOnce(EndpointBuilder) -> EndpointBuilder,
    {
        let endpoint = declare(EndpointBuilder::new(prefix)).build()?;
        self.register_endpoint(endpoint)
    }

    pub fn endpoint(&self, prefix: &str) -> DefinitionResult<Arc<EndpointDefinition>> {
        self.endpoints
            .read()
            .get(prefix)
            .cloned()
            .ok_or_else(|| DefinitionError::UnknownEndpoint {
                prefix: prefix.to_string(),
            })
    }

    /// Registered endpoint prefixes, sorted
    pub fn endpoint_prefixes(&self) -> Vec<String> {
        let mut prefixes: Vec<String> = self.endpoints.read().keys().cloned().collect();
        prefixes.sort();
        prefixes
    }

    /// Effective parameter schema of an operation, computed against current state
    pub fn effective_params(&self, prefix: &str, operation: &str) -> DefinitionResult<Arc<AttributeNode>> {
        let endpoint = self.endpoint(prefix)?;
        let definition = endpoint
            .operation(operation)
            .ok_or_else(|| DefinitionError::UnknownOperation {
                prefix: prefix.to_string(),
                operation: operation.to_string(),
            })?;
        compose_params(self, &endpoint, definition)
    }

    /// Add or override a kind bundle
    pub fn register_kind<B: KindBundle + 'static>(&self, bundle: B) {
        let name = bundle.kind_name().to_string();
        tracing::debug!(kind = %name, "Registered kind bundle");
        self.kinds.write().insert(name, Arc::new(bundle));
    }

    pub fn kind_bundle(&self, name: &str) -> Option<Arc<dyn KindBundle>> {
        self.kinds.read().get(name).cloned()
    }

    /// Bundle the engines dispatch to for a node kind
    pub fn bundle_for(&self, kind: &Kind) -> Option<Arc<dyn KindBundle>> {
        let bundle = self.kind_bundle(kind.bundle_name());
        if bundle.is_none() {
            tracing::warn!(kind = %kind, "No bundle registered for kind");
        }
        bundle
    }

    pub fn register_predicate<P>(&self, name: impl Into<String>, predicate: P)
    where
        P: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.predicates.write().insert(name.into(), Arc::new(predicate));
    }

    pub fn register_validator<V>(&self, name: impl Into<String>, validator: V)
    where
        V: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators.write().insert(name.into(), Arc::new(validator));
    }

    /// Read a node's value out of its host
    ///
    /// `null` counts as absent when the engine is configured that way.
    pub fn extract<'a>(&self, node: &AttributeNode, host: &'a Value) -> Option<Cow<'a, Value>> {
        self.accessor
            .access(host, node.accessor())
            .filter(|value| !(self.config.null_as_absent && value.is_null()))
    }

    /// Evaluate a condition against the host container of a field
    ///
    /// Unknown predicate names fall back to the truthiness of the host member
    /// with that name.
    pub fn check_condition(&self, condition: &Predicate, host: &Value) -> bool {
        match condition {
            Hook::Inline(predicate) => predicate(host),
            Hook::Named(name) => {
                let predicate = self.predicates.read().get(name).cloned();
                match predicate {
                    Some(predicate) => predicate(host),
                    None => self
                        .accessor
                        .access(host, name)
                        .map_or(false, |value| is_truthy(&value)),
                }
            }
        }
    }

    /// Run a custom validator; unknown names are skipped
    pub fn run_validator(&self, validator: &CustomValidator, value: &Value) -> Result<(), String> {
        match validator {
            Hook::Inline(validate) => validate(value),
            Hook::Named(name) => {
                let validate = self.validators.read().get(name).cloned();
                match validate {
                    Some(validate) => validate(value),
                    None => {
                        tracing::warn!(validator = %name, "Skipping unknown validator");
                        Ok(())
                    }
                }
            }
        }
    }

    /// Copy of the current registry state
    ///
    /// Nodes are shared, not cloned. Build a snapshot, mutate it, then swap it
    /// in to hot-reload definitions without touching the live registry.
    pub fn snapshot(&self) -> Registry {
        Registry {
            schemas: RwLock::new(self.schemas.read().clone()),
            endpoints: RwLock::new(self.endpoints.read().clone()),
            kinds: RwLock::new(self.kinds.read().clone()),
            predicates: RwLock::new(self.predicates.read().clone()),
            validators: RwLock::new(self.validators.read().clone()),
            accessor: Arc::clone(&self.accessor),
            config: self.config,
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(false, |n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Field;
    use crate::endpoint::{Method, OperationDefinition, ParamsDirective};
    use serde_json::json;

    fn hero_registry() -> Registry {
        let registry = Registry::new();
        registry
            .define_schema("hero", |s| {
                s.field(Field::string("name").required())
                    .field(Field::array("friends", "hero"))
                    .field(Field::array("tags", "string"))
            })
            .unwrap();
        registry
    }

    #[test]
    fn test_resolve_and_replace() {
        let registry = hero_registry();
        assert_eq!(registry.resolve("hero").unwrap().children().len(), 3);

        registry
            .define_schema("hero", |s| s.field(Field::string("alias")))
            .unwrap();
        let hero = registry.resolve("hero").unwrap();
        assert_eq!(hero.children().len(), 1);
        assert_eq!(registry.schema_names(), ["hero"]);
    }

    #[test]
    fn test_unknown_schema_at_call_time() {
        let registry = Registry::new();
        registry
            .define_schema("team", |s| s.field(Field::array("members", "hero")))
            .unwrap();

        let team = registry.resolve("team").unwrap();
        let members = team.child("members").unwrap();
        assert_eq!(
            registry.resolve_element(members).unwrap_err(),
            DefinitionError::unknown_schema("hero")
        );

        registry.define_schema("hero", |s| s.field(Field::string("name"))).unwrap();
        assert_eq!(registry.resolve_element(members).unwrap().name(), "hero");
    }

    #[test]
    fn test_primitive_elements_are_synthetic() {
        let registry = hero_registry();
        let hero = registry.resolve("hero").unwrap();
        let element = registry.resolve_element(hero.child("tags").unwrap()).unwrap();
        assert_eq!(*element.kind(), Kind::String);

        let friend = registry.resolve_element(hero.child("friends").unwrap()).unwrap();
        assert!(Arc::ptr_eq(&friend, &hero));
    }

    #[test]
    fn test_register_rejects_non_objects() {
        let registry = Registry::new();
        let leaf = Field::string("name").build().unwrap();
        assert!(registry.register("name", leaf).is_err());
        let hero = AttributeNode::object("hero").unwrap();
        assert!(registry.register("bad name", hero).is_err());
    }

    #[test]
    fn test_conditions_and_validators() {
        let registry = Registry::new();
        registry.register_predicate("is_admin", |host| host["role"] == "admin");
        registry.register_validator("even", |value| match value.as_i64() {
            Some(n) if n % 2 == 0 => Ok(()),
            _ => Err("is not even".to_string()),
        });

        let host = json!({"role": "admin", "visible": 1});
        assert!(registry.check_condition(&Predicate::named("is_admin"), &host));
        assert!(registry.check_condition(&Predicate::named("visible"), &host));
        assert!(!registry.check_condition(&Predicate::named("hidden"), &host));
        assert!(registry.check_condition(&Predicate::predicate(|h| h.is_object()), &host));

        assert!(registry.run_validator(&CustomValidator::named("even"), &json!(4)).is_ok());
        assert_eq!(
            registry.run_validator(&CustomValidator::named("even"), &json!(3)),
            Err("is not even".to_string())
        );
        assert!(registry.run_validator(&CustomValidator::named("unknown"), &json!(3)).is_ok());
    }

    #[test]
    fn test_extract_treats_null_as_absent() {
        let registry = Registry::new();
        let node = Field::string("name").build().unwrap();
        assert!(registry.extract(&node, &json!({"name": null})).is_none());

        let strict = Registry::new().with_config(EngineConfig::strict());
        assert_eq!(strict.extract(&node, &json!({"name": null})).as_deref(), Some(&Value::Null));
    }

    #[test]
    fn test_effective_params_follow_other_endpoints() {
        let registry = Registry::new();
        registry
            .define_endpoint("/users", |e| {
                e.operation(
                    OperationDefinition::new("create", Method::Post, "/")
                        .params(ParamsDirective::EndpointDefault("/accounts".into())),
                )
            })
            .unwrap();

        assert!(matches!(
            registry.effective_params("/users", "create"),
            Err(DefinitionError::UnknownEndpoint { .. })
        ));

        registry
            .define_endpoint("/accounts", |e| {
                e.default_params(SchemaBuilder::new("account").field(Field::string("email")))
            })
            .unwrap();
        let params = registry.effective_params("/users", "create").unwrap();
        assert_eq!(params.children()[0].name(), "email");

        assert!(matches!(
            registry.effective_params("/users", "delete"),
            Err(DefinitionError::UnknownOperation { .. })
        ));
    }

    #[test]
    fn test_snapshot_is_independent() {
        let registry = hero_registry();
        let snapshot = registry.snapshot();
        snapshot.define_schema("team", |s| s.field(Field::string("name"))).unwrap();
        assert!(snapshot.contains_schema("team"));
        assert!(!registry.contains_schema("team"));
    }

    #[test]
    fn test_custom_kind_registration() {
        struct Uuid;
        impl KindBundle for Uuid {
            fn kind_name(&self) -> &str {
                "uuid"
            }
            fn coerce<'v>(&self, value: &'v Value, _config: &EngineConfig) -> Option<Cow<'v, Value>> {
                value.as_str().filter(|s| s.len() == 36).map(|_| Cow::Borrowed(value))
            }
        }

        let registry = Registry::new();
        assert!(registry.bundle_for(&Kind::Custom("uuid".into())).is_none());
        registry.register_kind(Uuid);
        assert!(registry.bundle_for(&Kind::Custom("uuid".into())).is_some());
        assert_eq!(registry.bundle_for(&Kind::SchemaRef).unwrap().kind_name(), "object");
    }
}
