//! # tessera
//!
//! Declarative schemas for API payloads. A schema is declared once and then
//! drives three independent engines: the validator, which reports every
//! failure at once as a nested error tree; the serializer, which projects
//! values into the declared output shape; and the OpenAPI descriptor
//! generator.
//!
//! This is the umbrella package that re-exports the tessera crates and
//! provides a prelude and a logging bootstrap.

// Re-export all sub-packages as modules
pub use tessera_core as core;
pub use tessera_openapi as openapi;
pub use tessera_serializer as serializer;
pub use tessera_validation as validation;

// Re-export common types at root level for convenience
pub use tessera_core::{
    AttributeNode, DefinitionError, DefinitionResult, EndpointDefinition, EngineConfig, Field, Kind,
    KindBundle, Method, OperationDefinition, ParamsDirective, Registry, ResponseSpec, SchemaBuilder,
};
pub use tessera_openapi::{OpenApiConfig, OpenApiError, OpenApiGenerator, OpenApiResult};
pub use tessera_serializer::Serializer;
pub use tessera_validation::{ErrorTree, Outcome, Validator};

pub mod logging;

// Prelude module for convenient imports
pub mod prelude;

/// Current version of tessera
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the library version
pub fn version() -> &'static str {
    VERSION
}
