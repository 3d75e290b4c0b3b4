//! Prelude module for convenient imports
//!
//! ```rust
//! use tessera::prelude::*;
//! ```

pub use tessera_core::{
    host_value, AttributeNode, DefinitionError, DefinitionResult, EngineConfig, Field, Kind, KindBundle,
    Method, OperationDefinition, ParamsDirective, Registry, ResponseSpec, SchemaBuilder,
};
pub use tessera_openapi::{OpenApiConfig, OpenApiGenerator};
pub use tessera_serializer::Serializer;
pub use tessera_validation::{ErrorKey, ErrorTree, Outcome, Validator};

pub use serde::{Deserialize, Serialize};
pub use serde_json::{json, Value};
