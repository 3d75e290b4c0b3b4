//! # tessera-core
//!
//! Schema model shared by the tessera engines: attribute nodes, the schema
//! and endpoint registry with lazy per-call reference resolution, pluggable
//! kind bundles, hooks and accessors, and endpoint parameter composition.

pub mod accessor;
pub mod builder;
pub mod bundle;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod hook;
pub mod kind;
pub mod node;
pub mod registry;

pub use accessor::{host_value, Accessor, KeyedAccessor};
pub use builder::{Field, SchemaBuilder};
pub use bundle::{DescriptorType, KindBundle, Measure, MeasureUnit};
pub use config::EngineConfig;
pub use endpoint::{
    EndpointBuilder, EndpointDefinition, Method, OperationDefinition, ParamsDirective, ResponseSpec,
};
pub use error::{ConfigError, DefinitionError, DefinitionResult};
pub use hook::{CustomValidator, Hook, Predicate};
pub use kind::Kind;
pub use node::{AttributeNode, NodeOptions, Pattern};
pub use registry::Registry;
