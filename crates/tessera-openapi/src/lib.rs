/*!
# tessera-openapi

OpenAPI 3.0 descriptor generation for tessera schemas and endpoints.

Every registered schema becomes a component and every endpoint operation a
path item. Schema references are always emitted as `$ref`, so recursive
schemas produce finite documents.

## Usage

```rust,no_run
use tessera_core::{Field, Registry};
use tessera_openapi::{OpenApiConfig, OpenApiGenerator};

let registry = Registry::new();
registry
    .define_schema("hero", |s| s.field(Field::string("name").required()))
    .unwrap();

let mut generator = OpenApiGenerator::new(OpenApiConfig::new("Heroes", "1.0.0"));
generator.generate(&registry).unwrap();
let json = generator.export_json(true).unwrap();
```
*/

// Re-export main types
pub use crate::{
    config::{ExportConfig, ExportFormat, OpenApiConfig},
    error::{OpenApiError, OpenApiResult},
    export::OpenApiExporter,
    generator::OpenApiGenerator,
    schema::SchemaGenerator,
    specification::OpenApiSpec,
};

// Core modules
pub mod config;
pub mod error;
pub mod generator;
pub mod specification;

// Schema generation
pub mod schema;

// Export functionality
pub mod export;
