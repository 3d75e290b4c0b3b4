use crate::{
    config::OpenApiConfig,
    error::{OpenApiError, OpenApiResult},
    schema::SchemaGenerator,
    specification::*,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tessera_core::{AttributeNode, EndpointDefinition, OperationDefinition, Registry, ResponseSpec};

/// Main OpenAPI specification generator
pub struct OpenApiGenerator {
    /// Configuration
    config: OpenApiConfig,
    /// Generated specification
    spec: Option<OpenApiSpec>,
}

impl OpenApiGenerator {
    /// Create a new OpenAPI generator
    pub fn new(config: OpenApiConfig) -> Self {
        Self { config, spec: None }
    }

    /// Generate the specification for everything registered in `registry`
    ///
    /// Fails only on malformed registrations, such as a reference to a schema
    /// that is not registered.
    pub fn generate(&mut self, registry: &Registry) -> OpenApiResult<&OpenApiSpec> {
        let schemas = SchemaGenerator::new(registry);

        let mut spec = OpenApiSpec {
            openapi: self.config.openapi_version.clone(),
            info: self.convert_api_info(),
            servers: self.convert_servers(),
            paths: BTreeMap::new(),
            components: None,
            tags: self.convert_tags(),
            external_docs: self.config.external_docs.as_ref().map(|ed| ExternalDocumentation {
                url: ed.url.clone(),
                description: ed.description.clone(),
            }),
        };

        // Generate component schemas
        let mut components = Components::default();
        for name in registry.schema_names() {
            tracing::debug!(schema = %name, "Generating component schema");
            let schema = schemas.generate_schema(&name)?;
            components.schemas.insert(name, schema);
        }
        if !components.schemas.is_empty() {
            spec.components = Some(components);
        }

        // Generate paths from endpoints
        for prefix in registry.endpoint_prefixes() {
            let endpoint = registry.endpoint(&prefix)?;
            self.add_endpoint_tag(&mut spec, &endpoint);
            for operation in endpoint.operations() {
                self.process_operation(&mut spec, registry, &schemas, &endpoint, operation)?;
            }
        }

        let spec: &OpenApiSpec = self.spec.insert(spec);
        Ok(spec)
    }

    /// Process a single operation and add it to the specification
    fn process_operation(
        &self,
        spec: &mut OpenApiSpec,
        registry: &Registry,
        schemas: &SchemaGenerator<'_>,
        endpoint: &EndpointDefinition,
        operation: &OperationDefinition,
    ) -> OpenApiResult<()> {
        let path = endpoint.full_path(operation);
        tracing::debug!(method = %operation.method, path = %path, "Generating operation");

        let params = registry.effective_params(endpoint.prefix(), &operation.name)?;
        let generated = self.create_operation(schemas, endpoint, operation, &path, &params)?;

        let path_item = spec.paths.entry(path.clone()).or_default();
        let slot = path_item.slot_mut(operation.method.as_str()).ok_or_else(|| {
            OpenApiError::config_error(format!("Unsupported HTTP method: {}", operation.method))
        })?;
        if slot.is_some() {
            tracing::warn!(method = %operation.method, path = %path, "Operation replaces an earlier one on the same path");
        }
        *slot = Some(generated);

        Ok(())
    }

    /// Create an operation from its definition and effective parameters
    fn create_operation(
        &self,
        schemas: &SchemaGenerator<'_>,
        endpoint: &EndpointDefinition,
        operation: &OperationDefinition,
        path: &str,
        params: &AttributeNode,
    ) -> OpenApiResult<Operation> {
        let path_params = path_parameter_names(path);

        // Path parameters are documented in the path, even when also declared
        let mut parameters = path_params
            .iter()
            .map(|name| {
                let declared = params.child(name);
                Ok(Parameter {
                    name: name.clone(),
                    location: "path".to_string(),
                    description: declared.and_then(|node| node.options().description.clone()),
                    required: Some(true),
                    deprecated: None,
                    schema: Some(match declared {
                        Some(node) => schemas.field_schema(node)?,
                        None => Schema::of_type("string"),
                    }),
                })
            })
            .collect::<OpenApiResult<Vec<_>>>()?;

        let remaining: Vec<Arc<AttributeNode>> = params
            .children()
            .iter()
            .filter(|child| !path_params.iter().any(|name| name == child.name()))
            .cloned()
            .collect();

        let mut request_body = None;
        if !remaining.is_empty() {
            if self.config.query_parameters_for_reads && operation.method.is_read() {
                for field in &remaining {
                    parameters.push(Parameter {
                        name: field.name().to_string(),
                        location: "query".to_string(),
                        description: field.options().description.clone(),
                        required: Some(field.is_required() && !field.is_conditional()),
                        deprecated: field.options().deprecated.then_some(true),
                        schema: Some(schemas.field_schema(field)?),
                    });
                }
            } else {
                let schema = schemas.fields_schema(&remaining)?;
                let required = !schema.required.is_empty();
                request_body = Some(RequestBody {
                    description: params.options().description.clone(),
                    content: MediaType::json(schema),
                    required: Some(required),
                });
            }
        }

        let tags = if operation.tags.is_empty() {
            vec![endpoint.tag()]
        } else {
            operation.tags.clone()
        };

        Ok(Operation {
            tags,
            summary: operation.summary.clone(),
            description: operation.description.clone(),
            operation_id: Some(operation_id(endpoint.prefix(), &operation.name)),
            parameters,
            request_body,
            responses: self.create_responses(schemas.registry(), &operation.responses)?,
            deprecated: operation.deprecated.then_some(true),
        })
    }

    /// Create responses from response declarations
    fn create_responses(
        &self,
        registry: &Registry,
        declared: &[ResponseSpec],
    ) -> OpenApiResult<BTreeMap<String, Response>> {
        let mut responses = BTreeMap::new();

        // Default success response if none specified
        if declared.is_empty() {
            responses.insert(
                "200".to_string(),
                Response {
                    description: "Successful operation".to_string(),
                    content: BTreeMap::new(),
                },
            );
            return Ok(responses);
        }

        for response in declared {
            let content = match &response.schema {
                Some(name) => {
                    registry.resolve(name)?;
                    let reference = Schema::reference(name);
                    let schema = if response.many {
                        Schema::array_of(reference)
                    } else {
                        reference
                    };
                    MediaType::json(schema)
                }
                None => BTreeMap::new(),
            };

            let description = response
                .description
                .clone()
                .unwrap_or_else(|| status_description(response.status).to_string());

            responses.insert(response.status.to_string(), Response { description, content });
        }

        Ok(responses)
    }

    /// Document an endpoint's description on its tag
    fn add_endpoint_tag(&self, spec: &mut OpenApiSpec, endpoint: &EndpointDefinition) {
        let Some(description) = endpoint.description() else {
            return;
        };
        let name = endpoint.tag();
        match spec.tags.iter_mut().find(|tag| tag.name == name) {
            Some(tag) if tag.description.is_none() => tag.description = Some(description.to_string()),
            Some(_) => {}
            None => spec.tags.push(Tag {
                name,
                description: Some(description.to_string()),
                external_docs: None,
            }),
        }
    }

    /// Convert configuration info to specification info
    fn convert_api_info(&self) -> ApiInfo {
        ApiInfo {
            title: self.config.info.title.clone(),
            description: self.config.info.description.clone(),
            terms_of_service: self.config.info.terms_of_service.clone(),
            contact: self.config.info.contact.as_ref().map(|c| Contact {
                name: c.name.clone(),
                url: c.url.clone(),
                email: c.email.clone(),
            }),
            license: self.config.info.license.as_ref().map(|l| License {
                name: l.name.clone(),
                url: l.url.clone(),
            }),
            version: self.config.info.version.clone(),
        }
    }

    /// Convert server configurations
    fn convert_servers(&self) -> Vec<Server> {
        self.config
            .servers
            .iter()
            .map(|s| Server {
                url: s.url.clone(),
                description: s.description.clone(),
                variables: s.variables.as_ref().map(|vars| {
                    vars.iter()
                        .map(|(k, v)| {
                            (
                                k.clone(),
                                ServerVariable {
                                    default: v.default.clone(),
                                    enum_values: v.r#enum.clone(),
                                    description: v.description.clone(),
                                },
                            )
                        })
                        .collect()
                }),
            })
            .collect()
    }

    /// Convert tags
    fn convert_tags(&self) -> Vec<Tag> {
        self.config
            .tags
            .iter()
            .map(|t| Tag {
                name: t.name.clone(),
                description: t.description.clone(),
                external_docs: t.external_docs.as_ref().map(|ed| ExternalDocumentation {
                    url: ed.url.clone(),
                    description: ed.description.clone(),
                }),
            })
            .collect()
    }

    /// Export specification as JSON
    pub fn export_json(&self, pretty: bool) -> OpenApiResult<String> {
        let spec = self.spec.as_ref().ok_or_else(|| {
            OpenApiError::export_error("No specification generated yet. Call generate() first.")
        })?;
        crate::export::OpenApiExporter::to_json(spec, pretty)
    }

    /// Export specification as YAML
    pub fn export_yaml(&self) -> OpenApiResult<String> {
        let spec = self.spec.as_ref().ok_or_else(|| {
            OpenApiError::export_error("No specification generated yet. Call generate() first.")
        })?;
        crate::export::OpenApiExporter::to_yaml(spec)
    }

    /// Get the generated specification
    pub fn specification(&self) -> Option<&OpenApiSpec> {
        self.spec.as_ref()
    }

    pub fn config(&self) -> &OpenApiConfig {
        &self.config
    }
}

/// Names of `{param}` segments in a path, in order
pub fn path_parameter_names(path: &str) -> Vec<String> {
    path.split('/')
        .filter_map(|segment| segment.strip_prefix('{')?.strip_suffix('}'))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// `<endpointCamel><OperationPascal>`, e.g. `/super_heroes/:id` + `list_all` -> `superHeroesListAll`
pub fn operation_id(prefix: &str, operation: &str) -> String {
    let endpoint_words = prefix
        .split('/')
        .filter(|segment| !segment.starts_with(':') && !segment.starts_with('{'))
        .flat_map(|segment| segment.split(['_', '-']))
        .filter(|word| !word.is_empty());

    let mut id = String::new();
    for word in endpoint_words {
        if id.is_empty() {
            id.push_str(&word.to_lowercase());
        } else {
            id.push_str(&capitalize(word));
        }
    }
    for word in operation.split('_').filter(|word| !word.is_empty()) {
        id.push_str(&capitalize(word));
    }
    id
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn status_description(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        _ => "Response",
    }
}
