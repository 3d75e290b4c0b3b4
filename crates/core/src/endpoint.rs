//! Endpoints, operations and parameter composition
//!
//! An operation never stores its parameter schema. It stores a
//! [`ParamsDirective`] and the effective schema is computed against the
//! registry on every lookup, so replacing a schema or another endpoint's
//! defaults is visible immediately.

use crate::builder::SchemaBuilder;
use crate::error::{DefinitionError, DefinitionResult};
use crate::node::AttributeNode;
use crate::registry::Registry;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// HTTP method of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Trace,
}

impl Method {
    /// Lowercase method name, as used for descriptor path items
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
            Method::Put => "put",
            Method::Patch => "patch",
            Method::Delete => "delete",
            Method::Head => "head",
            Method::Options => "options",
            Method::Trace => "trace",
        }
    }

    /// Methods whose parameters conventionally travel in the query string
    pub fn is_read(&self) -> bool {
        matches!(self, Method::Get | Method::Head | Method::Delete)
    }
}

impl FromStr for Method {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            "TRACE" => Ok(Method::Trace),
            _ => Err(DefinitionError::invalid_option(
                s,
                "operation",
                "method",
                "unsupported HTTP method",
            )),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// How an operation derives its parameter schema
#[derive(Debug, Clone, Default)]
pub enum ParamsDirective {
    /// No parameters
    #[default]
    None,
    /// The endpoint's default parameters verbatim
    All,
    /// Only the named default parameters
    Only(Vec<String>),
    /// Every default parameter except the named ones
    Except(Vec<String>),
    /// A wholly new parameter schema
    Inline(Arc<AttributeNode>),
    /// Another endpoint's default parameters
    EndpointDefault(String),
    /// A registered schema
    Schema(String),
}

impl ParamsDirective {
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(names.into_iter().map(Into::into).collect())
    }

    pub fn except<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Except(names.into_iter().map(Into::into).collect())
    }

    pub fn inline(node: AttributeNode) -> Self {
        Self::Inline(Arc::new(node))
    }
}

impl From<bool> for ParamsDirective {
    fn from(all: bool) -> Self {
        if all {
            Self::All
        } else {
            Self::None
        }
    }
}

/// Documented response of an operation
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSpec {
    pub status: u16,
    /// Registered schema describing the body
    pub schema: Option<String>,
    /// Whether the body is a list of `schema`
    pub many: bool,
    pub description: Option<String>,
}

impl ResponseSpec {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            schema: None,
            many: false,
            description: None,
        }
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn many(mut self) -> Self {
        self.many = true;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A single operation of an endpoint
#[derive(Debug, Clone)]
pub struct OperationDefinition {
    pub name: String,
    pub method: Method,
    pub sub_path: String,
    pub params: ParamsDirective,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub deprecated: bool,
    pub responses: Vec<ResponseSpec>,
}

impl OperationDefinition {
    pub fn new(name: impl Into<String>, method: Method, sub_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            sub_path: sub_path.into(),
            params: ParamsDirective::None,
            summary: None,
            description: None,
            tags: Vec::new(),
            deprecated: false,
            responses: Vec::new(),
        }
    }

    pub fn params(mut self, params: impl Into<ParamsDirective>) -> Self {
        self.params = params.into();
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    pub fn response(mut self, response: ResponseSpec) -> Self {
        self.responses.push(response);
        self
    }
}

/// A group of operations sharing a path prefix and default parameters
#[derive(Debug, Clone)]
pub struct EndpointDefinition {
    prefix: String,
    default_params: Option<Arc<AttributeNode>>,
    operations: Vec<OperationDefinition>,
    description: Option<String>,
    tag: Option<String>,
}

impl EndpointDefinition {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn default_params(&self) -> Option<&Arc<AttributeNode>> {
        self.default_params.as_ref()
    }

    /// Operations in declaration order
    pub fn operations(&self) -> &[OperationDefinition] {
        &self.operations
    }

    pub fn operation(&self, name: &str) -> Option<&OperationDefinition> {
        self.operations.iter().find(|op| op.name == name)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Explicit tag, or the first segment of the prefix
    pub fn tag(&self) -> String {
        self.tag.clone().unwrap_or_else(|| {
            self.prefix
                .split('/')
                .find(|segment| !segment.is_empty())
                .unwrap_or("default")
                .to_string()
        })
    }

    /// Prefix joined with the operation's sub-path, `:param` rewritten to `{param}`
    pub fn full_path(&self, operation: &OperationDefinition) -> String {
        join_path(&self.prefix, &operation.sub_path)
    }
}

/// Builder for endpoint declarations
#[derive(Debug, Clone)]
pub struct EndpointBuilder {
    prefix: String,
    default_params: Option<SchemaBuilder>,
    operations: Vec<OperationDefinition>,
    description: Option<String>,
    tag: Option<String>,
}

impl EndpointBuilder {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            default_params: None,
            operations: Vec::new(),
            description: None,
            tag: None,
        }
    }

    pub fn default_params(mut self, params: SchemaBuilder) -> Self {
        self.default_params = Some(params);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn operation(mut self, operation: OperationDefinition) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn build(self) -> DefinitionResult<EndpointDefinition> {
        if !self.prefix.starts_with('/') {
            return Err(DefinitionError::invalid_option(
                &self.prefix,
                "endpoint",
                "prefix",
                "path prefixes start with '/'",
            ));
        }

        let mut operations: Vec<OperationDefinition> = Vec::with_capacity(self.operations.len());
        for operation in self.operations {
            if !crate::node::is_identifier(&operation.name) {
                return Err(DefinitionError::InvalidIdentifier(operation.name));
            }
            if operations.iter().any(|existing| existing.name == operation.name) {
                return Err(DefinitionError::DuplicateOperation {
                    prefix: self.prefix,
                    operation: operation.name,
                });
            }
            operations.push(operation);
        }

        let default_params = match self.default_params {
            Some(params) => Some(Arc::new(params.build()?)),
            None => None,
        };

        Ok(EndpointDefinition {
            prefix: self.prefix,
            default_params,
            operations,
            description: self.description,
            tag: self.tag,
        })
    }
}

/// Compute an operation's effective parameter schema
pub fn compose_params(
    registry: &Registry,
    endpoint: &EndpointDefinition,
    operation: &OperationDefinition,
) -> DefinitionResult<Arc<AttributeNode>> {
    let params_name = format!("{}_params", operation.name);
    let missing_default = || DefinitionError::MissingDefaultParams {
        prefix: endpoint.prefix.clone(),
        operation: operation.name.clone(),
    };

    match &operation.params {
        ParamsDirective::None => Ok(Arc::new(AttributeNode::from_children(params_name, Vec::new()))),
        ParamsDirective::All => endpoint.default_params.clone().ok_or_else(missing_default),
        ParamsDirective::Only(names) => {
            let defaults = endpoint.default_params.as_ref().ok_or_else(missing_default)?;
            check_known(endpoint, operation, defaults, names)?;
            let children = defaults
                .children()
                .iter()
                .filter(|child| names.iter().any(|name| name == child.name()))
                .cloned()
                .collect();
            Ok(Arc::new(AttributeNode::from_children(params_name, children)))
        }
        ParamsDirective::Except(names) => {
            let defaults = endpoint.default_params.as_ref().ok_or_else(missing_default)?;
            check_known(endpoint, operation, defaults, names)?;
            let children = defaults
                .children()
                .iter()
                .filter(|child| !names.iter().any(|name| name == child.name()))
                .cloned()
                .collect();
            Ok(Arc::new(AttributeNode::from_children(params_name, children)))
        }
        ParamsDirective::Inline(node) => Ok(Arc::clone(node)),
        ParamsDirective::EndpointDefault(prefix) => {
            let other = registry.endpoint(prefix)?;
            other
                .default_params
                .clone()
                .ok_or_else(|| DefinitionError::MissingDefaultParams {
                    prefix: prefix.clone(),
                    operation: operation.name.clone(),
                })
        }
        ParamsDirective::Schema(name) => registry.resolve(name),
    }
}

/// Selections and exclusions must both name default parameters
fn check_known(
    endpoint: &EndpointDefinition,
    operation: &OperationDefinition,
    defaults: &AttributeNode,
    names: &[String],
) -> DefinitionResult<()> {
    match names.iter().find(|name| defaults.child(name).is_none()) {
        Some(unknown) => Err(DefinitionError::UnknownParam {
            prefix: endpoint.prefix.clone(),
            operation: operation.name.clone(),
            param: unknown.clone(),
        }),
        None => Ok(()),
    }
}

fn join_path(prefix: &str, sub_path: &str) -> String {
    let segments: Vec<String> = prefix
        .split('/')
        .chain(sub_path.split('/'))
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.strip_prefix(':') {
            Some(param) => format!("{{{}}}", param),
            None => segment.to_string(),
        })
        .collect();
    format!("/{}", segments.join("/"))
}
