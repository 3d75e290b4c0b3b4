use crate::error::{OpenApiError, OpenApiResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Configuration for OpenAPI specification generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenApiConfig {
    /// OpenAPI specification version (should be "3.0.3")
    pub openapi_version: String,

    /// API information
    pub info: ApiInfo,

    /// Server configurations
    pub servers: Vec<ServerConfig>,

    /// Global tags for grouping operations
    pub tags: Vec<TagConfig>,

    /// External documentation
    pub external_docs: Option<ExternalDocs>,

    /// Document parameters of GET/HEAD/DELETE operations as query parameters
    /// instead of a request body
    pub query_parameters_for_reads: bool,

    /// Export settings
    pub export: ExportConfig,
}

/// API information section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiInfo {
    /// API title
    pub title: String,

    /// API description
    #[serde(default)]
    pub description: Option<String>,

    /// API version
    pub version: String,

    /// Terms of service URL
    #[serde(default)]
    pub terms_of_service: Option<String>,

    /// Contact information
    #[serde(default)]
    pub contact: Option<Contact>,

    /// License information
    #[serde(default)]
    pub license: Option<License>,
}

/// Contact information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub name: Option<String>,
    pub url: Option<String>,
    pub email: Option<String>,
}

/// License information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    pub name: String,
    pub url: Option<String>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub variables: Option<HashMap<String, ServerVariable>>,
}

/// Server variable for parameterized server URLs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerVariable {
    pub default: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub r#enum: Option<Vec<String>>,
}

/// Tag configuration for grouping operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub external_docs: Option<ExternalDocs>,
}

/// External documentation reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalDocs {
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Format written by the exporter
    pub format: ExportFormat,

    /// Pretty print JSON output
    pub pretty_print: bool,
}

/// Available export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Yaml,
}

impl ExportFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> OpenApiResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(ExportFormat::Json),
            Some("yaml") | Some("yml") => Ok(ExportFormat::Yaml),
            other => Err(OpenApiError::export_error(format!(
                "Unsupported file extension: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Json,
            pretty_print: true,
        }
    }
}

impl Default for OpenApiConfig {
    fn default() -> Self {
        Self {
            openapi_version: "3.0.3".to_string(),
            info: ApiInfo {
                title: "API Documentation".to_string(),
                description: Some("Auto-generated API documentation".to_string()),
                version: "1.0.0".to_string(),
                terms_of_service: None,
                contact: None,
                license: Some(License {
                    name: "MIT".to_string(),
                    url: Some("https://opensource.org/licenses/MIT".to_string()),
                }),
            },
            servers: vec![ServerConfig {
                url: "http://localhost:3000".to_string(),
                description: Some("Development server".to_string()),
                variables: None,
            }],
            tags: Vec::new(),
            external_docs: None,
            query_parameters_for_reads: false,
            export: ExportConfig::default(),
        }
    }
}

impl OpenApiConfig {
    /// Create a new configuration with custom API info
    pub fn new(title: &str, version: &str) -> Self {
        let mut config = Self::default();
        config.info.title = title.to_string();
        config.info.version = version.to_string();
        config
    }

    /// Load configuration from a YAML or JSON file, chosen by extension
    pub fn from_file(path: impl AsRef<Path>) -> OpenApiResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = match ExportFormat::from_path(path) {
            Ok(ExportFormat::Json) => serde_json::from_str(&content)?,
            Ok(ExportFormat::Yaml) => serde_yaml::from_str(&content)?,
            Err(_) => {
                return Err(OpenApiError::config_error(format!(
                    "Cannot infer configuration format of {}",
                    path.display()
                )))
            }
        };
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded OpenAPI configuration");
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> OpenApiResult<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values the generator relies on
    pub fn validate(&self) -> OpenApiResult<()> {
        if self.info.title.trim().is_empty() {
            return Err(OpenApiError::config_error("info.title must not be empty"));
        }
        if !self.openapi_version.starts_with("3.") {
            return Err(OpenApiError::config_error(format!(
                "Unsupported OpenAPI version: {}",
                self.openapi_version
            )));
        }
        Ok(())
    }

    /// Add a server configuration
    pub fn add_server(mut self, url: &str, description: Option<&str>) -> Self {
        self.servers.push(ServerConfig {
            url: url.to_string(),
            description: description.map(|s| s.to_string()),
            variables: None,
        });
        self
    }

    /// Add a tag
    pub fn add_tag(mut self, name: &str, description: Option<&str>) -> Self {
        self.tags.push(TagConfig {
            name: name.to_string(),
            description: description.map(|s| s.to_string()),
            external_docs: None,
        });
        self
    }

    pub fn with_query_parameters_for_reads(mut self, enabled: bool) -> Self {
        self.query_parameters_for_reads = enabled;
        self
    }
}
