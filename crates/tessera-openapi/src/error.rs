use tessera_core::DefinitionError;
use thiserror::Error;

/// Result type for OpenAPI operations
pub type OpenApiResult<T> = Result<T, OpenApiError>;

/// Errors that can occur during OpenAPI generation
#[derive(Debug, Error)]
pub enum OpenApiError {
    /// Malformed registration surfaced while walking the registry
    #[error("Definition error: {0}")]
    Definition(#[from] DefinitionError),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O error (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Export format error
    #[error("Export format error: {0}")]
    Export(String),
}

impl OpenApiError {
    /// Create a new configuration error
    pub fn config_error<T: ToString>(msg: T) -> Self {
        Self::Config(msg.to_string())
    }

    /// Create a new export format error
    pub fn export_error<T: ToString>(msg: T) -> Self {
        Self::Export(msg.to_string())
    }
}
