/*!
Export functionality for OpenAPI specifications.

Renders a generated specification as JSON or YAML, either to a string or to
a file on disk.
*/

use crate::{
    config::{ExportConfig, ExportFormat},
    error::OpenApiResult,
    specification::OpenApiSpec,
};
use std::path::Path;

/// Export service for OpenAPI specifications
pub struct OpenApiExporter;

impl OpenApiExporter {
    /// Render as JSON
    pub fn to_json(spec: &OpenApiSpec, pretty: bool) -> OpenApiResult<String> {
        let json = if pretty {
            serde_json::to_string_pretty(spec)?
        } else {
            serde_json::to_string(spec)?
        };
        Ok(json)
    }

    /// Render as YAML
    pub fn to_yaml(spec: &OpenApiSpec) -> OpenApiResult<String> {
        Ok(serde_yaml::to_string(spec)?)
    }

    /// Render in the configured format
    pub fn render(spec: &OpenApiSpec, config: &ExportConfig) -> OpenApiResult<String> {
        match config.format {
            ExportFormat::Json => Self::to_json(spec, config.pretty_print),
            ExportFormat::Yaml => Self::to_yaml(spec),
        }
    }

    /// Write to `path`
    ///
    /// A `.json`, `.yaml` or `.yml` extension overrides the configured format.
    pub fn write_to(spec: &OpenApiSpec, path: impl AsRef<Path>, config: &ExportConfig) -> OpenApiResult<()> {
        let path = path.as_ref();
        let format = ExportFormat::from_path(path).unwrap_or(config.format);
        let content = Self::render(
            spec,
            &ExportConfig {
                format,
                pretty_print: config.pretty_print,
            },
        )?;

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;

        tracing::info!(path = %path.display(), format = ?format, "Exported OpenAPI specification");
        Ok(())
    }
}
