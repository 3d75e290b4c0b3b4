//! # Logging bootstrap
//!
//! The tessera crates only emit `tracing` events. Applications that do not
//! install a subscriber of their own can use [`init_logging`] to get plain,
//! pretty or JSON output filtered by level or `RUST_LOG`.

use std::io;
use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "warn")
    pub level: String,
    /// Enable JSON structured logging (vs plain text)
    pub json_format: bool,
    /// Enable pretty printing for development
    pub pretty_print: bool,
    /// Include file and line number information
    pub include_location: bool,
    /// Environment filter (supports directives like "tessera_core=debug,tessera_openapi=info")
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            pretty_print: true,
            include_location: false,
            env_filter: None,
        }
    }
}

impl LoggingConfig {
    /// Production logging: JSON lines at info level
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            json_format: true,
            pretty_print: false,
            include_location: false,
            env_filter: Some("tessera_core=info,tessera_openapi=info".to_string()),
        }
    }

    /// Development logging: pretty output including registration events
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            json_format: false,
            pretty_print: true,
            include_location: true,
            env_filter: None,
        }
    }

    /// Test logging (minimal output)
    pub fn test() -> Self {
        Self {
            level: "error".to_string(),
            json_format: false,
            pretty_print: false,
            include_location: false,
            env_filter: None,
        }
    }

    pub fn with_level<S: Into<String>>(mut self, level: S) -> Self {
        self.level = level.into();
        self
    }

    /// Set environment filter
    pub fn with_env_filter<S: Into<String>>(mut self, filter: S) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Filter directives in effect: `RUST_LOG` wins over the configured filter
    pub fn filter(&self) -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
        let directives = self.env_filter.as_deref().unwrap_or(&self.level);
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(directives),
        }
    }
}

/// Install a global subscriber for `config`
///
/// Returns `Ok(false)` when a global subscriber was already installed, which
/// leaves that subscriber in place.
pub fn init_logging(config: &LoggingConfig) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
    let filter = config.filter()?;

    let installed = if config.json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                Layer::new()
                    .with_writer(io::stdout)
                    .with_file(config.include_location)
                    .with_line_number(config.include_location)
                    .json(),
            )
            .try_init()
    } else if config.pretty_print {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                Layer::new()
                    .with_writer(io::stdout)
                    .with_file(config.include_location)
                    .with_line_number(config.include_location)
                    .pretty(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                Layer::new()
                    .with_writer(io::stdout)
                    .with_file(config.include_location)
                    .with_line_number(config.include_location),
            )
            .try_init()
    };

    match installed {
        Ok(()) => {
            tracing::info!(
                target: "tessera::logging",
                "Logging initialized (level: {}, format: {})",
                config.level,
                if config.json_format { "JSON" } else { "text" }
            );
            Ok(true)
        }
        Err(_) => Ok(false),
    }
}
