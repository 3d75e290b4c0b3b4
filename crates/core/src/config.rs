//! Engine configuration

use crate::error::ConfigError;
use std::env;

pub const ENV_NULL_AS_ABSENT: &str = "TESSERA_NULL_AS_ABSENT";
pub const ENV_COERCE_STRINGS: &str = "TESSERA_COERCE_STRINGS";

/// Behaviour switches shared by the validator and serializer engines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Treat an explicit `null` like a missing value
    pub null_as_absent: bool,
    /// Let numeric and boolean kinds accept their string spellings
    pub coerce_strings: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            null_as_absent: true,
            coerce_strings: true,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strict configuration: no string coercion, `null` is a value
    pub fn strict() -> Self {
        Self {
            null_as_absent: false,
            coerce_strings: false,
        }
    }

    pub fn with_null_as_absent(mut self, enabled: bool) -> Self {
        self.null_as_absent = enabled;
        self
    }

    pub fn with_coerce_strings(mut self, enabled: bool) -> Self {
        self.coerce_strings = enabled;
        self
    }

    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            null_as_absent: read_flag(ENV_NULL_AS_ABSENT, defaults.null_as_absent)?,
            coerce_strings: read_flag(ENV_COERCE_STRINGS, defaults.coerce_strings)?,
        })
    }
}

fn read_flag(var: &str, default: bool) -> Result<bool, ConfigError> {
    match env::var(var) {
        Ok(value) => parse_flag(var, &value),
        Err(_) => Ok(default),
    }
}

fn parse_flag(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: var.to_string(),
            value: value.to_string(),
            expected: "true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_builder_setters() {
        let config = EngineConfig::new().with_coerce_strings(false);
        assert!(config.null_as_absent);
        assert!(!config.coerce_strings);
        assert_eq!(EngineConfig::strict(), config.with_null_as_absent(false));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        env::set_var(ENV_NULL_AS_ABSENT, "off");
        env::remove_var(ENV_COERCE_STRINGS);
        let config = EngineConfig::from_env().unwrap();
        assert!(!config.null_as_absent);
        assert!(config.coerce_strings);

        env::set_var(ENV_COERCE_STRINGS, "maybe");
        let error = EngineConfig::from_env().unwrap_err();
        assert!(matches!(error, ConfigError::InvalidValue { ref field, .. } if field == ENV_COERCE_STRINGS));

        env::remove_var(ENV_NULL_AS_ABSENT);
        env::remove_var(ENV_COERCE_STRINGS);
    }
}
