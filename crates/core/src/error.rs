//! Definition-time error types
//!
//! These errors describe programmer mistakes made while declaring schemas and
//! endpoints. They are raised during construction, registration and parameter
//! composition and are never used to report problems with request data.

use thiserror::Error;

pub type DefinitionResult<T> = Result<T, DefinitionError>;

/// Errors raised while building or resolving definitions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DefinitionError {
    #[error("Unknown schema: '{name}'")]
    UnknownSchema { name: String },

    #[error("Unknown endpoint: '{prefix}'")]
    UnknownEndpoint { prefix: String },

    #[error("Unknown operation '{operation}' on endpoint '{prefix}'")]
    UnknownOperation { prefix: String, operation: String },

    #[error("Duplicate field '{field}' in '{parent}'")]
    DuplicateField { parent: String, field: String },

    #[error("Duplicate operation '{operation}' on endpoint '{prefix}'")]
    DuplicateOperation { prefix: String, operation: String },

    #[error("Invalid identifier: '{0}'")]
    InvalidIdentifier(String),

    #[error("Invalid option '{option}' for {kind} field '{field}': {reason}")]
    InvalidOption {
        field: String,
        kind: String,
        option: String,
        reason: String,
    },

    #[error("Field '{field}' of kind {kind} requires an element reference")]
    MissingElementRef { field: String, kind: String },

    #[error("Operation '{operation}' on '{prefix}' selects default params but none are declared")]
    MissingDefaultParams { prefix: String, operation: String },

    #[error("Operation '{operation}' on '{prefix}' selects unknown parameter '{param}'")]
    UnknownParam {
        prefix: String,
        operation: String,
        param: String,
    },
}

impl DefinitionError {
    /// Create an unknown schema error
    pub fn unknown_schema(name: impl Into<String>) -> Self {
        Self::UnknownSchema { name: name.into() }
    }

    /// Create an invalid option error
    pub fn invalid_option(
        field: impl Into<String>,
        kind: impl Into<String>,
        option: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidOption {
            field: field.into(),
            kind: kind.into(),
            option: option.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while reading engine configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {field}: '{value}', expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },
}
