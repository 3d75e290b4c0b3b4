//! Pattern validation for string values

use super::INVALID;
use crate::traits::ValidationRule;
use serde_json::Value;
use tessera_core::Pattern;

/// Validator for a node's `pattern` option
///
/// The pattern is anchored at compile time, so the whole string must match.
#[derive(Debug, Clone, Copy)]
pub struct PatternValidator<'n> {
    pattern: &'n Pattern,
}

impl<'n> PatternValidator<'n> {
    pub fn new(pattern: &'n Pattern) -> Self {
        Self { pattern }
    }
}

impl ValidationRule for PatternValidator<'_> {
    fn validate(&self, value: &Value) -> Result<(), String> {
        // Only strings are matched; other kinds never carry a pattern
        match value.as_str() {
            Some(text) if !self.pattern.matches(text) => Err(INVALID.to_string()),
            _ => Ok(()),
        }
    }

    fn rule_name(&self) -> &'static str {
        "pattern"
    }

    fn parameters(&self) -> Option<Value> {
        Some(serde_json::json!({ "pattern": self.pattern.as_str() }))
    }
}
