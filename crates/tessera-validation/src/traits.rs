//! Core validation traits

use serde_json::Value;

/// A single secondary check run against an already type-checked value
///
/// Rules are option-keyed: the engine builds one per option a node carries
/// and runs them in a fixed order, collecting every failure.
pub trait ValidationRule: Send + Sync {
    /// Check a value, returning the failure message on error
    fn validate(&self, value: &Value) -> Result<(), String>;

    /// Get the validation rule name/type
    fn rule_name(&self) -> &'static str;

    /// Get validation rule parameters/configuration as JSON
    fn parameters(&self) -> Option<Value> {
        None
    }
}
