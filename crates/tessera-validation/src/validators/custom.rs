//! Custom validators declared on a node

use crate::traits::ValidationRule;
use serde_json::Value;
use tessera_core::{CustomValidator as Hook, Registry};

/// Runs one declared custom validator, inline or looked up by name
pub struct CustomValidator<'r> {
    hook: &'r Hook,
    registry: &'r Registry,
}

impl<'r> CustomValidator<'r> {
    pub fn new(hook: &'r Hook, registry: &'r Registry) -> Self {
        Self { hook, registry }
    }
}

impl ValidationRule for CustomValidator<'_> {
    fn validate(&self, value: &Value) -> Result<(), String> {
        self.registry.run_validator(self.hook, value)
    }

    fn rule_name(&self) -> &'static str {
        "custom"
    }

    fn parameters(&self) -> Option<Value> {
        self.hook
            .name()
            .map(|name| serde_json::json!({ "validator": name }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_inline_and_named_validators() {
        let registry = Registry::new();
        registry.register_validator("not_loki", |value| {
            if value == "Loki" {
                Err("is not allowed here".to_string())
            } else {
                Ok(())
            }
        });

        let named = Hook::named("not_loki");
        let rule = CustomValidator::new(&named, &registry);
        assert_eq!(rule.validate(&json!("Loki")), Err("is not allowed here".to_string()));
        assert!(rule.validate(&json!("Thor")).is_ok());
        assert_eq!(rule.parameters(), Some(json!({"validator": "not_loki"})));

        let inline = Hook::validator(|value| {
            value
                .as_str()
                .filter(|s| s.starts_with('T'))
                .map(|_| ())
                .ok_or_else(|| "must start with T".to_string())
        });
        let rule = CustomValidator::new(&inline, &registry);
        assert!(rule.validate(&json!("Thor")).is_ok());
        assert!(rule.validate(&json!("Loki")).is_err());
        assert_eq!(rule.parameters(), None);
    }
}
