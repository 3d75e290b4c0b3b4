//! Allowed-value validation

use super::NOT_INCLUDED;
use crate::traits::ValidationRule;
use serde_json::Value;

/// Validator for a node's `allowed` option
///
/// Numbers compare by value, so `1` and `1.0` are the same member.
#[derive(Debug, Clone, Copy)]
pub struct MembershipValidator<'n> {
    allowed: &'n [Value],
}

impl<'n> MembershipValidator<'n> {
    pub fn new(allowed: &'n [Value]) -> Self {
        Self { allowed }
    }

    fn contains(&self, value: &Value) -> bool {
        self.allowed.iter().any(|member| same_member(member, value))
    }
}

fn same_member(member: &Value, value: &Value) -> bool {
    match (member, value) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        _ => member == value,
    }
}

impl ValidationRule for MembershipValidator<'_> {
    fn validate(&self, value: &Value) -> Result<(), String> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(NOT_INCLUDED.to_string())
        }
    }

    fn rule_name(&self) -> &'static str {
        "allowed"
    }

    fn parameters(&self) -> Option<Value> {
        Some(serde_json::json!({ "allowed": self.allowed }))
    }
}
