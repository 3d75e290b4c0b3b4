//! Option-keyed secondary validators
//!
//! After a value passes its kind's type check, the engine runs one validator
//! per option the node carries, in a fixed order: pattern, min, max, allowed,
//! then custom validators in declaration order.

pub mod bounds;
pub mod custom;
pub mod membership;
pub mod pattern;

pub use bounds::{Bound, BoundsValidator};
pub use custom::CustomValidator;
pub use membership::MembershipValidator;
pub use pattern::PatternValidator;

use crate::traits::ValidationRule;
use tessera_core::{AttributeNode, KindBundle, Registry};

pub const REQUIRED: &str = "is required";
pub const INVALID: &str = "is invalid";
pub const TOO_SHORT: &str = "too short";
pub const TOO_LONG: &str = "too long";
pub const TOO_SMALL: &str = "too small";
pub const TOO_LARGE: &str = "too large";
pub const NOT_INCLUDED: &str = "is not included in the list";

/// Message for a value that fails its kind's type check
pub fn not_of_kind(kind_name: &str) -> String {
    format!("is not {}", kind_name)
}

/// Validators for every option set on `node`, in evaluation order
///
/// Bounds need a bundle to measure against and are left out without one.
pub fn secondary_rules<'a>(
    node: &'a AttributeNode,
    bundle: Option<&'a dyn KindBundle>,
    registry: &'a Registry,
) -> Vec<Box<dyn ValidationRule + 'a>> {
    let options = node.options();
    let mut rules: Vec<Box<dyn ValidationRule + 'a>> = Vec::new();

    if let Some(pattern) = &options.pattern {
        rules.push(Box::new(PatternValidator::new(pattern)));
    }
    if let Some(bundle) = bundle {
        if let Some(min) = options.min {
            rules.push(Box::new(BoundsValidator::min(min, bundle)));
        }
        if let Some(max) = options.max {
            rules.push(Box::new(BoundsValidator::max(max, bundle)));
        }
    }
    if let Some(allowed) = &options.allowed {
        rules.push(Box::new(MembershipValidator::new(allowed)));
    }
    for hook in &options.validators {
        rules.push(Box::new(CustomValidator::new(hook, registry)));
    }

    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tessera_core::{Field, Kind};

    #[test]
    fn test_rules_follow_option_order() {
        let registry = Registry::new();
        let node = Field::string("code")
            .validate_named("checksum")
            .allowed(["abc", "xyz"])
            .max(3.0)
            .min(2.0)
            .pattern("[a-z]+")
            .build()
            .unwrap();
        let bundle = registry.bundle_for(&Kind::String);

        let names: Vec<&str> = secondary_rules(&node, bundle.as_deref(), &registry)
            .iter()
            .map(|rule| rule.rule_name())
            .collect();
        assert_eq!(names, ["pattern", "min", "max", "allowed", "custom"]);
    }

    #[test]
    fn test_all_failures_are_reported() {
        let registry = Registry::new();
        let node = Field::string("code")
            .pattern("[a-z]+")
            .min(3.0)
            .allowed(["abc"])
            .build()
            .unwrap();
        let bundle = registry.bundle_for(&Kind::String);

        let failures: Vec<String> = secondary_rules(&node, bundle.as_deref(), &registry)
            .iter()
            .filter_map(|rule| rule.validate(&json!("A")).err())
            .collect();
        assert_eq!(failures, ["is invalid", "too short", "is not included in the list"]);
    }

    #[test]
    fn test_bounds_need_a_bundle() {
        let registry = Registry::new();
        let node = Field::integer("age").min(1.0).build().unwrap();
        assert!(secondary_rules(&node, None, &registry).is_empty());
        assert_eq!(not_of_kind("integer"), "is not integer");
    }
}
