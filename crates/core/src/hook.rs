//! Pluggable predicates and custom validators
//!
//! Conditions and custom rules share one shape: either a name looked up in the
//! registry at traversal time, or an inline function carried by the node.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Predicate evaluated against the host container of a field
pub type PredicateFn = dyn Fn(&Value) -> bool + Send + Sync;

/// Custom validator; `Err` carries the message appended to the field
pub type ValidatorFn = dyn Fn(&Value) -> Result<(), String> + Send + Sync;

/// A named or inline hook
pub enum Hook<F: ?Sized> {
    /// Resolved against the registry when the hook runs
    Named(String),
    /// Carried directly by the declaring node
    Inline(Arc<F>),
}

/// Conditional predicate attached to a field
pub type Predicate = Hook<PredicateFn>;

/// Custom validator attached to a field
pub type CustomValidator = Hook<ValidatorFn>;

impl<F: ?Sized> Hook<F> {
    /// Create a hook resolved by name
    pub fn named(name: impl Into<String>) -> Self {
        Hook::Named(name.into())
    }

    /// Name of a named hook
    pub fn name(&self) -> Option<&str> {
        match self {
            Hook::Named(name) => Some(name),
            Hook::Inline(_) => None,
        }
    }
}

impl Hook<PredicateFn> {
    /// Create an inline predicate
    pub fn predicate<P>(predicate: P) -> Self
    where
        P: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Hook::Inline(Arc::new(predicate))
    }
}

impl Hook<ValidatorFn> {
    /// Create an inline custom validator
    pub fn validator<V>(validator: V) -> Self
    where
        V: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        Hook::Inline(Arc::new(validator))
    }
}

impl<F: ?Sized> Clone for Hook<F> {
    fn clone(&self) -> Self {
        match self {
            Hook::Named(name) => Hook::Named(name.clone()),
            Hook::Inline(function) => Hook::Inline(Arc::clone(function)),
        }
    }
}

impl<F: ?Sized> fmt::Debug for Hook<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hook::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Hook::Inline(_) => f.write_str("Inline(<fn>)"),
        }
    }
}
