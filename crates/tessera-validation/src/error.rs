//! Validation result types
//!
//! Validation failures are data, never `Err`: an [`Outcome`] carries the
//! normalized value together with an [`ErrorTree`] that mirrors the shape of
//! the input.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Key used for direct messages of a node that also has failing children
pub const SELF_KEY: &str = "_self";

/// Position of a child error subtree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKey {
    /// Field of an object, by declared name
    Field(String),
    /// Element of an array, by 0-based input position
    Index(usize),
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKey::Field(name) => write!(f, "{}", name),
            ErrorKey::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for ErrorKey {
    fn from(name: &str) -> Self {
        ErrorKey::Field(name.to_string())
    }
}

impl From<usize> for ErrorKey {
    fn from(index: usize) -> Self {
        ErrorKey::Index(index)
    }
}

/// Error tree mirroring the validated input
///
/// A subtree is empty iff it has no direct messages and no non-empty children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorTree {
    messages: Vec<String>,
    children: Vec<(ErrorKey, ErrorTree)>,
}

impl ErrorTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.children.is_empty()
    }

    /// Append a direct message
    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Attach a child subtree; empty subtrees are dropped
    pub fn insert(&mut self, key: ErrorKey, tree: ErrorTree) {
        if !tree.is_empty() {
            self.children.push((key, tree));
        }
    }

    /// Direct messages in the order they were appended
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Non-empty child subtrees in traversal order
    pub fn children(&self) -> &[(ErrorKey, ErrorTree)] {
        &self.children
    }

    pub fn get(&self, key: impl Into<ErrorKey>) -> Option<&ErrorTree> {
        let key = key.into();
        self.children
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, tree)| tree)
    }

    /// Look up a subtree by dotted path, e.g. `friends.0.name`
    pub fn get_path(&self, path: &str) -> Option<&ErrorTree> {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |tree, segment| {
                tree.get(segment).or_else(|| {
                    segment
                        .parse::<usize>()
                        .ok()
                        .and_then(|index| tree.get(index))
                })
            })
    }

    /// Messages at a dotted path, empty when the path has none
    pub fn messages_at(&self, path: &str) -> &[String] {
        self.get_path(path).map(ErrorTree::messages).unwrap_or_default()
    }

    /// Number of messages in the whole tree
    pub fn total_errors(&self) -> usize {
        self.messages.len()
            + self
                .children
                .iter()
                .map(|(_, tree)| tree.total_errors())
                .sum::<usize>()
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for ErrorTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.children.is_empty() {
            let mut seq = serializer.serialize_seq(Some(self.messages.len()))?;
            for message in &self.messages {
                seq.serialize_element(message)?;
            }
            return seq.end();
        }

        let extra = usize::from(!self.messages.is_empty());
        let mut map = serializer.serialize_map(Some(self.children.len() + extra))?;
        if !self.messages.is_empty() {
            map.serialize_entry(SELF_KEY, &self.messages)?;
        }
        for (key, tree) in &self.children {
            map.serialize_entry(&key.to_string(), tree)?;
        }
        map.end()
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn walk(tree: &ErrorTree, path: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            for message in &tree.messages {
                if path.is_empty() {
                    writeln!(f, "{}", message)?;
                } else {
                    writeln!(f, "{} {}", path, message)?;
                }
            }
            for (key, child) in &tree.children {
                let child_path = if path.is_empty() {
                    key.to_string()
                } else {
                    format!("{}.{}", path, key)
                };
                walk(child, &child_path, f)?;
            }
            Ok(())
        }

        if self.is_empty() {
            return write!(f, "No validation errors");
        }
        walk(self, "", f)
    }
}

impl std::error::Error for ErrorTree {}

/// Result of validating one input
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Normalized value with defaults applied and types projected
    pub value: Value,
    /// Errors keyed like the input; empty means valid
    pub errors: ErrorTree,
}

impl Outcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The value when valid, the error tree otherwise
    pub fn into_result(self) -> Result<Value, ErrorTree> {
        if self.errors.is_empty() {
            Ok(self.value)
        } else {
            Err(self.errors)
        }
    }

    /// Convert to a JSON-serializable format for API responses
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "error": {
                "code": "validation_failed",
                "message": "Validation failed",
                "fields": self.errors
            }
        })
    }
}
