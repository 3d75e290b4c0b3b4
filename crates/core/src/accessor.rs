//! Reading field values out of host values

use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;

/// Reads a named member out of a host value
///
/// Returning `None` means the member is absent; accessors never fail.
pub trait Accessor: Send + Sync {
    fn access<'a>(&self, host: &'a Value, key: &str) -> Option<Cow<'a, Value>>;
}

/// Default accessor for keyed containers
///
/// Objects are read by key; arrays are read by a numeric key.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyedAccessor;

impl Accessor for KeyedAccessor {
    fn access<'a>(&self, host: &'a Value, key: &str) -> Option<Cow<'a, Value>> {
        match host {
            Value::Object(map) => map.get(key).map(Cow::Borrowed),
            Value::Array(items) => key
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index))
                .map(Cow::Borrowed),
            _ => None,
        }
    }
}

impl<F> Accessor for F
where
    F: Fn(&Value, &str) -> Option<Value> + Send + Sync,
{
    fn access<'a>(&self, host: &'a Value, key: &str) -> Option<Cow<'a, Value>> {
        self(host, key).map(Cow::Owned)
    }
}

/// Lift an arbitrary host object into a value the engines can read by member name
pub fn host_value<T: Serialize + ?Sized>(host: &T) -> Result<Value, serde_json::Error> {
    serde_json::to_value(host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Hero {
        name: String,
        power: u32,
    }

    #[test]
    fn test_keyed_access() {
        let host = json!({"name": "Thor", "tags": ["god", "hammer"]});
        assert_eq!(KeyedAccessor.access(&host, "name").as_deref(), Some(&json!("Thor")));
        assert!(KeyedAccessor.access(&host, "missing").is_none());

        let tags = &host["tags"];
        assert_eq!(KeyedAccessor.access(tags, "1").as_deref(), Some(&json!("hammer")));
        assert!(KeyedAccessor.access(&json!("scalar"), "name").is_none());
    }

    #[test]
    fn test_host_objects() {
        let hero = Hero {
            name: "Storm".into(),
            power: 9,
        };
        let host = host_value(&hero).unwrap();
        assert_eq!(KeyedAccessor.access(&host, "power").as_deref(), Some(&json!(9)));
    }

    #[test]
    fn test_closure_accessor() {
        let upper = |host: &Value, key: &str| host.get(key.to_lowercase()).cloned();
        let host = json!({"name": "Rogue"});
        assert_eq!(upper.access(&host, "NAME").map(Cow::into_owned), Some(json!("Rogue")));
    }
}
