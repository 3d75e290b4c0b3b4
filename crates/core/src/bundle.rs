//! Per-kind behaviour bundles
//!
//! The node model carries no type-specific behaviour. Engines look up a
//! [`KindBundle`] by kind name and use it for type checks, coercion,
//! measurement for min/max and serializer projection. New kinds register a
//! bundle with the registry; built-in bundles can be overridden the same way.

use crate::config::EngineConfig;
use once_cell::sync::Lazy;
use serde_json::{Number, Value};
use std::borrow::Cow;
use std::sync::Arc;

/// What a min/max bound is compared against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureUnit {
    /// Characters of a string or items of an array
    Length,
    /// Numeric value
    Magnitude,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measure {
    pub amount: f64,
    pub unit: MeasureUnit,
}

impl Measure {
    pub fn length(amount: usize) -> Self {
        Self {
            amount: amount as f64,
            unit: MeasureUnit::Length,
        }
    }

    pub fn magnitude(amount: f64) -> Self {
        Self {
            amount,
            unit: MeasureUnit::Magnitude,
        }
    }
}

/// Descriptor type and format for generated API documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DescriptorType {
    pub schema_type: Option<&'static str>,
    pub format: Option<&'static str>,
}

impl DescriptorType {
    pub const fn of(schema_type: &'static str) -> Self {
        Self {
            schema_type: Some(schema_type),
            format: None,
        }
    }

    pub const fn with_format(schema_type: &'static str, format: &'static str) -> Self {
        Self {
            schema_type: Some(schema_type),
            format: Some(format),
        }
    }
}

/// Behaviour of one attribute kind
pub trait KindBundle: Send + Sync {
    /// Kind name this bundle is registered under
    fn kind_name(&self) -> &str;

    /// Type check with coercion; `None` means the value is not of this kind
    fn coerce<'v>(&self, value: &'v Value, config: &EngineConfig) -> Option<Cow<'v, Value>>;

    /// Quantity compared against min/max, if the kind has one
    fn measure(&self, _value: &Value) -> Option<Measure> {
        None
    }

    /// Serializer projection; `None` makes the serializer treat the value as absent
    ///
    /// Defaults to [`KindBundle::coerce`] under the registry's configuration.
    fn project<'v>(&self, value: &'v Value, config: &EngineConfig) -> Option<Cow<'v, Value>> {
        self.coerce(value, config)
    }

    /// Value used for an absent field without a declared default
    fn empty_value(&self) -> Option<Value> {
        None
    }

    fn descriptor_type(&self) -> DescriptorType {
        DescriptorType::default()
    }
}

static BUILTIN_BUNDLES: Lazy<Vec<Arc<dyn KindBundle>>> = Lazy::new(|| {
    let bundles: [Arc<dyn KindBundle>; 7] = [
        Arc::new(StringBundle),
        Arc::new(BooleanBundle),
        Arc::new(NumberBundle),
        Arc::new(IntegerBundle),
        Arc::new(FloatBundle),
        Arc::new(ArrayBundle),
        Arc::new(ObjectBundle),
    ];
    bundles.into()
});

/// The bundles every registry starts with
pub fn builtin_bundles() -> &'static [Arc<dyn KindBundle>] {
    &BUILTIN_BUNDLES
}

pub struct StringBundle;

impl KindBundle for StringBundle {
    fn kind_name(&self) -> &str {
        "string"
    }

    fn coerce<'v>(&self, value: &'v Value, _config: &EngineConfig) -> Option<Cow<'v, Value>> {
        match value {
            Value::String(_) => Some(Cow::Borrowed(value)),
            _ => None,
        }
    }

    fn measure(&self, value: &Value) -> Option<Measure> {
        value.as_str().map(|text| Measure::length(text.chars().count()))
    }

    fn project<'v>(&self, value: &'v Value, _config: &EngineConfig) -> Option<Cow<'v, Value>> {
        match value {
            Value::String(_) => Some(Cow::Borrowed(value)),
            Value::Number(number) => Some(Cow::Owned(Value::String(number.to_string()))),
            Value::Bool(flag) => Some(Cow::Owned(Value::String(flag.to_string()))),
            _ => None,
        }
    }

    fn descriptor_type(&self) -> DescriptorType {
        DescriptorType::of("string")
    }
}

pub struct BooleanBundle;

impl KindBundle for BooleanBundle {
    fn kind_name(&self) -> &str {
        "boolean"
    }

    fn coerce<'v>(&self, value: &'v Value, config: &EngineConfig) -> Option<Cow<'v, Value>> {
        match value {
            Value::Bool(_) => Some(Cow::Borrowed(value)),
            Value::String(text) if config.coerce_strings => match text.as_str() {
                "true" => Some(Cow::Owned(Value::Bool(true))),
                "false" => Some(Cow::Owned(Value::Bool(false))),
                _ => None,
            },
            _ => None,
        }
    }

    fn descriptor_type(&self) -> DescriptorType {
        DescriptorType::of("boolean")
    }
}

pub struct NumberBundle;

impl KindBundle for NumberBundle {
    fn kind_name(&self) -> &str {
        "number"
    }

    fn coerce<'v>(&self, value: &'v Value, config: &EngineConfig) -> Option<Cow<'v, Value>> {
        match value {
            Value::Number(_) => Some(Cow::Borrowed(value)),
            Value::String(text) if config.coerce_strings => parse_number(text).map(Cow::Owned),
            _ => None,
        }
    }

    fn measure(&self, value: &Value) -> Option<Measure> {
        value.as_f64().map(Measure::magnitude)
    }

    fn descriptor_type(&self) -> DescriptorType {
        DescriptorType::of("number")
    }
}

pub struct IntegerBundle;

impl KindBundle for IntegerBundle {
    fn kind_name(&self) -> &str {
        "integer"
    }

    fn coerce<'v>(&self, value: &'v Value, config: &EngineConfig) -> Option<Cow<'v, Value>> {
        match value {
            Value::Number(number) if number.is_i64() || number.is_u64() => Some(Cow::Borrowed(value)),
            Value::Number(number) => number
                .as_f64()
                .filter(|float| float.fract() == 0.0 && float.abs() < i64::MAX as f64)
                .map(|float| Cow::Owned(Value::from(float as i64))),
            Value::String(text) if config.coerce_strings => {
                text.trim().parse::<i64>().ok().map(|int| Cow::Owned(Value::from(int)))
            }
            _ => None,
        }
    }

    fn measure(&self, value: &Value) -> Option<Measure> {
        value.as_f64().map(Measure::magnitude)
    }

    fn descriptor_type(&self) -> DescriptorType {
        DescriptorType::with_format("integer", "int64")
    }
}

pub struct FloatBundle;

impl KindBundle for FloatBundle {
    fn kind_name(&self) -> &str {
        "float"
    }

    fn coerce<'v>(&self, value: &'v Value, config: &EngineConfig) -> Option<Cow<'v, Value>> {
        let float = match value {
            Value::Number(number) if number.is_f64() => return Some(Cow::Borrowed(value)),
            Value::Number(number) => number.as_f64()?,
            Value::String(text) if config.coerce_strings => text.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        Number::from_f64(float).map(|number| Cow::Owned(Value::Number(number)))
    }

    fn measure(&self, value: &Value) -> Option<Measure> {
        value.as_f64().map(Measure::magnitude)
    }

    fn descriptor_type(&self) -> DescriptorType {
        DescriptorType::with_format("number", "float")
    }
}

pub struct ArrayBundle;

impl KindBundle for ArrayBundle {
    fn kind_name(&self) -> &str {
        "array"
    }

    fn coerce<'v>(&self, value: &'v Value, _config: &EngineConfig) -> Option<Cow<'v, Value>> {
        value.is_array().then_some(Cow::Borrowed(value))
    }

    fn measure(&self, value: &Value) -> Option<Measure> {
        value.as_array().map(|items| Measure::length(items.len()))
    }

    fn empty_value(&self) -> Option<Value> {
        Some(Value::Array(Vec::new()))
    }

    fn descriptor_type(&self) -> DescriptorType {
        DescriptorType::of("array")
    }
}

pub struct ObjectBundle;

impl KindBundle for ObjectBundle {
    fn kind_name(&self) -> &str {
        "object"
    }

    fn coerce<'v>(&self, value: &'v Value, _config: &EngineConfig) -> Option<Cow<'v, Value>> {
        value.is_object().then_some(Cow::Borrowed(value))
    }

    fn descriptor_type(&self) -> DescriptorType {
        DescriptorType::of("object")
    }
}

fn parse_number(text: &str) -> Option<Value> {
    let text = text.trim();
    if let Ok(int) = text.parse::<i64>() {
        return Some(Value::from(int));
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}
