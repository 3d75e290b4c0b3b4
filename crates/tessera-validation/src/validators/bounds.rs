//! Min/max validation through the kind's measurement

use super::{TOO_LARGE, TOO_LONG, TOO_SHORT, TOO_SMALL};
use crate::traits::ValidationRule;
use serde_json::Value;
use tessera_core::{KindBundle, MeasureUnit};

/// Which side of the range a bound limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Min,
    Max,
}

/// Validator for a node's `min` or `max` option
///
/// The bundle decides what is measured: characters of a string, items of an
/// array or the numeric value itself. Values the bundle cannot measure pass.
pub struct BoundsValidator<'b> {
    bound: Bound,
    limit: f64,
    bundle: &'b dyn KindBundle,
}

impl<'b> BoundsValidator<'b> {
    pub fn min(limit: f64, bundle: &'b dyn KindBundle) -> Self {
        Self {
            bound: Bound::Min,
            limit,
            bundle,
        }
    }

    pub fn max(limit: f64, bundle: &'b dyn KindBundle) -> Self {
        Self {
            bound: Bound::Max,
            limit,
            bundle,
        }
    }

    fn message(&self, unit: MeasureUnit) -> &'static str {
        match (self.bound, unit) {
            (Bound::Min, MeasureUnit::Length) => TOO_SHORT,
            (Bound::Min, MeasureUnit::Magnitude) => TOO_SMALL,
            (Bound::Max, MeasureUnit::Length) => TOO_LONG,
            (Bound::Max, MeasureUnit::Magnitude) => TOO_LARGE,
        }
    }
}

impl ValidationRule for BoundsValidator<'_> {
    fn validate(&self, value: &Value) -> Result<(), String> {
        let Some(measure) = self.bundle.measure(value) else {
            return Ok(());
        };

        let out_of_range = match self.bound {
            Bound::Min => measure.amount < self.limit,
            Bound::Max => measure.amount > self.limit,
        };
        if out_of_range {
            Err(self.message(measure.unit).to_string())
        } else {
            Ok(())
        }
    }

    fn rule_name(&self) -> &'static str {
        match self.bound {
            Bound::Min => "min",
            Bound::Max => "max",
        }
    }

    fn parameters(&self) -> Option<Value> {
        let mut params = serde_json::Map::new();
        params.insert(self.rule_name().to_string(), Value::from(self.limit));
        params.insert(
            "kind".to_string(),
            Value::String(self.bundle.kind_name().to_string()),
        );
        Some(Value::Object(params))
    }
}
