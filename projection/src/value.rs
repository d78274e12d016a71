//! Values crossing the facade boundary.

use crate::ManagedInstance;
use keel_core::Value;

/// The result of reading a property, or the argument of writing one.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Plain value of an unmanaged property.
    Value(Value),
    /// Live instance of a managed property.
    Managed(ManagedInstance),
}

impl PropertyValue {
    pub fn is_managed(&self) -> bool {
        matches!(self, PropertyValue::Managed(_))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            PropertyValue::Value(value) => Some(value),
            PropertyValue::Managed(_) => None,
        }
    }

    pub fn as_managed(&self) -> Option<&ManagedInstance> {
        match self {
            PropertyValue::Managed(instance) => Some(instance),
            PropertyValue::Value(_) => None,
        }
    }

    /// Short description for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            PropertyValue::Value(value) => value.type_name().to_string(),
            PropertyValue::Managed(instance) => format!("managed {}", instance.model_type()),
        }
    }
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        PropertyValue::Value(value)
    }
}

impl From<ManagedInstance> for PropertyValue {
    fn from(instance: ManagedInstance) -> Self {
        PropertyValue::Managed(instance)
    }
}

impl From<&ManagedInstance> for PropertyValue {
    fn from(instance: &ManagedInstance) -> Self {
        PropertyValue::Managed(instance.clone())
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Value(Value::from(s))
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Value(Value::from(s))
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Value(Value::Int(i))
    }
}

impl From<f64> for PropertyValue {
    fn from(f: f64) -> Self {
        PropertyValue::Value(Value::Float(f))
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Value(Value::Bool(b))
    }
}

/// Conversion from a property value into a Rust type.
///
/// On failure the original value is handed back for diagnostics.
pub trait FromPropertyValue: Sized {
    /// Name used in conversion errors.
    const EXPECTED: &'static str;

    fn from_property_value(value: PropertyValue) -> Result<Self, PropertyValue>;
}

impl FromPropertyValue for PropertyValue {
    const EXPECTED: &'static str = "any value";

    fn from_property_value(value: PropertyValue) -> Result<Self, PropertyValue> {
        Ok(value)
    }
}

impl FromPropertyValue for Value {
    const EXPECTED: &'static str = "a plain value";

    fn from_property_value(value: PropertyValue) -> Result<Self, PropertyValue> {
        match value {
            PropertyValue::Value(value) => Ok(value),
            other => Err(other),
        }
    }
}

impl FromPropertyValue for ManagedInstance {
    const EXPECTED: &'static str = "a managed instance";

    fn from_property_value(value: PropertyValue) -> Result<Self, PropertyValue> {
        match value {
            PropertyValue::Managed(instance) => Ok(instance),
            other => Err(other),
        }
    }
}

macro_rules! optional_scalar {
    ($ty:ty, $expected:literal, $variant:ident) => {
        impl FromPropertyValue for Option<$ty> {
            const EXPECTED: &'static str = $expected;

            fn from_property_value(value: PropertyValue) -> Result<Self, PropertyValue> {
                match value {
                    PropertyValue::Value(Value::Null) => Ok(None),
                    PropertyValue::Value(Value::$variant(v)) => Ok(Some(v)),
                    other => Err(other),
                }
            }
        }
    };
}

optional_scalar!(String, "an optional String", String);
optional_scalar!(i64, "an optional Int", Int);
optional_scalar!(bool, "an optional Bool", Bool);
optional_scalar!(Vec<Value>, "an optional List", List);

impl FromPropertyValue for Option<f64> {
    const EXPECTED: &'static str = "an optional Float";

    fn from_property_value(value: PropertyValue) -> Result<Self, PropertyValue> {
        match value {
            PropertyValue::Value(Value::Null) => Ok(None),
            PropertyValue::Value(Value::Float(f)) => Ok(Some(f)),
            PropertyValue::Value(Value::Int(i)) => Ok(Some(i as f64)),
            other => Err(other),
        }
    }
}
