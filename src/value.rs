//! Property values on both sides of the adapter.
//!
//! [`PropertyValue`] is what callers hand to the graph API, [`Value`] is what
//! the engine stores and looks up. Index lookups go through [`coerce`], a
//! closed table keyed by the attribute's declared [`DataType`]; property
//! writes go through [`PropertyValue::to_native`], which derives the data kind
//! from the value itself.

use std::fmt;

use crate::errors::TypedGraphError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    Boolean,
    Integer,
    Long,
    Double,
    String,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Boolean => "boolean",
            DataType::Integer => "integer",
            DataType::Long => "long",
            DataType::Double => "double",
            DataType::String => "string",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "boolean" => Some(DataType::Boolean),
            "integer" => Some(DataType::Integer),
            "long" => Some(DataType::Long),
            "double" => Some(DataType::Double),
            "string" => Some(DataType::String),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine-native typed value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Boolean(bool),
    Integer(i32),
    Long(i64),
    Double(f64),
    String(String),
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Boolean(_) => DataType::Boolean,
            Value::Integer(_) => DataType::Integer,
            Value::Long(_) => DataType::Long,
            Value::Double(_) => DataType::Double,
            Value::String(_) => DataType::String,
        }
    }
}

/// Generic property value accepted by the graph API.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
}

impl PropertyValue {
    /// Data kind an attribute gets when it is created from this value.
    pub fn data_type(&self) -> DataType {
        match self {
            PropertyValue::Bool(_) => DataType::Boolean,
            PropertyValue::Int(_) => DataType::Integer,
            PropertyValue::Long(_) => DataType::Long,
            PropertyValue::Float(_) | PropertyValue::Double(_) => DataType::Double,
            PropertyValue::String(_) => DataType::String,
        }
    }

    pub fn to_native(&self) -> Value {
        match self {
            PropertyValue::Bool(v) => Value::Boolean(*v),
            PropertyValue::Int(v) => Value::Integer(*v),
            PropertyValue::Long(v) => Value::Long(*v),
            PropertyValue::Float(v) => Value::Double(f64::from(*v)),
            PropertyValue::Double(v) => Value::Double(*v),
            PropertyValue::String(v) => Value::String(v.clone()),
        }
    }

    /// Equality against a stored value, under the same coercion an index
    /// lookup would apply. Values that do not coerce never match.
    pub fn matches(&self, stored: &Value) -> bool {
        coerce(stored.data_type(), self).is_ok_and(|wanted| wanted == *stored)
    }
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Boolean(v) => PropertyValue::Bool(v),
            Value::Integer(v) => PropertyValue::Int(v),
            Value::Long(v) => PropertyValue::Long(v),
            Value::Double(v) => PropertyValue::Double(v),
            Value::String(v) => PropertyValue::String(v),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Long(value)
    }
}

impl From<f32> for PropertyValue {
    fn from(value: f32) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Double(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(v) => write!(f, "{v}"),
            PropertyValue::Int(v) => write!(f, "{v}"),
            PropertyValue::Long(v) => write!(f, "{v}"),
            PropertyValue::Float(v) => write!(f, "{v}"),
            PropertyValue::Double(v) => write!(f, "{v}"),
            PropertyValue::String(v) => f.write_str(v),
        }
    }
}

/// Converts `value` into the engine value used to look up an attribute of kind
/// `data_type`.
pub fn coerce(data_type: DataType, value: &PropertyValue) -> Result<Value, TypedGraphError> {
    match (data_type, value) {
        (DataType::Boolean, PropertyValue::Bool(v)) => Ok(Value::Boolean(*v)),
        (DataType::Integer, PropertyValue::Int(v)) => Ok(Value::Integer(*v)),
        (DataType::Long, PropertyValue::Long(v)) => Ok(Value::Long(*v)),
        (DataType::String, PropertyValue::String(v)) => Ok(Value::String(v.clone())),
        (DataType::Double, PropertyValue::Double(v)) => Ok(Value::Double(*v)),
        (DataType::Double, PropertyValue::Float(v)) => Ok(Value::Double(f64::from(*v))),
        (data_type, value) => Err(TypedGraphError::unsupported(format!(
            "cannot use {value:?} to look up a {data_type} attribute"
        ))),
    }
}
