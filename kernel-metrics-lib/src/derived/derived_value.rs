use compact_str::CompactString;
use core::fmt;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// The value computed for one derived metric
#[derive(Debug, Clone, PartialEq)]
pub enum DerivedValue {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(CompactString),
}

impl DerivedValue {
    /// Convert a scalar JSON value; null, arrays and objects have no derived equivalent
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Boolean(*b)),
            Value::Number(n) => n.as_i64().map(Self::Integer).or_else(|| n.as_f64().map(Self::Float)),
            Value::String(s) => Some(Self::String(CompactString::from(s.as_str()))),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Integer(i) => Value::from(*i),
            Self::Float(f) => Value::from(*f),
            Self::Boolean(b) => Value::Bool(*b),
            Self::String(s) => Value::String(s.to_string()),
        }
    }

    /// Zero, `false` and the empty string are falsy
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Integer(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Boolean(b) => *b,
            Self::String(s) => !s.is_empty(),
        }
    }

    /// Numeric view of the value; booleans count as 1 and 0
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "metric counts stay far below 2^52")]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Boolean(b) => Some(f64::from(u8::from(*b))),
            Self::String(_) => None,
        }
    }
}

impl fmt::Display for DerivedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            // Debug keeps the trailing `.0` on whole floats
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

impl Serialize for DerivedValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::String(s) => serializer.serialize_str(s),
        }
    }
}
