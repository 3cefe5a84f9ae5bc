use std::fmt;

use serde::{Deserialize, Serialize};

/// Field value held by a record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Key used when comparing values for uniqueness.
    ///
    /// Ints and floats with the same numeric value collide, text is compared
    /// verbatim.
    pub fn unique_key(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(value) => format!("b:{value}"),
            Value::Int(value) => format!("n:{value}"),
            Value::Float(value) if is_exact_int(*value) => format!("n:{}", *value as i64),
            Value::Float(value) => format!("n:{value}"),
            Value::Text(value) => format!("s:{value}"),
        }
    }
}

/// Integral and inside the `i64` range, so the `as` cast keeps the value.
/// `i64::MAX as f64` rounds up to 2^63, hence the strict upper bound.
fn is_exact_int(value: f64) -> bool {
    value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value}"),
            Value::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_plain_text() {
        assert_eq!(Value::from("Jack").to_string(), "Jack");
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn integral_floats_share_unique_key_with_ints() {
        assert_eq!(Value::Float(3.0).unique_key(), Value::Int(3).unique_key());
        assert_ne!(Value::from("3").unique_key(), Value::Int(3).unique_key());
    }

    #[test]
    fn floats_beyond_i64_keep_their_own_key() {
        assert_ne!(Value::Float(1e19).unique_key(), Value::Float(2e19).unique_key());
        assert_ne!(
            Value::Float(9_223_372_036_854_775_808.0).unique_key(),
            Value::Int(i64::MAX).unique_key()
        );
        assert_ne!(Value::Float(-1e19).unique_key(), Value::Int(i64::MIN).unique_key());
        assert_eq!(
            Value::Float(-9_223_372_036_854_775_808.0).unique_key(),
            Value::Int(i64::MIN).unique_key()
        );
    }

    #[test]
    fn deserializes_untagged_json() {
        let values: Vec<Value> = serde_json::from_str(r#"[null, true, 7, 1.5, "x"]"#)
            .expect("valid json");
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Bool(true),
                Value::Int(7),
                Value::Float(1.5),
                Value::from("x"),
            ]
        );
    }
}
