//! INI value representation and scalar type inference.

use std::fmt;

use crate::error::ErrorKind;

/// A typed property value.
#[derive(Clone, PartialEq)]
pub enum Value {
    /// Empty value (`key=`).
    Null,
    /// Boolean value (`true` or `false`).
    Bool(bool),
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit floating-point number.
    Float(f64),
    /// Any other text, or a quoted value.
    String(String),
}

impl Value {
    /// Infer a typed value from a trimmed, unquoted raw value.
    ///
    /// Rules in priority order:
    /// - `""` is null
    /// - `true` / `false` are booleans (case-sensitive)
    /// - digits without a leading zero (or exactly `0`) are integers
    /// - `digits.digits` is a float
    /// - everything else is a string
    pub fn infer(raw: &str) -> Result<Value, ErrorKind> {
        match raw {
            "" => return Ok(Value::Null),
            "true" => return Ok(Value::Bool(true)),
            "false" => return Ok(Value::Bool(false)),
            _ => {}
        }

        if is_integer(raw) {
            return raw
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|source| ErrorKind::InvalidInteger {
                    value: raw.to_string(),
                    source,
                });
        }

        if is_float(raw) {
            let invalid = |reason: String| ErrorKind::InvalidFloat {
                value: raw.to_string(),
                reason,
            };
            // Out-of-range literals parse to infinity rather than failing.
            return match raw.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Value::Float(f)),
                Ok(_) => Err(invalid("number too large to fit in target type".to_string())),
                Err(e) => Err(invalid(e.to_string())),
            };
        }

        Ok(Value::String(raw.to_string()))
    }

    /// Returns `true` if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the boolean value if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer value if this is an `Integer`.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the float value if this is a `Float`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns a reference to the string if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

/// `0`, or ASCII digits not starting with `0`. No sign.
fn is_integer(s: &str) -> bool {
    if s.is_empty() || (s.len() > 1 && s.starts_with('0')) {
        return false;
    }
    s.bytes().all(|b| b.is_ascii_digit())
}

/// One or more digits, a dot, one or more digits.
fn is_float(s: &str) -> bool {
    match s.split_once('.') {
        Some((int, frac)) => is_digits(int) && is_digits(frac),
        None => false,
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{:?}", n),
            Value::String(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}
