//! Decoders that check a raw value against a single goal type.

use serde_json::{Map, Value};

use crate::decoder::{decoder, Decoder};
use crate::error::{Failure, ValueError};

/// Accepts strings.
pub fn string() -> impl Decoder<String> + Clone + Send + Sync {
    decoder(|value: &Value| -> Result<String, Failure> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(ValueError::wrong_type(other, "string").into()),
        }
    })
}

/// Accepts strings with at least one non-whitespace character.
///
/// Empty strings fail with [`ValueError::EmptyValue`], so an optional field
/// submitted blank falls back to its default.
pub fn non_empty_string() -> impl Decoder<String> + Clone + Send + Sync {
    decoder(|value: &Value| -> Result<String, Failure> {
        match value {
            Value::String(s) if s.trim().is_empty() => {
                Err(ValueError::empty(value, "expected a non-empty string").into())
            }
            Value::String(s) => Ok(s.clone()),
            other => Err(ValueError::wrong_type(other, "string").into()),
        }
    })
}

/// Accepts integers. Floats are rejected even when they have no fraction.
pub fn integer() -> impl Decoder<i64> + Clone + Send + Sync {
    decoder(|value: &Value| -> Result<i64, Failure> {
        value
            .as_i64()
            .ok_or_else(|| ValueError::wrong_type(value, "int").into())
    })
}

/// Accepts any number, integer or float.
pub fn number() -> impl Decoder<f64> + Clone + Send + Sync {
    decoder(|value: &Value| -> Result<f64, Failure> {
        value
            .as_f64()
            .ok_or_else(|| ValueError::wrong_type(value, "number").into())
    })
}

/// Accepts `true` and `false` only. See [`boolean_ish`](super::boolean_ish)
/// for the lenient form.
pub fn boolean() -> impl Decoder<bool> + Clone + Send + Sync {
    decoder(|value: &Value| -> Result<bool, Failure> {
        value
            .as_bool()
            .ok_or_else(|| ValueError::wrong_type(value, "bool").into())
    })
}

/// Accepts objects, returned as-is.
pub fn object() -> impl Decoder<Map<String, Value>> + Clone + Send + Sync {
    decoder(|value: &Value| -> Result<Map<String, Value>, Failure> {
        match value {
            Value::Object(map) => Ok(map.clone()),
            other => Err(ValueError::wrong_type(other, "object").into()),
        }
    })
}

/// Accepts arrays without looking at their elements.
pub fn array_of_mixed() -> impl Decoder<Vec<Value>> + Clone + Send + Sync {
    decoder(|value: &Value| -> Result<Vec<Value>, Failure> {
        match value {
            Value::Array(items) => Ok(items.clone()),
            other => Err(ValueError::wrong_type(other, "array").into()),
        }
    })
}

/// Accepts anything except `null`.
pub fn mixed() -> impl Decoder<Value> + Clone + Send + Sync {
    decoder(|value: &Value| -> Result<Value, Failure> {
        if value.is_null() {
            return Err(ValueError::wrong_type(value, "non-null").into());
        }
        Ok(value.clone())
    })
}

/// Alias of [`mixed`].
pub fn non_null() -> impl Decoder<Value> + Clone + Send + Sync {
    mixed()
}
