//! Lenient decoders for values that arrive as text, such as form posts and
//! query strings.

use serde_json::Value;

use crate::decoder::{decoder, Decoder};
use crate::error::{Failure, ValueError};

const TRUTHY: [&str; 4] = ["true", "t", "on", "yes"];
const FALSY: [&str; 4] = ["false", "f", "off", "no"];
/// Blanks stripped around numeric text. Unicode spaces are not among them.
const BLANKS: [char; 6] = [' ', '\t', '\n', '\r', '\0', '\x0B'];

/// Accepts booleans and the usual spellings of them.
///
/// | input | result |
/// |-------|--------|
/// | `true` / `false` | itself |
/// | `1`, `1.0`, `"1"` | `true` |
/// | `0`, `0.0`, `"0"` | `false` |
/// | `"true"`, `"t"`, `"on"`, `"yes"` (any case) | `true` |
/// | `"false"`, `"f"`, `"off"`, `"no"` (any case) | `false` |
///
/// Anything else fails with `WrongType("boolean-ish")`.
pub fn boolean_ish() -> impl Decoder<bool> + Clone + Send + Sync {
    decoder(|value: &Value| -> Result<bool, Failure> {
        let decoded = match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => match n.as_f64() {
                Some(f) if f == 1.0 => Some(true),
                Some(f) if f == 0.0 => Some(false),
                _ => None,
            },
            Value::String(s) if s == "1" => Some(true),
            Value::String(s) if s == "0" => Some(false),
            Value::String(s) => {
                let lower = s.to_lowercase();
                if TRUTHY.contains(&lower.as_str()) {
                    Some(true)
                } else if FALSY.contains(&lower.as_str()) {
                    Some(false)
                } else {
                    None
                }
            }
            _ => None,
        };
        decoded.ok_or_else(|| ValueError::wrong_type(value, "boolean-ish").into())
    })
}

/// Accepts strings holding a whole number, e.g. `" 007 "`.
///
/// Surrounding ASCII blanks and, for non-negative numbers, leading zeros are
/// ignored. What remains must be an optional `-` followed by digits only, and
/// must convert to an `i64` that prints back to exactly the same text. That
/// rules out fractions (`"1.5"`), `+` signs, exponents, a sign after the
/// zeros (`"00-7"`) and padded negatives (`"-007"`).
pub fn int_of_string() -> impl Decoder<i64> + Clone + Send + Sync {
    decoder(|value: &Value| -> Result<i64, Failure> {
        let wrong_type =
            || -> Failure { ValueError::wrong_type_with_value(value, "int as string").into() };
        let Value::String(s) = value else {
            return Err(wrong_type());
        };
        let trimmed = s.trim_matches(&BLANKS[..]);
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(wrong_type());
        }
        let canonical = if negative {
            trimmed
        } else {
            match digits.trim_start_matches('0') {
                "" => "0",
                rest => rest,
            }
        };
        match canonical.parse::<i64>() {
            Ok(n) if n.to_string() == canonical => Ok(n),
            _ => Err(wrong_type()),
        }
    })
}
