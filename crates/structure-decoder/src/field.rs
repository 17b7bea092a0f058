//! Single-field decoding: stop at the first problem.

use serde_json::Value;

use crate::decoder::Decoder;
use crate::error::{DecodeError, Failure, StructuralError, ValueError};
use crate::subject::Subject;

/// Finds `name` on the subject, failing with `UnsupportedStructure` or
/// `MissingField`.
fn lookup<'a>(subject: &Subject<'a>, name: &str) -> Result<&'a Value, DecodeError> {
    if let Subject::Unsupported(value) = *subject {
        return Err(DecodeError::new(
            value.clone(),
            StructuralError::unsupported(value),
            None,
        ));
    }
    subject.get(name).ok_or_else(|| {
        let snapshot = subject.to_value();
        DecodeError::new(
            snapshot.clone(),
            StructuralError::missing_field(snapshot, name),
            None,
        )
    })
}

/// Decodes the field `name` of `subject` with `decoder`.
///
/// A field bound to `null` counts as missing. Any failure of the decoder is
/// returned as a [`DecodeError`] whose path starts with `name`.
///
/// ```
/// use serde_json::json;
/// use structure_decoder::types::{array_of, integer};
/// use structure_decoder::decode_field;
///
/// let payload = json!({"ids": [1, 2, "three"]});
/// let err = decode_field(&payload, "ids", array_of(integer())).unwrap_err();
///
/// assert_eq!(err.path(), ["ids", "2"]);
/// assert_eq!(
///     err.to_string(),
///     "At [ids->2], failed decoding value: expected type [int] but got [string]."
/// );
/// ```
pub fn decode_field<'a, T>(
    subject: impl Into<Subject<'a>>,
    name: &str,
    decoder: impl Decoder<T>,
) -> Result<T, DecodeError> {
    let subject = subject.into();
    let value = lookup(&subject, name)?;
    tracing::trace!(field = name, "decoding field");
    decoder
        .decode(value)
        .map_err(|e| DecodeError::new(subject.to_value(), e, Some(name)))
}

/// Decodes the field `name` of `subject`, falling back to `default` when the
/// field is missing or the decoder reports it empty.
///
/// Only a missing field or an [`ValueError::EmptyValue`] raised by `decoder`
/// itself yields the default. Failures from deeper levels, such as an empty
/// element inside a list, still propagate, as do all other errors.
///
/// ```
/// use serde_json::json;
/// use structure_decoder::types::non_empty_string;
/// use structure_decoder::decode_optional_field;
///
/// let form = json!({"nickname": ""});
/// let anon = Some("anon".to_string());
/// let nickname = decode_optional_field(&form, "nickname", non_empty_string(), anon.clone());
/// assert_eq!(nickname, Ok(anon));
/// ```
pub fn decode_optional_field<'a, T>(
    subject: impl Into<Subject<'a>>,
    name: &str,
    decoder: impl Decoder<T>,
    default: Option<T>,
) -> Result<Option<T>, DecodeError> {
    let subject = subject.into();
    let value = match lookup(&subject, name) {
        Ok(value) => value,
        Err(e) if e.final_cause().is_missing_field() => {
            tracing::trace!(field = name, "optional field missing, using default");
            return Ok(default);
        }
        Err(e) => return Err(e),
    };
    match decoder.decode(value) {
        Ok(decoded) => Ok(Some(decoded)),
        Err(Failure::Value(ValueError::EmptyValue { .. }))
        | Err(Failure::Structural(StructuralError::MissingField { .. })) => {
            tracing::trace!(field = name, "optional field empty, using default");
            Ok(default)
        }
        Err(e) => Err(DecodeError::new(subject.to_value(), e, Some(name))),
    }
}
