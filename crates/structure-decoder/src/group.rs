//! Group decoding: evaluate every declared field and collect every outcome.
//!
//! [`decode_field`](crate::decode_field) stops at the first problem, which
//! suits structured sources such as APIs and databases. A person filling in a
//! form wants to hear about every problem at once, so
//! [`decode_field_group`] isolates failures per field instead.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

use crate::decoder::{boxed, BoxedDecoder, Decoder};
use crate::error::{DecodeError, StructuralError};
use crate::field::{decode_field, decode_optional_field};
use crate::subject::Subject;

/// Declares one expected field and how to decode it.
pub struct FieldSpec<T> {
    name: String,
    decoder: BoxedDecoder<T>,
    required: bool,
    default: Option<T>,
}

impl<T> FieldSpec<T> {
    /// A field that must be present and decode cleanly.
    pub fn required<D>(name: impl Into<String>, decoder: D) -> Self
    where
        D: Decoder<T> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            decoder: boxed(decoder),
            required: true,
            default: None,
        }
    }

    /// A field that takes `default` when missing or empty.
    pub fn optional<D>(name: impl Into<String>, decoder: D, default: Option<T>) -> Self
    where
        D: Decoder<T> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            decoder: boxed(decoder),
            required: false,
            default,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default_value(&self) -> Option<&T> {
        self.default.as_ref()
    }
}

impl<T: fmt::Debug> fmt::Debug for FieldSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}

/// The outcome of decoding one field of a group.
///
/// When `error` is set, `value` is `None`. An optional field that fell back to
/// a `None` default has neither.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue<T> {
    /// Name of the field as declared in its [`FieldSpec`].
    pub name: String,
    pub value: Option<T>,
    pub error: Option<DecodeError>,
}

impl<T> FieldValue<T> {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<Option<T>, DecodeError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.value),
        }
    }
}

/// Outcomes of a group decode, keyed by field name in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldGroup<T> {
    values: IndexMap<String, FieldValue<T>>,
}

impl<T> FieldGroup<T> {
    pub fn get(&self, name: &str) -> Option<&FieldValue<T>> {
        self.values.get(name)
    }

    /// The decoded value of `name`, if it decoded to one.
    pub fn value(&self, name: &str) -> Option<&T> {
        self.values.get(name).and_then(|v| v.value.as_ref())
    }

    /// True when no field failed.
    pub fn is_ok(&self) -> bool {
        self.values.values().all(FieldValue::is_ok)
    }

    pub fn errors(&self) -> impl Iterator<Item = (&str, &DecodeError)> {
        self.values
            .iter()
            .filter_map(|(name, v)| v.error.as_ref().map(|e| (name.as_str(), e)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue<T>)> {
        self.values.iter().map(|(name, v)| (name.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_map(self) -> IndexMap<String, FieldValue<T>> {
        self.values
    }

    /// Field name to error report, for every failing field.
    pub fn error_report(&self) -> Value {
        let report: Map<String, Value> = self
            .errors()
            .map(|(name, e)| (name.to_string(), e.to_json()))
            .collect();
        Value::Object(report)
    }
}

fn check_duplicates<T>(subject: &Subject<'_>, fields: &[FieldSpec<T>]) -> Result<(), DecodeError> {
    let mut seen = HashSet::with_capacity(fields.len());
    for field in fields {
        if !seen.insert(field.name.as_str()) {
            let snapshot = subject.to_value();
            return Err(DecodeError::new(
                snapshot.clone(),
                StructuralError::duplicate_field(snapshot, field.name.as_str()),
                None,
            ));
        }
    }
    Ok(())
}

/// Decodes every field in `fields` against `subject`, collecting one
/// [`FieldValue`] per field without stopping at failures.
///
/// The only error returned directly is `DuplicateField`, raised before any
/// field is evaluated when two specs share a name.
///
/// ```
/// use serde_json::json;
/// use structure_decoder::types::{integer, map, non_empty_string};
/// use structure_decoder::{decode_field_group, FieldSpec};
///
/// let form = json!({"name": "", "age": "ten"});
/// let fields = [
///     FieldSpec::required("name", map(non_empty_string(), serde_json::Value::from)),
///     FieldSpec::required("age", map(integer(), serde_json::Value::from)),
/// ];
///
/// let group = decode_field_group(&form, &fields).unwrap();
/// assert_eq!(group.errors().count(), 2);
/// ```
pub fn decode_field_group<'a, T: Clone>(
    subject: impl Into<Subject<'a>>,
    fields: &[FieldSpec<T>],
) -> Result<FieldGroup<T>, DecodeError> {
    let subject = subject.into();
    check_duplicates(&subject, fields)?;

    let mut values = IndexMap::with_capacity(fields.len());
    for field in fields {
        let outcome = if field.required {
            decode_field(subject, &field.name, &field.decoder).map(Some)
        } else {
            decode_optional_field(subject, &field.name, &field.decoder, field.default.clone())
        };
        let value = match outcome {
            Ok(value) => FieldValue {
                name: field.name.clone(),
                value,
                error: None,
            },
            Err(error) => {
                tracing::debug!(field = %field.name, error = %error, "field failed to decode");
                FieldValue {
                    name: field.name.clone(),
                    value: None,
                    error: Some(error),
                }
            }
        };
        values.insert(field.name.clone(), value);
    }

    let group = FieldGroup { values };
    tracing::debug!(
        fields = group.len(),
        failed = group.errors().count(),
        "decoded field group"
    );
    Ok(group)
}
