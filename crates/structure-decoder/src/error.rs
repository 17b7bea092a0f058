//! Error model.
//!
//! Decoders fail with a [`Failure`]: either a bare cause ([`StructuralError`]
//! or [`ValueError`]) or an already path-annotated [`DecodeError`] bubbling up
//! from a nested combinator. [`DecodeError`] is the only error that crosses
//! the field-decode boundary. It carries one flattened [`Path`] and the
//! innermost [`Cause`], however deep the failure happened.

use serde_json::{json, Value};
use std::fmt;
use thiserror::Error;

/// A single path segment: an object key or an array index rendered as a string.
pub type PathStep = String;

/// Ordered segments from the outermost decode call to the failing element.
pub type Path = Vec<PathStep>;

/// Returns the type name used in error messages for a raw value.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ------------------------------------------------------------------ Causes

/// A problem with the shape or presence of a field, independent of its value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StructuralError {
    #[error("Failed decoding field [{field_name}]: Missing field [{field_name}].")]
    MissingField { subject: Value, field_name: String },

    #[error(
        "Failed decoding field [{field_name}]: The field [{field_name}] has already been decoded on this subject."
    )]
    DuplicateField { subject: Value, field_name: String },

    #[error(
        "Failed decoding structure: Subject must be an associative array or an object. Subject is of type [{got}]."
    )]
    UnsupportedStructure { subject: Value, got: String },

    #[error("Failed decoding structure: No decoders were supplied to try.")]
    NoDecoders { value: Value },
}

impl StructuralError {
    pub fn missing_field(subject: Value, field_name: impl Into<String>) -> Self {
        Self::MissingField {
            subject,
            field_name: field_name.into(),
        }
    }

    pub fn duplicate_field(subject: Value, field_name: impl Into<String>) -> Self {
        Self::DuplicateField {
            subject,
            field_name: field_name.into(),
        }
    }

    pub fn unsupported(subject: &Value) -> Self {
        Self::UnsupportedStructure {
            got: type_name(subject).to_string(),
            subject: subject.clone(),
        }
    }

    /// Name of the field the error is about, when it is about one.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Self::MissingField { field_name, .. } | Self::DuplicateField { field_name, .. } => {
                Some(field_name)
            }
            Self::UnsupportedStructure { .. } | Self::NoDecoders { .. } => None,
        }
    }

    /// The structure (or, for [`StructuralError::NoDecoders`], the value) being decoded.
    pub fn subject(&self) -> &Value {
        match self {
            Self::MissingField { subject, .. }
            | Self::DuplicateField { subject, .. }
            | Self::UnsupportedStructure { subject, .. } => subject,
            Self::NoDecoders { value } => value,
        }
    }

    /// The message without the `Failed decoding ...:` prefix.
    pub fn reason(&self) -> String {
        match self {
            Self::MissingField { field_name, .. } => format!("Missing field [{field_name}]."),
            Self::DuplicateField { field_name, .. } => {
                format!("The field [{field_name}] has already been decoded on this subject.")
            }
            Self::UnsupportedStructure { got, .. } => format!(
                "Subject must be an associative array or an object. Subject is of type [{got}]."
            ),
            Self::NoDecoders { .. } => "No decoders were supplied to try.".to_string(),
        }
    }
}

/// A problem with the value of a field that is present.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("Failed decoding value: {}.", wrong_type_reason(.value, .expected_type, .include_value))]
    WrongType {
        value: Value,
        expected_type: String,
        /// Whether the offending value is echoed in the message.
        include_value: bool,
    },

    /// The value is present but "empty": a zero-length string, an empty list.
    #[error("Failed decoding value: {reason}.")]
    EmptyValue { value: Value, reason: String },

    /// Length, character-set and similar caller-defined restrictions.
    #[error("Failed decoding value: {reason}.")]
    BrokenConstraint { value: Value, reason: String },
}

fn wrong_type_reason(value: &Value, expected_type: &str, include_value: &bool) -> String {
    let got = type_name(value);
    if *include_value {
        let shown = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        format!("expected type [{expected_type}] but got [{got}: {shown}]")
    } else {
        format!("expected type [{expected_type}] but got [{got}]")
    }
}

impl ValueError {
    pub fn wrong_type(value: &Value, expected_type: impl Into<String>) -> Self {
        Self::WrongType {
            value: value.clone(),
            expected_type: expected_type.into(),
            include_value: false,
        }
    }

    /// Like [`ValueError::wrong_type`] but echoes the value in the message,
    /// useful when a string is expected to hold some other type.
    pub fn wrong_type_with_value(value: &Value, expected_type: impl Into<String>) -> Self {
        Self::WrongType {
            value: value.clone(),
            expected_type: expected_type.into(),
            include_value: true,
        }
    }

    pub fn empty(value: &Value, reason: impl Into<String>) -> Self {
        Self::EmptyValue {
            value: value.clone(),
            reason: reason.into(),
        }
    }

    pub fn broken_constraint(value: &Value, reason: impl Into<String>) -> Self {
        Self::BrokenConstraint {
            value: value.clone(),
            reason: reason.into(),
        }
    }

    pub fn value(&self) -> &Value {
        match self {
            Self::WrongType { value, .. }
            | Self::EmptyValue { value, .. }
            | Self::BrokenConstraint { value, .. } => value,
        }
    }

    pub fn reason(&self) -> String {
        match self {
            Self::WrongType {
                value,
                expected_type,
                include_value,
            } => wrong_type_reason(value, expected_type, include_value),
            Self::EmptyValue { reason, .. } | Self::BrokenConstraint { reason, .. } => {
                reason.clone()
            }
        }
    }

    /// Expected type name for [`ValueError::WrongType`].
    pub fn expected_type(&self) -> Option<&str> {
        match self {
            Self::WrongType { expected_type, .. } => Some(expected_type),
            _ => None,
        }
    }
}

/// The root cause of a [`DecodeError`]. Never another `DecodeError`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Cause {
    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    Value(#[from] ValueError),
}

impl Cause {
    pub fn is_missing_field(&self) -> bool {
        matches!(self, Self::Structural(StructuralError::MissingField { .. }))
    }

    pub fn is_empty_value(&self) -> bool {
        matches!(self, Self::Value(ValueError::EmptyValue { .. }))
    }

    pub fn as_structural(&self) -> Option<&StructuralError> {
        match self {
            Self::Structural(e) => Some(e),
            Self::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&ValueError> {
        match self {
            Self::Value(e) => Some(e),
            Self::Structural(_) => None,
        }
    }
}

/// Anything a decoder may fail with.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Failure {
    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    Value(#[from] ValueError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl From<Cause> for Failure {
    fn from(cause: Cause) -> Self {
        match cause {
            Cause::Structural(e) => Self::Structural(e),
            Cause::Value(e) => Self::Value(e),
        }
    }
}

// ------------------------------------------------------------- DecodeError

/// Controls how a [`DecodeError`] renders as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Joins path segments inside the `At [...]` breadcrumb.
    pub separator: String,
    /// Lower-case the first letter of the cause message when a path is shown.
    pub lowercase_cause: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            separator: "->".to_string(),
            lowercase_cause: true,
        }
    }
}

/// A failure located by a path within the decoded subject.
///
/// Built with [`DecodeError::new`], which merges nested `DecodeError`s instead
/// of wrapping them again:
///
/// ```
/// use serde_json::json;
/// use structure_decoder::{DecodeError, ValueError};
///
/// let wrong = ValueError::wrong_type(&json!("x"), "int");
/// let inner = DecodeError::new(json!("x"), wrong, Some("0"));
/// let outer = DecodeError::new(json!({"ids": ["x"]}), inner, Some("ids"));
///
/// assert_eq!(outer.path(), ["ids", "0"]);
/// assert_eq!(
///     outer.to_string(),
///     "At [ids->0], failed decoding value: expected type [int] but got [string]."
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeError {
    subject: Value,
    path: Path,
    final_cause: Cause,
}

impl DecodeError {
    /// Wraps `failure` raised while decoding `subject`, using `field_name` as
    /// the newest (outermost) path segment.
    pub fn new(subject: Value, failure: impl Into<Failure>, field_name: Option<&str>) -> Self {
        let mut path: Path = field_name.map(str::to_string).into_iter().collect();
        let final_cause = match failure.into() {
            Failure::Decode(inner) => {
                path.extend(inner.path);
                inner.final_cause
            }
            Failure::Structural(err) => {
                if let Some(sub_field) = err.field_name() {
                    path.push(sub_field.to_string());
                }
                Cause::Structural(err)
            }
            Failure::Value(err) => Cause::Value(err),
        };
        Self {
            subject,
            path,
            final_cause,
        }
    }

    /// The structure that was being decoded at the outermost level.
    pub fn subject(&self) -> &Value {
        &self.subject
    }

    pub fn path(&self) -> &[PathStep] {
        &self.path
    }

    pub fn final_cause(&self) -> &Cause {
        &self.final_cause
    }

    pub fn into_final_cause(self) -> Cause {
        self.final_cause
    }

    /// The path as an RFC 6901 JSON Pointer, e.g. `/items/3/name`.
    pub fn pointer(&self) -> String {
        let mut out = String::new();
        for step in &self.path {
            out.push('/');
            if step.contains(['~', '/']) {
                out.push_str(&step.replace('~', "~0").replace('/', "~1"));
            } else {
                out.push_str(step);
            }
        }
        out
    }

    pub fn render(&self, opts: &RenderOptions) -> String {
        let message = self.final_cause.to_string();
        if self.path.is_empty() {
            return message;
        }
        let message = if opts.lowercase_cause {
            lowercase_first(&message)
        } else {
            message
        };
        format!("At [{}], {}", self.path.join(opts.separator.as_str()), message)
    }

    /// A JSON report suitable for returning to the client that sent the subject.
    pub fn to_json(&self) -> Value {
        json!({
            "path": self.path,
            "pointer": self.pointer(),
            "message": self.to_string(),
        })
    }
}

fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&RenderOptions::default()))
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.final_cause)
    }
}
