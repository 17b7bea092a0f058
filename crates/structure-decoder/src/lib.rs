//! Decode loosely-typed structures into typed values.
//!
//! Input arrives as a `serde_json::Value` (an API payload, a config blob) or
//! as any object exposing named properties (a decoded form post). Decoders
//! narrow raw values into typed ones and report failures as [`DecodeError`]s
//! that locate the problem with a path such as `items->3->name`.
//!
//! Two protocols sit on top of the decoders:
//!
//! - [`decode_field`] / [`decode_optional_field`] stop at the first problem;
//! - [`decode_field_group`] evaluates every declared [`FieldSpec`] and
//!   collects all outcomes, so every problem can be reported at once.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use structure_decoder::types::{array_of, boolean_ish, integer, string};
//! use structure_decoder::decode_field;
//!
//! let payload = json!({"tags": ["a", "b"], "public": "yes", "limit": "ten"});
//!
//! assert_eq!(
//!     decode_field(&payload, "tags", array_of(string())),
//!     Ok(vec!["a".to_string(), "b".to_string()])
//! );
//! assert_eq!(decode_field(&payload, "public", boolean_ish()), Ok(true));
//!
//! let err = decode_field(&payload, "limit", integer()).unwrap_err();
//! assert_eq!(err.path(), ["limit"]);
//! assert_eq!(
//!     err.to_string(),
//!     "At [limit], failed decoding value: expected type [int] but got [string]."
//! );
//! ```

pub mod decoder;
pub mod error;
pub mod field;
pub mod group;
pub mod subject;
pub mod types;

pub use decoder::{boxed, BoxedDecoder, Decoder};
pub use error::{
    type_name, Cause, DecodeError, Failure, Path, PathStep, RenderOptions, StructuralError,
    ValueError,
};
pub use field::{decode_field, decode_optional_field};
pub use group::{decode_field_group, FieldGroup, FieldSpec, FieldValue};
pub use subject::{NamedProperties, Subject};
