//! The decoder library.
//!
//! Primitive decoders check a raw value against one goal type and fail with
//! [`ValueError::WrongType`](crate::ValueError::WrongType) otherwise. Composite
//! decoders take other decoders and apply them to elements, alternatives or
//! decoded outputs.

pub mod coerce;
pub mod compose;
pub mod primitive;

pub use coerce::{boolean_ish, int_of_string};
pub use compose::{array_of, first_of, map, map_of, max_depth, refine, DEFAULT_MAX_DEPTH};
pub use primitive::{
    array_of_mixed, boolean, integer, mixed, non_empty_string, non_null, number, object, string,
};
