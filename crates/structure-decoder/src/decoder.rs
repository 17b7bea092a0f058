//! The decoder capability.

use serde_json::Value;

use crate::error::Failure;

/// Converts one raw value into a `T`, or fails.
///
/// Every `Fn(&Value) -> Result<T, Failure>` is a decoder, so plain closures
/// work wherever a decoder is expected:
///
/// ```
/// use serde_json::{json, Value};
/// use structure_decoder::{Decoder, Failure, ValueError};
///
/// let even = |value: &Value| -> Result<u64, Failure> {
///     match value.as_u64() {
///         Some(n) if n % 2 == 0 => Ok(n),
///         _ => Err(ValueError::wrong_type(value, "even number").into()),
///     }
/// };
///
/// assert_eq!(even.decode(&json!(4)), Ok(4));
/// assert!(even.decode(&json!(3)).is_err());
/// ```
pub trait Decoder<T> {
    fn decode(&self, value: &Value) -> Result<T, Failure>;
}

impl<T, F> Decoder<T> for F
where
    F: Fn(&Value) -> Result<T, Failure>,
{
    fn decode(&self, value: &Value) -> Result<T, Failure> {
        self(value)
    }
}

/// A type-erased decoder that can be stored in field specs and shared
/// between threads.
pub type BoxedDecoder<T> = Box<dyn Fn(&Value) -> Result<T, Failure> + Send + Sync>;

/// Erases the concrete type of `decoder`.
pub fn boxed<T, D>(decoder: D) -> BoxedDecoder<T>
where
    D: Decoder<T> + Send + Sync + 'static,
{
    Box::new(move |value: &Value| decoder.decode(value))
}

/// Pins a closure to the decoder signature so its argument lifetime is
/// inferred as higher-ranked.
pub(crate) fn decoder<T, F>(f: F) -> F
where
    F: Fn(&Value) -> Result<T, Failure>,
{
    f
}
