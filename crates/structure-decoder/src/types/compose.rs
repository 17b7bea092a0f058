//! Combinators that build decoders out of other decoders.
//!
//! Element-wise combinators report an element failure as a [`DecodeError`]
//! whose newest path segment is the element's index or key, so a failure three
//! levels down reads as `At [items->3->name], ...` once the field decode wraps
//! it.

use indexmap::IndexMap;
use serde_json::Value;

use crate::decoder::{decoder, BoxedDecoder, Decoder};
use crate::error::{DecodeError, Failure, StructuralError, ValueError};

/// Nesting limit suggested for [`max_depth`] when decoding untrusted input.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Decodes every element of an array with `element`, keeping order.
///
/// Stops at the first element that fails.
pub fn array_of<T, D>(element: D) -> impl Decoder<Vec<T>>
where
    D: Decoder<T>,
{
    decoder(move |value: &Value| -> Result<Vec<T>, Failure> {
        let Value::Array(items) = value else {
            return Err(ValueError::wrong_type(value, "array").into());
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                element.decode(item).map_err(|e| {
                    Failure::from(DecodeError::new(item.clone(), e, Some(&index.to_string())))
                })
            })
            .collect()
    })
}

/// Decodes every value of an object with `element`, keeping key order.
///
/// Arrays are rejected, except the empty array, which is read as an empty
/// mapping since many encoders cannot tell `[]` and `{}` apart.
pub fn map_of<T, D>(element: D) -> impl Decoder<IndexMap<String, T>>
where
    D: Decoder<T>,
{
    decoder(move |value: &Value| -> Result<IndexMap<String, T>, Failure> {
        match value {
            Value::Object(map) => map
                .iter()
                .map(|(key, item)| match element.decode(item) {
                    Ok(decoded) => Ok((key.clone(), decoded)),
                    Err(e) => Err(Failure::from(DecodeError::new(
                        item.clone(),
                        e,
                        Some(key.as_str()),
                    ))),
                })
                .collect(),
            Value::Array(items) if items.is_empty() => Ok(IndexMap::new()),
            other => {
                Err(ValueError::wrong_type(other, "associative array with string keys").into())
            }
        }
    })
}

/// Tries each decoder in order and returns the first success.
///
/// When all of them fail, the last failure is returned. With no decoders at
/// all the result is [`StructuralError::NoDecoders`]. See also the
/// [`first_of!`](crate::first_of!) macro, which boxes the decoders for you.
pub fn first_of<T>(decoders: Vec<BoxedDecoder<T>>) -> impl Decoder<T> {
    decoder(move |value: &Value| -> Result<T, Failure> {
        let mut last = None;
        for (attempt, candidate) in decoders.iter().enumerate() {
            match candidate.decode(value) {
                Ok(decoded) => return Ok(decoded),
                Err(e) => {
                    tracing::trace!(attempt, error = %e, "first_of candidate failed");
                    last = Some(e);
                }
            }
        }
        Err(last.unwrap_or_else(|| {
            StructuralError::NoDecoders {
                value: value.clone(),
            }
            .into()
        }))
    })
}

/// Transforms the output of `inner` with `f`.
///
/// Handy for bringing fields of different types to a common output type
/// before handing them to a field group.
pub fn map<T, U, D, F>(inner: D, f: F) -> impl Decoder<U>
where
    D: Decoder<T>,
    F: Fn(T) -> U,
{
    decoder(move |value: &Value| -> Result<U, Failure> { inner.decode(value).map(&f) })
}

/// Fails with [`ValueError::BrokenConstraint`] when `predicate` rejects the
/// value decoded by `inner`.
///
/// ```
/// use serde_json::json;
/// use structure_decoder::types::{refine, string};
/// use structure_decoder::Decoder;
///
/// let username = refine(string(), "must be at most 8 characters", |s: &String| {
///     s.chars().count() <= 8
/// });
/// assert!(username.decode(&json!("ada")).is_ok());
/// assert!(username.decode(&json!("augusta_ada")).is_err());
/// ```
pub fn refine<T, D, P>(inner: D, reason: impl Into<String>, predicate: P) -> impl Decoder<T>
where
    D: Decoder<T>,
    P: Fn(&T) -> bool,
{
    let reason = reason.into();
    decoder(move |value: &Value| -> Result<T, Failure> {
        let decoded = inner.decode(value)?;
        if predicate(&decoded) {
            Ok(decoded)
        } else {
            Err(ValueError::broken_constraint(value, reason.clone()).into())
        }
    })
}

/// Rejects values nested deeper than `limit` before running `inner`.
///
/// Scalars have depth 0; each enclosing array or object adds one.
pub fn max_depth<T, D>(limit: usize, inner: D) -> impl Decoder<T>
where
    D: Decoder<T>,
{
    decoder(move |value: &Value| -> Result<T, Failure> {
        if exceeds_depth(value, limit) {
            return Err(ValueError::broken_constraint(
                value,
                format!("value nests deeper than {limit} levels"),
            )
            .into());
        }
        inner.decode(value)
    })
}

fn exceeds_depth(value: &Value, limit: usize) -> bool {
    let mut stack = vec![(value, 0usize)];
    while let Some((current, depth)) = stack.pop() {
        match current {
            Value::Array(items) => {
                if depth >= limit {
                    return true;
                }
                stack.extend(items.iter().map(|child| (child, depth + 1)));
            }
            Value::Object(map) => {
                if depth >= limit {
                    return true;
                }
                stack.extend(map.values().map(|child| (child, depth + 1)));
            }
            _ => {}
        }
    }
    false
}

/// Builds a [`first_of`] decoder from heterogeneous decoders.
///
/// ```
/// use serde_json::json;
/// use structure_decoder::types::{int_of_string, integer};
/// use structure_decoder::{first_of, Decoder};
///
/// let lenient_int = first_of![integer(), int_of_string()];
/// assert_eq!(lenient_int.decode(&json!(5)), Ok(5));
/// assert_eq!(lenient_int.decode(&json!(" 5")), Ok(5));
/// ```
#[macro_export]
macro_rules! first_of {
    ($($decoder:expr),* $(,)?) => {
        $crate::types::first_of(vec![$($crate::boxed($decoder)),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxed;
    use crate::error::Cause;
    use crate::types::{boolean_ish, int_of_string, integer, non_empty_string, string};
    use serde_json::json;

    fn decode_error<T: std::fmt::Debug>(result: Result<T, Failure>) -> DecodeError {
        match result {
            Err(Failure::Decode(err)) => err,
            other => panic!("expected a DecodeError, got {other:?}"),
        }
    }

    #[test]
    fn test_array_of_keeps_order() {
        let d = array_of(string());
        assert_eq!(
            d.decode(&json!(["a", "b", "c"])),
            Ok(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
        assert_eq!(d.decode(&json!([])), Ok(vec![]));
    }

    #[test]
    fn test_array_of_reports_first_failing_index() {
        let err = decode_error(array_of(integer()).decode(&json!([1, "b", "c"])));
        assert_eq!(err.path(), ["1"]);
        assert_eq!(err.subject(), &json!("b"));
        assert_eq!(
            err.final_cause().as_value().and_then(ValueError::expected_type),
            Some("int")
        );
    }

    #[test]
    fn test_array_of_rejects_non_arrays() {
        for value in [json!({"0": 1}), json!("abc"), json!(null)] {
            match array_of(integer()).decode(&value) {
                Err(Failure::Value(err)) => assert_eq!(err.expected_type(), Some("array")),
                other => panic!("{value}: expected WrongType, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_nested_arrays_accumulate_path() {
        let d = array_of(array_of(integer()));
        let err = decode_error(d.decode(&json!([[1], [2, 3, "x"]])));
        assert_eq!(err.path(), ["1", "2"]);
        assert_eq!(err.subject(), &json!([2, 3, "x"]));
    }

    #[test]
    fn test_map_of() {
        let d = map_of(boolean_ish());
        let decoded = d.decode(&json!({"b": "yes", "a": 0})).unwrap();
        assert_eq!(decoded.keys().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(decoded["b"], true);
        assert_eq!(decoded["a"], false);
        assert!(d.decode(&json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_map_of_rejects_sequences() {
        for value in [json!([1, 2]), json!(["a"]), json!("a"), json!(3)] {
            match map_of(integer()).decode(&value) {
                Err(Failure::Value(err)) => {
                    assert_eq!(err.expected_type(), Some("associative array with string keys"))
                }
                other => panic!("{value}: expected WrongType, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_map_of_reports_key() {
        let err = decode_error(map_of(integer()).decode(&json!({"ok": 1, "bad": "x"})));
        assert_eq!(err.path(), ["bad"]);
        assert_eq!(err.subject(), &json!("x"));
    }

    #[test]
    fn test_first_of() {
        let d = first_of(vec![boxed(integer()), boxed(int_of_string())]);
        assert_eq!(d.decode(&json!(3)), Ok(3));
        assert_eq!(d.decode(&json!("03")), Ok(3));
    }

    #[test]
    fn test_first_of_returns_last_failure() {
        let d = first_of(vec![boxed(integer()), boxed(int_of_string())]);
        match d.decode(&json!(true)) {
            Err(Failure::Value(err)) => assert_eq!(err.expected_type(), Some("int as string")),
            other => panic!("expected WrongType, got {other:?}"),
        }
    }

    #[test]
    fn test_first_of_without_decoders() {
        let d = first_of::<i64>(vec![]);
        assert_eq!(
            d.decode(&json!(1)),
            Err(Failure::Structural(StructuralError::NoDecoders { value: json!(1) }))
        );
    }

    #[test]
    fn test_first_of_macro_mixes_decoder_types() {
        let d = crate::first_of![
            map(integer(), |n: i64| n.to_string()),
            string(),
        ];
        assert_eq!(d.decode(&json!(12)), Ok("12".to_string()));
        assert_eq!(d.decode(&json!("twelve")), Ok("twelve".to_string()));
    }

    #[test]
    fn test_refine() {
        let d = refine(non_empty_string(), "must be at most 3 characters", |s: &String| {
            s.len() <= 3
        });
        assert_eq!(d.decode(&json!("abc")), Ok("abc".to_string()));
        match d.decode(&json!("abcd")) {
            Err(Failure::Value(ValueError::BrokenConstraint { reason, value })) => {
                assert_eq!(reason, "must be at most 3 characters");
                assert_eq!(value, json!("abcd"));
            }
            other => panic!("expected BrokenConstraint, got {other:?}"),
        }
        // The inner failure passes through untouched.
        assert!(matches!(
            d.decode(&json!("")),
            Err(Failure::Value(ValueError::EmptyValue { .. }))
        ));
    }

    #[test]
    fn test_max_depth() {
        let d = max_depth(2, array_of(array_of(integer())));
        assert_eq!(d.decode(&json!([[1], [2]])), Ok(vec![vec![1], vec![2]]));
        match d.decode(&json!([[[1]]])) {
            Err(Failure::Value(ValueError::BrokenConstraint { reason, .. })) => {
                assert_eq!(reason, "value nests deeper than 2 levels")
            }
            other => panic!("expected BrokenConstraint, got {other:?}"),
        }
    }

    #[test]
    fn test_exceeds_depth() {
        assert!(!exceeds_depth(&json!(1), 0));
        assert!(exceeds_depth(&json!([]), 0));
        assert!(!exceeds_depth(&json!({"a": [1]}), 2));
        assert!(exceeds_depth(&json!({"a": [1, {"b": 2}]}), 2));

        let mut deep = json!(0);
        for _ in 0..1_000 {
            deep = Value::Array(vec![deep]);
        }
        assert!(exceeds_depth(&deep, DEFAULT_MAX_DEPTH));
        assert!(!exceeds_depth(&deep, 1_000));
    }

    #[test]
    fn test_wrapped_missing_field_inside_array() {
        let field = |value: &Value| -> Result<String, Failure> {
            crate::decode_field(value, "name", string()).map_err(Failure::from)
        };
        let err = decode_error(array_of(field).decode(&json!([{"name": "a"}, {}])));
        assert_eq!(err.path(), ["1", "name"]);
        assert!(err.final_cause().is_missing_field());
        assert!(matches!(err.final_cause(), Cause::Structural(_)));
    }
}
