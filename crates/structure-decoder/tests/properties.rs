use proptest::prelude::*;
use serde_json::{json, Map, Value};
use structure_decoder::types::{array_of, int_of_string, integer, string};
use structure_decoder::{decode_field, decode_optional_field, Cause, Decoder, StructuralError};

fn non_container() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<String>().prop_map(Value::from),
        prop::collection::vec(any::<i64>(), 0..4).prop_map(|v| json!(v)),
    ]
}

proptest! {
    #[test]
    fn unsupported_subject_always_fails_structurally(
        subject in non_container(),
        name in "[a-z]{1,8}",
    ) {
        let err = decode_field(&subject, &name, string()).unwrap_err();
        let is_unsupported = matches!(
            err.final_cause(),
            Cause::Structural(StructuralError::UnsupportedStructure { .. })
        );
        prop_assert!(is_unsupported);
    }

    #[test]
    fn missing_key_reports_path_or_default(
        entries in prop::collection::btree_map("[a-z]{1,6}", any::<i64>(), 0..6),
        key in "[A-Z]{1,6}",
        default in any::<i64>(),
    ) {
        let map: Map<String, Value> = entries
            .into_iter()
            .map(|(k, v)| (k, Value::from(v)))
            .collect();
        let subject = Value::Object(map);

        let err = decode_field(&subject, &key, integer()).unwrap_err();
        prop_assert_eq!(err.path(), [key.clone()]);
        prop_assert!(err.final_cause().is_missing_field());

        let decoded = decode_optional_field(&subject, &key, integer(), Some(default));
        prop_assert_eq!(decoded, Ok(Some(default)));
    }

    #[test]
    fn int_of_string_accepts_padded_integers(
        n in any::<i64>(),
        zeros in 0usize..4,
        pad in " {0,3}",
    ) {
        let text = if n < 0 {
            n.to_string()
        } else {
            format!("{pad}{}{n}{pad}", "0".repeat(zeros))
        };
        prop_assert_eq!(int_of_string().decode(&Value::from(text)), Ok(n));
    }

    #[test]
    fn int_of_string_rejects_fractions(n in 0i64..1_000_000, frac in 1u32..1000) {
        let text = format!("{n}.{frac}");
        prop_assert!(int_of_string().decode(&Value::from(text)).is_err());
    }

    #[test]
    fn int_of_string_rejects_sign_after_zeros(zeros in 1usize..4, n in 0i64..1_000_000) {
        let text = format!("{}-{n}", "0".repeat(zeros));
        prop_assert!(int_of_string().decode(&Value::from(text)).is_err());
    }

    #[test]
    fn array_of_string_keeps_elements(items in prop::collection::vec(any::<String>(), 0..8)) {
        let value = json!(items);
        prop_assert_eq!(array_of(string()).decode(&value), Ok(items));
    }
}
