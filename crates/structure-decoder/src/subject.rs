//! The structure fields are read from.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// An object that exposes values by property name.
///
/// Implemented for string-keyed `HashMap` and `BTreeMap` of JSON values (the
/// usual shape of a decoded form post). Implement it for your own types to
/// decode them without first converting them into a `serde_json::Value`.
pub trait NamedProperties {
    /// Reads the property called `name`, or `None` when it is not defined.
    fn property(&self, name: &str) -> Option<&Value>;

    /// Owned copy of the object, attached to errors raised against it.
    fn snapshot(&self) -> Value;
}

impl NamedProperties for HashMap<String, Value> {
    fn property(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }

    fn snapshot(&self) -> Value {
        Value::Object(self.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

impl NamedProperties for BTreeMap<String, Value> {
    fn property(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }

    fn snapshot(&self) -> Value {
        Value::Object(self.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

/// The input to a field decode, resolved once at the entry point.
#[derive(Clone, Copy)]
pub enum Subject<'a> {
    Mapping(&'a Map<String, Value>),
    NamedProperties(&'a dyn NamedProperties),
    Unsupported(&'a Value),
}

impl<'a> Subject<'a> {
    /// Looks up `name`. A property bound to `null` counts as absent.
    ///
    /// Returns `None` for [`Subject::Unsupported`] as well; callers check
    /// [`Subject::is_supported`] first.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        let found = match *self {
            Subject::Mapping(map) => map.get(name),
            Subject::NamedProperties(obj) => obj.property(name),
            Subject::Unsupported(_) => None,
        };
        found.filter(|v| !v.is_null())
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Subject::Unsupported(_))
    }

    /// Owned copy of the subject for error reporting.
    pub fn to_value(&self) -> Value {
        match *self {
            Subject::Mapping(map) => Value::Object(map.clone()),
            Subject::NamedProperties(obj) => obj.snapshot(),
            Subject::Unsupported(value) => value.clone(),
        }
    }
}

impl<'a> From<&'a Value> for Subject<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Object(map) => Subject::Mapping(map),
            other => Subject::Unsupported(other),
        }
    }
}

impl<'a> From<&'a Map<String, Value>> for Subject<'a> {
    fn from(map: &'a Map<String, Value>) -> Self {
        Subject::Mapping(map)
    }
}

impl<'a> From<&'a HashMap<String, Value>> for Subject<'a> {
    fn from(map: &'a HashMap<String, Value>) -> Self {
        Subject::NamedProperties(map)
    }
}

impl<'a> From<&'a BTreeMap<String, Value>> for Subject<'a> {
    fn from(map: &'a BTreeMap<String, Value>) -> Self {
        Subject::NamedProperties(map)
    }
}

impl<'a> From<&'a dyn NamedProperties> for Subject<'a> {
    fn from(obj: &'a dyn NamedProperties) -> Self {
        Subject::NamedProperties(obj)
    }
}

impl std::fmt::Debug for Subject<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Subject::Mapping(map) => f.debug_tuple("Mapping").field(map).finish(),
            Subject::NamedProperties(obj) => {
                f.debug_tuple("NamedProperties").field(&obj.snapshot()).finish()
            }
            Subject::Unsupported(value) => f.debug_tuple("Unsupported").field(value).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Point {
        x: Value,
    }

    impl NamedProperties for Point {
        fn property(&self, name: &str) -> Option<&Value> {
            match name {
                "x" => Some(&self.x),
                _ => None,
            }
        }

        fn snapshot(&self) -> Value {
            json!({ "x": self.x })
        }
    }

    #[test]
    fn test_resolve_json_values() {
        let obj = json!({"a": 1});
        assert!(matches!(Subject::from(&obj), Subject::Mapping(_)));
        for value in [json!(null), json!(1), json!("a"), json!([1, 2]), json!(true)] {
            assert!(!Subject::from(&value).is_supported(), "{value}");
        }
    }

    #[test]
    fn test_null_counts_as_absent() {
        let obj = json!({"a": null, "b": 0});
        let subject = Subject::from(&obj);
        assert_eq!(subject.get("a"), None);
        assert_eq!(subject.get("b"), Some(&json!(0)));
        assert_eq!(subject.get("c"), None);
    }

    #[test]
    fn test_named_properties() {
        let point = Point { x: json!(3) };
        let subject = Subject::NamedProperties(&point);
        assert_eq!(subject.get("x"), Some(&json!(3)));
        assert_eq!(subject.get("y"), None);
        assert_eq!(subject.to_value(), json!({"x": 3}));
    }

    #[test]
    fn test_form_maps() {
        let mut form = HashMap::new();
        form.insert("name".to_string(), json!("Ada"));
        let subject = Subject::from(&form);
        assert_eq!(subject.get("name"), Some(&json!("Ada")));
        assert_eq!(subject.to_value(), json!({"name": "Ada"}));

        let mut sorted = BTreeMap::new();
        sorted.insert("age".to_string(), json!(36));
        assert_eq!(Subject::from(&sorted).get("age"), Some(&json!(36)));
    }
}
