//! End-to-end marshalling tests

use crate::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn roundtrip(value: &MValue) -> MValue {
    let registry = MarshallerRegistry::with_defaults();
    let text = marshall(&registry, value).unwrap();
    demarshall(&registry, &text, None).unwrap()
}

#[test]
fn test_string_keyed_roundtrip() {
    let m = MValue::map(vec![
        entry("name", "Alice"),
        entry("age", 30),
        entry("ratio", 0.75),
        entry("active", true),
        entry("nothing", MValue::Null),
    ]);
    assert_eq!(roundtrip(&m), m);
}

#[test]
fn test_mixed_key_map() {
    let registry = MarshallerRegistry::with_defaults();
    let m = MValue::map(vec![entry(1, "a"), entry("x", "b")]);

    let text = marshall(&registry, &m).unwrap();
    let json = parse_json(&text).unwrap();
    let obj = json.as_object().unwrap();
    assert_eq!(obj.len(), 2);
    assert_eq!(obj.get("x"), Some(&json!("b")));
    assert_eq!(obj.get(&format!("{}1", EMBEDDED_JSON)), Some(&json!("a")));

    let back = demarshall(&registry, &text, None).unwrap();
    assert_eq!(back, m);
    assert_eq!(back.get(&MValue::int(1)), Some(&MValue::str("a")));
    assert!(back.as_map().unwrap().iter().any(|e| e.key.as_int() == Some(1)));
}

#[test]
fn test_null_map() {
    let registry = MarshallerRegistry::with_defaults();
    let mut session = create_session(&registry);
    assert_eq!(session.marshall_as(&MValue::Null, Some("map")).unwrap(), "null");
    assert_eq!(marshall(&registry, &MValue::Null).unwrap(), "null");

    for text in ["[]", "[{\"a\":1}]", "\"{}\"", "12", "false", "null"] {
        assert_eq!(demarshall(&registry, text, Some("map")).unwrap(), MValue::Null, "{text}");
    }
}

#[test]
fn test_quote_in_value_and_key() {
    let m = MValue::map(vec![
        entry("he said \"hi\"", "she said \"bye\""),
        entry(MValue::list(vec!["\"quoted\"".into()]), "back\\slash"),
    ]);
    assert_eq!(roundtrip(&m), m);
}

#[test]
fn test_empty_map() {
    let registry = MarshallerRegistry::with_defaults();
    assert_eq!(marshall(&registry, &MValue::map(vec![])).unwrap(), "{}");
    assert_eq!(
        demarshall(&registry, "{}", Some("LinkedHashMap")).unwrap(),
        MValue::map(vec![])
    );
    assert_eq!(demarshall(&registry, "{}", None).unwrap(), MValue::map(vec![]));
}

#[test]
fn test_shape_rejection() {
    let registry = MarshallerRegistry::with_defaults();
    let map = registry.lookup_by_type("map").unwrap();
    assert!(!map.handles(&json!([1, 2, 3])));
    assert!(map.handles(&json!({"a": 1})));

    let resolved = registry.lookup_by_shape(&json!([{"a": 1}]), None).unwrap();
    assert_eq!(resolved.type_id(), "list");
}

#[test]
fn test_unknown_type_hint() {
    let registry = MarshallerRegistry::with_defaults();
    let err = demarshall(&registry, r#"{"a":1}"#, Some("no-such-type")).unwrap_err();
    assert!(matches!(err, MarshalError::UnknownType(ref t) if t == "no-such-type"));
}

#[test]
fn test_nested_failure_aborts_whole_operation() {
    let registry = MarshallerRegistry::with_defaults();
    let text = format!(r#"{{"a":1,"inner":{{"{}{{":2}}}}"#, EMBEDDED_JSON);
    let err = demarshall(&registry, &text, None).unwrap_err();
    assert!(matches!(err, MarshalError::MalformedEmbeddedKey { .. }));
}

#[test]
fn test_map_of_records_keyed_by_record() {
    let key = MValue::Record(RecordValue::new("Point", vec![field("x", 1), field("y", 2)]));
    let owner = MValue::Record(RecordValue::new("User", vec![field("name", "bo")]).with_id("u7"));
    let m = MValue::map(vec![
        entry(key, owner.clone()),
        entry("again", owner),
    ]);
    assert_eq!(roundtrip(&m), m);
}

#[test]
fn test_deeply_nested_keys() {
    let mut value = MValue::str("leaf");
    for depth in 0..16 {
        value = MValue::map(vec![entry(MValue::map(vec![entry(depth, "k")]), value)]);
    }
    assert_eq!(roundtrip(&value), value);
}

#[test]
fn test_custom_resolver() {
    struct EverythingIsAString;

    impl TypeResolver for EverythingIsAString {
        fn determine_type(
            &self,
            _: &MarshallerRegistry,
            _: Option<&str>,
            _: &serde_json::Value,
        ) -> Result<String> {
            Ok("string".to_string())
        }
    }

    let registry = MarshallerRegistry::with_defaults();
    let resolver = EverythingIsAString;
    let mut session = MarshallingSession::with_resolver(&registry, &resolver);
    assert_eq!(session.demarshall(&json!(5), None).unwrap(), MValue::Null);
    assert_eq!(session.demarshall(&json!("x"), None).unwrap(), MValue::str("x"));
}

#[test]
fn test_shared_registry_across_threads() {
    let registry = Arc::new(MarshallerRegistry::with_defaults());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                let m = MValue::map(vec![entry(i, "thread"), entry("n", i)]);
                let text = marshall(&registry, &m).unwrap();
                let back = demarshall(&registry, &text, None).unwrap();
                assert_eq!(back, m);
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
}

#[test]
fn test_opts_from_config() {
    let opts = MarshalOpts::from_json(r#"{"embed_sentinel": "~k~", "track_identity": false}"#).unwrap();
    let registry = MarshallerRegistry::with_defaults_and_opts(opts).unwrap();
    let m = MValue::map(vec![entry(MValue::bool(false), "no")]);
    let text = marshall(&registry, &m).unwrap();
    assert_eq!(text, r#"{"~k~false":"no"}"#);
    assert_eq!(demarshall(&registry, &text, None).unwrap(), m);
}
