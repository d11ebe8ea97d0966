//! Unit tests for Value

use core_types::Value;
use std::collections::BTreeMap;

#[test]
fn test_text_accessors() {
    let value = Value::from("abc".to_string());
    assert_eq!(value.as_text(), Some("abc"));
    assert_eq!(value.as_list(), None);
    assert!(!value.is_null());
}

#[test]
fn test_default_is_null() {
    assert_eq!(Value::default(), Value::Null);
}

#[test]
fn test_list_accessor() {
    let value = Value::from(vec![Value::from("a"), Value::from("b")]);
    assert_eq!(value.as_list().map(|items| items.len()), Some(2));
}

#[test]
fn test_object_json_shape() {
    let mut fields = BTreeMap::new();
    fields.insert("a".to_string(), Value::from("x"));
    fields.insert("b".to_string(), Value::Null);
    let value = Value::Object(fields);
    assert_eq!(
        serde_json::to_value(&value).unwrap(),
        serde_json::json!({"a": "x", "b": null})
    );
}

#[test]
fn test_json_deserializes_nested() {
    let value: Value = serde_json::from_str(r#"{"items":["a",true,1.5]}"#).unwrap();
    let items = value.get("items").and_then(Value::as_list).unwrap();
    assert_eq!(items[0], Value::from("a"));
    assert_eq!(items[1], Value::Bool(true));
    assert_eq!(items[2], Value::Number(1.5));
}

#[test]
fn test_flatten_object_in_key_order() {
    let value: Value = vec![
        ("b".to_string(), Value::from("2")),
        ("a".to_string(), Value::from("1")),
    ]
    .into_iter()
    .collect();
    assert_eq!(value.flatten_text(), "12");
}
