use dynjson::{to_value, DynError, OnError, Value, ValueKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Config {
    name: String,
    retries: u32,
    ratio: f64,
    tags: Vec<String>,
    inner: Option<Inner>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Inner {
    enabled: bool,
}

#[derive(Serialize)]
struct Meters(Vec<f64>);

#[derive(Serialize)]
enum Shape {
    Empty,
    Circle(f64),
    Rect { w: u32, h: u32 },
    Pair(i32, i32),
}

fn config() -> Config {
    Config {
        name: "svc".into(),
        retries: 3,
        ratio: 0.25,
        tags: vec!["a".into(), "b".into()],
        inner: Some(Inner { enabled: true }),
    }
}

// ============================================================================
// From impls
// ============================================================================

#[test]
fn scalar_kinds() {
    assert_eq!(Value::from(true).kind(), ValueKind::Boolean);
    assert_eq!(Value::from(1u8).kind(), ValueKind::Number);
    assert_eq!(Value::from('c').kind(), ValueKind::String);
    assert_eq!(Value::from(None::<i32>).kind(), ValueKind::Null);
    assert_eq!(Value::from(Some("x")).kind(), ValueKind::String);
}

#[test]
fn scalars_cast_back_to_themselves() {
    assert_eq!(Value::from(-5i8).cast::<i8>().unwrap(), -5);
    assert_eq!(Value::from(u64::MAX).cast::<u64>().unwrap(), u64::MAX);
    assert_eq!(Value::from(i64::MIN).cast::<i64>().unwrap(), i64::MIN);
    assert_eq!(Value::from(1.5f32).cast::<f32>().unwrap(), 1.5);
    assert_eq!(Value::from("s").cast::<String>().unwrap(), "s");
}

#[test]
fn containers_record_short_origin() {
    let v = Value::from(vec![1, 2]);
    assert_eq!(v.origin(), Some("Vec"));
    let mut m = HashMap::new();
    m.insert("k".to_string(), 1);
    assert_eq!(Value::from(m).origin(), Some("HashMap"));
}

#[test]
fn index_map_keeps_order() {
    let mut m = IndexMap::new();
    m.insert("z", 1);
    m.insert("a", 2);
    assert_eq!(Value::from(m).keys(), vec!["z", "a"]);
}

#[test]
fn btree_map_is_sorted() {
    let m: BTreeMap<&str, i32> = [("b", 1), ("a", 2)].into_iter().collect();
    assert_eq!(Value::from(m).keys(), vec!["a", "b"]);
}

#[test]
fn from_serde_json_value() {
    let v = Value::from(json!({"a": [1, null, "x"], "b": {"c": false}}));
    assert_eq!(v.to_json(false, false), r#"{"a":[1,null,"x"],"b":{"c":false}}"#);
}

#[test]
fn collect_into_value() {
    let arr: Value = (1..=3).collect();
    assert_eq!(arr.to_json(false, false), "[1,2,3]");
    let obj: Value = vec![("a", 1), ("b", 2)].into_iter().collect();
    assert_eq!(obj.to_json(false, false), r#"{"a":1,"b":2}"#);
}

// ============================================================================
// Serializer path
// ============================================================================

#[test]
fn struct_becomes_object_with_origin() {
    let v = Value::from_object(&config()).unwrap();
    assert!(v.is_object());
    assert_eq!(v.origin(), Some("Config"));
    assert_eq!(v["inner"].origin(), Some("Inner"));
    assert_eq!(v["tags"].len(), 2);
    assert_eq!(v["ratio"].cast::<f64>().unwrap(), 0.25);
    assert_eq!(v.keys(), vec!["name", "retries", "ratio", "tags", "inner"]);
}

#[test]
fn newtype_struct_names_the_inner_composite() {
    let v = to_value(&Meters(vec![1.0, 2.5])).unwrap();
    assert_eq!(v.origin(), Some("Meters"));
    assert_eq!(v.to_json(false, false), "[1.0,2.5]");
}

#[test]
fn enum_variants() {
    assert_eq!(to_value(&Shape::Empty).unwrap().as_str(), Some("Empty"));
    assert_eq!(to_value(&Shape::Circle(1.5)).unwrap().to_json(false, false), r#"{"Circle":1.5}"#);
    assert_eq!(
        to_value(&Shape::Rect { w: 2, h: 3 }).unwrap().to_json(false, false),
        r#"{"Rect":{"w":2,"h":3}}"#
    );
    assert_eq!(to_value(&Shape::Pair(1, 2)).unwrap().to_json(false, false), r#"{"Pair":[1,2]}"#);
}

#[test]
fn from_object_is_idempotent() {
    let v = Value::from_object(&config()).unwrap();
    let again = Value::from_object(&v).unwrap();
    assert_eq!(again, v);
    assert_eq!(again.origin(), Some("Config"));
    assert_eq!(again["inner"].origin(), Some("Inner"));
}

#[test]
fn exact_numbers_survive_the_serializer() {
    let v = Value::from_json("[3.14159265358979323846264338327950288]").unwrap();
    let again = Value::from_object(&v).unwrap();
    assert_eq!(again.to_json(false, false), "[3.14159265358979323846264338327950288]");
}

#[test]
fn unclassifiable_input_fails_or_degrades() {
    let mut bad = HashMap::new();
    bad.insert((1, 2), "tuple key");
    assert!(matches!(Value::from_object(&bad), Err(DynError::Convert(_))));
    assert!(Value::from_object_with(&bad, OnError::Ignore).unwrap().is_null());
}

#[test]
fn import_plain_replaces_in_place() {
    let mut v = Value::from_json("[1]").unwrap();
    v.import_plain(&Inner { enabled: false }).unwrap();
    assert_eq!(v["enabled"].as_bool(), Some(false));
}

// ============================================================================
// Outbound
// ============================================================================

#[test]
fn to_object_matches_serde_json() {
    let v = Value::from_object(&config()).unwrap();
    assert_eq!(v.to_object(), serde_json::to_value(config()).unwrap());
}

#[test]
fn to_native_round_trip() {
    let v = Value::from_object(&config()).unwrap();
    let back: Config = v.to_native().unwrap();
    assert_eq!(back, config());
}

#[test]
fn to_native_type_mismatch_is_json_error() {
    let v = Value::from("not a number");
    assert!(matches!(v.to_native::<u32>(), Err(DynError::Json(_))));
}

#[test]
fn serde_serialize_ignores_origin() {
    let v = Value::from_object(&config()).unwrap();
    let text = serde_json::to_string(&v).unwrap();
    assert_eq!(text, v.to_json(false, false));
}

#[test]
fn serde_deserialize_value() {
    let v: Value = serde_json::from_str(r#"{"a": [1.10, true]}"#).unwrap();
    assert_eq!(v.to_json(false, false), r#"{"a":[1.10,true]}"#);
}

#[test]
fn value_as_struct_field() {
    #[derive(Serialize, Deserialize)]
    struct Envelope {
        id: u32,
        body: Value,
    }

    let env: Envelope = serde_json::from_str(r#"{"id": 1, "body": {"x": [1, 2]}}"#).unwrap();
    assert_eq!(env.body["x"][1].cast::<i32>().unwrap(), 2);
    assert_eq!(serde_json::to_string(&env).unwrap(), r#"{"id":1,"body":{"x":[1,2]}}"#);
}
