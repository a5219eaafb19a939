use dynjson::{JsonFormat, Settings, Value};

fn doc(text: &str) -> Value {
    Value::from_json(text).unwrap()
}

/// Helper: compare two JSON texts structurally.
fn assert_json_eq(actual: &str, expected: &str) {
    let a: serde_json::Value = serde_json::from_str(actual).unwrap();
    let b: serde_json::Value = serde_json::from_str(expected).unwrap();
    assert_eq!(a, b, "JSON mismatch:\n  actual:   {actual}\n  expected: {expected}");
}

// ============================================================================
// Compact layout
// ============================================================================

#[test]
fn compact_scalars() {
    assert_eq!(Value::null().to_json(false, false), "null");
    assert_eq!(Value::from(true).to_json(false, false), "true");
    assert_eq!(Value::from(-12).to_json(false, false), "-12");
    assert_eq!(Value::from("x").to_json(false, false), r#""x""#);
}

#[test]
fn compact_containers() {
    let v = doc(r#"{ a: [1, 2], b: {}, c: [] }"#);
    assert_eq!(v.to_json(false, false), r#"{"a":[1,2],"b":{},"c":[]}"#);
}

#[test]
fn round_trip_with_sorted_keys_then_add() {
    let mut v = doc(r#"{"b":[11,22,33],"a":123}"#);
    let sorted = v.to_json(false, true);
    assert_eq!(sorted, r#"{"a":123,"b":[11,22,33]}"#);
    assert_json_eq(&doc(&sorted).to_json(false, false), &sorted);

    v["b"].add(777);
    assert_eq!(v["b"].len(), 4);
    assert_eq!(v["b"][3].cast::<i32>().unwrap(), 777);
}

#[test]
fn sort_keys_does_not_reorder_the_value() {
    let v = doc(r#"{"b": 1, "a": 2}"#);
    let _ = v.to_json(false, true);
    assert_eq!(v.keys(), vec!["b", "a"]);
}

#[test]
fn sort_keys_applies_at_every_level() {
    let v = doc(r#"{"z": {"y": 1, "x": 2}}"#);
    assert_eq!(v.to_json(false, true), r#"{"z":{"x":2,"y":1}}"#);
}

// ============================================================================
// Pretty layout
// ============================================================================

#[test]
fn indented_layout() {
    let v = doc(r#"{"a": 1, "b": [true, null], "c": {}}"#);
    let expected = "{\n  \"a\": 1,\n  \"b\": [\n    true,\n    null\n  ],\n  \"c\": {}\n}";
    assert_eq!(v.to_json(true, false), expected);
}

#[test]
fn export_json_is_indented_insertion_order() {
    let v = doc(r#"{"b": 1, "a": 2}"#);
    assert_eq!(v.export_json(), "{\n  \"b\": 1,\n  \"a\": 2\n}");
}

// ============================================================================
// Escaping
// ============================================================================

#[test]
fn control_characters_escape() {
    let v = Value::from("line\nbreak\u{1}");
    assert_eq!(v.to_json(false, false), r#""line\nbreak\u0001""#);
}

#[test]
fn non_ascii_is_literal_by_default() {
    let v = Value::from("日本");
    assert_eq!(v.to_json(false, false), "\"日本\"");
}

#[test]
fn force_ascii_escapes_everything_outside_ascii() {
    let v = doc(r#"{"clé": "日本😀"}"#);
    let format = JsonFormat::default().with_force_ascii(true);
    let out = v.to_json_with(&format);
    assert!(out.is_ascii());
    assert_eq!(out, r#"{"cl\u00e9":"\u65e5\u672c\ud83d\ude00"}"#);
    assert_eq!(doc(&out), v);
}

#[test]
fn format_from_settings_takes_ascii_policy() {
    let settings = Settings::default().with_force_ascii(true);
    let format = JsonFormat::from_settings(&settings);
    assert!(format.force_ascii);
    assert!(!format.indent);
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn floats_use_shortest_text() {
    assert_eq!(Value::from(0.1).to_json(false, false), "0.1");
    assert_eq!(Value::from(0.1f32).to_json(false, false), "0.1");
}

#[test]
fn output_parses_back_equal() {
    let v = doc(r#"{ a: [1, 2.5, "x", null, true], b: { c: -3 } }"#);
    for (indent, sort) in [(false, false), (true, false), (true, true)] {
        let text = v.to_json(indent, sort);
        let back: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back, v.to_object());
    }
}
