use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};
use dynjson::{DynError, Value, ValueKind};
use uuid::Uuid;

fn assert_invalid_cast<T: std::fmt::Debug>(result: dynjson::Result<T>, from: ValueKind) {
    match result {
        Err(DynError::InvalidCast { from: f, .. }) => assert_eq!(f, from),
        other => panic!("expected invalid cast from {from}, got {other:?}"),
    }
}

fn naive() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 6)
        .unwrap()
        .and_hms_nano_opt(7, 8, 9, 123_456_700)
        .unwrap()
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn integers_from_number() {
    let v = Value::from(300);
    assert_eq!(v.cast::<i64>().unwrap(), 300);
    assert_eq!(v.cast::<u16>().unwrap(), 300);
    assert_invalid_cast(v.cast::<u8>(), ValueKind::Number);
}

#[test]
fn integers_from_text() {
    assert_eq!(Value::from(" 42 ").cast::<i32>().unwrap(), 42);
    assert_eq!(Value::from("+7").cast::<u8>().unwrap(), 7);
    assert_eq!(Value::from("-9").cast::<i64>().unwrap(), -9);
    assert_invalid_cast(Value::from("forty").cast::<i32>(), ValueKind::String);
}

#[test]
fn integer_text_must_be_integral() {
    for text in ["-3.5", " 1e3 ", "2.0", "", "-", "0x10", "1 000"] {
        assert_invalid_cast(Value::from(text).cast::<i32>(), ValueKind::String);
    }
}

#[test]
fn integer_text_out_of_range() {
    assert_invalid_cast(Value::from("256").cast::<u8>(), ValueKind::String);
    assert_invalid_cast(Value::from("-1").cast::<u32>(), ValueKind::String);
    assert_invalid_cast(Value::from("9".repeat(50)).cast::<u128>(), ValueKind::String);
}

#[test]
fn integers_from_bool() {
    assert_eq!(Value::from(true).cast::<u8>().unwrap(), 1);
    assert_eq!(Value::from(false).cast::<i64>().unwrap(), 0);
}

#[test]
fn floats() {
    assert_eq!(Value::from(1.25).cast::<f64>().unwrap(), 1.25);
    assert_eq!(Value::from(7).cast::<f32>().unwrap(), 7.0);
    assert_eq!(Value::from("2.5e1").cast::<f64>().unwrap(), 25.0);
    assert_eq!(Value::from(true).cast::<f64>().unwrap(), 1.0);
}

#[test]
fn i128_extremes() {
    assert_eq!(Value::from(i128::MIN).cast::<i128>().unwrap(), i128::MIN);
    assert_eq!(Value::from(u64::MAX).cast::<u128>().unwrap(), u128::from(u64::MAX));
    assert_eq!(Value::from(i128::MAX).cast::<i128>().unwrap(), i128::MAX);
    assert_eq!(Value::from(u128::MAX).cast::<u128>().unwrap(), u128::MAX);
    assert_invalid_cast(Value::from(u128::MAX).cast::<i128>(), ValueKind::Number);
    assert_invalid_cast(Value::from(i128::MIN).cast::<u128>(), ValueKind::Number);
}

#[test]
fn integers_beyond_u64_stay_exact() {
    let big = u128::from(u64::MAX) + 2;
    assert_eq!(Value::from(big).cast::<u128>().unwrap(), big);
    assert_eq!(Value::from(big).cast::<i128>().unwrap(), i128::try_from(big).unwrap());
}

#[test]
fn integral_decimals_beyond_f64_precision() {
    let v = Value::from_json("9007199254740993.0").unwrap();
    assert_eq!(v.cast::<i64>().unwrap(), 9_007_199_254_740_993);
}

#[test]
fn half_even_rounding_reads_every_digit() {
    assert_eq!(Value::from_json("2.50000000000000000001").unwrap().cast::<i32>().unwrap(), 3);
    assert_eq!(Value::from_json("2.50000000000000000000").unwrap().cast::<i32>().unwrap(), 2);
    assert_eq!(Value::from_json("-3.5").unwrap().cast::<i32>().unwrap(), -4);
}

// ============================================================================
// Booleans & text
// ============================================================================

#[test]
fn bools() {
    assert!(Value::from(2).cast::<bool>().unwrap());
    assert!(!Value::from(0).cast::<bool>().unwrap());
    assert!(Value::from(" TRUE ").cast::<bool>().unwrap());
    assert!(!Value::from("False").cast::<bool>().unwrap());
    assert_invalid_cast(Value::from("yes").cast::<bool>(), ValueKind::String);
}

#[test]
fn strings() {
    assert_eq!(Value::from("abc").cast::<String>().unwrap(), "abc");
    assert_eq!(Value::from(12).cast::<String>().unwrap(), "12");
    assert_eq!(Value::from(false).cast::<String>().unwrap(), "false");
}

#[test]
fn chars() {
    assert_eq!(Value::from("x").cast::<char>().unwrap(), 'x');
    assert_eq!(Value::from('é').cast::<char>().unwrap(), 'é');
    assert_eq!(Value::from(65).cast::<char>().unwrap(), 'A');
    assert!(Value::from("xy").cast::<char>().is_err());
}

// ============================================================================
// Null & containers
// ============================================================================

#[test]
fn null_fails_except_for_option() {
    assert_invalid_cast(Value::null().cast::<i32>(), ValueKind::Null);
    assert_invalid_cast(Value::null().cast::<String>(), ValueKind::Null);
    assert_eq!(Value::null().cast::<Option<i32>>().unwrap(), None);
    assert_eq!(Value::from(5).cast::<Option<i32>>().unwrap(), Some(5));
}

#[test]
fn missing_key_with_option_is_none() {
    let v = Value::from_json("{ a: 1 }").unwrap();
    assert_eq!(v["b"].cast::<Option<String>>().unwrap(), None);
}

#[test]
fn containers_fail_for_scalars() {
    assert_invalid_cast(Value::empty_object().cast::<String>(), ValueKind::Object);
    assert_invalid_cast(Value::empty_array().cast::<bool>(), ValueKind::Array);
}

#[test]
fn cast_to_value_clones() {
    let v = Value::from_json("[1, [2]]").unwrap();
    assert_eq!(v.cast::<Value>().unwrap(), v);
}

#[test]
fn cast_to_vec() {
    let v = Value::from_json(r#"[1, "2", true]"#).unwrap();
    assert_eq!(v.cast::<Vec<i32>>().unwrap(), vec![1, 2, 1]);
    assert!(Value::from(1).cast::<Vec<i32>>().is_err());
}

// ============================================================================
// Opaque scalars
// ============================================================================

#[test]
fn utc_datetime_round_trip() {
    let dt = naive().and_utc();
    let v = Value::from(dt);
    assert_eq!(v.as_str(), Some("2024-05-06T07:08:09.1234567Z"));
    assert_eq!(v.cast::<DateTime<Utc>>().unwrap(), dt);
}

#[test]
fn zoned_datetime_round_trip() {
    let tz = FixedOffset::west_opt(5 * 3600).unwrap();
    let dt = tz.from_local_datetime(&naive()).unwrap();
    let v = Value::from(dt);
    assert_eq!(v.as_str(), Some("2024-05-06T07:08:09.1234567-05:00"));
    assert_eq!(v.cast::<DateTime<FixedOffset>>().unwrap(), dt);
}

#[test]
fn naive_datetime_round_trip() {
    let v = Value::from(naive());
    assert_eq!(v.as_str(), Some("2024-05-06T07:08:09.1234567"));
    assert_eq!(v.cast::<NaiveDateTime>().unwrap(), naive());
}

#[test]
fn duration_round_trip() {
    let d = TimeDelta::new(3 * 86_400 + 61, 0).unwrap();
    let v = Value::from(d);
    assert_eq!(v.as_str(), Some("3.00:01:01"));
    assert_eq!(v.cast::<TimeDelta>().unwrap(), d);
}

#[test]
fn uuid_round_trip() {
    let id = Uuid::parse_str("67E55044-10B1-426F-9247-BB680E5FE0C8").unwrap();
    let v = Value::from(id);
    assert_eq!(v.as_str(), Some("67e55044-10b1-426f-9247-bb680e5fe0c8"));
    assert_eq!(v.cast::<Uuid>().unwrap(), id);
}

#[test]
fn bad_temporal_text_is_invalid_cast() {
    assert_invalid_cast(Value::from("yesterday").cast::<DateTime<Utc>>(), ValueKind::String);
    assert_invalid_cast(Value::from(5).cast::<Uuid>(), ValueKind::Number);
}
