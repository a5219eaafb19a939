//! Plain-object bridge: native Rust values in and out of `Value`.
//!
//! Inbound, there are direct `From` impls for scalars, strings, the common
//! containers, `serde_json::Value`, chrono date/time types and `Uuid`, plus a
//! generic path for anything `Serialize` through [`to_value`]. The generic path
//! records struct names as origins so the printable renderer can show them.
//!
//! Outbound, [`Value::to_object`] builds a `serde_json::Value` tree and
//! [`Value::to_native`] deserializes into any owned type.

use crate::error::{DynError, Result};
use crate::temporal;
use crate::value::{Map, Payload, Value};
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeDelta, Utc};
use indexmap::IndexMap;
use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use serde::ser::{self, Serialize, Serializer};
use serde_json::Number;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use uuid::Uuid;

/// Struct name `serde_json::Number` serializes under when exact decimal text
/// is enabled. Its single field carries the text.
const NUMBER_TOKEN: &str = "$serde_json::private::Number";

impl ser::Error for DynError {
    fn custom<T: Display>(msg: T) -> Self {
        DynError::Convert(msg.to_string())
    }
}

/// Short type name for origins: `alloc::vec::Vec<i32>` → `Vec`.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

fn number_from_text(text: &str) -> Option<Number> {
    serde_json::from_str(text).ok()
}

fn number_value(n: Number) -> Value {
    Value::from_payload(Payload::Number(n))
}

// ============================================================================
// Scalars
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::from_payload(Payload::Bool(b))
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    number_value(Number::from(n))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! impl_from_wide_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    number_from_text(&n.to_string()).map(number_value).unwrap_or_default()
                }
            }
        )*
    };
}

impl_from_wide_integer!(i128, u128);

impl From<f64> for Value {
    /// NaN and infinities have no JSON form and become Null.
    fn from(f: f64) -> Self {
        Number::from_f64(f).map(number_value).unwrap_or_default()
    }
}

impl From<f32> for Value {
    /// Uses the shortest `f32` text, so `0.1f32` stays `0.1`.
    fn from(f: f32) -> Self {
        if !f.is_finite() {
            return Value::null();
        }
        number_from_text(&f.to_string()).map(number_value).unwrap_or_default()
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        number_value(n)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::from_payload(Payload::String(c.to_string()))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::from_payload(Payload::String(s.to_owned()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::from_payload(Payload::String(s))
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::from(s.as_str())
    }
}

impl From<Cow<'_, str>> for Value {
    fn from(s: Cow<'_, str>) -> Self {
        Value::from(s.into_owned())
    }
}

impl From<&Value> for Value {
    fn from(v: &Value) -> Self {
        v.clone()
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or_default()
    }
}

// ============================================================================
// Opaque scalars
// ============================================================================

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::from(temporal::format_utc(&dt))
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Value::from(temporal::format_zoned(&dt))
    }
}

impl From<DateTime<Local>> for Value {
    fn from(dt: DateTime<Local>) -> Self {
        Value::from(temporal::format_zoned(&dt))
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::from(temporal::format_naive(&dt))
    }
}

impl From<TimeDelta> for Value {
    fn from(d: TimeDelta) -> Self {
        Value::from(temporal::format_duration(&d))
    }
}

impl From<Uuid> for Value {
    fn from(id: Uuid) -> Self {
        Value::from(id.hyphenated().to_string())
    }
}

// ============================================================================
// Containers
// ============================================================================

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::from_payload(Payload::Array(items.into_iter().map(Into::into).collect()))
            .with_origin(short_type_name::<Vec<T>>())
    }
}

impl<T: Clone + Into<Value>> From<&[T]> for Value {
    fn from(items: &[T]) -> Self {
        Value::from_payload(Payload::Array(items.iter().cloned().map(Into::into).collect()))
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Value::from_payload(Payload::Array(items.into_iter().map(Into::into).collect()))
    }
}

macro_rules! impl_from_map {
    ($($map:ident),*) => {
        $(
            impl<K: Into<String>, T: Into<Value>, S> From<$map<K, T, S>> for Value {
                fn from(entries: $map<K, T, S>) -> Self {
                    let map: Map = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
                    Value::from_payload(Payload::Object(map)).with_origin(short_type_name::<$map<K, T, S>>())
                }
            }
        )*
    };
}

impl_from_map!(HashMap, IndexMap);

impl<K: Into<String>, T: Into<Value>> From<BTreeMap<K, T>> for Value {
    fn from(entries: BTreeMap<K, T>) -> Self {
        let map: Map = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Value::from_payload(Payload::Object(map)).with_origin(short_type_name::<BTreeMap<K, T>>())
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        let payload = match json {
            serde_json::Value::Null => Payload::Null,
            serde_json::Value::Bool(b) => Payload::Bool(b),
            serde_json::Value::Number(n) => Payload::Number(n),
            serde_json::Value::String(s) => Payload::String(s),
            serde_json::Value::Array(items) => Payload::Array(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(entries) => {
                Payload::Object(entries.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        };
        Value::from_payload(payload)
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::from_payload(Payload::Array(iter.into_iter().map(Into::into).collect()))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::from_payload(Payload::Object(
            iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        ))
    }
}

// ============================================================================
// Outbound
// ============================================================================

impl Value {
    /// Walk the tree into `serde_json` containers. Numbers stay exact and
    /// Object order is preserved; origins are dropped.
    pub fn to_object(&self) -> serde_json::Value {
        match &self.payload {
            Payload::Null => serde_json::Value::Null,
            Payload::Bool(b) => serde_json::Value::Bool(*b),
            Payload::Number(n) => serde_json::Value::Number(n.clone()),
            Payload::String(s) => serde_json::Value::String(s.clone()),
            Payload::Array(items) => serde_json::Value::Array(items.iter().map(Value::to_object).collect()),
            Payload::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_object())).collect(),
            ),
        }
    }

    /// Deserialize into any owned native type.
    ///
    /// ```
    /// use dynjson::Value;
    /// use std::collections::HashMap;
    ///
    /// let v = Value::from_json("{ a: 1, b: 2 }").unwrap();
    /// let m: HashMap<String, u8> = v.to_native().unwrap();
    /// assert_eq!(m["b"], 2);
    /// ```
    pub fn to_native<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.to_object())?)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        // The origin rides along as a newtype name so that converting a Value
        // through the bridge keeps it.
        match self.origin {
            Some(origin) if self.kind().is_composite() => serializer.serialize_newtype_struct(origin, &self.payload),
            _ => self.payload.serialize(serializer),
        }
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Payload::Null => serializer.serialize_unit(),
            Payload::Bool(b) => serializer.serialize_bool(*b),
            Payload::Number(n) => n.serialize(serializer),
            Payload::String(s) => serializer.serialize_str(s),
            Payload::Array(items) => serializer.collect_seq(items),
            Payload::Object(map) => serializer.collect_map(map),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

// ============================================================================
// Generic inbound path
// ============================================================================

/// Convert any `Serialize` value. Nested structs, maps and sequences become
/// child Values; struct names become origins.
///
/// ```
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Person { a: i32, b: &'static str }
///
/// let v = dynjson::to_value(&Person { a: 123, b: "abc" }).unwrap();
/// assert_eq!(v.origin(), Some("Person"));
/// assert_eq!(v["b"].as_str(), Some("abc"));
/// ```
pub fn to_value<T: Serialize + ?Sized>(x: &T) -> Result<Value> {
    x.serialize(ValueSerializer)
}

/// Serializer whose output is a `Value`.
pub struct ValueSerializer;

fn map_key(key: Value) -> Result<String> {
    match key.payload {
        Payload::String(s) => Ok(s),
        Payload::Number(n) => Ok(n.to_string()),
        Payload::Bool(b) => Ok(b.to_string()),
        _ => Err(DynError::Convert(format!(
            "map key must be a string, number or boolean, got {}",
            key.kind()
        ))),
    }
}

fn tagged(variant: &'static str, inner: Value) -> Value {
    let mut map = Map::new();
    map.insert(variant.to_owned(), inner);
    Value::from_payload(Payload::Object(map))
}

impl Serializer for ValueSerializer {
    type Ok = Value;
    type Error = DynError;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(v.iter().copied().collect())
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::null())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Value> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::null())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::null())
    }

    fn serialize_unit_variant(self, _name: &'static str, _index: u32, variant: &'static str) -> Result<Value> {
        Ok(Value::from(variant))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(self, name: &'static str, value: &T) -> Result<Value> {
        let mut inner = value.serialize(self)?;
        if inner.kind().is_composite() {
            inner.origin = Some(name);
        }
        Ok(inner)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value> {
        Ok(tagged(variant, to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec {
            items: Vec::with_capacity(len.unwrap_or(0)),
            origin: None,
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec {
            items: Vec::with_capacity(len),
            origin: Some(name),
        })
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::Map {
            map: Map::new(),
            next_key: None,
            origin: None,
        })
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<SerializeMap> {
        if name == NUMBER_TOKEN {
            return Ok(SerializeMap::Number { out: None });
        }
        Ok(SerializeMap::Map {
            map: Map::new(),
            next_key: None,
            origin: Some(name),
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            variant,
            map: Map::new(),
        })
    }
}

pub struct SerializeVec {
    items: Vec<Value>,
    origin: Option<&'static str>,
}

impl SerializeVec {
    fn finish(self) -> Value {
        let mut value = Value::from_payload(Payload::Array(self.items));
        value.origin = self.origin;
        value
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = DynError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = DynError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = DynError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

pub struct SerializeTupleVariant {
    variant: &'static str,
    items: Vec<Value>,
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = DynError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(tagged(self.variant, Value::from_payload(Payload::Array(self.items))))
    }
}

pub enum SerializeMap {
    Map {
        map: Map,
        next_key: Option<String>,
        origin: Option<&'static str>,
    },
    /// Exact decimal text handed over by `serde_json::Number`.
    Number { out: Option<Value> },
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = DynError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        match self {
            SerializeMap::Map { next_key, .. } => {
                *next_key = Some(map_key(to_value(key)?)?);
                Ok(())
            }
            SerializeMap::Number { .. } => Err(DynError::Convert("unexpected map inside a number".into())),
        }
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        match self {
            SerializeMap::Map { map, next_key, .. } => {
                let key = next_key
                    .take()
                    .ok_or_else(|| DynError::Convert("map value serialized before its key".into()))?;
                map.insert(key, to_value(value)?);
                Ok(())
            }
            SerializeMap::Number { .. } => Err(DynError::Convert("unexpected map inside a number".into())),
        }
    }

    fn end(self) -> Result<Value> {
        match self {
            SerializeMap::Map { map, origin, .. } => {
                let mut value = Value::from_payload(Payload::Object(map));
                value.origin = origin;
                Ok(value)
            }
            SerializeMap::Number { out } => out.ok_or_else(|| DynError::Convert("number without text".into())),
        }
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = DynError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        match self {
            SerializeMap::Map { map, .. } => {
                map.insert(key.to_owned(), to_value(value)?);
                Ok(())
            }
            SerializeMap::Number { out } => {
                let text = to_value(value)?;
                let number = text
                    .as_str()
                    .and_then(number_from_text)
                    .ok_or_else(|| DynError::Convert(format!("invalid number text {:?}", text)))?;
                *out = Some(number_value(number));
                Ok(())
            }
        }
    }

    fn end(self) -> Result<Value> {
        ser::SerializeMap::end(self)
    }
}

pub struct SerializeStructVariant {
    variant: &'static str,
    map: Map,
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = DynError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.map.insert(key.to_owned(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(tagged(self.variant, Value::from_payload(Payload::Object(self.map))))
    }
}
