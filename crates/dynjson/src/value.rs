//! The tagged document value.
//!
//! A `Value` owns exactly one payload (null, boolean, number, string, array or
//! object). Its kind is read off the payload on demand, so mutating the payload
//! can change the kind: assigning an index onto Null promotes it to an Array.
//!
//! Besides the payload a value may carry an *origin*, the name of the native
//! type it was converted from. Only the printable renderer looks at it; it is
//! ignored by equality and by JSON output, and cleared whenever a mutating
//! accessor replaces the payload.

use crate::error::{DynError, Result};
use crate::settings::Settings;
use crate::types::ValueKind;
use crate::{bridge, parser};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Number;
use std::fmt;

/// Ordered key → value storage of an Object payload.
pub type Map = IndexMap<String, Value>;

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) enum Payload {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Object(Map),
}

#[derive(Clone, Default)]
pub struct Value {
    pub(crate) payload: Payload,
    pub(crate) origin: Option<&'static str>,
}

/// Shared Null returned by soft-miss lookups.
pub(crate) static NULL: Value = Value {
    payload: Payload::Null,
    origin: None,
};

/// What the top-level factories do when conversion or parsing fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnError {
    /// Return the error to the caller.
    #[default]
    Propagate,
    /// Log the error and return Null instead.
    Ignore,
}

impl OnError {
    fn recover(self, err: DynError, site: &'static str) -> Result<Value> {
        match self {
            OnError::Propagate => Err(err),
            OnError::Ignore => {
                tracing::warn!(error = %err, site, "conversion failed; degrading to null");
                Ok(Value::null())
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.payload == other.payload
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::Null => f.write_str("Null"),
            Payload::Bool(b) => write!(f, "Bool({})", b),
            Payload::Number(n) => write!(f, "Number({})", n),
            Payload::String(s) => write!(f, "String({:?})", s),
            Payload::Array(items) => {
                f.write_str("Array ")?;
                f.debug_list().entries(items).finish()
            }
            Payload::Object(map) => {
                f.write_str("Object ")?;
                f.debug_map().entries(map).finish()
            }
        }
    }
}

// ============================================================================
// Construction
// ============================================================================

impl Value {
    pub(crate) fn from_payload(payload: Payload) -> Self {
        Self {
            payload,
            origin: None,
        }
    }

    /// A fresh Null value.
    pub fn null() -> Self {
        Self::default()
    }

    /// A fresh empty Array.
    pub fn empty_array() -> Self {
        Self::from_payload(Payload::Array(Vec::new()))
    }

    /// A fresh empty Object.
    pub fn empty_object() -> Self {
        Self::from_payload(Payload::Object(Map::new()))
    }

    /// Build an Array from any sequence of convertible items.
    pub fn new_array<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let mut result = Self::empty_array();
        for item in items {
            result.add(item);
        }
        result
    }

    /// Build an Object from a flat `key, value, key, value, ...` sequence.
    ///
    /// Keys are cast to strings. An odd number of arguments or a repeated key
    /// is an invalid-argument failure.
    ///
    /// ```
    /// use dynjson::Value;
    ///
    /// let obj = Value::new_object([Value::from("a"), Value::from(111)]).unwrap();
    /// assert_eq!(obj["a"].cast::<i32>().unwrap(), 111);
    /// assert!(Value::new_object([Value::from("a")]).is_err());
    /// ```
    pub fn new_object<I>(args: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let args: Vec<Value> = args.into_iter().map(Into::into).collect();
        if args.len() % 2 != 0 {
            return Err(DynError::InvalidArgument(format!(
                "new_object requires an even number of arguments, got {}",
                args.len()
            )));
        }
        let mut result = Self::empty_object();
        let mut args = args.into_iter();
        while let (Some(key), Some(value)) = (args.next(), args.next()) {
            let key: String = key.cast()?;
            result.add_entry(key, value)?;
        }
        Ok(result)
    }

    /// Convert any serializable native value through the plain-object bridge.
    ///
    /// Converting a `Value` yields an equal `Value`, origin included.
    pub fn from_object<T: Serialize + ?Sized>(x: &T) -> Result<Self> {
        bridge::to_value(x)
    }

    /// Like [`Value::from_object`], optionally degrading failures to Null.
    pub fn from_object_with<T: Serialize + ?Sized>(x: &T, on_error: OnError) -> Result<Self> {
        bridge::to_value(x).or_else(|err| on_error.recover(err, "from_object"))
    }

    /// Parse text with the default settings (relaxed grammar).
    ///
    /// A leading `#!` line is skipped.
    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_json_with(Some(text), &Settings::default(), OnError::Propagate)
    }

    /// Parse text with explicit settings. `None` yields Null.
    pub fn from_json_with(text: Option<&str>, settings: &Settings, on_error: OnError) -> Result<Self> {
        let Some(text) = text else {
            return Ok(Self::null());
        };
        parser::parse(strip_shebang(text), settings).or_else(|err| on_error.recover(err, "from_json"))
    }

    /// Replace this value's payload with the conversion of `x`.
    pub fn import_plain<T: Serialize + ?Sized>(&mut self, x: &T) -> Result<()> {
        *self = Self::from_object(x)?;
        Ok(())
    }

    /// Replace this value's payload with the parse of `text`.
    pub fn import_json(&mut self, text: &str) -> Result<()> {
        *self = Self::from_json(text)?;
        Ok(())
    }

    /// Indented JSON in insertion order.
    pub fn export_json(&self) -> String {
        self.to_json(true, false)
    }

    /// Attach an origin type name for printable output.
    pub fn with_origin(mut self, origin: &'static str) -> Self {
        self.origin = Some(origin);
        self
    }

    /// The native type name this value was converted from, if recorded.
    pub fn origin(&self) -> Option<&'static str> {
        self.origin
    }
}

fn strip_shebang(text: &str) -> &str {
    if !text.starts_with("#!") {
        return text;
    }
    text.split_once('\n').map(|(_, rest)| rest).unwrap_or("")
}

// ============================================================================
// Typing
// ============================================================================

impl Value {
    /// The logical kind of the current payload.
    pub fn kind(&self) -> ValueKind {
        match self.payload {
            Payload::Null => ValueKind::Null,
            Payload::Bool(_) => ValueKind::Boolean,
            Payload::Number(_) => ValueKind::Number,
            Payload::String(_) => ValueKind::String,
            Payload::Array(_) => ValueKind::Array,
            Payload::Object(_) => ValueKind::Object,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn is_null(&self) -> bool {
        matches!(self.payload, Payload::Null)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self.payload, Payload::Bool(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self.payload, Payload::Number(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self.payload, Payload::String(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.payload, Payload::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self.payload, Payload::Object(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.payload {
            Payload::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match &self.payload {
            Payload::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.payload {
            Payload::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match &self.payload {
            Payload::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match &mut self.payload {
            Payload::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match &self.payload {
            Payload::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Map> {
        match &mut self.payload {
            Payload::Object(map) => Some(map),
            _ => None,
        }
    }
}

// ============================================================================
// Containment & enumeration
// ============================================================================

impl Value {
    /// Element count for Arrays, entry count for Objects, 0 otherwise.
    pub fn len(&self) -> usize {
        match &self.payload {
            Payload::Array(items) => items.len(),
            Payload::Object(map) => map.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Object keys in insertion order; empty for every other kind.
    pub fn keys(&self) -> Vec<String> {
        match &self.payload {
            Payload::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// True only for genuine Objects. Association lists never match.
    pub fn contains_key(&self, key: &str) -> bool {
        match &self.payload {
            Payload::Object(map) => map.contains_key(key),
            _ => false,
        }
    }

    /// Array elements or Object entries in container order. Scalars and
    /// Null yield nothing.
    pub fn iter(&self) -> Iter<'_> {
        let inner = match &self.payload {
            Payload::Array(items) => IterInner::Array(items.iter()),
            Payload::Object(map) => IterInner::Object(map.iter()),
            _ => IterInner::Empty,
        };
        Iter { inner }
    }
}

/// One item of [`Value::iter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Member<'a> {
    Element(&'a Value),
    Entry(&'a str, &'a Value),
}

impl<'a> Member<'a> {
    pub fn key(&self) -> Option<&'a str> {
        match *self {
            Member::Element(_) => None,
            Member::Entry(key, _) => Some(key),
        }
    }

    pub fn value(&self) -> &'a Value {
        match *self {
            Member::Element(value) | Member::Entry(_, value) => value,
        }
    }
}

pub struct Iter<'a> {
    inner: IterInner<'a>,
}

enum IterInner<'a> {
    Array(std::slice::Iter<'a, Value>),
    Object(indexmap::map::Iter<'a, String, Value>),
    Empty,
}

impl<'a> Iterator for Iter<'a> {
    type Item = Member<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IterInner::Array(items) => items.next().map(Member::Element),
            IterInner::Object(entries) => entries.next().map(|(k, v)| Member::Entry(k, v)),
            IterInner::Empty => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            IterInner::Array(items) => items.size_hint(),
            IterInner::Object(entries) => entries.size_hint(),
            IterInner::Empty => (0, Some(0)),
        }
    }
}

impl<'a> IntoIterator for &'a Value {
    type Item = Member<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// Mutation primitives
// ============================================================================

impl Value {
    /// Replace any non-Array payload with an empty Array, then hand it out.
    pub(crate) fn coerce_array(&mut self) -> &mut Vec<Value> {
        if !self.is_array() {
            *self = Self::empty_array();
        }
        match &mut self.payload {
            Payload::Array(items) => items,
            _ => unreachable!("payload was just coerced to an array"),
        }
    }

    /// Replace any non-Object payload with an empty Object, then hand it out.
    pub(crate) fn coerce_object(&mut self) -> &mut Map {
        if !self.is_object() {
            *self = Self::empty_object();
        }
        match &mut self.payload {
            Payload::Object(map) => map,
            _ => unreachable!("payload was just coerced to an object"),
        }
    }

    /// Append to the Array payload, promoting a non-Array first.
    pub fn add(&mut self, value: impl Into<Value>) -> &mut Self {
        self.coerce_array().push(value.into());
        self
    }

    /// Insert into the Object payload, promoting a non-Object first.
    /// Insert-only: an existing key is an invalid-argument failure.
    pub fn add_entry(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<&mut Self> {
        let key = key.into();
        let map = self.coerce_object();
        if map.contains_key(&key) {
            return Err(DynError::InvalidArgument(format!(
                "an entry with key {:?} already exists",
                key
            )));
        }
        map.insert(key, value.into());
        Ok(self)
    }

    /// Remove and return the first Array element. `None` for non-Arrays and
    /// empty Arrays.
    pub fn shift(&mut self) -> Option<Value> {
        match &mut self.payload {
            Payload::Array(items) if !items.is_empty() => Some(items.remove(0)),
            _ => None,
        }
    }

    /// Reset the payload to Null in place.
    pub fn nullify(&mut self) {
        *self = Self::null();
    }
}
