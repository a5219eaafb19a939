//! Depth-limited, key-redacting copies of a document.
//!
//! Used by the console helpers and the CLI `trim` command to keep log output
//! small and free of secrets.

use crate::value::{Payload, Value};

/// Replacement for the value of a hidden key.
pub const HIDDEN_MARKER: &str = "***";
/// Replacement for an Array nested deeper than the limit.
pub const ARRAY_MARKER: &str = "[...]";
/// Replacement for an Object nested deeper than the limit.
pub const OBJECT_MARKER: &str = "{...}";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditOptions {
    /// Deepest container level kept, the root being level 1. 0 means
    /// unlimited.
    pub max_depth: usize,
    /// Object keys whose values are replaced by [`HIDDEN_MARKER`].
    pub hide_keys: Vec<String>,
    /// Rebuild even when no limit is configured.
    pub always: bool,
}

impl EditOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_hide_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hide_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_always(mut self, always: bool) -> Self {
        self.always = always;
        self
    }

    /// True when no limit is configured and no rebuild is forced.
    fn is_noop(&self) -> bool {
        self.max_depth == 0 && self.hide_keys.is_empty() && !self.always
    }

    fn is_hidden(&self, key: &str) -> bool {
        self.hide_keys.iter().any(|hidden| hidden == key)
    }

    fn too_deep(&self, depth: usize) -> bool {
        self.max_depth > 0 && depth > self.max_depth
    }
}

fn depth_marker(value: &Value) -> Option<Value> {
    match value.payload {
        Payload::Array(_) => Some(Value::from(ARRAY_MARKER)),
        Payload::Object(_) => Some(Value::from(OBJECT_MARKER)),
        _ => None,
    }
}

impl Value {
    /// Copy of this value with the limits in `options` applied.
    ///
    /// ```
    /// use dynjson::{EditOptions, Value};
    ///
    /// let v = Value::from_json(r#"{ user: "ann", password: "s3cret", tags: [[1]] }"#).unwrap();
    /// let opts = EditOptions::default().with_max_depth(2).with_hide_keys(["password"]);
    /// let trimmed = v.clone_with(&opts);
    /// assert_eq!(trimmed.to_json(false, false), r#"{"user":"ann","password":"***","tags":["[...]"]}"#);
    /// ```
    pub fn clone_with(&self, options: &EditOptions) -> Value {
        if options.is_noop() {
            return self.clone();
        }
        rebuild(self, options, 1)
    }

    /// Apply the limits in `options` in place.
    pub fn trim(&mut self, options: &EditOptions) {
        if options.is_noop() {
            return;
        }
        trim_in_place(self, options, 1);
    }
}

fn rebuild(value: &Value, options: &EditOptions, depth: usize) -> Value {
    if options.too_deep(depth) {
        if let Some(marker) = depth_marker(value) {
            return marker;
        }
    }
    let payload = match &value.payload {
        Payload::Array(items) => Payload::Array(items.iter().map(|item| rebuild(item, options, depth + 1)).collect()),
        Payload::Object(map) => Payload::Object(
            map.iter()
                .map(|(key, item)| {
                    let item = if options.is_hidden(key) {
                        Value::from(HIDDEN_MARKER)
                    } else {
                        rebuild(item, options, depth + 1)
                    };
                    (key.clone(), item)
                })
                .collect(),
        ),
        scalar => scalar.clone(),
    };
    Value::from_payload(payload)
}

fn trim_in_place(value: &mut Value, options: &EditOptions, depth: usize) {
    if options.too_deep(depth) {
        if let Some(marker) = depth_marker(value) {
            *value = marker;
            return;
        }
    }
    value.origin = None;
    match &mut value.payload {
        Payload::Array(items) => {
            for item in items {
                trim_in_place(item, options, depth + 1);
            }
        }
        Payload::Object(map) => {
            for (key, item) in map.iter_mut() {
                if options.is_hidden(key) {
                    *item = Value::from(HIDDEN_MARKER);
                } else {
                    trim_in_place(item, options, depth + 1);
                }
            }
        }
        _ => {}
    }
}
