//! # dynjson
//!
//! A single dynamically-shaped **document value** for Rust: JSON scalars,
//! objects and arrays (plus Lisp-style association lists) behind one
//! forgiving read/write surface.
//!
//! Lookups never fail. A missing key, an out-of-range index or a value of the
//! wrong shape reads as Null, so deep probing needs no `Option` plumbing.
//! Writes promote the target as needed: assigning an index onto Null turns it
//! into an Array, assigning a key turns it into an Object.
//!
//! ## Quick start
//!
//! ```rust
//! use dynjson::Value;
//!
//! let mut doc = Value::from_json(r#"{ a: 123, b: [11, 22, 33] }"#).unwrap();
//! assert_eq!(doc["a"].cast::<i32>().unwrap(), 123);
//! assert!(doc["missing"]["deeper"][7].is_null());
//!
//! doc["b"].add(777);
//! assert_eq!(doc["b"].len(), 4);
//! assert_eq!(doc.to_json(false, true), r#"{"a":123,"b":[11,22,33,777]}"#);
//! ```
//!
//! ## Modules
//!
//! - [`value`] — `Value`, factories, kind predicates, enumeration, mutation
//! - [`access`] — key / index / association-list accessors and dotted paths
//! - [`cast`] — `Value::cast::<T>()` coercion
//! - [`bridge`] — native Rust values ⇄ `Value` (`From`, serde)
//! - [`parser`] — relaxed JSON and association-list text parser
//! - [`serializer`] — canonical JSON and printable debug output
//! - [`editor`] — depth-limited, key-redacting copies
//! - [`console`] — printable output to stdout / `tracing`
//! - [`settings`] — explicit configuration with reset-to-defaults
//! - [`temporal`] — canonical text for date/time, duration and GUID scalars
//! - [`error`] — error types

pub mod access;
pub mod bridge;
pub mod cast;
pub mod console;
pub mod editor;
pub mod error;
pub mod parser;
pub mod serializer;
pub mod settings;
pub mod temporal;
pub mod types;
pub mod value;

pub use access::{is_association_pair, Accessor};
pub use bridge::to_value;
pub use cast::FromValue;
pub use editor::EditOptions;
pub use error::{DynError, Result};
pub use serializer::{printable, JsonFormat, PrintOptions};
pub use settings::{Settings, Syntax};
pub use types::ValueKind;
pub use value::{Map, Member, OnError, Value};
