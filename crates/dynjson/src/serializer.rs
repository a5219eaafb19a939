//! Output: canonical JSON and the printable debug form.
//!
//! # Printable format
//!
//! ```text
//! Title: <Person> {
//!   a: 123,
//!   "two words": "abc"
//! }
//! ```
//!
//! Identifier-like keys are bare, other keys and all strings are JSON-quoted.
//! The `<Origin>` prefix appears only with `show_detail` and only on
//! composites that recorded a native type name. Compact mode drops every
//! newline and space: `{a:123,b:"abc"}`.

use crate::settings::Settings;
use crate::value::{Payload, Value};
use std::fmt::{self, Write as _};

const INDENT: &str = "  ";

fn push_indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str(INDENT);
    }
}

/// Append `s` as a JSON string literal.
pub(crate) fn write_quoted(out: &mut String, s: &str, force_ascii: bool) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c if force_ascii && !c.is_ascii() => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{:04x}", unit);
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

// ============================================================================
// JSON
// ============================================================================

/// Layout options for [`Value::to_json_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JsonFormat {
    /// Two-space pretty layout instead of a single line.
    pub indent: bool,
    /// Emit Object keys in lexicographic order.
    pub sort_keys: bool,
    /// Escape every non-ASCII character as `\uXXXX`.
    pub force_ascii: bool,
}

impl JsonFormat {
    /// Compact, insertion-ordered output with the ASCII policy from `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            force_ascii: settings.force_ascii,
            ..Self::default()
        }
    }

    pub fn with_indent(mut self, indent: bool) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_sort_keys(mut self, sort_keys: bool) -> Self {
        self.sort_keys = sort_keys;
        self
    }

    pub fn with_force_ascii(mut self, force_ascii: bool) -> Self {
        self.force_ascii = force_ascii;
        self
    }
}

impl Value {
    /// Canonical JSON text.
    ///
    /// ```
    /// use dynjson::Value;
    ///
    /// let v = Value::from_json("{ b: [1, 2], a: 0.10 }").unwrap();
    /// assert_eq!(v.to_json(false, false), r#"{"b":[1,2],"a":0.10}"#);
    /// assert_eq!(v.to_json(false, true), r#"{"a":0.10,"b":[1,2]}"#);
    /// ```
    pub fn to_json(&self, indent: bool, sort_keys: bool) -> String {
        self.to_json_with(&JsonFormat {
            indent,
            sort_keys,
            force_ascii: false,
        })
    }

    pub fn to_json_with(&self, format: &JsonFormat) -> String {
        let mut out = String::new();
        write_json(&mut out, self, format, 0);
        out
    }
}

fn write_json(out: &mut String, value: &Value, format: &JsonFormat, level: usize) {
    match &value.payload {
        Payload::Null => out.push_str("null"),
        Payload::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Payload::Number(n) => {
            let _ = write!(out, "{}", n);
        }
        Payload::String(s) => write_quoted(out, s, format.force_ascii),
        Payload::Array(items) => {
            write_container(out, ('[', ']'), items.iter(), format.indent, level, |out, item, level| {
                write_json(out, item, format, level)
            });
        }
        Payload::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            if format.sort_keys {
                entries.sort_by(|a, b| a.0.cmp(b.0));
            }
            let separator = if format.indent { ": " } else { ":" };
            write_container(out, ('{', '}'), entries.into_iter(), format.indent, level, |out, (key, item), level| {
                write_quoted(out, key, format.force_ascii);
                out.push_str(separator);
                write_json(out, item, format, level);
            });
        }
    }
}

/// Shared bracket / separator / indentation logic for both output forms.
fn write_container<T>(
    out: &mut String,
    (open, close): (char, char),
    members: impl ExactSizeIterator<Item = T>,
    indent: bool,
    level: usize,
    mut write_member: impl FnMut(&mut String, T, usize),
) {
    out.push(open);
    if members.len() == 0 {
        out.push(close);
        return;
    }
    for (i, member) in members.enumerate() {
        if i > 0 {
            out.push(',');
        }
        if indent {
            out.push('\n');
            push_indent(out, level + 1);
        }
        write_member(out, member, level + 1);
    }
    if indent {
        out.push('\n');
        push_indent(out, level);
    }
    out.push(close);
}

// ============================================================================
// Printable
// ============================================================================

/// Options for [`Value::to_printable`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrintOptions {
    /// Rendered as a `Title: ` prefix.
    pub title: Option<String>,
    /// Single-line output without any whitespace.
    pub no_indent: bool,
    /// Prefix composites with `<Origin> ` when an origin is recorded.
    pub show_detail: bool,
}

impl PrintOptions {
    /// Indented output with the detail policy from `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            show_detail: settings.show_detail,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_no_indent(mut self, no_indent: bool) -> Self {
        self.no_indent = no_indent;
        self
    }

    pub fn with_show_detail(mut self, show_detail: bool) -> Self {
        self.show_detail = show_detail;
        self
    }
}

impl Value {
    /// Debug rendering in the printable format described on [`crate::serializer`].
    pub fn to_printable(&self, options: &PrintOptions) -> String {
        let mut out = String::new();
        if let Some(title) = &options.title {
            out.push_str(title);
            out.push_str(": ");
        }
        write_printable(&mut out, self, options, 0);
        out
    }
}

/// Indented printable form of `value` with an optional title.
pub fn printable(value: &Value, title: Option<&str>) -> String {
    let options = PrintOptions {
        title: title.map(str::to_owned),
        ..PrintOptions::default()
    };
    value.to_printable(&options)
}

fn is_bare_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn write_printable(out: &mut String, value: &Value, options: &PrintOptions, level: usize) {
    let indent = !options.no_indent;
    if options.show_detail && value.kind().is_composite() {
        if let Some(origin) = value.origin {
            let _ = write!(out, "<{}> ", origin);
        }
    }
    match &value.payload {
        Payload::String(s) => write_quoted(out, s, false),
        Payload::Array(items) => {
            write_container(out, ('[', ']'), items.iter(), indent, level, |out, item, level| {
                write_printable(out, item, options, level)
            });
        }
        Payload::Object(map) => {
            let separator = if indent { ": " } else { ":" };
            write_container(out, ('{', '}'), map.iter(), indent, level, |out, (key, item), level| {
                if is_bare_key(key) {
                    out.push_str(key);
                } else {
                    write_quoted(out, key, false);
                }
                out.push_str(separator);
                write_printable(out, item, options, level);
            });
        }
        // Scalars render exactly as in JSON.
        _ => write_json(out, value, &JsonFormat::default(), level),
    }
}

impl fmt::Display for Value {
    /// Indented printable form; `{:#}` adds origin prefixes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = PrintOptions {
            show_detail: f.alternate(),
            ..PrintOptions::default()
        };
        f.write_str(&self.to_printable(&options))
    }
}
