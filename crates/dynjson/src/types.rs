//! Logical kinds of a dynjson `Value`.

use std::fmt;

/// The six logical kinds a `Value` can take. The kind is always derived from
/// the current payload, so it may change after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Null,
}

impl ValueKind {
    /// Lowercase name, as used by `Value::type_name` and in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
            ValueKind::Object => "object",
            ValueKind::Array => "array",
            ValueKind::Null => "null",
        }
    }

    /// True for the two container kinds.
    pub fn is_composite(self) -> bool {
        matches!(self, ValueKind::Object | ValueKind::Array)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
