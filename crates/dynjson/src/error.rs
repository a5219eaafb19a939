//! Error types for dynjson parsing, conversion and mutation.

use crate::types::ValueKind;
use thiserror::Error;

/// Errors that can occur while building, converting or mutating a `Value`.
///
/// Lookups never produce one of these: a missing key or out-of-range index
/// resolves to Null instead.
#[derive(Error, Debug)]
pub enum DynError {
    /// The input text was not valid relaxed JSON or association-list syntax.
    /// Line and column are 1-based.
    #[error("parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// Strict JSON parsing or native deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A hard failure at the call site: negative index, odd argument count,
    /// duplicate key on insert-only paths.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `cast` could not convert the payload to the requested type.
    #[error("invalid cast from {from} to {to}: {reason}")]
    InvalidCast {
        from: ValueKind,
        to: &'static str,
        reason: String,
    },

    /// The plain-object bridge could not classify a native value.
    #[error("conversion error: {0}")]
    Convert(String),
}

impl DynError {
    pub(crate) fn invalid_cast(from: ValueKind, to: &'static str, reason: impl Into<String>) -> Self {
        DynError::InvalidCast {
            from,
            to,
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout dynjson.
pub type Result<T> = std::result::Result<T, DynError>;
