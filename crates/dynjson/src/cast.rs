//! `Value::cast::<T>()`: coercion of a payload to a native Rust type.
//!
//! Numbers, strings and booleans convert into each other following the usual
//! numeric/text rules. Null and containers only convert to `Value`, `Option`
//! (Null → `None`) and `Vec` (Arrays); every other combination is an
//! invalid-cast error.

use crate::error::{DynError, Result};
use crate::temporal;
use crate::types::ValueKind;
use crate::value::{Payload, Value};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta, Utc};
use serde_json::Number;
use uuid::Uuid;

/// Types a `Value` can be coerced into with [`Value::cast`].
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self>;
}

impl Value {
    /// Coerce the payload to `T`.
    ///
    /// ```
    /// use dynjson::Value;
    ///
    /// assert_eq!(Value::from("42").cast::<i64>().unwrap(), 42);
    /// assert_eq!(Value::from(2.5).cast::<i32>().unwrap(), 2);
    /// assert_eq!(Value::from(true).cast::<String>().unwrap(), "true");
    /// assert!(Value::null().cast::<i32>().is_err());
    /// assert_eq!(Value::null().cast::<Option<i32>>().unwrap(), None);
    /// ```
    pub fn cast<T: FromValue>(&self) -> Result<T> {
        T::from_value(self)
    }
}

fn unsupported(value: &Value, to: &'static str) -> DynError {
    DynError::invalid_cast(value.kind(), to, "no conversion for this kind")
}

fn parse_number(text: &str, from: ValueKind, to: &'static str) -> Result<Number> {
    serde_json::from_str::<Number>(text.trim())
        .map_err(|_| DynError::invalid_cast(from, to, format!("{:?} is not a number", text)))
}

// ============================================================================
// Numbers
// ============================================================================

/// Exact integer as sign and magnitude, wide enough for both `i128` and
/// `u128` targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Wide {
    negative: bool,
    magnitude: u128,
}

impl Wide {
    fn narrow<T>(self) -> Option<T>
    where
        T: TryFrom<u128> + TryFrom<i128>,
    {
        if self.negative {
            let signed = 0i128.checked_sub_unsigned(self.magnitude)?;
            <T as TryFrom<i128>>::try_from(signed).ok()
        } else {
            <T as TryFrom<u128>>::try_from(self.magnitude).ok()
        }
    }
}

impl std::fmt::Display for Wide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.negative && self.magnitude != 0 {
            f.write_str("-")?;
        }
        write!(f, "{}", self.magnitude)
    }
}

fn split_sign(text: &str) -> (bool, &str) {
    match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    }
}

/// Decimal number text read as `0.DIGITS * 10^point`, leading zeros removed.
/// An empty `digits` is zero.
struct Decimal {
    negative: bool,
    digits: Vec<u8>,
    point: i64,
}

impl Decimal {
    fn parse(text: &str) -> Option<Self> {
        let (negative, unsigned) = split_sign(text);
        let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
            Some(at) => (&unsigned[..at], unsigned[at + 1..].parse::<i64>().ok()?),
            None => (unsigned, 0),
        };
        let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        if whole.is_empty() || !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }

        let mut digits: Vec<u8> = whole.bytes().chain(fraction.bytes()).map(|b| b - b'0').collect();
        let leading = digits.iter().take_while(|&&d| d == 0).count();
        digits.drain(..leading);
        if digits.is_empty() {
            return Some(Self {
                negative,
                digits,
                point: 0,
            });
        }
        let point = i64::try_from(whole.len())
            .ok()?
            .checked_add(exponent)?
            .checked_sub(i64::try_from(leading).ok()?)?;
        Some(Self {
            negative,
            digits,
            point,
        })
    }

    fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    /// Nearest integer, ties to even. `None` past the `u128` range.
    fn round_ties_even(&self) -> Option<Wide> {
        // u128::MAX has 39 digits.
        if self.point > 39 {
            return None;
        }
        let split = usize::try_from(self.point.max(0)).ok()?;
        let mut magnitude: u128 = 0;
        for i in 0..split {
            let digit = self.digits.get(i).copied().unwrap_or(0);
            magnitude = magnitude.checked_mul(10)?.checked_add(u128::from(digit))?;
        }

        // A negative point means the value is below 0.1.
        let round_up = self.point >= 0
            && match self.digits.get(split) {
                Some(&first) if first > 5 => true,
                Some(&5) => self.digits[split + 1..].iter().any(|&d| d != 0) || magnitude % 2 == 1,
                _ => false,
            };
        if round_up {
            magnitude = magnitude.checked_add(1)?;
        }
        Some(Wide {
            negative: self.negative,
            magnitude,
        })
    }
}

fn to_wide(value: &Value, to: &'static str) -> Result<Wide> {
    let out_of_range = |text: &str| DynError::invalid_cast(value.kind(), to, format!("{} is out of range", text));
    match &value.payload {
        Payload::Number(n) => {
            let text = n.to_string();
            Decimal::parse(&text)
                .and_then(|decimal| decimal.round_ties_even())
                .ok_or_else(|| out_of_range(&text))
        }
        Payload::String(s) => {
            let text = s.trim();
            let (negative, digits) = split_sign(text);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(DynError::invalid_cast(
                    ValueKind::String,
                    to,
                    format!("{:?} is not an integer", s),
                ));
            }
            let magnitude = digits.parse::<u128>().map_err(|_| out_of_range(text))?;
            Ok(Wide { negative, magnitude })
        }
        Payload::Bool(b) => Ok(Wide {
            negative: false,
            magnitude: u128::from(*b),
        }),
        _ => Err(unsupported(value, to)),
    }
}

macro_rules! impl_integer_cast {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Result<Self> {
                    let to = stringify!($ty);
                    let wide = to_wide(value, to)?;
                    wide.narrow::<$ty>().ok_or_else(|| {
                        DynError::invalid_cast(value.kind(), to, format!("{} is out of range", wide))
                    })
                }
            }
        )*
    };
}

impl_integer_cast!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self> {
        let from_number = |n: &Number| {
            n.as_f64()
                .ok_or_else(|| DynError::invalid_cast(value.kind(), "f64", format!("{} is out of range", n)))
        };
        match &value.payload {
            Payload::Number(n) => from_number(n),
            Payload::String(s) => from_number(&parse_number(s, ValueKind::String, "f64")?),
            Payload::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            _ => Err(unsupported(value, "f64")),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Result<Self> {
        let wide = f64::from_value(value).map_err(|err| match err {
            DynError::InvalidCast { from, reason, .. } => DynError::InvalidCast { from, to: "f32", reason },
            other => other,
        })?;
        let narrow = wide as f32;
        if narrow.is_infinite() {
            return Err(DynError::invalid_cast(value.kind(), "f32", format!("{} is out of range", wide)));
        }
        Ok(narrow)
    }
}

// ============================================================================
// Booleans & text
// ============================================================================

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self> {
        match &value.payload {
            Payload::Bool(b) => Ok(*b),
            Payload::Number(n) => Ok(Decimal::parse(&n.to_string()).is_none_or(|d| !d.is_zero())),
            Payload::String(s) => {
                let s = s.trim();
                if s.eq_ignore_ascii_case("true") {
                    Ok(true)
                } else if s.eq_ignore_ascii_case("false") {
                    Ok(false)
                } else {
                    Err(DynError::invalid_cast(
                        ValueKind::String,
                        "bool",
                        format!("{:?} is not a boolean", s),
                    ))
                }
            }
            _ => Err(unsupported(value, "bool")),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self> {
        match &value.payload {
            Payload::String(s) => Ok(s.clone()),
            Payload::Number(n) => Ok(n.to_string()),
            Payload::Bool(b) => Ok(b.to_string()),
            _ => Err(unsupported(value, "String")),
        }
    }
}

impl FromValue for char {
    fn from_value(value: &Value) -> Result<Self> {
        match &value.payload {
            Payload::String(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(DynError::invalid_cast(
                        ValueKind::String,
                        "char",
                        format!("{:?} is not a single character", s),
                    )),
                }
            }
            Payload::Number(_) => {
                let code = u32::from_value(value)
                    .map_err(|err| DynError::invalid_cast(ValueKind::Number, "char", err.to_string()))?;
                char::from_u32(code).ok_or_else(|| {
                    DynError::invalid_cast(ValueKind::Number, "char", format!("{} is not a code point", code))
                })
            }
            _ => Err(unsupported(value, "char")),
        }
    }
}

// ============================================================================
// Structural
// ============================================================================

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self> {
        if value.is_null() {
            return Ok(None);
        }
        T::from_value(value).map(Some)
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self> {
        match &value.payload {
            Payload::Array(items) => items.iter().map(T::from_value).collect(),
            _ => Err(unsupported(value, "Vec")),
        }
    }
}

// ============================================================================
// Opaque scalars (canonical text)
// ============================================================================

fn text<'v>(value: &'v Value, to: &'static str) -> Result<&'v str> {
    value.as_str().ok_or_else(|| unsupported(value, to))
}

fn parsed<T>(value: &Value, to: &'static str, parse: impl FnOnce(&str) -> Option<T>) -> Result<T> {
    let s = text(value, to)?;
    parse(s).ok_or_else(|| DynError::invalid_cast(ValueKind::String, to, format!("cannot parse {:?}", s)))
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: &Value) -> Result<Self> {
        parsed(value, "DateTime<Utc>", temporal::parse_utc)
    }
}

impl FromValue for DateTime<FixedOffset> {
    fn from_value(value: &Value) -> Result<Self> {
        parsed(value, "DateTime<FixedOffset>", temporal::parse_zoned)
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: &Value) -> Result<Self> {
        parsed(value, "NaiveDateTime", temporal::parse_naive)
    }
}

impl FromValue for TimeDelta {
    fn from_value(value: &Value) -> Result<Self> {
        parsed(value, "TimeDelta", temporal::parse_duration)
    }
}

impl FromValue for Uuid {
    fn from_value(value: &Value) -> Result<Self> {
        parsed(value, "Uuid", |s| Uuid::parse_str(s.trim()).ok())
    }
}
