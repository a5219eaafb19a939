//! Uniform key / index / association-list accessors.
//!
//! Every lookup is forgiving: a missing key, an out-of-range or negative
//! index, or a payload of the wrong shape resolves to Null. Writes are the
//! opposite: they coerce the payload into the container they need (Object for
//! string keys, Array for indices), discarding whatever was there.
//!
//! String keys on an Array payload fall back to association-list semantics:
//! the array is scanned for `[key, value]` pairs.
//!
//! ```
//! use dynjson::Value;
//!
//! let mut v = Value::null();
//! v[3] = Value::from(777);
//! assert_eq!(v.len(), 4);
//! assert!(v[0].is_null());
//!
//! let alist = Value::from_json(r#"( ("a" 123) ("b" true) )"#).unwrap();
//! assert_eq!(alist["a"].cast::<i32>().unwrap(), 123);
//! assert!(alist["z"].is_null());
//! ```

use crate::error::{DynError, Result};
use crate::value::{Payload, Value, NULL};
use std::ops::{Index, IndexMut};

mod private {
    pub trait Sealed {}
    impl Sealed for str {}
    impl Sealed for String {}
    impl Sealed for usize {}
    impl Sealed for isize {}
    impl Sealed for i64 {}
    impl Sealed for i32 {}
    impl<T: ?Sized + Sealed> Sealed for &T {}
}

/// A key or position usable with [`Value::get`], [`Value::set`] and the
/// `[]` operators. Implemented for `str`, `String`, and integer indices.
pub trait Accessor: private::Sealed {
    #[doc(hidden)]
    fn lookup<'v>(&self, v: &'v Value) -> Option<&'v Value>;

    #[doc(hidden)]
    fn lookup_mut<'v>(&self, v: &'v mut Value) -> Option<&'v mut Value>;

    /// Coerce `v` into the right container and return the slot to write.
    #[doc(hidden)]
    fn slot<'v>(&self, v: &'v mut Value) -> Result<&'v mut Value>;
}

impl Accessor for str {
    fn lookup<'v>(&self, v: &'v Value) -> Option<&'v Value> {
        match &v.payload {
            Payload::Object(map) => map.get(self),
            Payload::Array(items) => {
                let pos = association_position(items, self)?;
                items[pos].as_array().and_then(|pair| pair.get(1))
            }
            _ => None,
        }
    }

    fn lookup_mut<'v>(&self, v: &'v mut Value) -> Option<&'v mut Value> {
        match &mut v.payload {
            Payload::Object(map) => map.get_mut(self),
            Payload::Array(items) => {
                let pos = association_position(items, self)?;
                items[pos].as_array_mut().and_then(|pair| pair.get_mut(1))
            }
            _ => None,
        }
    }

    fn slot<'v>(&self, v: &'v mut Value) -> Result<&'v mut Value> {
        Ok(v.coerce_object().entry(self.to_owned()).or_default())
    }
}

impl Accessor for String {
    fn lookup<'v>(&self, v: &'v Value) -> Option<&'v Value> {
        self.as_str().lookup(v)
    }

    fn lookup_mut<'v>(&self, v: &'v mut Value) -> Option<&'v mut Value> {
        self.as_str().lookup_mut(v)
    }

    fn slot<'v>(&self, v: &'v mut Value) -> Result<&'v mut Value> {
        self.as_str().slot(v)
    }
}

impl<T: ?Sized + Accessor> Accessor for &T {
    fn lookup<'v>(&self, v: &'v Value) -> Option<&'v Value> {
        (**self).lookup(v)
    }

    fn lookup_mut<'v>(&self, v: &'v mut Value) -> Option<&'v mut Value> {
        (**self).lookup_mut(v)
    }

    fn slot<'v>(&self, v: &'v mut Value) -> Result<&'v mut Value> {
        (**self).slot(v)
    }
}

impl Accessor for usize {
    fn lookup<'v>(&self, v: &'v Value) -> Option<&'v Value> {
        match &v.payload {
            Payload::Array(items) => items.get(*self),
            _ => None,
        }
    }

    fn lookup_mut<'v>(&self, v: &'v mut Value) -> Option<&'v mut Value> {
        match &mut v.payload {
            Payload::Array(items) => items.get_mut(*self),
            _ => None,
        }
    }

    fn slot<'v>(&self, v: &'v mut Value) -> Result<&'v mut Value> {
        let len = self
            .checked_add(1)
            .ok_or_else(|| DynError::InvalidArgument(format!("index {} is too large", self)))?;
        let items = v.coerce_array();
        if items.len() < len {
            items.resize_with(len, Value::null);
        }
        Ok(&mut items[*self])
    }
}

macro_rules! impl_signed_accessor {
    ($($ty:ty),*) => {
        $(
            impl Accessor for $ty {
                fn lookup<'v>(&self, v: &'v Value) -> Option<&'v Value> {
                    usize::try_from(*self).ok()?.lookup(v)
                }

                fn lookup_mut<'v>(&self, v: &'v mut Value) -> Option<&'v mut Value> {
                    usize::try_from(*self).ok()?.lookup_mut(v)
                }

                fn slot<'v>(&self, v: &'v mut Value) -> Result<&'v mut Value> {
                    let pos = usize::try_from(*self).map_err(|_| {
                        DynError::InvalidArgument(format!("index {} is below 0", self))
                    })?;
                    pos.slot(v)
                }
            }
        )*
    };
}

impl_signed_accessor!(isize, i64, i32);

/// Shape check for one association-list element: a two-element Array whose
/// first element is a scalar that casts to a string.
pub fn is_association_pair(value: &Value) -> bool {
    pair_key(value).is_some()
}

fn pair_key(value: &Value) -> Option<String> {
    match value.as_array().map(Vec::as_slice) {
        Some([key, _]) if !key.is_null() && !key.kind().is_composite() => key.cast().ok(),
        _ => None,
    }
}

/// A two-element pair keyed by Null. It matches no key but does not end the
/// scan.
fn is_null_keyed_pair(value: &Value) -> bool {
    matches!(value.as_array().map(Vec::as_slice), Some([key, _]) if key.is_null())
}

/// Position of the first pair keyed `key`. Null-keyed pairs are skipped; any
/// other element that fails the shape check before a match aborts the scan.
fn association_position(items: &[Value], key: &str) -> Option<usize> {
    for (pos, item) in items.iter().enumerate() {
        if is_null_keyed_pair(item) {
            continue;
        }
        if pair_key(item)? == key {
            return Some(pos);
        }
    }
    None
}

impl Value {
    /// Soft lookup: the addressed value, or the shared Null on any miss.
    pub fn get<I: Accessor>(&self, index: I) -> &Value {
        index.lookup(self).unwrap_or(&NULL)
    }

    /// Like [`Value::get`] but reports a miss as `None`.
    pub fn lookup<I: Accessor>(&self, index: I) -> Option<&Value> {
        index.lookup(self)
    }

    pub fn get_mut<I: Accessor>(&mut self, index: I) -> Option<&mut Value> {
        index.lookup_mut(self)
    }

    /// Assign through a key or index, coercing the payload as needed.
    ///
    /// Fails only for a negative index or one at `usize::MAX`.
    pub fn set<I: Accessor>(&mut self, index: I, value: impl Into<Value>) -> Result<()> {
        *index.slot(self)? = value.into();
        Ok(())
    }

    /// Attribute-style read, same resolution as a string key.
    pub fn member(&self, name: &str) -> &Value {
        self.get(name)
    }

    /// Attribute-style write, same resolution as a string key.
    pub fn set_member(&mut self, name: &str, value: impl Into<Value>) {
        self.coerce_object().insert(name.to_owned(), value.into());
    }

    /// Walk a dotted path such as `"items.0.name"`. Numeric segments index
    /// Arrays; every other segment resolves as a member name, so association
    /// lists are traversable too. Any miss yields Null.
    pub fn path(&self, path: &str) -> &Value {
        if path.is_empty() {
            return self;
        }
        let mut current = self;
        for segment in path.split('.') {
            current = match segment.parse::<usize>() {
                Ok(pos) if current.is_array() => current.get(pos),
                _ => current.get(segment),
            };
            if current.is_null() {
                break;
            }
        }
        current
    }
}

impl<I: Accessor> Index<I> for Value {
    type Output = Value;

    fn index(&self, index: I) -> &Value {
        self.get(index)
    }
}

impl<I: Accessor> IndexMut<I> for Value {
    /// # Panics
    ///
    /// Panics on a negative index. Use [`Value::set`] to get an error instead.
    fn index_mut(&mut self, index: I) -> &mut Value {
        match index.slot(self) {
            Ok(slot) => slot,
            Err(err) => panic!("{}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(key: &str, value: impl Into<Value>) -> Value {
        Value::new_array([Value::from(key), value.into()])
    }

    #[test]
    fn pair_shape_requires_two_elements() {
        assert!(is_association_pair(&pair("a", 1)));
        assert!(!is_association_pair(&Value::new_array([Value::from("a")])));
        assert!(!is_association_pair(&Value::new_array([1, 2, 3])));
        assert!(!is_association_pair(&Value::from("a")));
    }

    #[test]
    fn pair_key_must_be_scalar() {
        let nested = Value::new_array([Value::new_array([1]), Value::from(2)]);
        assert!(!is_association_pair(&nested));
        let null_key = Value::new_array([Value::null(), Value::from(2)]);
        assert!(!is_association_pair(&null_key));
    }

    #[test]
    fn numeric_pair_keys_match_their_text() {
        let list = Value::new_array([Value::new_array([1, 2])]);
        assert_eq!(list["1"].cast::<i32>().unwrap(), 2);
    }

    #[test]
    fn malformed_element_before_match_aborts_scan() {
        let list = Value::new_array([Value::from(5), pair("a", 1)]);
        assert!(list["a"].is_null());
    }

    #[test]
    fn null_keyed_pairs_are_skipped() {
        let list = Value::new_array([Value::new_array([Value::null(), Value::from(1)]), pair("a", 2)]);
        assert!(!is_association_pair(&list[0]));
        assert_eq!(list["a"].cast::<i32>().unwrap(), 2);
    }

    #[test]
    fn set_past_the_largest_index_fails() {
        let mut v = Value::new_array([1]);
        assert!(matches!(v.set(usize::MAX, 2), Err(DynError::InvalidArgument(_))));
        assert_eq!(v.len(), 1);
    }

    #[test]
    fn match_before_malformed_element_is_found() {
        let list = Value::new_array([pair("a", 1), Value::from(5)]);
        assert_eq!(list["a"].cast::<i32>().unwrap(), 1);
    }

    #[test]
    fn get_mut_reaches_into_association_list() {
        let mut list = Value::new_array([pair("a", 1)]);
        *list.get_mut("a").unwrap() = Value::from(2);
        assert_eq!(list["a"].cast::<i32>().unwrap(), 2);
        assert!(list.is_array());
    }

    #[test]
    #[should_panic(expected = "below 0")]
    fn index_mut_panics_on_negative_index() {
        let mut v = Value::null();
        v[-1] = Value::from(1);
    }
}
