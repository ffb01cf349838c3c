// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property bags carried by elements and commands.
//!
//! A [`PropertyBag`] is an ordered string-keyed map of [`Value`]s. The
//! protocol never interprets most keys; it only moves them. The handful of
//! names it does care about live in [`keys`].

use alloc::collections::btree_map::{self, BTreeMap};
use alloc::string::String;
use alloc::vec::Vec;

/// Well-known property names.
pub mod keys {
    /// Horizontal position.
    pub const X: &str = "x";
    /// Vertical position.
    pub const Y: &str = "y";
    /// Width.
    pub const W: &str = "w";
    /// Height.
    pub const H: &str = "h";
    /// Whether the element (and its subtree) is drawn.
    pub const VISIBLE: &str = "visible";
    /// Stroke width; zero means no stroke.
    pub const STROKE_WIDTH: &str = "strokeWidth";
    /// Producer-side state machine; never transferred.
    pub const STATES: &str = "states";
    /// Currently applied state; never transferred, since applying a state
    /// sets ordinary properties that produce their own commands.
    pub const STATE: &str = "state";

    /// Keys stripped from every command before it is buffered.
    pub const NON_TRANSFERABLE: &[&str] = &[STATES, STATE];
}

/// A single property value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// Explicitly empty.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Any number; integers round-trip exactly up to 2^53. Non-finite
    /// numbers have no wire form and fail to serialize.
    Number(#[cfg_attr(feature = "serde", serde(serialize_with = "finite_number"))] f64),
    /// String value (colors, text, font names, ...).
    Text(String),
    /// Ordered list of values.
    List(Vec<Value>),
}

#[cfg(feature = "serde")]
fn finite_number<S: serde::Serializer>(n: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if n.is_finite() {
        serializer.serialize_f64(*n)
    } else {
        Err(serde::ser::Error::custom(alloc::format!(
            "{n} has no JSON representation"
        )))
    }
}

impl Value {
    /// Returns the number, if this is a [`Value::Number`].
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the flag, if this is a [`Value::Bool`].
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the string, if this is a [`Value::Text`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(String::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::List(v)
    }
}

/// An ordered map of property names to values.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PropertyBag {
    entries: BTreeMap<String, Value>,
}

impl PropertyBag {
    /// Creates an empty bag.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets `key`, returning the previous value.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(String::from(key), value.into())
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns the numeric value for `key`.
    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    /// Returns the boolean value for `key`.
    #[must_use]
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Returns whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the bag has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    /// Iterates keys in order.
    pub fn keys(&self) -> btree_map::Keys<'_, String, Value> {
        self.entries.keys()
    }

    /// Copies every entry of `other` into `self`; keys present in both take
    /// `other`'s value.
    pub fn merge(&mut self, other: &Self) {
        for (k, v) in &other.entries {
            self.entries.insert(k.clone(), v.clone());
        }
    }

    /// Returns a copy without the [`keys::NON_TRANSFERABLE`] entries.
    #[must_use]
    pub fn transferable(&self) -> Self {
        let mut out = self.clone();
        for key in keys::NON_TRANSFERABLE {
            out.entries.remove(*key);
        }
        out
    }

    /// Splits one frame off a bag whose list values describe a sequence.
    ///
    /// Every [`Value::List`] entry contributes its first element to the
    /// returned frame and is shortened by one; lists that become empty are
    /// removed from `self`. Scalar entries are copied into the frame and
    /// kept. The returned flag is `true` while any list still has values,
    /// so callers loop until it turns `false`.
    pub fn take_frame(&mut self) -> (Self, bool) {
        let mut frame = Self::new();
        let mut more = false;
        let mut exhausted = Vec::new();

        for (key, value) in &mut self.entries {
            match value {
                Value::List(items) => {
                    if !items.is_empty() {
                        frame.entries.insert(key.clone(), items.remove(0));
                    }
                    if items.is_empty() {
                        exhausted.push(key.clone());
                    } else {
                        more = true;
                    }
                }
                scalar => {
                    frame.entries.insert(key.clone(), scalar.clone());
                }
            }
        }

        for key in exhausted {
            self.entries.remove(&key);
        }

        (frame, more)
    }
}

impl<'a> IntoIterator for &'a PropertyBag {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn merge_is_last_write_wins() {
        let mut a = PropertyBag::new().with("x", 1).with("y", 2);
        let b = PropertyBag::new().with("x", 10).with("w", 3);
        a.merge(&b);
        assert_eq!(a.number("x"), Some(10.0));
        assert_eq!(a.number("y"), Some(2.0));
        assert_eq!(a.number("w"), Some(3.0));
    }

    #[test]
    fn transferable_drops_state_keys() {
        let bag = PropertyBag::new()
            .with(keys::STATE, "hover")
            .with(keys::STATES, Value::List(vec![Value::from("a")]))
            .with(keys::X, 5);
        let out = bag.transferable();
        assert_eq!(out.len(), 1);
        assert!(out.contains_key(keys::X));
        // Source bag is untouched.
        assert_eq!(bag.len(), 3);
    }

    #[test]
    fn take_frame_walks_lists() {
        let mut bag = PropertyBag::new()
            .with("x", Value::List(vec![Value::from(1), Value::from(2)]))
            .with("y", Value::List(vec![Value::from(7)]))
            .with("fill", "red");

        let (first, more) = bag.take_frame();
        assert!(more, "x still has a value");
        assert_eq!(first.number("x"), Some(1.0));
        assert_eq!(first.number("y"), Some(7.0));
        assert_eq!(first.get("fill"), Some(&Value::from("red")));
        assert!(!bag.contains_key("y"), "exhausted list is removed");

        let (second, more) = bag.take_frame();
        assert!(!more, "all lists exhausted");
        assert_eq!(second.number("x"), Some(2.0));
        assert!(!second.contains_key("y"));
        assert_eq!(second.get("fill"), Some(&Value::from("red")));
    }

    #[test]
    fn take_frame_without_lists_is_single_frame() {
        let mut bag = PropertyBag::new().with("x", 3);
        let (frame, more) = bag.take_frame();
        assert!(!more, "no lists means no further frames");
        assert_eq!(frame, bag);
    }
}
