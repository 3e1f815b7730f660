// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Tri-state attribute values and the typed value tree.
//!
//! Every attribute handed to or returned by a controller is a [`Value`]:
//!
//! - [`Value::Known`] - a concrete value
//! - [`Value::Null`] - explicitly absent
//! - [`Value::Unknown`] - not resolved yet; only legal in a planned configuration
//!
//! A [`ValueTree`] maps attribute names to values in name order. Reading a name
//! that was never set yields [`Value::Null`].
//!
//! # Example
//!
//! ```rust
//! use nios_provider::value::{Value, ValueTree};
//!
//! let tree = ValueTree::new()
//!     .with("name", "host.example.com")
//!     .with("ipv4addr", "10.0.0.20")
//!     .with_unknown("comment");
//!
//! assert_eq!(tree.get_str("name"), Some("host.example.com"));
//! assert!(tree.get("comment").is_unknown());
//! assert!(tree.get("view").is_null());
//! ```

use std::collections::BTreeMap;
use std::fmt;

/// Nested string map used for extensible attributes (`{"Site": {"value": "lab"}}`).
pub type MapOfMaps = BTreeMap<String, BTreeMap<String, String>>;

/// A tri-state value: known, null or not yet known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value<T> {
    /// Concrete value
    Known(T),
    /// Explicitly absent
    Null,
    /// Not resolved before apply
    Unknown,
}

impl<T> Default for Value<T> {
    fn default() -> Self {
        Value::Null
    }
}

impl<T> Value<T> {
    /// Returns `true` for [`Value::Known`].
    #[must_use]
    pub fn is_known(&self) -> bool {
        matches!(self, Value::Known(_))
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` for [`Value::Unknown`].
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown)
    }

    /// Borrow the concrete value, if any.
    #[must_use]
    pub fn known(&self) -> Option<&T> {
        match self {
            Value::Known(value) => Some(value),
            Value::Null | Value::Unknown => None,
        }
    }

    /// Map the concrete value, keeping null and unknown as they are.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Value<U> {
        match self {
            Value::Known(value) => Value::Known(f(value)),
            Value::Null => Value::Null,
            Value::Unknown => Value::Unknown,
        }
    }
}

impl<T> From<Option<T>> for Value<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Value::Known)
    }
}

/// A concrete attribute value of one of the supported semantic types.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    String(String),
    Int32(i32),
    Bool(bool),
    /// String-to-string map
    Map(BTreeMap<String, String>),
    /// Map of string maps, used for extensible attributes
    MapOfMaps(MapOfMaps),
    /// Nested list of objects
    List(Vec<ValueTree>),
}

impl AttrValue {
    /// Human readable name of the value's type, used in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            AttrValue::String(_) => "string",
            AttrValue::Int32(_) => "int32",
            AttrValue::Bool(_) => "bool",
            AttrValue::Map(_) => "map of strings",
            AttrValue::MapOfMaps(_) => "map of string maps",
            AttrValue::List(_) => "list of objects",
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::String(value) => write!(f, "{value:?}"),
            AttrValue::Int32(value) => write!(f, "{value}"),
            AttrValue::Bool(value) => write!(f, "{value}"),
            AttrValue::Map(value) => write!(f, "{value:?}"),
            AttrValue::MapOfMaps(value) => write!(f, "{value:?}"),
            AttrValue::List(items) => write!(f, "[{} objects]", items.len()),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::String(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::String(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        AttrValue::Int32(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<BTreeMap<String, String>> for AttrValue {
    fn from(value: BTreeMap<String, String>) -> Self {
        AttrValue::Map(value)
    }
}

impl From<MapOfMaps> for AttrValue {
    fn from(value: MapOfMaps) -> Self {
        AttrValue::MapOfMaps(value)
    }
}

impl From<Vec<ValueTree>> for AttrValue {
    fn from(value: Vec<ValueTree>) -> Self {
        AttrValue::List(value)
    }
}

static NULL: Value<AttrValue> = Value::Null;

/// Ordered mapping from attribute name to tri-state value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueTree {
    attributes: BTreeMap<String, Value<AttrValue>>,
}

impl ValueTree {
    /// Create an empty tree; every attribute reads as null.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set `name` to a known value.
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.set(name, Value::Known(value.into()));
        self
    }

    /// Builder: mark `name` as not yet known.
    #[must_use]
    pub fn with_unknown(mut self, name: &str) -> Self {
        self.set(name, Value::Unknown);
        self
    }

    /// Builder: mark `name` as explicitly null.
    #[must_use]
    pub fn with_null(mut self, name: &str) -> Self {
        self.set(name, Value::Null);
        self
    }

    /// Set the value of `name`.
    pub fn set(&mut self, name: impl Into<String>, value: Value<AttrValue>) {
        self.attributes.insert(name.into(), value);
    }

    /// Value of `name`; names never set read as [`Value::Null`].
    #[must_use]
    pub fn get(&self, name: &str) -> &Value<AttrValue> {
        self.attributes.get(name).unwrap_or(&NULL)
    }

    /// Known string value of `name`.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Value::Known(AttrValue::String(value)) => Some(value),
            _ => None,
        }
    }

    /// Known boolean value of `name`.
    #[must_use]
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name) {
            Value::Known(AttrValue::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    /// Known integer value of `name`.
    #[must_use]
    pub fn get_i32(&self, name: &str) -> Option<i32> {
        match self.get(name) {
            Value::Known(AttrValue::Int32(value)) => Some(*value),
            _ => None,
        }
    }

    /// Known string map value of `name`.
    #[must_use]
    pub fn get_map(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        match self.get(name) {
            Value::Known(AttrValue::Map(value)) => Some(value),
            _ => None,
        }
    }

    /// Known map-of-maps value of `name`.
    #[must_use]
    pub fn get_map_of_maps(&self, name: &str) -> Option<&MapOfMaps> {
        match self.get(name) {
            Value::Known(AttrValue::MapOfMaps(value)) => Some(value),
            _ => None,
        }
    }

    /// Known list value of `name`.
    #[must_use]
    pub fn get_list(&self, name: &str) -> Option<&[ValueTree]> {
        match self.get(name) {
            Value::Known(AttrValue::List(items)) => Some(items),
            _ => None,
        }
    }

    /// Iterate over explicitly set attributes in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value<AttrValue>)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Names of attributes whose value is still unknown.
    #[must_use]
    pub fn unknown_attributes(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, value)| value.is_unknown())
            .map(|(name, _)| name)
            .collect()
    }

    /// Number of explicitly set attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns `true` when no attribute was set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
