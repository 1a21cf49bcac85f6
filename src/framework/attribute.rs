//! Attribute values and sets

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// A single typed attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    String(String),
    Integer(i64),
}

impl AttributeValue {
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => write!(f, "null"),
            AttributeValue::String(s) => write!(f, "{}", s),
            AttributeValue::Integer(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Integer(i64::from(value))
    }
}

/// Unordered collection of named value lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttributeSet {
    attributes: HashMap<String, Vec<AttributeValue>>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a single-valued attribute, replacing any previous values.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(name.into(), vec![value.into()]);
    }

    /// Set an attribute to a list of values, replacing any previous values.
    pub fn set_values<V>(&mut self, name: impl Into<String>, values: impl IntoIterator<Item = V>)
    where
        V: Into<AttributeValue>,
    {
        self.attributes
            .insert(name.into(), values.into_iter().map(Into::into).collect());
    }

    /// Append one value to an attribute.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes
            .entry(name.into())
            .or_default()
            .push(value.into());
    }

    /// Builder form of [`AttributeSet::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Builder form of [`AttributeSet::set_values`].
    pub fn with_values<V>(mut self, name: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self
    where
        V: Into<AttributeValue>,
    {
        self.set_values(name, values);
        self
    }

    pub fn get(&self, name: &str) -> Option<&[AttributeValue]> {
        self.attributes.get(name).map(Vec::as_slice)
    }

    /// First value of an attribute as a string, if it is one.
    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.get(name)?.first()?.as_str()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<AttributeValue>> {
        self.attributes.remove(name)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[AttributeValue])> {
        self.attributes
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

/// Opaque identifier the host uses to address a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Uid(String);

impl Uid {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Uid {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A record as handed to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectorObject {
    pub object_class: String,
    pub uid: Uid,
    pub name: String,
    pub attributes: AttributeSet,
}
