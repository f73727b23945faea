//! Header collections and the fluent header builder.
//!
//! # Design
//! `HeaderSet` keeps headers as an ordered list of owned pairs so requests can
//! be inspected and compared as plain data. Names compare ASCII
//! case-insensitively, which is how HTTP treats them; writing a name that is
//! already present replaces the value in place. Nothing here validates names
//! or values. Illegal headers reach the transport unchanged and it decides
//! whether to reject them.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::ContentType;

pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_TYPE: &str = "Content-Type";

/// Insertion-ordered header name/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: Vec<(String, String)>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`. An existing header with the same name (ignoring
    /// case) keeps its position and takes the new spelling and value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(idx) => self.entries[idx] = (name, value),
            None => self.entries.push((name, value)),
        }
    }

    /// Add a value, joining it onto an existing one with `, ` (the HTTP list
    /// form for repeated fields). The first spelling of the name is kept.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(idx) => {
                let existing = &mut self.entries[idx].1;
                existing.push_str(", ");
                existing.push_str(&value);
            }
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|idx| self.entries[idx].1.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name).map(|idx| self.entries.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A new set holding `self` overlaid by `overlay`; overlay values win.
    /// Neither input is modified.
    pub fn merged(&self, overlay: &HeaderSet) -> HeaderSet {
        let mut out = self.clone();
        for (name, value) in overlay.iter() {
            out.insert(name, value);
        }
        out
    }

    pub fn into_vec(self) -> Vec<(String, String)> {
        self.entries
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HeaderSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = HeaderSet::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for HeaderSet {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl IntoIterator for HeaderSet {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for HeaderSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for HeaderSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct HeaderSetVisitor;

        impl<'de> Visitor<'de> for HeaderSetVisitor {
            type Value = HeaderSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of header names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut set = HeaderSet::new();
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    set.insert(k, v);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(HeaderSetVisitor)
    }
}

/// Fluent builder for per-call or default headers.
///
/// Each `with_*` consumes the builder and returns the updated value, so a
/// chain never aliases a shared instance.
#[derive(Debug, Clone, Default)]
pub struct NetHeaders {
    headers: HeaderSet,
}

impl NetHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_authorization(self, key: impl Into<String>) -> Self {
        self.with_custom(AUTHORIZATION, key)
    }

    pub fn with_content_type(self, content_type: ContentType) -> Self {
        self.with_custom(CONTENT_TYPE, content_type.as_str())
    }

    pub fn with_custom(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn finish(self) -> HeaderSet {
        self.headers
    }
}
