//! The output of a resolution pass: an ordered key → value mapping.
//!
//! Values are stored in insertion order (schema order for a full capture) so
//! listings are stable. [`ResolvedValues::deserialize`] hands the mapping to
//! serde through a `toml::Value` table, the same way layered config is
//! turned into a typed struct.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::CaptureError;
use crate::schema::ValueSchema;
use crate::value::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedValues {
    entries: Vec<(String, Value)>,
}

impl ResolvedValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value for `key`. Replacing keeps the original position.
    pub fn insert(&mut self, key: &str, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let position = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(position).1)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Overlay `other` on top of `self`; keys in `other` win.
    pub fn extend(&mut self, other: ResolvedValues) {
        for (key, value) in other.entries {
            self.insert(&key, value);
        }
    }

    /// Convert to a TOML table (whole numbers become integers).
    pub fn to_table(&self) -> toml::Table {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), toml::Value::from(v.clone())))
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .entries
            .iter()
            .map(|(k, v)| {
                let json = match v {
                    Value::Boolean(b) => serde_json::Value::Bool(*b),
                    Value::Number(n) => serde_json::Number::from_f64(*n)
                        .map(serde_json::Value::Number)
                        .unwrap_or(serde_json::Value::Null),
                    Value::String(s) => serde_json::Value::String(s.clone()),
                };
                (k.clone(), json)
            })
            .collect();
        serde_json::Value::Object(map)
    }

    /// Deserialize the values into a typed struct keyed by schema key.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, CaptureError> {
        toml::Value::Table(self.to_table())
            .try_into()
            .map_err(|e: toml::de::Error| CaptureError::InvalidValues {
                reason: e.to_string(),
            })
    }

    /// Render `key = value` lines, masking values of masked schemas.
    pub fn listing<'a>(&'a self, schemas: &'a [ValueSchema]) -> Listing<'a> {
        Listing {
            values: self,
            schemas,
        }
    }
}

impl Serialize for ResolvedValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl IntoIterator for ResolvedValues {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Display adapter returned by [`ResolvedValues::listing`].
pub struct Listing<'a> {
    values: &'a ResolvedValues,
    schemas: &'a [ValueSchema],
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.values.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let masked = self
                .schemas
                .iter()
                .any(|s| s.key() == key && s.is_masked());
            if masked {
                write!(f, "{key} = {}", value.masked())?;
            } else {
                write!(f, "{key} = {value}")?;
            }
        }
        Ok(())
    }
}
