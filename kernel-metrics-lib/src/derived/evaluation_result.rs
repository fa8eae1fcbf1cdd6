use super::{DerivedValue, Provenance};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Metric values keyed by metric, in the order they were computed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricValues {
    entries: Vec<(String, DerivedValue)>,
}

impl MetricValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&DerivedValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Set `key`, keeping its original position if it is already present
    pub fn insert(&mut self, key: impl Into<String>, value: DerivedValue) {
        let key = key.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DerivedValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for MetricValues {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Everything computed for one item
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    type_key: String,
    values: MetricValues,
    provenance: Vec<(String, Vec<Provenance>)>,
}

impl EvaluationResult {
    #[must_use]
    pub const fn new(type_key: String, values: MetricValues, provenance: Vec<(String, Vec<Provenance>)>) -> Self {
        Self {
            type_key,
            values,
            provenance,
        }
    }

    #[must_use]
    pub fn type_key(&self) -> &str {
        &self.type_key
    }

    #[must_use]
    pub const fn values(&self) -> &MetricValues {
        &self.values
    }

    #[must_use]
    pub fn value(&self, key: &str) -> Option<&DerivedValue> {
        self.values.get(key)
    }

    #[must_use]
    pub fn provenance(&self, key: &str) -> Option<&[Provenance]> {
        self.provenance.iter().find(|(k, _)| k == key).map(|(_, p)| p.as_slice())
    }

    /// Provenance rendered as `path:`/`metric:` tags
    #[must_use]
    pub fn provenance_tags(&self, key: &str) -> Vec<String> {
        self.provenance(key)
            .map(|sources| sources.iter().map(ToString::to_string).collect())
            .unwrap_or_default()
    }

    /// `{"type", "values", "provenance"}` as a JSON tree
    ///
    /// Declaration order survives only when serializing straight to text; a
    /// `Value` keeps its object keys sorted.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

struct ProvenanceMap<'a>(&'a [(String, Vec<Provenance>)]);

impl Serialize for ProvenanceMap<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, sources) in self.0 {
            map.serialize_entry(key, sources)?;
        }
        map.end()
    }
}

impl Serialize for EvaluationResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("EvaluationResult", 3)?;
        state.serialize_field("type", &self.type_key)?;
        state.serialize_field("values", &self.values)?;
        state.serialize_field("provenance", &ProvenanceMap(&self.provenance))?;
        state.end()
    }
}
