use serde::Serialize;
use serde_json::{Map, Value};

/// Ordered attribute object attached to an [`Event`]
pub type Attributes = Map<String, Value>;

/// Build [`Attributes`] from a `json!({...})` object literal
///
/// Anything other than an object yields an empty attribute set.
#[must_use]
pub fn attributes(value: Value) -> Attributes {
    match value {
        Value::Object(map) => map,
        _ => Attributes::new(),
    }
}

/// A named structured event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub name: String,
    pub attributes: Attributes,
}

impl Event {
    #[must_use]
    pub fn new(name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            name: name.into(),
            attributes,
        }
    }

    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Render the event as a flat JSON object with the name under `event`
    #[must_use]
    pub fn to_record(&self) -> Value {
        let mut record = Map::with_capacity(self.attributes.len() + 1);
        let _ = record.insert("event".to_string(), Value::String(self.name.clone()));
        for (key, value) in &self.attributes {
            let _ = record.insert(key.clone(), value.clone());
        }
        Value::Object(record)
    }
}
