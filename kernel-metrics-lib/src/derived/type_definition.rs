use super::MetricDefinition;
use crate::Result;
use crate::documents::require_str;
use ohno::{app_err, bail};
use serde_json::Value;

/// The ordered metrics declared for one item type
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    type_key: String,
    metrics: Vec<MetricDefinition>,
}

impl TypeDefinition {
    /// Parse a whole definition document
    ///
    /// The document needs a `type` string and a `metrics` list of mappings.
    /// Metric keys must be unique within the document.
    pub fn from_mapping(payload: &Value, source: &str) -> Result<Self> {
        let type_key = require_str(payload, "type", &format!("derived definition in {source}"))?;

        let Some(entries) = payload.get("metrics").and_then(Value::as_array) else {
            bail!("Derived definition for type '{type_key}' in {source} must contain a list of metric definitions under 'metrics'");
        };

        let mut metrics: Vec<MetricDefinition> = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            if !entry.is_object() {
                return Err(app_err!("Metric entry #{} of type '{type_key}' in {source} must be a mapping", index + 1));
            }

            let metric = MetricDefinition::from_entry(entry, &type_key, index, source)?;
            if metrics.iter().any(|m| m.key() == metric.key()) {
                return Err(app_err!("Duplicate metric key '{}' for type '{type_key}' in {source}", metric.key()));
            }
            metrics.push(metric);
        }

        Ok(Self { type_key, metrics })
    }

    #[must_use]
    pub fn type_key(&self) -> &str {
        &self.type_key
    }

    /// Metrics in declaration order
    #[must_use]
    pub fn metrics(&self) -> &[MetricDefinition] {
        &self.metrics
    }

    #[must_use]
    pub fn metric(&self, key: &str) -> Option<&MetricDefinition> {
        self.metrics.iter().find(|m| m.key() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metric(key: &str) -> Value {
        json!({"key": key, "description": "d", "operation": "length", "config": {"path": "fields.items"}})
    }

    #[test]
    fn test_parse_preserves_order() {
        let payload = json!({"type": "task", "metrics": [metric("b"), metric("a"), metric("c")]});
        let definition = TypeDefinition::from_mapping(&payload, "task.yaml").unwrap();

        assert_eq!(definition.type_key(), "task");
        let keys: Vec<_> = definition.metrics().iter().map(MetricDefinition::key).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert!(definition.metric("a").is_some());
        assert!(definition.metric("z").is_none());
    }

    #[test]
    fn test_empty_metric_list_is_valid() {
        let payload = json!({"type": "wiki", "metrics": []});
        let definition = TypeDefinition::from_mapping(&payload, "wiki.yaml").unwrap();
        assert!(definition.metrics().is_empty());
    }

    #[test]
    fn test_duplicate_metric_key() {
        let payload = json!({"type": "task", "metrics": [metric("a"), metric("a")]});
        let err = TypeDefinition::from_mapping(&payload, "task.yaml").unwrap_err();
        assert!(err.to_string().contains("Duplicate metric key 'a' for type 'task' in task.yaml"));
    }

    #[test]
    fn test_metrics_must_be_list() {
        let err = TypeDefinition::from_mapping(&json!({"type": "task"}), "task.yaml").unwrap_err();
        assert!(err.to_string().contains("Derived definition for type 'task' in task.yaml must contain a list of metric definitions under 'metrics'"));

        let err = TypeDefinition::from_mapping(&json!({"type": "task", "metrics": {"a": 1}}), "task.yaml").unwrap_err();
        assert!(err.to_string().contains("under 'metrics'"));
    }

    #[test]
    fn test_entries_must_be_mappings() {
        let payload = json!({"type": "task", "metrics": [metric("a"), "b"]});
        let err = TypeDefinition::from_mapping(&payload, "task.yaml").unwrap_err();
        assert!(err.to_string().contains("Metric entry #2 of type 'task' in task.yaml must be a mapping"));
    }

    #[test]
    fn test_metric_errors_name_the_type() {
        let payload = json!({"type": "task", "metrics": [metric("a"), {"description": "d", "operation": "length"}]});
        let err = TypeDefinition::from_mapping(&payload, "task.yaml").unwrap_err();
        assert!(
            err.to_string()
                .contains("'key' for metric entry #2 of type 'task' in task.yaml must be a non-empty string")
        );

        let payload = json!({"type": "task", "metrics": [{"key": "a", "operation": "length"}]});
        let err = TypeDefinition::from_mapping(&payload, "task.yaml").unwrap_err();
        assert!(err.to_string().contains("'description' for metric 'a' in task.yaml must be a non-empty string"));
    }

    #[test]
    fn test_missing_type() {
        let err = TypeDefinition::from_mapping(&json!({"metrics": []}), "x.yaml").unwrap_err();
        assert!(err.to_string().contains("'type' for derived definition in x.yaml must be a non-empty string"));
    }
}
