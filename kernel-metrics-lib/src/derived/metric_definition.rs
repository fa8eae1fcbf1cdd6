use crate::Result;
use crate::documents::{require_str, string_list};
use ohno::app_err;
use serde_json::{Map, Value};

/// One named derived metric as declared in a definition document
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDefinition {
    key: String,
    description: String,
    operation: String,
    config: Map<String, Value>,
    depends_on: Vec<String>,
}

impl MetricDefinition {
    /// Parse one entry of a definition document's `metrics` list
    ///
    /// `key`, `description` and `operation` must be non-empty strings. `config`
    /// defaults to an empty mapping and `depends_on` to an empty list; repeated
    /// dependencies collapse to their first occurrence. The operation name and
    /// its config keys are not checked here.
    pub fn from_mapping(payload: &Value, source: &str) -> Result<Self> {
        Self::parse(payload, "metric entry", source)
    }

    /// Parse entry `index` (zero-based) of the `metrics` list declared for `type_key`
    ///
    /// Same rules as [`Self::from_mapping`], with the type and position named in
    /// errors raised before the metric key is known.
    pub fn from_entry(payload: &Value, type_key: &str, index: usize, source: &str) -> Result<Self> {
        Self::parse(payload, &format!("metric entry #{} of type '{type_key}'", index + 1), source)
    }

    fn parse(payload: &Value, entry: &str, source: &str) -> Result<Self> {
        let key = require_str(payload, "key", &format!("{entry} in {source}"))?;
        let describe = format!("metric '{key}' in {source}");
        let description = require_str(payload, "description", &describe)?;
        let operation = require_str(payload, "operation", &describe)?;

        let config = match payload.get("config") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(config)) => config.clone(),
            Some(_) => return Err(app_err!("Metric '{key}' in {source} must define a mapping under 'config'")),
        };

        let mut depends_on: Vec<String> = Vec::new();
        for dependency in string_list(payload, "depends_on", &format!("'depends_on' for {describe}"))? {
            if !depends_on.contains(&dependency) {
                depends_on.push(dependency);
            }
        }

        Ok(Self {
            key,
            description,
            operation,
            config,
            depends_on,
        })
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The operation name exactly as written in the document
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    #[must_use]
    pub const fn config(&self) -> &Map<String, Value> {
        &self.config
    }

    #[must_use]
    pub fn depends_on(&self) -> &[String] {
        &self.depends_on
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_metric() {
        let payload = json!({
            "key": "completion_ratio",
            "description": "Share of checklist items completed",
            "operation": "ratio",
            "config": {"numerator": "checklist_completed", "denominator": "checklist_total", "precision": 2},
            "depends_on": ["checklist_completed", "checklist_total", "checklist_completed"]
        });

        let metric = MetricDefinition::from_mapping(&payload, "task.yaml").unwrap();
        assert_eq!(metric.key(), "completion_ratio");
        assert_eq!(metric.description(), "Share of checklist items completed");
        assert_eq!(metric.operation(), "ratio");
        assert_eq!(metric.config().get("precision"), Some(&json!(2)));
        assert_eq!(metric.depends_on(), ["checklist_completed", "checklist_total"]);
    }

    #[test]
    fn test_optional_fields_default() {
        let payload = json!({"key": "has_body", "description": "Body present", "operation": "EXISTS"});
        let metric = MetricDefinition::from_mapping(&payload, "wiki.yaml").unwrap();
        assert!(metric.config().is_empty());
        assert!(metric.depends_on().is_empty());
        assert_eq!(metric.operation(), "EXISTS");
    }

    #[test]
    fn test_missing_fields_name_the_metric() {
        let payload = json!({"key": "word_total", "operation": "length"});
        let err = MetricDefinition::from_mapping(&payload, "schema/derived/document.yaml").unwrap_err();
        assert!(
            err.to_string()
                .contains("'description' for metric 'word_total' in schema/derived/document.yaml must be a non-empty string")
        );

        let payload = json!({"key": "word_total", "description": "Words", "operation": "  "});
        let err = MetricDefinition::from_mapping(&payload, "schema/derived/document.yaml").unwrap_err();
        assert!(
            err.to_string()
                .contains("'operation' for metric 'word_total' in schema/derived/document.yaml must be a non-empty string")
        );
    }

    #[test]
    fn test_missing_key_names_the_entry() {
        let payload = json!({"description": "d", "operation": "length"});
        let err = MetricDefinition::from_mapping(&payload, "task.yaml").unwrap_err();
        assert!(err.to_string().contains("'key' for metric entry in task.yaml must be a non-empty string"));

        let err = MetricDefinition::from_entry(&payload, "task", 2, "task.yaml").unwrap_err();
        assert!(
            err.to_string()
                .contains("'key' for metric entry #3 of type 'task' in task.yaml must be a non-empty string")
        );
    }

    #[test]
    fn test_config_must_be_mapping() {
        let payload = json!({"key": "k", "description": "d", "operation": "length", "config": ["path"]});
        let err = MetricDefinition::from_mapping(&payload, "task.yaml").unwrap_err();
        assert!(err.to_string().contains("Metric 'k' in task.yaml must define a mapping under 'config'"));
    }

    #[test]
    fn test_depends_on_validation() {
        let payload = json!({"key": "k", "description": "d", "operation": "ratio", "depends_on": "a"});
        let err = MetricDefinition::from_mapping(&payload, "task.yaml").unwrap_err();
        assert!(err.to_string().contains("'depends_on' for metric 'k' in task.yaml must be a sequence"));

        let payload = json!({"key": "k", "description": "d", "operation": "ratio", "depends_on": ["a", ""]});
        let err = MetricDefinition::from_mapping(&payload, "task.yaml").unwrap_err();
        assert!(err.to_string().contains("'depends_on' for metric 'k' in task.yaml must contain non-empty strings"));
    }
}
