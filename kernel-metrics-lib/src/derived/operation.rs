//! The closed set of operations a metric definition can name

use super::{DerivedValue, EvaluationError, MetricDefinition, MetricValues, Provenance};
use crate::paths::resolve;
use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// A computed value and the sources it was derived from
pub type OperationOutput = (DerivedValue, Vec<Provenance>);

type OperationResult = Result<OperationOutput, EvaluationError>;

/// Operations available to derived metrics
///
/// Names are matched case-insensitively (`word_count`, `Word_Count`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Operation {
    /// Element count of the sequence or mapping at `path`
    Length,

    /// Entries of the sequence at `path` whose `field` equals `equals`
    CountWhere,

    /// `numerator` metric divided by `denominator` metric
    Ratio,

    /// `metric` divided by the constant `per`
    Rate,

    /// Words in the plain or rich text at `path`
    WordCount,

    /// Truthiness of the value at `path`
    Exists,
}

impl Operation {
    /// Look up an operation by name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }

    /// Run the operation for `metric` against `item`, reading sibling metrics from `computed`
    ///
    /// # Errors
    /// Returns an error when a required config key is missing or malformed, or
    /// when a referenced metric is not numeric.
    pub fn apply(self, metric: &MetricDefinition, item: &Value, computed: &MetricValues) -> OperationResult {
        match self {
            Self::Length => length(metric, item),
            Self::CountWhere => count_where(metric, item),
            Self::Ratio => ratio(metric, computed),
            Self::Rate => rate(metric, computed),
            Self::WordCount => word_count(metric, item),
            Self::Exists => exists(metric, item),
        }
    }
}

fn length(metric: &MetricDefinition, item: &Value) -> OperationResult {
    let path = require_config_str(metric, "path")?;
    let count = match resolve(item, path) {
        Some(Value::Array(items)) => items.len(),
        Some(Value::Object(map)) => map.len(),
        _ => 0,
    };
    Ok((count_value(count), vec![Provenance::Path(path.to_string())]))
}

fn count_where(metric: &MetricDefinition, item: &Value) -> OperationResult {
    let path = require_config_str(metric, "path")?;
    let field = require_config_str(metric, "field")?;
    let needle = metric.config().get("equals").unwrap_or(&Value::Bool(true));

    let count = match resolve(item, path) {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter(|entry| entry.is_object())
            .filter_map(|entry| lookup_field(entry, field))
            .filter(|value| loosely_equal(value, needle))
            .count(),
        _ => 0,
    };

    Ok((count_value(count), vec![Provenance::Path(path.to_string())]))
}

fn ratio(metric: &MetricDefinition, computed: &MetricValues) -> OperationResult {
    let numerator_key = require_config_str(metric, "numerator")?;
    let denominator_key = require_config_str(metric, "denominator")?;
    let precision = precision(metric)?;
    let provenance = vec![
        Provenance::Metric(numerator_key.to_string()),
        Provenance::Metric(denominator_key.to_string()),
    ];

    let numerator = computed.get(numerator_key).cloned().unwrap_or(DerivedValue::Integer(0));
    let denominator = computed.get(denominator_key).cloned().unwrap_or(DerivedValue::Integer(0));

    if !denominator.is_truthy() {
        let default = match metric.config().get("default") {
            None => DerivedValue::Float(0.0),
            Some(value) => DerivedValue::from_json(value).ok_or_else(|| EvaluationError::InvalidConfig {
                metric: metric.key().to_string(),
                key: "default".to_string(),
                reason: "must be a number, boolean or string".to_string(),
            })?,
        };
        return Ok((default, provenance));
    }

    let value = numeric(metric, numerator_key, &numerator)? / numeric(metric, denominator_key, &denominator)?;
    Ok((DerivedValue::Float(round_to(value, precision)), provenance))
}

fn rate(metric: &MetricDefinition, computed: &MetricValues) -> OperationResult {
    let metric_key = require_config_str(metric, "metric")?;

    let per = match metric.config().get("per") {
        None | Some(Value::Null) => {
            return Err(EvaluationError::MissingConfig {
                metric: metric.key().to_string(),
                key: "per".to_string(),
            });
        }
        Some(value) => value.as_f64().filter(|per| *per != 0.0).ok_or_else(|| EvaluationError::InvalidConfig {
            metric: metric.key().to_string(),
            key: "per".to_string(),
            reason: "must be a non-zero number".to_string(),
        })?,
    };
    let precision = precision(metric)?;

    let base = computed.get(metric_key).cloned().unwrap_or(DerivedValue::Integer(0));
    let value = numeric(metric, metric_key, &base)? / per;

    Ok((
        DerivedValue::Float(round_to(value, precision)),
        vec![Provenance::Metric(metric_key.to_string())],
    ))
}

fn word_count(metric: &MetricDefinition, item: &Value) -> OperationResult {
    let path = require_config_str(metric, "path")?;
    let text = resolve(item, path).map(extract_text).unwrap_or_default();
    Ok((count_value(count_words(&text)), vec![Provenance::Path(path.to_string())]))
}

fn exists(metric: &MetricDefinition, item: &Value) -> OperationResult {
    let path = require_config_str(metric, "path")?;
    let present = resolve(item, path).is_some_and(is_truthy);
    Ok((DerivedValue::Boolean(present), vec![Provenance::Path(path.to_string())]))
}

fn require_config_str<'a>(metric: &'a MetricDefinition, key: &str) -> Result<&'a str, EvaluationError> {
    match metric.config().get(key) {
        None | Some(Value::Null) => Err(EvaluationError::MissingConfig {
            metric: metric.key().to_string(),
            key: key.to_string(),
        }),
        Some(Value::String(value)) if !value.is_empty() => Ok(value),
        Some(_) => Err(EvaluationError::InvalidConfig {
            metric: metric.key().to_string(),
            key: key.to_string(),
            reason: "must be a non-empty string".to_string(),
        }),
    }
}

/// Optional `precision`: number of decimal places to round to
fn precision(metric: &MetricDefinition) -> Result<Option<i32>, EvaluationError> {
    match metric.config().get("precision") {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_i64()
            .and_then(|p| i32::try_from(p).ok())
            .map(Some)
            .ok_or_else(|| EvaluationError::InvalidConfig {
                metric: metric.key().to_string(),
                key: "precision".to_string(),
                reason: "must be an integer".to_string(),
            }),
    }
}

fn numeric(metric: &MetricDefinition, source: &str, value: &DerivedValue) -> Result<f64, EvaluationError> {
    value.as_f64().ok_or_else(|| EvaluationError::NonNumericMetric {
        metric: metric.key().to_string(),
        source_metric: source.to_string(),
    })
}

/// Round half to even at `precision` decimal places
fn round_to(value: f64, precision: Option<i32>) -> f64 {
    let Some(precision) = precision else {
        return value;
    };

    let factor = 10f64.powi(precision);
    if factor == 0.0 {
        return 0.0;
    }
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round_ties_even() / factor
}

fn count_value(count: usize) -> DerivedValue {
    DerivedValue::Integer(i64::try_from(count).unwrap_or(i64::MAX))
}

/// Strict segment-by-segment walk, no dotted-key fallback
fn lookup_field<'a>(entry: &'a Value, field: &str) -> Option<&'a Value> {
    field.split('.').try_fold(entry, |current, part| current.as_object()?.get(part))
}

fn loosely_equal(value: &Value, needle: &Value) -> bool {
    match (value, needle) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::Bool(flag), Value::Number(n)) | (Value::Number(n), Value::Bool(flag)) => {
            n.as_f64() == Some(if *flag { 1.0 } else { 0.0 })
        }
        _ => value == needle,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Plain strings as-is; rich-text deltas as the concatenation of their `insert` fragments
fn extract_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Object(map) => map
            .get("ops")
            .and_then(Value::as_array)
            .map(|ops| ops.iter().filter_map(|op| op.get("insert").and_then(Value::as_str)).collect())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn count_words(text: &str) -> usize {
    text.replace('\n', " ").split(' ').filter(|token| !token.trim().is_empty()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strum::IntoEnumIterator;

    fn metric(operation: &str, config: Value) -> MetricDefinition {
        MetricDefinition::from_mapping(
            &json!({"key": "m", "description": "test metric", "operation": operation, "config": config}),
            "test.yaml",
        )
        .unwrap()
    }

    fn run(operation: Operation, config: Value, item: &Value, computed: &MetricValues) -> OperationResult {
        let name: &'static str = operation.into();
        operation.apply(&metric(name, config), item, computed)
    }

    fn computed(entries: &[(&str, DerivedValue)]) -> MetricValues {
        let mut values = MetricValues::new();
        for (key, value) in entries {
            values.insert(*key, value.clone());
        }
        values
    }

    #[test]
    fn test_names_are_case_insensitive() {
        assert_eq!(Operation::from_name("length"), Some(Operation::Length));
        assert_eq!(Operation::from_name("COUNT_WHERE"), Some(Operation::CountWhere));
        assert_eq!(Operation::from_name("Word_Count"), Some(Operation::WordCount));
        assert_eq!(Operation::from_name("median"), None);
        assert_eq!(Operation::from_name("apply"), None);
        assert_eq!(Operation::from_name(""), None);
    }

    #[test]
    fn test_every_operation_round_trips_its_name() {
        for operation in Operation::iter() {
            assert_eq!(Operation::from_name(&operation.to_string()), Some(operation));
        }
    }

    #[test]
    fn test_length() {
        let item = json!({"fields": {"tags": ["a", "b", "c"], "meta": {"a": 1}, "title": "text"}});
        let empty = MetricValues::new();

        let (value, provenance) = run(Operation::Length, json!({"path": "fields.tags"}), &item, &empty).unwrap();
        assert_eq!(value, DerivedValue::Integer(3));
        assert_eq!(provenance, vec![Provenance::Path("fields.tags".into())]);

        let (value, _) = run(Operation::Length, json!({"path": "fields.meta"}), &item, &empty).unwrap();
        assert_eq!(value, DerivedValue::Integer(1));

        let (value, _) = run(Operation::Length, json!({"path": "fields.title"}), &item, &empty).unwrap();
        assert_eq!(value, DerivedValue::Integer(0));

        let (value, _) = run(Operation::Length, json!({"path": "fields.missing"}), &item, &empty).unwrap();
        assert_eq!(value, DerivedValue::Integer(0));
    }

    #[test]
    fn test_length_requires_path() {
        let err = run(Operation::Length, json!({}), &json!({}), &MetricValues::new()).unwrap_err();
        assert_eq!(
            err,
            EvaluationError::MissingConfig {
                metric: "m".into(),
                key: "path".into()
            }
        );

        let err = run(Operation::Length, json!({"path": 3}), &json!({}), &MetricValues::new()).unwrap_err();
        assert!(matches!(err, EvaluationError::InvalidConfig { ref key, .. } if key == "path"));
    }

    #[test]
    fn test_count_where_defaults_to_true() {
        let item = json!({"fields": {"checklist": [{"done": true}, {"done": false}]}});
        let (value, provenance) = run(
            Operation::CountWhere,
            json!({"path": "fields.checklist", "field": "done"}),
            &item,
            &MetricValues::new(),
        )
        .unwrap();
        assert_eq!(value, DerivedValue::Integer(1));
        assert_eq!(provenance, vec![Provenance::Path("fields.checklist".into())]);
    }

    #[test]
    fn test_count_where_nested_field_and_skips() {
        let item = json!({
            "fields": {
                "timeline": {
                    "messages": [
                        {"meta": {"direction": "inbound"}},
                        {"meta": {"direction": "outbound"}},
                        {"meta": {}},
                        "not a mapping",
                        {"meta": {"direction": "inbound"}}
                    ]
                }
            }
        });

        let (value, _) = run(
            Operation::CountWhere,
            json!({"path": "fields.timeline.messages", "field": "meta.direction", "equals": "inbound"}),
            &item,
            &MetricValues::new(),
        )
        .unwrap();
        assert_eq!(value, DerivedValue::Integer(2));
    }

    #[test]
    fn test_count_where_numeric_equality() {
        let item = json!({"fields": {"rows": [{"score": 1}, {"score": 1.0}, {"score": 2}]}});
        let (value, _) = run(
            Operation::CountWhere,
            json!({"path": "fields.rows", "field": "score", "equals": 1}),
            &item,
            &MetricValues::new(),
        )
        .unwrap();
        assert_eq!(value, DerivedValue::Integer(2));
    }

    #[test]
    fn test_count_where_booleans_match_one_and_zero() {
        let item = json!({"fields": {"checklist": [{"done": 1}, {"done": true}, {"done": 0}, {"done": 2}]}});
        let (value, _) = run(
            Operation::CountWhere,
            json!({"path": "fields.checklist", "field": "done"}),
            &item,
            &MetricValues::new(),
        )
        .unwrap();
        assert_eq!(value, DerivedValue::Integer(2));

        let (value, _) = run(
            Operation::CountWhere,
            json!({"path": "fields.checklist", "field": "done", "equals": 0}),
            &item,
            &MetricValues::new(),
        )
        .unwrap();
        assert_eq!(value, DerivedValue::Integer(1));
    }

    #[test]
    fn test_count_where_on_non_sequence() {
        let item = json!({"fields": {"checklist": {"done": true}}});
        let (value, _) = run(
            Operation::CountWhere,
            json!({"path": "fields.checklist", "field": "done"}),
            &item,
            &MetricValues::new(),
        )
        .unwrap();
        assert_eq!(value, DerivedValue::Integer(0));
    }

    #[test]
    fn test_count_where_requires_field() {
        let err = run(Operation::CountWhere, json!({"path": "fields.checklist"}), &json!({}), &MetricValues::new()).unwrap_err();
        assert!(err.to_string().contains("must provide 'field'"));
    }

    #[test]
    fn test_ratio_with_precision() {
        let values = computed(&[("done", DerivedValue::Integer(1)), ("total", DerivedValue::Integer(2))]);
        let (value, provenance) = run(
            Operation::Ratio,
            json!({"numerator": "done", "denominator": "total", "precision": 2}),
            &json!({}),
            &values,
        )
        .unwrap();

        assert_eq!(value, DerivedValue::Float(0.5));
        assert_eq!(
            provenance,
            vec![Provenance::Metric("done".into()), Provenance::Metric("total".into())]
        );
    }

    #[test]
    fn test_ratio_rounds_half_to_even() {
        let values = computed(&[("a", DerivedValue::Integer(1)), ("b", DerivedValue::Integer(8))]);
        let (value, _) = run(
            Operation::Ratio,
            json!({"numerator": "a", "denominator": "b", "precision": 2}),
            &json!({}),
            &values,
        )
        .unwrap();
        assert_eq!(value, DerivedValue::Float(0.12));

        let values = computed(&[("a", DerivedValue::Integer(2)), ("b", DerivedValue::Integer(3))]);
        let (value, _) = run(
            Operation::Ratio,
            json!({"numerator": "a", "denominator": "b", "precision": 2}),
            &json!({}),
            &values,
        )
        .unwrap();
        assert_eq!(value, DerivedValue::Float(0.67));
    }

    #[test]
    fn test_ratio_without_precision() {
        let values = computed(&[("a", DerivedValue::Integer(1)), ("b", DerivedValue::Integer(4))]);
        let (value, _) = run(Operation::Ratio, json!({"numerator": "a", "denominator": "b"}), &json!({}), &values).unwrap();
        assert_eq!(value, DerivedValue::Float(0.25));
    }

    #[test]
    fn test_ratio_zero_denominator_returns_default() {
        let values = computed(&[("a", DerivedValue::Integer(1)), ("b", DerivedValue::Integer(0))]);

        let (value, _) = run(Operation::Ratio, json!({"numerator": "a", "denominator": "b"}), &json!({}), &values).unwrap();
        assert_eq!(value, DerivedValue::Float(0.0));

        let (value, _) = run(
            Operation::Ratio,
            json!({"numerator": "a", "denominator": "b", "default": 1}),
            &json!({}),
            &values,
        )
        .unwrap();
        assert_eq!(value, DerivedValue::Integer(1));

        let err = run(
            Operation::Ratio,
            json!({"numerator": "a", "denominator": "b", "default": [1]}),
            &json!({}),
            &values,
        )
        .unwrap_err();
        assert!(matches!(err, EvaluationError::InvalidConfig { ref key, .. } if key == "default"));
    }

    #[test]
    fn test_ratio_missing_metrics_count_as_zero() {
        let (value, _) = run(
            Operation::Ratio,
            json!({"numerator": "a", "denominator": "b", "default": "n/a"}),
            &json!({}),
            &MetricValues::new(),
        )
        .unwrap();
        assert_eq!(value, DerivedValue::String("n/a".into()));
    }

    #[test]
    fn test_ratio_non_numeric_metric() {
        let values = computed(&[("a", DerivedValue::String("x".into())), ("b", DerivedValue::Integer(2))]);
        let err = run(Operation::Ratio, json!({"numerator": "a", "denominator": "b"}), &json!({}), &values).unwrap_err();
        assert_eq!(
            err,
            EvaluationError::NonNumericMetric {
                metric: "m".into(),
                source_metric: "a".into()
            }
        );
    }

    #[test]
    fn test_ratio_invalid_precision() {
        let values = computed(&[("a", DerivedValue::Integer(1)), ("b", DerivedValue::Integer(2))]);
        let err = run(
            Operation::Ratio,
            json!({"numerator": "a", "denominator": "b", "precision": "two"}),
            &json!({}),
            &values,
        )
        .unwrap_err();
        assert!(matches!(err, EvaluationError::InvalidConfig { ref key, .. } if key == "precision"));
    }

    #[test]
    fn test_rate() {
        let values = computed(&[("word_count", DerivedValue::Integer(6))]);
        let (value, provenance) = run(
            Operation::Rate,
            json!({"metric": "word_count", "per": 200, "precision": 2}),
            &json!({}),
            &values,
        )
        .unwrap();
        assert_eq!(value, DerivedValue::Float(0.03));
        assert_eq!(provenance, vec![Provenance::Metric("word_count".into())]);
    }

    #[test]
    fn test_rate_large_negative_precision_rounds_to_zero() {
        let values = computed(&[("words", DerivedValue::Integer(1))]);
        let (value, _) = run(
            Operation::Rate,
            json!({"metric": "words", "per": 2, "precision": -400}),
            &json!({}),
            &values,
        )
        .unwrap();
        assert_eq!(value, DerivedValue::Float(0.0));

        let values = computed(&[("words", DerivedValue::Integer(1250))]);
        let (value, _) = run(
            Operation::Rate,
            json!({"metric": "words", "per": 1, "precision": -2}),
            &json!({}),
            &values,
        )
        .unwrap();
        assert_eq!(value, DerivedValue::Float(1200.0));
    }

    #[test]
    fn test_rate_rejects_zero_and_missing_per() {
        let values = computed(&[("w", DerivedValue::Integer(6))]);

        let err = run(Operation::Rate, json!({"metric": "w", "per": 0}), &json!({}), &values).unwrap_err();
        assert_eq!(
            err,
            EvaluationError::InvalidConfig {
                metric: "m".into(),
                key: "per".into(),
                reason: "must be a non-zero number".into()
            }
        );

        let err = run(Operation::Rate, json!({"metric": "w", "per": "ten"}), &json!({}), &values).unwrap_err();
        assert!(matches!(err, EvaluationError::InvalidConfig { ref key, .. } if key == "per"));

        let err = run(Operation::Rate, json!({"metric": "w"}), &json!({}), &values).unwrap_err();
        assert!(matches!(err, EvaluationError::MissingConfig { ref key, .. } if key == "per"));
    }

    #[test]
    fn test_word_count_plain_and_delta() {
        let item = json!({
            "fields": {
                "summary": "one two\nthree  four ",
                "body": {"ops": [{"insert": "Hello "}, {"insert": "world"}, {"retain": 3}, "junk"]},
                "count": 12
            }
        });
        let empty = MetricValues::new();

        let (value, _) = run(Operation::WordCount, json!({"path": "fields.summary"}), &item, &empty).unwrap();
        assert_eq!(value, DerivedValue::Integer(4));

        let (value, provenance) = run(Operation::WordCount, json!({"path": "fields.body"}), &item, &empty).unwrap();
        assert_eq!(value, DerivedValue::Integer(2));
        assert_eq!(provenance, vec![Provenance::Path("fields.body".into())]);

        let (value, _) = run(Operation::WordCount, json!({"path": "fields.count"}), &item, &empty).unwrap();
        assert_eq!(value, DerivedValue::Integer(0));

        let (value, _) = run(Operation::WordCount, json!({"path": "fields.absent"}), &item, &empty).unwrap();
        assert_eq!(value, DerivedValue::Integer(0));
    }

    #[test]
    fn test_exists() {
        let item = json!({
            "fields": {"zero": 0, "empty": "", "list": [], "text": "hi", "flag": true, "nothing": null}
        });
        let empty = MetricValues::new();
        let check = |path: &str| {
            let (value, _) = run(Operation::Exists, json!({"path": path}), &item, &empty).unwrap();
            value
        };

        assert_eq!(check("fields.absent"), DerivedValue::Boolean(false));
        assert_eq!(check("fields.zero"), DerivedValue::Boolean(false));
        assert_eq!(check("fields.empty"), DerivedValue::Boolean(false));
        assert_eq!(check("fields.list"), DerivedValue::Boolean(false));
        assert_eq!(check("fields.nothing"), DerivedValue::Boolean(false));
        assert_eq!(check("fields.text"), DerivedValue::Boolean(true));
        assert_eq!(check("fields.flag"), DerivedValue::Boolean(true));
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   "), 0);
        assert_eq!(count_words("a\n\nb"), 2);
        assert_eq!(count_words("tab\tseparated words"), 2);
    }
}
