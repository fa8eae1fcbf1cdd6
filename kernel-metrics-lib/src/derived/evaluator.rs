use super::{DerivedValue, EvaluationError, EvaluationResult, MetricDefinition, MetricValues, Operation, Provenance, TypeDefinition};
use crate::Result;
use crate::documents::{discover, load_document};
use crate::events::{Tracer, attributes};
use crate::registry::TypeRegistry;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::bail;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;

const LOG_TARGET: &str = "   derived";

/// Evaluates the derived metrics declared for each registered item type
///
/// Definitions are read from the documents directly under `schema_root`, one
/// document per item type. Evaluation only reads the loaded definitions, so a
/// shared evaluator can serve many threads; reloading requires `&mut self`.
#[derive(Debug)]
pub struct DerivedEvaluator {
    schema_root: Utf8PathBuf,
    registry: Arc<TypeRegistry>,
    tracer: Tracer,
    definitions: BTreeMap<String, TypeDefinition>,
}

impl DerivedEvaluator {
    /// Create an evaluator and load its definitions immediately
    ///
    /// # Errors
    /// Returns an error if any definition document is malformed, references an
    /// unregistered type, or duplicates another document's type.
    pub fn new(schema_root: impl Into<Utf8PathBuf>, registry: Arc<TypeRegistry>, tracer: Tracer) -> Result<Self> {
        let mut evaluator = Self {
            schema_root: schema_root.into(),
            registry,
            tracer,
            definitions: BTreeMap::new(),
        };
        evaluator.load_definitions()?;
        Ok(evaluator)
    }

    /// Replace the loaded definitions with the documents currently on disk
    ///
    /// The previous definitions are dropped first; if loading fails the
    /// evaluator is left with no definitions. A missing schema root loads
    /// nothing.
    pub fn load_definitions(&mut self) -> Result<()> {
        self.definitions.clear();
        log::info!(target: LOG_TARGET, "Loading derived definitions from '{}'", self.schema_root);

        let mut definitions = BTreeMap::new();
        for path in discover(&self.schema_root, false)? {
            let definition = Self::load_definition(&path)?;
            let type_key = definition.type_key().to_string();

            if !self.registry.contains(&type_key) {
                bail!("derived definition '{path}' references type '{type_key}' which is not registered");
            }
            if definitions.contains_key(&type_key) {
                bail!("Duplicate derived definition for type '{type_key}'");
            }

            log::debug!(
                target: LOG_TARGET,
                "Loaded {} derived metric(s) for type '{type_key}' from '{path}'",
                definition.metrics().len()
            );
            let _ = definitions.insert(type_key, definition);
        }

        log::info!(target: LOG_TARGET, "Loaded derived definitions for {} type(s)", definitions.len());
        self.definitions = definitions;
        Ok(())
    }

    fn load_definition(path: &Utf8Path) -> Result<TypeDefinition> {
        let document = load_document(path)?;
        if !document.is_object() {
            bail!("Derived definition '{path}' must contain a mapping");
        }
        TypeDefinition::from_mapping(&document, path.as_str())
    }

    #[must_use]
    pub fn schema_root(&self) -> &Utf8Path {
        &self.schema_root
    }

    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Type keys with loaded definitions, sorted
    #[must_use]
    pub fn list_types(&self) -> Vec<&str> {
        self.definitions.keys().map(String::as_str).collect()
    }

    /// The loaded definition for `type_key`
    ///
    /// # Errors
    /// Returns [`EvaluationError::NoDefinition`] when no document declared the type.
    pub fn definition_for(&self, type_key: &str) -> Result<&TypeDefinition, EvaluationError> {
        self.definitions.get(type_key).ok_or_else(|| EvaluationError::NoDefinition {
            type_key: type_key.to_string(),
        })
    }

    /// Compute every metric declared for the item's type, in declaration order
    ///
    /// # Errors
    /// Fails on the first problem: a missing or unknown `item_type`, a type
    /// without definitions, a dependency not yet computed, an unsupported
    /// operation, or bad operation config. No partial result is returned.
    pub fn evaluate_item(&self, item: &Value) -> Result<EvaluationResult, EvaluationError> {
        let type_key = item_type(item)?;
        if !self.registry.contains(type_key) {
            return Err(EvaluationError::UnknownType {
                type_key: type_key.to_string(),
            });
        }
        let definition = self.definition_for(type_key)?;
        let item_id = item.get("id").cloned().unwrap_or(Value::Null);

        let mut values = MetricValues::new();
        let mut provenance = Vec::with_capacity(definition.metrics().len());
        {
            let span = self.tracer.span(
                "derived.evaluate_item",
                attributes(json!({"type_key": type_key, "item_id": item_id})),
            );

            for metric in definition.metrics() {
                let (value, sources) = compute_metric(metric, item, &values)?;
                log::trace!(target: LOG_TARGET, "{type_key}.{} = {value}", metric.key());

                self.tracer.emit(
                    "derived.metric",
                    attributes(json!({
                        "span_id": span.id(),
                        "type_key": type_key,
                        "item_id": item_id,
                        "metric": metric.key(),
                        "value": value.to_json(),
                        "sources": sources.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    })),
                );

                values.insert(metric.key(), value);
                provenance.push((metric.key().to_string(), sources));
            }
        }

        let mut metrics: Vec<&str> = values.keys().collect();
        metrics.sort_unstable();
        self.tracer.emit(
            "derived.evaluation_complete",
            attributes(json!({"type_key": type_key, "item_id": item_id, "metrics": metrics})),
        );

        Ok(EvaluationResult::new(type_key.to_string(), values, provenance))
    }

    /// Evaluate items one after another, pairing each with its result
    ///
    /// # Errors
    /// Stops at the first item that fails to evaluate.
    pub fn evaluate_many<'a, I>(&self, items: I) -> Result<Vec<(&'a Value, EvaluationResult)>, EvaluationError>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        items.into_iter().map(|item| Ok((item, self.evaluate_item(item)?))).collect()
    }
}

fn item_type(item: &Value) -> Result<&str, EvaluationError> {
    item.get("item_type")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .ok_or(EvaluationError::MissingItemType)
}

fn compute_metric(
    metric: &MetricDefinition,
    item: &Value,
    computed: &MetricValues,
) -> Result<(DerivedValue, Vec<Provenance>), EvaluationError> {
    if let Some(dependency) = metric.depends_on().iter().find(|d| !computed.contains(d)) {
        return Err(EvaluationError::UnmetDependency {
            metric: metric.key().to_string(),
            dependency: dependency.clone(),
        });
    }

    let operation = Operation::from_name(metric.operation()).ok_or_else(|| EvaluationError::UnsupportedOperation {
        metric: metric.key().to_string(),
        operation: metric.operation().to_string(),
    })?;

    operation.apply(metric, item, computed)
}
