//! Derived metric evaluation for kernel items
//!
//! This module computes named facts about an item (word counts, checklist
//! completion ratios, link counts, ...) from its raw `fields` and `metadata`.
//! Which facts exist for which item type is not hard-coded: it is declared in
//! one definition document per type, loaded from a schema directory.
//!
//! # Implementation Model
//!
//! A definition document lists metrics in order. Each [`MetricDefinition`]
//! names one [`Operation`] from a closed vocabulary, passes it a free-form
//! config object, and may declare the sibling metrics it depends on. The
//! documents are parsed into immutable [`TypeDefinition`]s when
//! [`DerivedEvaluator::load_definitions`] runs; structural problems (missing
//! fields, duplicate keys, unknown item types) abort the whole load.
//!
//! [`DerivedEvaluator::evaluate_item`] then walks an item's metrics strictly in
//! declaration order. Dependencies are never reordered: a metric whose
//! dependency has not been computed yet fails with
//! [`EvaluationError::UnmetDependency`]. Operation-specific config keys are only
//! checked when the operation runs, so a malformed config surfaces as an
//! [`EvaluationError`] on the first item of that type.
//!
//! Every computed value is paired with its [`Provenance`]: the item paths or
//! sibling metrics it was derived from. Each metric, and each finished item,
//! is also reported as a structured event through the evaluator's
//! [`Tracer`](crate::events::Tracer).

mod derived_value;
mod evaluation_error;
mod evaluation_result;
mod evaluator;
mod metric_definition;
mod operation;
mod provenance;
mod type_definition;

pub use derived_value::DerivedValue;
pub use evaluation_error::EvaluationError;
pub use evaluation_result::{EvaluationResult, MetricValues};
pub use evaluator::DerivedEvaluator;
pub use metric_definition::MetricDefinition;
pub use operation::{Operation, OperationOutput};
pub use provenance::Provenance;
pub use type_definition::TypeDefinition;
