use core::fmt;

/// Why evaluating an item failed
///
/// Evaluation is all-or-nothing: any of these aborts the item and nothing is
/// returned for the metrics that did compute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    /// The item has no non-empty string `item_type`
    MissingItemType,

    /// The item's type is not in the type registry
    UnknownType { type_key: String },

    /// The type is registered but no derived definition was loaded for it
    NoDefinition { type_key: String },

    /// A metric ran before one of its declared dependencies
    UnmetDependency { metric: String, dependency: String },

    /// The metric names an operation outside the supported vocabulary
    UnsupportedOperation { metric: String, operation: String },

    /// A config key the operation requires is absent
    MissingConfig { metric: String, key: String },

    /// A config key is present but unusable
    InvalidConfig { metric: String, key: String, reason: String },

    /// A metric used as a number holds a string
    NonNumericMetric { metric: String, source_metric: String },
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingItemType => write!(f, "Item is missing a valid 'item_type' field"),
            Self::UnknownType { type_key } => write!(f, "Type '{type_key}' is not registered"),
            Self::NoDefinition { type_key } => write!(f, "No derived definition registered for '{type_key}'"),
            Self::UnmetDependency { metric, dependency } => {
                write!(f, "Metric '{metric}' depends on '{dependency}' but it has not been computed")
            }
            Self::UnsupportedOperation { metric, operation } => {
                write!(f, "Unsupported operation '{operation}' in metric '{metric}'")
            }
            Self::MissingConfig { metric, key } => write!(f, "Metric '{metric}' must provide '{key}' in configuration"),
            Self::InvalidConfig { metric, key, reason } => {
                write!(f, "Metric '{metric}' has an invalid '{key}' in configuration: {reason}")
            }
            Self::NonNumericMetric { metric, source_metric } => {
                write!(f, "Metric '{metric}' needs a numeric value for '{source_metric}'")
            }
        }
    }
}

impl core::error::Error for EvaluationError {}
