use crate::derived::EvaluationResult;
use serde_json::Value;

/// An evaluated item, ready for reporting
#[derive(Debug, Clone)]
pub struct ReportableItem {
    pub id: String,
    pub item_type: String,
    pub result: EvaluationResult,
}

impl ReportableItem {
    #[must_use]
    pub const fn new(id: String, item_type: String, result: EvaluationResult) -> Self {
        Self { id, item_type, result }
    }

    /// Pair an item payload with its evaluation, lifting out the id and type
    #[must_use]
    pub fn from_evaluation(item: &Value, result: EvaluationResult) -> Self {
        let id = match item.get("id") {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Null) | None => "<no id>".to_string(),
            Some(other) => other.to_string(),
        };
        let item_type = result.type_key().to_string();
        Self::new(id, item_type, result)
    }
}
