use super::ReportableItem;
use crate::Result;
use crate::derived::EvaluationResult;
use core::fmt::Write;
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    items: Vec<JsonItem<'a>>,
}

#[derive(Serialize)]
struct JsonItem<'a> {
    id: &'a str,
    item_type: &'a str,
    derived: &'a EvaluationResult,
}

/// Write `{"items": [{"id", "item_type", "derived"}]}`, preserving metric declaration order
///
/// # Errors
///
/// Returns an error if serialization or the writer fails
pub fn generate<W: Write>(items: &[ReportableItem], writer: &mut W) -> Result<()> {
    let report = JsonReport {
        items: items
            .iter()
            .map(|item| JsonItem {
                id: &item.id,
                item_type: &item.item_type,
                derived: &item.result,
            })
            .collect(),
    };

    writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    Ok(())
}
