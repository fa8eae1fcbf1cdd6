use super::{ReportableItem, common};
use crate::Result;
use crate::registry::TypeRegistry;
use core::fmt::Write;
use owo_colors::OwoColorize;

const BANNER_WIDTH: usize = 60;

/// Write the summary report: per-type totals, then every item's derived values
///
/// # Errors
///
/// Returns an error if an item's type is missing from `registry` or the writer fails
pub fn generate<W: Write>(items: &[ReportableItem], registry: &TypeRegistry, use_colors: bool, writer: &mut W) -> Result<()> {
    if use_colors {
        writeln!(writer, "{}", "Summary Report".bold())?;
    } else {
        writeln!(writer, "Summary Report")?;
    }
    writeln!(writer, "{}", "=".repeat(BANNER_WIDTH))?;
    writeln!(writer)?;

    let totals = common::count_by_type(items);
    if totals.is_empty() {
        writeln!(writer, "No items were processed.")?;
        return Ok(());
    }

    for (type_key, count) in totals {
        let schema_ref = registry.get_manifest(type_key)?.schema_ref();
        if use_colors {
            writeln!(writer, "Type: {} (schema: {schema_ref}) -> {count} item(s)", type_key.cyan().bold())?;
        } else {
            writeln!(writer, "Type: {type_key} (schema: {schema_ref}) -> {count} item(s)")?;
        }
    }
    writeln!(writer)?;

    for item in items {
        if use_colors {
            writeln!(writer, "Item {} [{}]", item.id.bold(), item.item_type.cyan())?;
        } else {
            writeln!(writer, "Item {} [{}]", item.id, item.item_type)?;
        }

        for (key, value) in item.result.values().iter() {
            if use_colors {
                writeln!(writer, "  - {}: {}", key.green(), value)?;
            } else {
                writeln!(writer, "  - {key}: {value}")?;
            }
        }
        writeln!(writer)?;
    }

    Ok(())
}
