//! Common utilities shared across report generators.

use super::ReportableItem;
use std::collections::BTreeMap;

/// Count items per type, sorted by type key.
pub fn count_by_type(items: &[ReportableItem]) -> BTreeMap<&str, usize> {
    let mut totals: BTreeMap<&str, usize> = BTreeMap::new();
    for item in items {
        *totals.entry(item.result.type_key()).or_default() += 1;
    }
    totals
}
