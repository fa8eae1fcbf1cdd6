use serde_json::Value;

/// Resolve a dotted `path` against `data`
///
/// An empty path resolves to `data` itself. Returns `None` when the path cannot
/// be followed to the end.
#[must_use]
pub fn resolve<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(data);
    }

    let parts: Vec<&str> = path.split('.').collect();
    let mut current = data;
    let mut index = 0;

    while index < parts.len() {
        let map = current.as_object()?;

        // longest joined candidate first, the single segment last
        let (next, end) = (index + 1..=parts.len())
            .rev()
            .find_map(|end| map.get(&parts[index..end].join(".")).map(|value| (value, end)))?;

        current = next;
        index = end;
    }

    Some(current)
}

/// Resolve a dotted `path` against `data`, falling back to `default`
#[must_use]
pub fn resolve_or<'a>(data: &'a Value, path: &str, default: &'a Value) -> &'a Value {
    resolve(data, path).unwrap_or(default)
}
