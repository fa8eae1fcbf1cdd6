use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{IntoAppError, app_err};
use serde_json::Value;
use std::fs;
use walkdir::WalkDir;

const LOG_TARGET: &str = " documents";

/// Supported on-disk document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Determine the format from a file extension, case-insensitively
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        let extension = path.extension()?.to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// List the documents under `root` in sorted path order
///
/// Only files with a supported extension are returned. When `recursive` is false
/// only the immediate children of `root` are considered. A missing `root` yields
/// an empty list.
pub fn discover(root: &Utf8Path, recursive: bool) -> Result<Vec<Utf8PathBuf>> {
    if !root.exists() {
        log::debug!(target: LOG_TARGET, "Document root '{root}' does not exist");
        return Ok(Vec::new());
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).max_depth(max_depth).sort_by_file_name() {
        let entry = entry.into_app_err_with(|| format!("scanning document directory '{root}'"))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = Utf8PathBuf::from_path_buf(entry.into_path())
            .map_err(|path| app_err!("document path '{}' is not valid UTF-8", path.display()))?;

        if DocumentFormat::from_path(&path).is_some() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Read and parse a YAML or JSON document
///
/// An empty (or whitespace-only) document parses as an empty mapping.
pub fn load_document(path: &Utf8Path) -> Result<Value> {
    let format = DocumentFormat::from_path(path).ok_or_else(|| app_err!("unsupported document format: '{path}'"))?;
    let content = fs::read_to_string(path).into_app_err_with(|| format!("reading document '{path}'"))?;

    if content.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }

    let value = match format {
        DocumentFormat::Yaml => serde_yaml::from_str(&content).into_app_err_with(|| format!("parsing YAML document '{path}'"))?,
        DocumentFormat::Json => serde_json::from_str(&content).into_app_err_with(|| format!("parsing JSON document '{path}'"))?,
    };

    log::trace!(target: LOG_TARGET, "Loaded document '{path}'");
    Ok(value)
}
