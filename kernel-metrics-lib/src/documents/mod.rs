//! Discovery and parsing of configuration documents
//!
//! Type manifests and derived metric definitions live on disk as YAML or JSON
//! documents. Both are parsed into a `serde_json::Value` tree so that the
//! definition models validate one representation regardless of file format.

mod fields;
mod loader;

pub use fields::{require_str, string_list};
pub use loader::{DocumentFormat, discover, load_document};
