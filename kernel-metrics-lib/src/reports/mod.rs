//! Report generation for derived metric evaluations
//!
//! Two generators are provided, each accessed through a `generate` function:
//! - **Console**: the human-readable summary report, with optional ANSI colors
//! - **JSON**: machine-readable values and provenance per item
//!
//! Both operate on a slice of [`ReportableItem`], an item's id and type paired
//! with its [`EvaluationResult`](crate::derived::EvaluationResult).

mod common;
mod console;
mod json;
mod reportable_item;

pub use console::generate as generate_console;
pub use json::generate as generate_json;
pub use reportable_item::ReportableItem;
