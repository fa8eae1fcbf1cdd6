//! Command-line interface and orchestration for kernel-metrics
//!
//! This module implements the CLI commands and wires the type registry, the
//! derived evaluator and the report generators together.
//!
//! # Implementation Model
//!
//! ## Commands
//!
//! - **evaluate**: Load item payloads, check their structure, evaluate their
//!   derived metrics, and print the summary report (optionally a JSON report
//!   and the captured event stream)
//! - **validate**: Load every type manifest and derived definition, reporting
//!   the first configuration error
//! - **types**: List registered item types and their derived metric counts
//! - **init**: Generate a default configuration file
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap, initializes
//! logging, and routes to the appropriate command handler. Commands that need
//! the schema tree build a `Session`: the TOML configuration, then the
//! [`TypeRegistry`](crate::registry::TypeRegistry) from `types_dir`, then the
//! [`DerivedEvaluator`](crate::derived::DerivedEvaluator) from `derived_dir`.

mod common;
mod config;
mod evaluate;
mod host;
mod init;
mod run;
mod types;
mod validate;

#[cfg(debug_assertions)]
pub use config::Config;

pub use common::{ColorMode, GlobalArgs, LogLevel};
pub use evaluate::{EvaluateArgs, evaluate_items};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use run::run;
pub use types::{TypesArgs, list_types};
pub use validate::{ValidateArgs, validate_schema};
