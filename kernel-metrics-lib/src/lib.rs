#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for kernel-metrics
//!
//! This library computes derived metrics for kernel items (documents, tasks,
//! wiki entries, ...) from declarative per-type definition documents.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`registry`]: Type manifests and the registry of known item types
//! - [`derived`]: Metric definitions, operations, and the evaluator
//! - [`paths`]: Dotted-path lookup into item payloads
//! - [`documents`]: Discovery and parsing of YAML/JSON documents
//! - [`events`]: Structured evaluation events and trace spans
//! - [`reports`]: Report generation for evaluation results

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

pub mod derived;
pub mod documents;
pub mod events;
pub mod paths;
pub mod registry;

#[cfg(any(debug_assertions, test))]
pub mod reports;
#[cfg(not(any(debug_assertions, test)))]
mod reports;

pub use crate::commands::{Host, run};
