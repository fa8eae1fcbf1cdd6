use super::Host;
use super::common::{ColorMode, GlobalArgs, Session};
use crate::Result;
use crate::documents::{DocumentFormat, discover, load_document};
use crate::events::{MemorySink, Tracer};
use crate::registry::TypeRegistry;
use crate::reports::{ReportableItem, generate_console, generate_json};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ohno::{IntoAppError, bail};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::sync::Arc;

const LOG_TARGET: &str = "  evaluate";

#[derive(Parser, Debug)]
pub struct EvaluateArgs {
    /// Item payload files or directories (default is the configured `items_dir`)
    #[arg(value_name = "PATHS")]
    pub paths: Vec<Utf8PathBuf>,

    /// Also write the evaluation results to a JSON file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub json: Option<Utf8PathBuf>,

    /// Print the structured event stream after the report
    #[arg(long, help_heading = "Report Output")]
    pub events: bool,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,
}

/// An item payload and the file it was read from
#[derive(Debug)]
struct LoadedItem {
    path: Utf8PathBuf,
    payload: Value,
}

impl LoadedItem {
    fn name(&self) -> &str {
        self.path.file_name().unwrap_or(self.path.as_str())
    }
}

pub fn evaluate_items<H: Host>(host: &mut H, global: &GlobalArgs, args: &EvaluateArgs) -> Result<()> {
    evaluate_items_in(host, Utf8Path::new("."), global, args)
}

fn evaluate_items_in<H: Host>(host: &mut H, working_dir: &Utf8Path, global: &GlobalArgs, args: &EvaluateArgs) -> Result<()> {
    let sink = args.events.then(|| Arc::new(MemorySink::new()));
    let tracer = match &sink {
        Some(sink) => Tracer::new(sink.clone()),
        None => Tracer::default(),
    };

    let session = Session::load(working_dir, global, tracer)?;

    let paths = if args.paths.is_empty() {
        vec![session.config.items_path()]
    } else {
        args.paths.clone()
    };
    let items = load_items(&paths)?;
    log::info!(target: LOG_TARGET, "Loaded {} item(s)", items.len());

    let problems = check_items(&items, &session.config.required_item_fields, session.registry());
    if !problems.is_empty() {
        for problem in &problems {
            let _ = writeln!(host.error(), "Validation error: {problem}");
        }
        host.exit(1);
        bail!("{} item(s) failed validation", problems.len());
    }

    let results = session.evaluator.evaluate_many(items.iter().map(|item| &item.payload))?;
    let reportable: Vec<ReportableItem> = results
        .into_iter()
        .map(|(payload, result)| ReportableItem::from_evaluation(payload, result))
        .collect();

    let mut console = String::new();
    generate_console(&reportable, session.registry(), args.color.use_colors(), &mut console)?;
    let _ = write!(host.output(), "{console}");

    if let Some(filename) = &args.json {
        let mut json_output = String::new();
        generate_json(&reportable, &mut json_output)?;
        fs::write(filename, json_output).into_app_err_with(|| format!("writing JSON report to '{filename}'"))?;
        log::info!(target: LOG_TARGET, "Wrote JSON report to '{filename}'");
    }

    if let Some(sink) = sink {
        let _ = writeln!(host.output(), "Events");
        for event in sink.events() {
            let _ = writeln!(host.output(), "{}", event.to_record());
        }
    }

    Ok(())
}

/// Read item payloads from files, and from JSON files directly inside directories
fn load_items(paths: &[Utf8PathBuf]) -> Result<Vec<LoadedItem>> {
    let mut items = Vec::new();
    for path in paths {
        if path.is_dir() {
            for file in discover(path, false)? {
                if DocumentFormat::from_path(&file) == Some(DocumentFormat::Json) {
                    let payload = load_document(&file)?;
                    items.push(LoadedItem { path: file, payload });
                }
            }
        } else {
            let payload = load_document(path)?;
            items.push(LoadedItem {
                path: path.clone(),
                payload,
            });
        }
    }
    Ok(items)
}

/// Lightweight structural check run before evaluation
///
/// Reports items that are not mappings, lack a required top-level field, or
/// name an unregistered `item_type`.
fn check_items(items: &[LoadedItem], required_fields: &[String], registry: &TypeRegistry) -> Vec<String> {
    let mut problems = Vec::new();
    for item in items {
        let Some(payload) = item.payload.as_object() else {
            problems.push(format!("{}: item must be a mapping", item.name()));
            continue;
        };

        let mut missing: Vec<&str> = required_fields
            .iter()
            .map(String::as_str)
            .filter(|field| !payload.contains_key(*field))
            .collect();
        if !missing.is_empty() {
            missing.sort_unstable();
            problems.push(format!("{}: missing fields {}", item.name(), missing.join(", ")));
            continue;
        }

        match payload.get("item_type") {
            Some(Value::String(item_type)) if registry.contains(item_type) => {}
            Some(Value::String(item_type)) => problems.push(format!("{}: unknown item_type '{item_type}'", item.name())),
            Some(other) => problems.push(format!("{}: unknown item_type '{other}'", item.name())),
            None => problems.push(format!("{}: missing fields item_type", item.name())),
        }
    }
    problems
}
