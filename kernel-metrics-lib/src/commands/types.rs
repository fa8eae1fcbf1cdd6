use super::Host;
use super::common::{GlobalArgs, Session};
use crate::Result;
use crate::events::Tracer;
use camino::Utf8Path;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct TypesArgs {}

pub fn list_types<H: Host>(host: &mut H, global: &GlobalArgs, args: &TypesArgs) -> Result<()> {
    list_types_in(host, Utf8Path::new("."), global, args)
}

fn list_types_in<H: Host>(host: &mut H, working_dir: &Utf8Path, global: &GlobalArgs, _args: &TypesArgs) -> Result<()> {
    let session = Session::load(working_dir, global, Tracer::default())?;
    let mut out = host.output();

    if session.registry().is_empty() {
        let _ = writeln!(out, "No types registered under '{}'", session.config.types_path());
        return Ok(());
    }

    for manifest in session.registry().manifests() {
        let derived = match session.evaluator.definition_for(manifest.type_key()) {
            Ok(definition) => format!("{} derived metric(s)", definition.metrics().len()),
            Err(_) => "no derived metrics".to_string(),
        };
        let _ = writeln!(out, "{} (schema: {}) - {derived}", manifest.type_key(), manifest.schema_ref());
        if !manifest.capabilities().is_empty() {
            let _ = writeln!(out, "  capabilities: {}", manifest.capabilities().join(", "));
        }
    }

    Ok(())
}
