use super::Host;
use super::common::{GlobalArgs, Session};
use crate::Result;
use crate::events::Tracer;
use camino::Utf8Path;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ValidateArgs {}

pub fn validate_schema<H: Host>(host: &mut H, global: &GlobalArgs, args: &ValidateArgs) -> Result<()> {
    validate_schema_in(host, Utf8Path::new("."), global, args)
}

fn validate_schema_in<H: Host>(host: &mut H, working_dir: &Utf8Path, global: &GlobalArgs, _args: &ValidateArgs) -> Result<()> {
    match Session::load(working_dir, global, Tracer::default()) {
        Ok(session) => {
            let _ = writeln!(host.output(), "Schema is valid");
            if let Some(path) = &global.config {
                let _ = writeln!(host.output(), "Config file: {path}");
            } else {
                let _ = writeln!(host.output(), "Using default configuration (no config file given)");
            }
            let _ = writeln!(host.output(), "Registered types: {}", session.registry().len());

            let derived = session.evaluator.list_types();
            if derived.is_empty() {
                let _ = writeln!(host.output(), "Derived definitions: none");
            } else {
                let _ = writeln!(host.output(), "Derived definitions: {}", derived.join(", "));
            }
            Ok(())
        }
        Err(e) => {
            let _ = writeln!(host.error(), "❌ Schema validation failed: {e}");
            host.exit(1);
            Err(e)
        }
    }
}
