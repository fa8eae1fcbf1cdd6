//! Command dispatch logic for kernel-metrics

use super::common::{GlobalArgs, init_logging};
use super::{EvaluateArgs, InitArgs, TypesArgs, ValidateArgs, evaluate_items, init_config, list_types, validate_schema};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "kernel-metrics", version, author, long_about = None)]
#[command(about = "Evaluate derived metrics for kernel items")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate item payloads and print the summary report
    Evaluate(EvaluateArgs),
    /// Check type manifests and derived definitions for errors
    Validate(ValidateArgs),
    /// List registered item types
    Types(TypesArgs),
    /// Generate a default configuration file
    Init(InitArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = Cli::parse_from(args);
    init_logging(cli.global.log_level);

    match &cli.command {
        Command::Evaluate(evaluate_args) => evaluate_items(host, &cli.global, evaluate_args),
        Command::Validate(validate_args) => validate_schema(host, &cli.global, validate_args),
        Command::Types(types_args) => list_types(host, &cli.global, types_args),
        Command::Init(init_args) => init_config(host, init_args),
    }
}
