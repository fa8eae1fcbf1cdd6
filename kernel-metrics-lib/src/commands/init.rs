use super::Host;
use super::config::{CONFIG_FILE_NAME, Config};
use crate::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use ohno::bail;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Output configuration file path (default is `kernel-metrics.toml` in the current directory)
    #[arg(value_name = "PATH")]
    pub output: Option<Utf8PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

pub fn init_config<H: Host>(host: &mut H, args: &InitArgs) -> Result<()> {
    let output = args.output.clone().unwrap_or_else(|| Utf8PathBuf::from(CONFIG_FILE_NAME));

    if output.exists() && !args.force {
        bail!("'{output}' already exists, use --force to overwrite it");
    }

    Config::save_default(&output)?;
    let _ = writeln!(host.output(), "Generated default configuration file: {output}");
    Ok(())
}
