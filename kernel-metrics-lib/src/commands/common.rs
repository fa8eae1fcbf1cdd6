//! Shared setup for the commands that load a schema tree

use super::config::Config;
use crate::Result;
use crate::derived::DerivedEvaluator;
use crate::events::Tracer;
use crate::registry::TypeRegistry;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, ValueEnum};
use std::sync::Arc;

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    Auto,
}

impl ColorMode {
    #[must_use]
    pub fn use_colors(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => {
                use std::io::{IsTerminal, stdout};
                stdout().is_terminal()
            }
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Arguments accepted by every subcommand
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Path to configuration file (default is `kernel-metrics.toml`)
    #[arg(long, short = 'c', value_name = "PATH", global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    pub log_level: LogLevel,
}

/// Initialize logger based on log level
pub fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    // a logger may already be installed when commands run more than once in-process
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}

/// Configuration, type registry and derived evaluator loaded together
#[derive(Debug)]
pub struct Session {
    pub config: Config,
    pub evaluator: DerivedEvaluator,
}

impl Session {
    /// Load the configuration and everything under its schema root
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration, a type manifest, or a derived
    /// definition fails to load
    pub fn load(working_dir: &Utf8Path, args: &GlobalArgs, tracer: Tracer) -> Result<Self> {
        let config = Config::load(working_dir, args.config.as_ref())?;
        let registry = TypeRegistry::load(&config.types_path(), &tracer)?;
        let evaluator = DerivedEvaluator::new(config.derived_path(), Arc::new(registry), tracer)?;
        Ok(Self { config, evaluator })
    }

    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        self.evaluator.registry()
    }
}
