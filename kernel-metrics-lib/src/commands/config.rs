use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// File name looked up in the working directory when no `--config` is given
pub const CONFIG_FILE_NAME: &str = "kernel-metrics.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root directory of the schema tree
    #[serde(default = "default_schema_root")]
    pub schema_root: String,

    /// Type manifest directory, relative to `schema_root`
    #[serde(default = "default_types_dir")]
    pub types_dir: String,

    /// Derived definition directory, relative to `schema_root`
    #[serde(default = "default_derived_dir")]
    pub derived_dir: String,

    /// Item payload directory used when `evaluate` is given no paths
    #[serde(default = "default_items_dir")]
    pub items_dir: String,

    /// Top-level fields every item must carry
    #[serde(default = "default_required_item_fields")]
    pub required_item_fields: Vec<String>,

    /// Directory relative paths are resolved against
    #[serde(skip)]
    base_dir: Utf8PathBuf,
}

fn default_schema_root() -> String {
    "schema".to_string()
}

fn default_types_dir() -> String {
    "types".to_string()
}

fn default_derived_dir() -> String {
    "derived".to_string()
}

fn default_items_dir() -> String {
    "items".to_string()
}

fn default_required_item_fields() -> Vec<String> {
    vec!["id".to_string(), "item_type".to_string(), "fields".to_string()]
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Without an explicit path, `kernel-metrics.toml` in `working_dir` is used
    /// if present. Relative directories resolve against the directory that
    /// holds the configuration file, or `working_dir` for the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated
    pub fn load(working_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading kernel-metrics configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = working_dir.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    log::debug!(target: "    config", "No '{CONFIG_FILE_NAME}' in '{working_dir}', using defaults");
                    return Ok(Self::default().with_base_dir(working_dir));
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading kernel-metrics configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        let base_dir = final_path.parent().map_or_else(|| working_dir.to_path_buf(), Utf8Path::to_path_buf);
        Ok(config.with_base_dir(&base_dir))
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    #[must_use]
    pub fn with_base_dir(mut self, base_dir: &Utf8Path) -> Self {
        self.base_dir = base_dir.to_path_buf();
        self
    }

    #[must_use]
    pub fn schema_path(&self) -> Utf8PathBuf {
        self.base_dir.join(&self.schema_root)
    }

    #[must_use]
    pub fn types_path(&self) -> Utf8PathBuf {
        self.schema_path().join(&self.types_dir)
    }

    #[must_use]
    pub fn derived_path(&self) -> Utf8PathBuf {
        self.schema_path().join(&self.derived_dir)
    }

    #[must_use]
    pub fn items_path(&self) -> Utf8PathBuf {
        self.base_dir.join(&self.items_dir)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if a directory name is blank or a required item field is blank
    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("schema_root", &self.schema_root),
            ("types_dir", &self.types_dir),
            ("derived_dir", &self.derived_dir),
            ("items_dir", &self.items_dir),
        ] {
            if value.trim().is_empty() {
                return Err(app_err!("{name} must not be empty"));
            }
        }

        if let Some(index) = self.required_item_fields.iter().position(|field| field.trim().is_empty()) {
            return Err(app_err!("required_item_fields entry #{} must not be empty", index + 1));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
