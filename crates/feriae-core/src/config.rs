//! Configuration management trait.
//!
//! [`ConfigManager`] gives a TOML-backed configuration type path resolution,
//! layered loading (file, then `<PREFIX>_<SECTION>__<KEY>` environment
//! variables) and export helpers. The CLI config subcommands are generic
//! over it.

use std::path::PathBuf;

use ::config::{Config, Environment, File, FileFormat};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Environment variables visible to the loader, keyed by name.
pub type EnvVars = ::config::Map<String, String>;

/// Separator between nested keys in environment variable names.
pub const ENV_KEY_SEPARATOR: &str = "__";

/// A TOML-backed configuration type.
pub trait ConfigManager: Serialize + DeserializeOwned + Default {
    /// Project name, used for the config directory and messages.
    fn project_name() -> &'static str;

    /// Environment variable holding an explicit config file path.
    fn config_path_env_var() -> &'static str;

    /// Prefix of override variables, e.g. `FERIAE` for `FERIAE_SERVER__PORT`.
    fn env_prefix() -> &'static str;

    /// Default config file location: `<config dir>/<project>/config.toml`.
    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(Self::project_name()).join("config.toml"))
    }

    /// Resolve the config file path: explicit, then env var, then default.
    fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var(Self::config_path_env_var()) {
            if !path.is_empty() {
                return Some(PathBuf::from(path));
            }
        }
        Self::default_config_path()
    }

    /// Load configuration from file (defaults if absent) plus process env.
    fn load(explicit: Option<&str>) -> Result<Self> {
        Self::load_with_env(explicit, None)
    }

    /// Load configuration, reading overrides from `env` instead of the
    /// process environment when given.
    fn load_with_env(explicit: Option<&str>, env: Option<EnvVars>) -> Result<Self> {
        let path = Self::resolve_config_path(explicit);
        let mut builder = Config::builder();
        if let Some(path) = &path {
            log::debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }
        let layered = builder
            .add_source(
                Environment::with_prefix(Self::env_prefix())
                    .prefix_separator("_")
                    .separator(ENV_KEY_SEPARATOR)
                    .ignore_empty(true)
                    .source(env),
            )
            .build()
            .map_err(|e| match &path {
                Some(path) => Error::config(format!("Failed to load {}: {e}", path.display())),
                None => Error::config(e.to_string()),
            })?;
        layered
            .try_deserialize()
            .map_err(|e| Error::config(format!("Invalid configuration: {e}")))
    }

    /// Export the configuration as `(NAME, value)` pairs that
    /// [`load`](Self::load) reads back.
    fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value = toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_env(&Self::env_prefix().to_uppercase(), "_", &value, &mut vars);
        Ok(vars)
    }

    /// Render as pretty TOML.
    fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }
}

fn flatten_env(name: &str, sep: &str, value: &toml::Value, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, child) in table {
                let child_name = format!("{name}{sep}{}", key.to_uppercase());
                flatten_env(&child_name, ENV_KEY_SEPARATOR, child, out);
            }
        }
        toml::Value::String(s) => out.push((name.to_string(), s.clone())),
        other => out.push((name.to_string(), other.to_string())),
    }
}
