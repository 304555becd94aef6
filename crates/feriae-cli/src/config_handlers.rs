//! `config` subcommand handlers.
//!
//! The handlers are generic over [`ConfigManager`] and return the text to
//! print instead of printing it, so `main` owns stdout. TOML dotted-key
//! helpers live at the bottom.

use std::path::PathBuf;

use feriae_core::{ConfigManager, Error, Result};

use crate::cli::ConfigAction;
use crate::config::FeriaeConfig;

/// Run a `config` action against [`FeriaeConfig`].
pub fn handle_config_command(config_path: Option<&str>, action: &ConfigAction) -> Result<String> {
    match action {
        ConfigAction::Path => config_path_report::<FeriaeConfig>(config_path),
        ConfigAction::Get { key } => config_get::<FeriaeConfig>(config_path, key),
        ConfigAction::Set { key, value } => config_set::<FeriaeConfig>(config_path, key, value),
        ConfigAction::Init { file, force } => {
            config_init::<FeriaeConfig>(file.as_deref().or(config_path), *force)
        }
        ConfigAction::Export { docker_env } => {
            config_export(&FeriaeConfig::load(config_path)?, *docker_env)
        }
    }
}

// ============================================================================
// Generic handlers
// ============================================================================

/// Resolved config path, with a hint when the file is missing.
pub fn config_path_report<C: ConfigManager>(config_path: Option<&str>) -> Result<String> {
    let path = C::resolve_config_path(config_path)
        .ok_or_else(|| Error::config("Could not determine config directory for this platform"))?;
    if path.exists() {
        Ok(path.display().to_string())
    } else {
        Ok(format!(
            "{}\n(file does not exist, run `{} config init` to create it)",
            path.display(),
            C::project_name()
        ))
    }
}

/// Value at a dotted key of the effective configuration.
pub fn config_get<C: ConfigManager>(config_path: Option<&str>, key: &str) -> Result<String> {
    let config = C::load(config_path)?;
    let tree = toml::Value::try_from(&config).map_err(|e| Error::config(e.to_string()))?;
    get_nested_value(&tree, key)
        .map(format_toml_value)
        .ok_or_else(|| Error::config(format!("Key '{key}' not found in configuration")))
}

/// Write a value at a dotted key into an existing config file.
pub fn config_set<C: ConfigManager>(
    config_path: Option<&str>,
    key: &str,
    value: &str,
) -> Result<String> {
    let path = C::resolve_config_path(config_path)
        .ok_or_else(|| Error::config("Could not determine config directory"))?;
    if !path.exists() {
        return Err(Error::config(format!(
            "Config file does not exist at {}. Run `{} config init` first.",
            path.display(),
            C::project_name()
        )));
    }

    let content = std::fs::read_to_string(&path).map_err(|e| Error::io_with_path(e, &path))?;
    let mut tree: toml::Value = toml::from_str(&content)
        .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;
    set_nested_value(&mut tree, key, parse_value(value))?;

    // Reject edits that would no longer load.
    let text = toml::to_string_pretty(&tree).map_err(|e| Error::config(e.to_string()))?;
    toml::from_str::<C>(&text)
        .map_err(|e| Error::config(format!("Invalid value for {key}: {e}")))?;

    std::fs::write(&path, text).map_err(|e| Error::io_with_path(e, &path))?;
    Ok(format!("Set {key} = {value} in {}", path.display()))
}

/// Write a default config file.
pub fn config_init<C: ConfigManager>(file: Option<&str>, force: bool) -> Result<String> {
    let path = match file {
        Some(p) => PathBuf::from(p),
        None => C::default_config_path()
            .ok_or_else(|| Error::config("Could not determine config directory"))?,
    };
    if path.exists() && !force {
        return Err(Error::config(format!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }
    std::fs::write(&path, C::default().to_toml_string()?)
        .map_err(|e| Error::io_with_path(e, &path))?;
    Ok(format!("Config file created at {}", path.display()))
}

/// Configuration as `KEY=VALUE` lines.
pub fn config_export<C: ConfigManager>(config: &C, docker_env: bool) -> Result<String> {
    let prefix = if docker_env { "--env " } else { "" };
    Ok(config
        .to_env_vars()?
        .iter()
        .map(|(key, value)| format!("{prefix}{key}={value}"))
        .collect::<Vec<_>>()
        .join("\n"))
}

// ============================================================================
// TOML dotted-key helpers
// ============================================================================

/// Follow a dotted key through nested tables.
pub fn get_nested_value<'a>(value: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.')
        .try_fold(value, |current, part| current.as_table()?.get(part))
}

/// Set a value at a dotted key, creating intermediate tables.
pub fn set_nested_value(root: &mut toml::Value, key: &str, value: toml::Value) -> Result<()> {
    let (parents, leaf) = match key.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, key),
    };
    if leaf.is_empty() {
        return Err(Error::config(format!("Invalid key '{key}'")));
    }

    let mut current = root;
    for part in parents.into_iter().flat_map(|p| p.split('.')) {
        let table = current
            .as_table_mut()
            .ok_or_else(|| Error::config(format!("Cannot navigate into '{part}' in '{key}'")))?;
        current = table
            .entry(part.to_string())
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }

    current
        .as_table_mut()
        .ok_or_else(|| Error::config(format!("Cannot set '{key}' on a non-table value")))?
        .insert(leaf.to_string(), value);
    Ok(())
}

/// Parse a CLI string as bool, integer, float, or string, in that order.
pub fn parse_value(s: &str) -> toml::Value {
    match s {
        "true" => toml::Value::Boolean(true),
        "false" => toml::Value::Boolean(false),
        _ => s
            .parse::<i64>()
            .map(toml::Value::Integer)
            .or_else(|_| s.parse::<f64>().map(toml::Value::Float))
            .unwrap_or_else(|_| toml::Value::String(s.to_string())),
    }
}

/// Render a TOML value for stdout: scalars bare, tables as TOML.
pub fn format_toml_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        toml::Value::Datetime(dt) => dt.to_string(),
        toml::Value::Array(_) | toml::Value::Table(_) => {
            toml::to_string_pretty(value).unwrap_or_else(|_| format!("{value:?}"))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
