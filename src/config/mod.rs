mod schema;

pub use schema::{Config, Selection};

use anyhow::{anyhow, Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::registry::Registry;
use crate::rules;

pub const CONFIG_ENV_VAR: &str = "TAGSEL_CONFIG";
pub const PREFIX_ENV_VAR: &str = "TAGSEL_PREFIX";
pub const ATTR_ENV_VAR: &str = "TAGSEL_ATTR";
pub const EVAL_ATTR_ENV_VAR: &str = "TAGSEL_EVAL_ATTR";

/// separates multiple rule sources inside one environment variable
const ENV_LIST_SEPARATOR: char = ';';

/// explicit path from the environment, else `~/.tagsel/config.json`
pub fn get_config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }

    dirs::home_dir().map(|home| home.join(".tagsel").join("config.json"))
}

/// the `--config` path if given, else the default location
pub fn get_config_path_with_override(override_path: Option<&Path>) -> Result<PathBuf> {
    match override_path {
        Some(path) => Ok(path.to_path_buf()),
        None => get_config_path().ok_or_else(|| anyhow!("Could not find home directory")),
    }
}

/// load the config file, then layer environment overrides on top
///
/// an explicitly requested file must exist; the default location may not
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    let mut config = match explicit {
        Some(path) => read(path)?,
        None => match get_config_path() {
            Some(path) if path.exists() => read(&path)?,
            _ => Config::default(),
        },
    };

    apply_env(&mut config, |key| env::var(key).ok());
    Ok(config)
}

/// read a JSON (or JSON5) config file
pub fn read(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(anyhow!("config file not found: {}", path.display()));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = json5::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// apply `TAGSEL_PREFIX`, `TAGSEL_ATTR` and `TAGSEL_EVAL_ATTR`
pub fn apply_env(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(prefix) = lookup(PREFIX_ENV_VAR).filter(|p| !p.trim().is_empty()) {
        config.prefix = prefix.trim().to_string();
    }
    if let Some(value) = lookup(ATTR_ENV_VAR) {
        config.selection.attr = split_env_list(&value);
    }
    if let Some(value) = lookup(EVAL_ATTR_ENV_VAR) {
        config.selection.eval_attr = split_env_list(&value);
    }
}

fn split_env_list(value: &str) -> Vec<String> {
    value
        .split(ENV_LIST_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// verify a config file and return a list of errors
pub fn verify(path: &Path) -> Result<Vec<String>> {
    let config = read(path)?;
    let mut errors = Vec::new();

    if config.prefix.is_empty() {
        errors.push("prefix: must not be empty".to_string());
    } else if config.prefix.contains(char::is_whitespace) {
        errors.push(format!("prefix: '{}' must not contain whitespace", config.prefix));
    }

    for (i, source) in config.selection.attr.iter().enumerate() {
        if let Err(e) = rules::compile(&[source], &[] as &[&str]) {
            errors.push(format!("selection.attr[{}]: {}", i, e));
        }
    }

    for (i, expr) in config.selection.eval_attr.iter().enumerate() {
        if let Err(e) = rules::compile(&[] as &[&str], &[expr]) {
            errors.push(format!("selection.eval_attr[{}]: {}", i, e));
        }
    }

    Ok(errors)
}

/// load a test catalog
pub fn load_catalog(path: &Path) -> Result<Registry> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog: {}", path.display()))?;

    let registry: Registry = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse catalog: {}", path.display()))?;

    debug!(path = %path.display(), tests = registry.len(), "loaded catalog");
    Ok(registry)
}
