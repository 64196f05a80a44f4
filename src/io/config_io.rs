use std::fs;
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};

use crate::model::config::{AppConfig, FormatConfig};

/// Commented default written by `crib init`
pub const DEFAULT_CONFIG: &str = include_str!("../templates/config.toml");

pub const CONFIG_FILE: &str = "config.toml";

/// Error type for configuration I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("could not edit config: {0}")]
    EditError(#[from] toml_edit::TomlError),
    #[error("unknown config key: {0}")]
    UnknownKey(String),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
    #[error("{0} already exists (use --force to overwrite)")]
    AlreadyExists(PathBuf),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Data directory, respecting XDG_DATA_HOME
pub fn default_data_dir() -> PathBuf {
    let data_home = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".local").join("share"));
    data_home.join("toolcrib")
}

/// Get the user's home directory
fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

/// Read config.toml from the data dir. A missing file means all defaults.
pub fn read_config(data_dir: &Path) -> Result<AppConfig, ConfigError> {
    let path = config_path(data_dir);
    let text = match fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(e) => return Err(ConfigError::ReadError { path, source: e }),
    };
    let mut config: AppConfig =
        toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            source: e,
        })?;
    if config.crews.count == 0 {
        tracing::warn!("crews.count = 0 in config, using 1");
        config.crews.count = 1;
    }
    let defaults = FormatConfig::default();
    if !is_valid_strftime(&config.format.date) {
        tracing::warn!(date = %config.format.date, "bad format.date in config, using default");
        config.format.date = defaults.date;
    }
    if !is_valid_strftime(&config.format.time) {
        tracing::warn!(time = %config.format.time, "bad format.time in config, using default");
        config.format.time = defaults.time;
    }
    Ok(config)
}

/// chrono panics when displaying a format with an unknown specifier
fn is_valid_strftime(fmt: &str) -> bool {
    !StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error))
}

/// Write the commented default config. Refuses to clobber unless `force`.
pub fn write_default_config(data_dir: &Path, force: bool) -> Result<PathBuf, ConfigError> {
    let path = config_path(data_dir);
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path));
    }
    fs::create_dir_all(data_dir)?;
    fs::write(&path, DEFAULT_CONFIG)?;
    Ok(path)
}

/// Read config.toml as an editable document (the default template if missing).
pub fn read_config_doc(data_dir: &Path) -> Result<toml_edit::DocumentMut, ConfigError> {
    let path = config_path(data_dir);
    let text = match fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => DEFAULT_CONFIG.to_string(),
        Err(e) => return Err(ConfigError::ReadError { path, source: e }),
    };
    Ok(text.parse()?)
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config_doc(data_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    fs::create_dir_all(data_dir)?;
    fs::write(config_path(data_dir), doc.to_string())?;
    Ok(())
}

/// Set one supported `section.key` to an integer value
pub fn set_value(doc: &mut toml_edit::DocumentMut, key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    };
    let (section, field, parsed) = match key {
        "crews.count" => {
            let n: u8 = value.parse().map_err(|_| invalid())?;
            if n == 0 {
                return Err(invalid());
            }
            ("crews", "count", i64::from(n))
        }
        "storage.autosave_secs" => {
            let n: u32 = value.parse().map_err(|_| invalid())?;
            if n == 0 {
                return Err(invalid());
            }
            ("storage", "autosave_secs", i64::from(n))
        }
        "storage.history_limit" => {
            let n: u32 = value.parse().map_err(|_| invalid())?;
            ("storage", "history_limit", i64::from(n))
        }
        _ => return Err(ConfigError::UnknownKey(key.to_string())),
    };
    if !doc.contains_key(section) {
        doc[section] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc[section][field] = toml_edit::value(parsed);
    Ok(())
}
