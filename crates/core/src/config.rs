//! Configuration loading utilities
//!
//! Settings are merged from several sources, highest priority first:
//! 1. CLI arguments
//! 2. Environment variables (handled by clap)
//! 3. Config file (searched in standard locations)
//! 4. Built-in defaults

use std::env;
use std::fs;
use std::path::PathBuf;

use log::debug;
use serde::de::DeserializeOwned;

use crate::APP_NAME;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Describes where a configuration was loaded from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Explicit path provided via CLI or env var
    Explicit(PathBuf),
    /// Found in current working directory
    CurrentDir(PathBuf),
    /// Found in XDG config home (~/.config/climate-api/)
    XdgConfig(PathBuf),
    /// Found in system config (/etc/climate-api/)
    System(PathBuf),
    /// No config file found, using defaults
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            ConfigSource::Explicit(p)
            | ConfigSource::CurrentDir(p)
            | ConfigSource::XdgConfig(p)
            | ConfigSource::System(p) => Some(p),
            ConfigSource::Defaults => None,
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.path() {
            Some(p) => write!(f, "{}", p.display()),
            None => write!(f, "(defaults)"),
        }
    }
}

/// Find a configuration file in standard locations
///
/// Search order:
/// 1. Environment variable (e.g. `CLIMATE_API_CONFIG`), if the file it names exists
/// 2. Current directory
/// 3. XDG config home (`$XDG_CONFIG_HOME/climate-api/` or `~/.config/climate-api/`)
/// 4. System config (`/etc/climate-api/`)
pub fn find_config_file(env_var: &str, filename: &str) -> ConfigSource {
    let candidates = [
        env::var(env_var).ok().map(|p| ConfigSource::Explicit(p.into())),
        Some(ConfigSource::CurrentDir(PathBuf::from(filename))),
        Some(ConfigSource::XdgConfig(xdg_config_path(filename))),
        Some(ConfigSource::System(
            PathBuf::from("/etc").join(APP_NAME).join(filename),
        )),
    ];

    candidates
        .into_iter()
        .flatten()
        .find(|source| source.path().is_some_and(|p| p.exists()))
        .unwrap_or(ConfigSource::Defaults)
}

fn xdg_config_path(filename: &str) -> PathBuf {
    let base = match (env::var("XDG_CONFIG_HOME"), env::var("HOME")) {
        (Ok(xdg_config), _) => PathBuf::from(xdg_config),
        (Err(_), Ok(home)) => PathBuf::from(home).join(".config"),
        // Relative fallback, won't normally exist
        (Err(_), Err(_)) => PathBuf::from(".config"),
    };
    base.join(APP_NAME).join(filename)
}

/// Load and parse a TOML configuration file
///
/// Returns `T::default()` when the source is [`ConfigSource::Defaults`].
pub fn load_config<T: DeserializeOwned + Default>(source: &ConfigSource) -> Result<T, ConfigError> {
    let Some(path) = source.path() else {
        return Ok(T::default());
    };

    debug!("reading config file: {}", path.display());
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })
}
