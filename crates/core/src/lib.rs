//! Climate API Core Library
//!
//! Shared utilities for the climate API service:
//! - Configuration loading (XDG-compliant)
//! - File system checks

mod config;
pub mod fs;

pub use config::{find_config_file, load_config, ConfigError, ConfigSource};
pub use fs::is_file;

/// Application name used for XDG paths and the config file name
pub const APP_NAME: &str = "climate-api";

/// Default API port
pub const DEFAULT_API_PORT: u16 = 9800;
