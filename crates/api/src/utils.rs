use clap::Parser;
use climate_api_core::{find_config_file, load_config, ConfigError, DEFAULT_API_PORT};
use fern::{
    colors::{Color, ColoredLevelConfig},
    Dispatch,
};
use log::LevelFilter;
use std::env;
use time::{format_description::well_known::Iso8601, OffsetDateTime};

use crate::{AnchorDate, DatabaseOptions};

#[derive(Parser, Clone, Debug, serde::Deserialize, Default)]
#[command(
    author,
    version,
    about = "Climate API - read-only REST API over daily climate observations"
)]
pub struct Cli {
    /// Path to config file (TOML format)
    /// Searched in order: this flag, $CLIMATE_API_CONFIG, ./climate-api.toml,
    /// $XDG_CONFIG_HOME/climate-api/climate-api.toml, /etc/climate-api/climate-api.toml
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "CLIMATE_API_LEVEL")]
    pub level: Option<String>,

    /// Host to listen on (use 0.0.0.0 for all interfaces)
    #[arg(short, long, env = "CLIMATE_API_HOST")]
    #[serde(alias = "host")]
    pub domain: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "CLIMATE_API_PORT")]
    pub port: Option<u16>,

    /// Public URL used in links on the landing page
    #[arg(short, long, env = "CLIMATE_API_REMOTE_URL")]
    pub remote_url: Option<String>,

    /// Path to the SQLite file holding the `measurement` and `station` tables
    #[arg(long, env = "CLIMATE_API_DATABASE")]
    pub database: Option<String>,

    /// Reference date for the trailing one-year window: YYYY-MM-DD, or
    /// "latest" to follow the most recent observation in the database
    #[arg(short, long, env = "CLIMATE_API_ANCHOR_DATE")]
    pub anchor_date: Option<String>,

    /// Maximum number of pooled database connections
    #[arg(short, long, env = "CLIMATE_API_MAX_CONNECTIONS")]
    pub max_connections: Option<u32>,
}

impl Cli {
    pub fn host(&self) -> String {
        self.domain
            .clone()
            .unwrap_or_else(|| "127.0.0.1".to_string())
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_API_PORT)
    }

    pub fn remote_url(&self) -> String {
        self.remote_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.host(), self.port()))
    }

    pub fn database(&self) -> String {
        self.database
            .clone()
            .unwrap_or_else(|| "./Resources/hawaii.sqlite".to_string())
    }

    pub fn anchor_date(&self) -> Result<AnchorDate, time::error::Parse> {
        match &self.anchor_date {
            Some(anchor) => anchor.parse(),
            None => Ok(AnchorDate::default()),
        }
    }

    pub fn database_options(&self) -> DatabaseOptions {
        let defaults = DatabaseOptions::default();
        DatabaseOptions {
            max_connections: self.max_connections.unwrap_or(defaults.max_connections),
            ..defaults
        }
    }

    /// Fill every unset field from `fallback`.
    pub fn or(self, fallback: Cli) -> Cli {
        Cli {
            config: self.config.or(fallback.config),
            level: self.level.or(fallback.level),
            domain: self.domain.or(fallback.domain),
            port: self.port.or(fallback.port),
            remote_url: self.remote_url.or(fallback.remote_url),
            database: self.database.or(fallback.database),
            anchor_date: self.anchor_date.or(fallback.anchor_date),
            max_connections: self.max_connections.or(fallback.max_connections),
        }
    }
}

/// Load configuration from CLI args, config file, and environment
pub fn get_config_info() -> Result<Cli, ConfigError> {
    let cli_args = Cli::parse();

    let source = match &cli_args.config {
        Some(path) => climate_api_core::ConfigSource::Explicit(path.into()),
        None => find_config_file("CLIMATE_API_CONFIG", "climate-api.toml"),
    };
    let file_config: Cli = load_config(&source)?;

    // CLI args override file config (env vars are handled by clap)
    Ok(cli_args.or(file_config))
}

pub fn get_log_level(cli: &Cli) -> LevelFilter {
    let level_str = cli
        .level
        .clone()
        .or_else(|| env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    match level_str.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

pub fn setup_logger() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let timestamp = OffsetDateTime::now_utc()
                .format(&Iso8601::DEFAULT)
                .unwrap_or_default();
            out.finish(format_args!(
                "[{} {}] {}: {}",
                timestamp,
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .chain(std::io::stdout())
}
