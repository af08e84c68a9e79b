// src/config/mod.rs
// Server configuration: CLI flags > environment > TOML file > defaults

use anyhow::{Context, Result, bail};
use clap::Args;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::Level;

use crate::catalog::DEFAULT_IMPLICIT_CATEGORY;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_QUOTES_PATH: &str = "quotes.json";
pub const DEFAULT_CONFIG_PATH: &str = "dailyquote.toml";
pub const DEFAULT_SESSION_TTL_HOURS: u64 = 24;
/// One hundred years
pub const MAX_SESSION_TTL_HOURS: u64 = 24 * 365 * 100;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Command-line / environment overrides. Every field is optional so that
/// unset values fall through to the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Path to a TOML config file
    #[arg(long, env = "DQ_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "DQ_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "DQ_PORT")]
    pub port: Option<u16>,

    /// Quotes JSON file
    #[arg(short, long, env = "DQ_QUOTES")]
    pub quotes: Option<PathBuf>,

    /// Directory with the web frontend (index.html, static assets)
    #[arg(long, env = "DQ_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Category name for a quotes file that is a plain list
    #[arg(long, env = "DQ_DEFAULT_CATEGORY")]
    pub default_category: Option<String>,

    /// Hours of inactivity before a session is forgotten
    #[arg(long, env = "DQ_SESSION_TTL_HOURS")]
    pub session_ttl_hours: Option<u64>,

    /// trace, debug, info, warn or error
    #[arg(long, env = "DQ_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Contents of the optional TOML config file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub quotes: Option<PathBuf>,
    pub static_dir: Option<PathBuf>,
    pub default_category: Option<String>,
    pub session_ttl_hours: Option<u64>,
    pub log_level: Option<String>,
}

impl FileConfig {
    /// Read a config file. A missing file is only an error when `required`.
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        if !path.exists() {
            if required {
                bail!("config file {} does not exist", path.display());
            }
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Fully resolved server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub quotes: PathBuf,
    pub static_dir: Option<PathBuf>,
    pub default_category: String,
    pub session_ttl_hours: u64,
    pub log_level: Level,
}

impl ServerConfig {
    /// Resolve from CLI/env arguments plus the config file they point to
    pub fn resolve(args: &ConfigArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path, true)?,
            None => FileConfig::load(Path::new(DEFAULT_CONFIG_PATH), false)?,
        };
        Self::merge(args, file)
    }

    /// Layer arguments over file values over defaults
    pub fn merge(args: &ConfigArgs, file: FileConfig) -> Result<Self> {
        let log_level = args
            .log_level
            .clone()
            .or(file.log_level)
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        let log_level = Level::from_str(log_level.trim())
            .map_err(|_| anyhow::anyhow!("invalid log level '{log_level}'"))?;

        let session_ttl_hours = args
            .session_ttl_hours
            .or(file.session_ttl_hours)
            .unwrap_or(DEFAULT_SESSION_TTL_HOURS);
        if session_ttl_hours == 0 {
            bail!("session_ttl_hours must be at least 1");
        }
        if session_ttl_hours > MAX_SESSION_TTL_HOURS {
            bail!("session_ttl_hours must be at most {MAX_SESSION_TTL_HOURS}, got {session_ttl_hours}");
        }

        Ok(Self {
            host: args
                .host
                .clone()
                .or(file.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: args.port.or(file.port).unwrap_or(DEFAULT_PORT),
            quotes: args
                .quotes
                .clone()
                .or(file.quotes)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_QUOTES_PATH)),
            static_dir: args.static_dir.clone().or(file.static_dir),
            default_category: args
                .default_category
                .clone()
                .or(file.default_category)
                .unwrap_or_else(|| DEFAULT_IMPLICIT_CATEGORY.to_string()),
            session_ttl_hours,
            log_level,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Idle session lifetime, capped at `MAX_SESSION_TTL_HOURS`
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours.min(MAX_SESSION_TTL_HOURS) as i64)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            quotes: PathBuf::from(DEFAULT_QUOTES_PATH),
            static_dir: None,
            default_category: DEFAULT_IMPLICIT_CATEGORY.to_string(),
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            log_level: Level::INFO,
        }
    }
}
