//! Application configuration.
//!
//! Each setting resolves with priority: config.toml > environment (.env) > default.

use chrono_tz::Tz;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Default server port
pub const SERVER_PORT: u16 = 3000;

/// Default database location
pub const DEFAULT_DB_PATH: &str = "data/vocab.db";

/// Default config file, relative to the working directory
pub const CONFIG_FILE: &str = "config.toml";

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    database: Option<DatabaseConfig>,
    server: Option<ServerConfig>,
    study: Option<StudyConfig>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerConfig {
    port: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct StudyConfig {
    /// IANA zone name whose calendar days decide what is due
    timezone: Option<String>,
}

/// Resolved settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database_path: PathBuf,
    pub port: u16,
    pub timezone: Tz,
}

impl Settings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", SERVER_ADDR, self.port)
    }
}

/// Load settings from `config.toml`, `.env` and the environment
pub fn load() -> Settings {
    // Load .env file if present
    let _ = dotenvy::dotenv();
    resolve(read_file_config(Path::new(CONFIG_FILE)), |key| std::env::var(key).ok())
}

fn read_file_config(path: &Path) -> FileConfig {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return FileConfig::default();
    };
    match toml::from_str::<FileConfig>(&contents) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring invalid {}: {}", path.display(), e);
            FileConfig::default()
        }
    }
}

fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Settings {
    let database_path = match file.database.and_then(|d| d.path) {
        Some(path) => {
            tracing::info!("Using database from config.toml: {}", path);
            PathBuf::from(path)
        }
        None => match env("DATABASE_PATH") {
            Some(path) => {
                tracing::info!("Using database from DATABASE_PATH env: {}", path);
                PathBuf::from(path)
            }
            None => PathBuf::from(DEFAULT_DB_PATH),
        },
    };

    let port = file
        .server
        .and_then(|s| s.port)
        .or_else(|| env("PORT").and_then(|p| parse_port(&p)))
        .unwrap_or(SERVER_PORT);

    let timezone = file
        .study
        .and_then(|s| s.timezone)
        .or_else(|| env("STUDY_TIMEZONE"))
        .or_else(|| env("TZ"))
        .and_then(|name| parse_timezone(&name))
        .unwrap_or(Tz::UTC);

    Settings {
        database_path,
        port,
        timezone,
    }
}

fn parse_port(value: &str) -> Option<u16> {
    match value.trim().parse() {
        Ok(port) => Some(port),
        Err(_) => {
            tracing::warn!("Ignoring invalid PORT: {}", value);
            None
        }
    }
}

/// Parse an IANA zone name. The POSIX `:` prefix (`TZ=:Asia/Seoul`) is accepted.
fn parse_timezone(name: &str) -> Option<Tz> {
    let trimmed = name.trim();
    match trimmed.strip_prefix(':').unwrap_or(trimmed).parse::<Tz>() {
        Ok(tz) => Some(tz),
        Err(_) => {
            tracing::warn!(
                "Unknown time zone {:?}; expected an IANA name such as \"Asia/Seoul\" \
                 (set study.timezone or STUDY_TIMEZONE), falling back to UTC",
                name
            );
            None
        }
    }
}
