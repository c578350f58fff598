//! Configuration loading and resolution
//!
//! Priority order, highest first:
//! 1. Command-line argument
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default
//!
//! Tiers 1 and 2 arrive together as [`ConfigOverrides`] (the binary's clap
//! parser reads both). A missing config file is not an error; a malformed one
//! is.

use crate::db::PoolSettings;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_DATABASE_PATH: &str = "evaluations.db";
pub const DEFAULT_STATIC_DIR: &str = "public";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Browser origins allowed to call the API when nothing else is configured
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "https://intellcap-evaluations.onrender.com",
    "http://localhost:3000",
    "https://localhost:3000",
];

/// Contents of `config.toml`; every key optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
    pub static_dir: Option<PathBuf>,
    pub cors_origins: Option<Vec<String>>,
    pub max_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub busy_timeout_ms: Option<u64>,
}

impl TomlConfig {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
    pub static_dir: Option<PathBuf>,
    pub cors_origins: Option<Vec<String>>,
    pub max_connections: Option<u32>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    /// Folder holding the dashboard page and its assets; served only if it exists
    pub static_dir: Option<PathBuf>,
    pub cors_origins: Vec<String>,
    pub pool: PoolSettings,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            static_dir: Some(PathBuf::from(DEFAULT_STATIC_DIR)),
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            pool: PoolSettings::default(),
        }
    }
}

impl ServiceConfig {
    /// Merge overrides and file values over the compiled defaults
    pub fn resolve(overrides: &ConfigOverrides, file: Option<&TomlConfig>) -> Self {
        let defaults = Self::default();
        let file = file.cloned().unwrap_or_default();

        let pool = PoolSettings {
            max_connections: overrides
                .max_connections
                .or(file.max_connections)
                .unwrap_or(defaults.pool.max_connections)
                .max(1),
            acquire_timeout: file
                .acquire_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.pool.acquire_timeout),
            busy_timeout: file
                .busy_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.pool.busy_timeout),
        };

        Self {
            host: overrides.host.clone().or(file.host).unwrap_or(defaults.host),
            port: overrides.port.or(file.port).unwrap_or(defaults.port),
            database_path: overrides
                .database_path
                .clone()
                .or(file.database_path)
                .unwrap_or(defaults.database_path),
            static_dir: overrides.static_dir.clone().or(file.static_dir).or(defaults.static_dir),
            cors_origins: overrides
                .cors_origins
                .clone()
                .or(file.cors_origins)
                .unwrap_or(defaults.cors_origins),
            pool,
        }
    }
}

/// Platform config file locations, most specific first
fn candidate_config_files() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("evalform").join("config.toml"));
    }
    if cfg!(target_os = "linux") {
        candidates.push(PathBuf::from("/etc/evalform/config.toml"));
    }
    candidates
}

/// Load the TOML tier
///
/// An explicit path is used if given; otherwise the platform locations are
/// searched. Returns `Ok(None)` when no file exists.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<Option<TomlConfig>> {
    let path = match explicit {
        Some(path) if path.exists() => Some(path.to_path_buf()),
        Some(path) => {
            warn!("Config file {} not found, using defaults", path.display());
            None
        }
        None => candidate_config_files().into_iter().find(|p| p.exists()),
    };

    match path {
        Some(path) => {
            info!("Loading config file: {}", path.display());
            TomlConfig::load(&path).map(Some)
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::resolve(&ConfigOverrides::default(), None);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3001);
        assert_eq!(config.database_path, PathBuf::from("evaluations.db"));
        assert_eq!(config.static_dir, Some(PathBuf::from("public")));
        assert_eq!(config.cors_origins.len(), 3);
        assert_eq!(config.pool, PoolSettings::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = TomlConfig::parse(
            r#"
            port = 8080
            database_path = "/var/lib/evalform/evaluations.db"
            cors_origins = ["https://dash.example.org"]
            busy_timeout_ms = 250
            "#,
        )
        .unwrap();

        let config = ServiceConfig::resolve(&ConfigOverrides::default(), Some(&file));
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(
            config.database_path,
            PathBuf::from("/var/lib/evalform/evaluations.db")
        );
        assert_eq!(config.cors_origins, vec!["https://dash.example.org"]);
        assert_eq!(config.pool.busy_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_overrides_beat_file() {
        let file = TomlConfig {
            port: Some(8080),
            host: Some("127.0.0.1".into()),
            max_connections: Some(10),
            ..Default::default()
        };
        let overrides = ConfigOverrides {
            port: Some(9000),
            max_connections: Some(2),
            ..Default::default()
        };

        let config = ServiceConfig::resolve(&overrides, Some(&file));
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.pool.max_connections, 2);
    }

    #[test]
    fn test_zero_connections_clamped() {
        let overrides = ConfigOverrides {
            max_connections: Some(0),
            ..Default::default()
        };
        let config = ServiceConfig::resolve(&overrides, None);
        assert_eq!(config.pool.max_connections, 1);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let result = TomlConfig::parse("port = \"not a number\"");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_explicit_file_falls_back() {
        let missing = Path::new("/nonexistent/evalform/config.toml");
        assert!(load_toml_config(Some(missing)).unwrap().is_none());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "host = \"127.0.0.1\"\nstatic_dir = \"www\"").unwrap();

        let loaded = load_toml_config(Some(file.path())).unwrap().unwrap();
        assert_eq!(loaded.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(loaded.static_dir, Some(PathBuf::from("www")));
    }
}
