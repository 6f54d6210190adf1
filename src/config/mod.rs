//! Configuration management

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub backend: BackendConfig,

    /// Directory holding the built web client
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("public")
}

/// Where schedule data comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// Remote GraphQL API at `backend.endpoint`
    Graphql,
    /// Seeded in-process store
    #[default]
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub mode: BackendMode,
    pub endpoint: Option<String>,
    /// Service token sent as `Authorization: JWT <token>`
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            mode: BackendMode::default(),
            endpoint: None,
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

/// Load from `$DIVE_CONFIG_DIR/config.*` (default: current directory) and
/// the environment.
pub fn load_config() -> Result<Config> {
    let config_dir = std::env::var_os("DIVE_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    load_config_from(&config_dir)
}

pub fn load_config_from(config_dir: &Path) -> Result<Config> {
    let config = ::config::Config::builder()
        // Start with defaults
        .set_default("port", 3000)?
        .set_default("backend.mode", "memory")?
        // Load from config file if it exists
        .add_source(
            ::config::File::with_name(&config_dir.join("config").to_string_lossy())
                .required(false),
        )
        // Override with environment variables (DIVE_PORT, DIVE_BACKEND__ENDPOINT, etc.)
        .add_source(
            ::config::Environment::with_prefix("DIVE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(config.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 4] = [
        "DIVE_PORT",
        "DIVE_BACKEND__MODE",
        "DIVE_BACKEND__ENDPOINT",
        "DIVE_STATIC_DIR",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_without_file() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(dir.path()).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.backend.mode, BackendMode::Memory);
        assert_eq!(config.backend.timeout_secs, 10);
        assert_eq!(config.static_dir, PathBuf::from("public"));
    }

    #[test]
    #[serial]
    fn test_file_then_env_override() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            r#"
port = 8080

[backend]
mode = "graphql"
endpoint = "http://localhost:8000/graphql"
timeout_secs = 3
"#,
        )
        .unwrap();

        let config = load_config_from(dir.path()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.backend.mode, BackendMode::Graphql);
        assert_eq!(config.backend.timeout_secs, 3);

        std::env::set_var("DIVE_PORT", "9090");
        std::env::set_var("DIVE_BACKEND__ENDPOINT", "https://api.example.com/graphql");
        let config = load_config_from(dir.path()).unwrap();
        clear_env();

        assert_eq!(config.port, 9090);
        assert_eq!(
            config.backend.endpoint.as_deref(),
            Some("https://api.example.com/graphql")
        );
        assert_eq!(config.backend.mode, BackendMode::Graphql);
    }

    #[test]
    #[serial]
    fn test_unknown_mode_is_rejected() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("DIVE_BACKEND__MODE", "carrier-pigeon");
        let result = load_config_from(dir.path());
        clear_env();

        assert!(result.is_err());
    }
}
