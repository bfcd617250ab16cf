use std::path::Path;

use anyhow::Context;
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Default, Debug, Clone)]
#[serde(default)]
pub struct Configuration {
    pub server: ServerSettings,
    pub database: DatabaseConfig,
}

impl Configuration {
    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let config = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let cfg: Self = toml::from_str(&config)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(cfg)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            host: String::from("0.0.0.0"),
            port: 8080,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Directory holding `db.sqlite`.
    pub path: String,
    /// Full connection URL, takes precedence over `path`.
    pub url: Option<String>,
    /// Insert the sample directory into an empty store.
    pub seed: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: String::from("data"),
            url: None,
            seed: false,
        }
    }
}

impl DatabaseConfig {
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!("sqlite://{}/db.sqlite?mode=rwc", self.path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg: Configuration = toml::from_str(
            r#"
            [database]
            seed = true
            "#,
        )
        .unwrap();
        assert!(cfg.database.seed);
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.database.connection_url(), "sqlite://data/db.sqlite?mode=rwc");
    }

    #[test]
    fn explicit_url_wins() {
        let cfg: Configuration = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 5000

            [database]
            path = "ignored"
            url = "sqlite::memory:"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.database.connection_url(), "sqlite::memory:");
    }

    #[test]
    fn missing_file_is_default() {
        let cfg = Configuration::load("does/not/exist.toml").unwrap();
        assert_eq!(cfg.database.path, "data");
        assert!(!cfg.database.seed);
    }
}
