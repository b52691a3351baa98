//! Configuration module
//!
//! `AppConfig` is read from a TOML file; every section and field has a
//! default, so a partial file (or none at all) is valid.
//!
//! ```toml
//! [server]
//! api_host = "0.0.0.0"
//! api_port = 3000
//! public_base_url = "https://port-russell.example"
//!
//! [database]
//! url = "sqlite://./marina.db?mode=rwc"   # or "memory"
//!
//! [logging]
//! level = "info"
//! format = "pretty"                        # or "json"
//!
//! [reservations]
//! interval_rule = "inclusive"              # or "strict"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::IntervalRule;
use crate::infrastructure::DatabaseConfig;
use crate::interfaces::http::middleware::SessionConfig;
use crate::shared::errors::InfraError;

/// Database URL that selects the in-memory store
pub const MEMORY_DATABASE_URL: &str = "memory";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub logging: LoggingConfig,
    pub reservations: ReservationsConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
    /// Origin used for absolute links; derived from host and port if unset
    pub public_base_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 3000,
            shutdown_timeout: 30,
            public_base_url: None,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    pub fn base_url(&self) -> String {
        match &self.public_base_url {
            Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
            _ => format!("http://{}", self.address()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub run_migrations: bool,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        let db = DatabaseConfig::default();
        Self {
            url: db.url,
            run_migrations: db.run_migrations,
        }
    }
}

impl DatabaseSection {
    pub fn is_memory(&self) -> bool {
        self.url.trim() == MEMORY_DATABASE_URL
    }

    pub fn connection(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.url.clone(),
            run_migrations: self.run_migrations,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReservationsConfig {
    /// `inclusive` (start <= end) or `strict` (start < end)
    pub interval_rule: IntervalRule,
}

impl AppConfig {
    /// Read and parse `path`.
    pub fn load(path: &Path) -> Result<Self, InfraError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, InfraError> {
        Ok(toml::from_str(raw)?)
    }

    /// Load `path`, falling back to defaults when it is missing or invalid.
    /// The error is returned alongside so the caller can log it once
    /// tracing is up.
    pub fn load_or_default(path: &Path) -> (Self, Option<InfraError>) {
        match Self::load(path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    pub fn interval_rule(&self) -> IntervalRule {
        self.reservations.interval_rule
    }
}

/// `$MARINA_CONFIG` if set, else `~/.config/marina-service/config.toml`
pub fn default_config_path() -> PathBuf {
    if let Some(path) = std::env::var_os("MARINA_CONFIG") {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("marina-service")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();
        assert_eq!(cfg.server.api_port, 3000);
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.interval_rule(), IntervalRule::Inclusive);
        assert_eq!(cfg.session.cookie_name, "tokenDemo");
        assert!(!cfg.database.is_memory());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            [server]
            api_port = 8080

            [database]
            url = "memory"

            [reservations]
            interval_rule = "strict"

            [session]
            max_age_secs = 60
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.api_port, 8080);
        assert_eq!(cfg.server.api_host, "0.0.0.0");
        assert!(cfg.database.is_memory());
        assert_eq!(cfg.interval_rule(), IntervalRule::Strict);
        assert_eq!(cfg.session.max_age_secs, 60);
        assert_eq!(cfg.session.email_cookie_name, "userEmail");
    }

    #[test]
    fn unknown_interval_rule_is_rejected() {
        let err = AppConfig::from_toml("[reservations]\ninterval_rule = \"loose\"");
        assert!(matches!(err, Err(InfraError::Config(_))));
    }

    #[test]
    fn base_url_prefers_public_setting() {
        let mut server = ServerConfig::default();
        assert_eq!(server.base_url(), "http://0.0.0.0:3000");
        server.public_base_url = Some("https://port.example/".to_string());
        assert_eq!(server.base_url(), "https://port.example");
    }

    #[test]
    fn missing_file_falls_back() {
        let (cfg, err) = AppConfig::load_or_default(Path::new("/nonexistent/marina.toml"));
        assert!(err.is_some());
        assert_eq!(cfg.server.api_port, 3000);
    }
}
