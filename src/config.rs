//! Configuration module for Account Hub.
//!
//! Loads configuration from YAML files and environment variables.

use std::time::Duration;

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// How long in-flight requests may run after a shutdown signal.
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            shutdown_timeout_secs: 5,
        }
    }
}

impl ServerConfig {
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

/// Database configuration.
///
/// A full `url` wins over the individual connection fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub name: String,
    pub password: String,
    pub ssl_mode: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            name: "postgres".to_string(),
            password: String::new(),
            ssl_mode: "disable".to_string(),
            max_connections: 10,
            acquire_timeout_secs: 5,
        }
    }
}

impl DatabaseConfig {
    /// Build Postgres connection options from this configuration.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        if let Some(url) = &self.url {
            return url.parse();
        }

        let ssl_mode: PgSslMode = self.ssl_mode.parse()?;

        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.name)
            .password(&self.password)
            .ssl_mode(ssl_mode))
    }

    /// A loggable description of the target database (no credentials).
    pub fn describe(&self) -> String {
        match &self.url {
            Some(_) => "<url>".to_string(),
            None => format!("{}:{}/{}", self.host, self.port, self.name),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub enabled: bool,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub token_duration_hours: i64,
    /// bcrypt work factor used when hashing new passwords.
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_issuer: "account-hub".to_string(),
            token_duration_hours: 24,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

/// Variables read by earlier deployments, mapped onto config keys.
const LEGACY_ENV: &[(&str, &str)] = &[
    ("DATABASE_URL", "database.url"),
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_USER", "database.user"),
    ("DB_NAME", "database.name"),
    ("DB_PASSWORD", "database.password"),
];

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy variables (DB_USER, DB_NAME, DB_PASSWORD, ...)
    /// 2. Environment variables (ACCOUNT_HUB__*)
    /// 3. config/local.yaml (if exists)
    /// 4. config/default.yaml (if exists)
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("ACCOUNT_HUB")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in LEGACY_ENV {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.shutdown_timeout(), Duration::from_secs(5));
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.ssl_mode, "disable");
        assert!(!config.auth.enabled);
        assert_eq!(config.auth.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: Config = ConfigLoader::builder()
            .add_source(File::from_str(
                "server:\n  port: 8080\nauth:\n  enabled: true\nlogging:\n  format: pretty\n",
                config::FileFormat::Yaml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.auth.enabled);
        assert_eq!(config.auth.jwt_issuer, "account-hub");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_connect_options_from_fields() {
        let db = DatabaseConfig {
            host: "db.internal".to_string(),
            name: "accounts".to_string(),
            ..Default::default()
        };
        let options = db.connect_options().unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 5432);
        assert_eq!(options.get_database(), Some("accounts"));
        assert_eq!(db.describe(), "db.internal:5432/accounts");
    }

    #[test]
    fn test_connect_options_prefers_url() {
        let db = DatabaseConfig {
            url: Some("postgres://u:p@example.com:6543/other".to_string()),
            ..Default::default()
        };
        let options = db.connect_options().unwrap();
        assert_eq!(options.get_host(), "example.com");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(db.describe(), "<url>");
    }

    #[test]
    fn test_invalid_ssl_mode() {
        let db = DatabaseConfig {
            ssl_mode: "sometimes".to_string(),
            ..Default::default()
        };
        assert!(db.connect_options().is_err());
    }
}
