//! Application configuration
//!
//! Loaded from YAML, then overridden by `LEZIT_*` environment variables.
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 8080
//!   cors_origins: ["https://app.lezit.in"]
//! database:
//!   backend: mongodb
//!   uri: mongodb://localhost:27017
//!   name: lezit
//! auth:
//!   jwt_secret: change-me-to-something-at-least-32-bytes
//!   token_ttl_hours: 24
//! bootstrap_admin:
//!   name: Operations
//!   email: ops@lezit.in
//!   password: initial-password
//! logging:
//!   json: true
//! ```

use crate::core::auth::MAX_TOKEN_TTL_HOURS;
use crate::core::error::{ConfigError, LezitResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Secret used when nothing else is configured. Fine for local runs only.
pub const DEVELOPMENT_JWT_SECRET: &str = "lezit-development-secret-change-me-now";

const MIN_SECRET_LEN: usize = 32;

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub bootstrap_admin: Option<BootstrapAdmin>,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseBackend {
    #[default]
    InMemory,
    Mongodb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub uri: Option<String>,
    pub name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::InMemory,
            uri: None,
            name: "lezit".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub password_pepper: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
            token_ttl_hours: 24,
            password_pepper: "lezit".to_string(),
        }
    }
}

/// Admin account created at startup when missing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Emit JSON log lines instead of the human-readable format
    pub json: bool,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> LezitResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            message: format!("{}: {}", path.display(), e),
        })?;
        serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                file: Some(path.display().to_string()),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> LezitResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// File (when given) → environment → validation
    pub fn load(path: Option<&Path>) -> LezitResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) -> LezitResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `LEZIT_*` overrides from an arbitrary lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> LezitResult<()> {
        if let Some(host) = lookup("LEZIT_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("LEZIT_PORT") {
            self.server.port = parse_value("LEZIT_PORT", &port)?;
        }
        if let Some(backend) = lookup("LEZIT_DATABASE_BACKEND") {
            self.database.backend = match backend.as_str() {
                "in_memory" => DatabaseBackend::InMemory,
                "mongodb" => DatabaseBackend::Mongodb,
                _ => {
                    return Err(invalid(
                        "LEZIT_DATABASE_BACKEND",
                        &backend,
                        "expected in_memory or mongodb",
                    ));
                }
            };
        }
        if let Some(uri) = lookup("LEZIT_MONGODB_URI") {
            self.database.uri = Some(uri);
        }
        if let Some(name) = lookup("LEZIT_DATABASE_NAME") {
            self.database.name = name;
        }
        if let Some(secret) = lookup("LEZIT_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(ttl) = lookup("LEZIT_TOKEN_TTL_HOURS") {
            self.auth.token_ttl_hours = parse_value("LEZIT_TOKEN_TTL_HOURS", &ttl)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> LezitResult<()> {
        if self.server.port == 0 {
            return Err(invalid("server.port", "0", "port must be non-zero"));
        }
        if self.auth.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(invalid(
                "auth.jwt_secret",
                "<redacted>",
                &format!("must be at least {} bytes", MIN_SECRET_LEN),
            ));
        }
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&self.auth.token_ttl_hours) {
            return Err(invalid(
                "auth.token_ttl_hours",
                &self.auth.token_ttl_hours.to_string(),
                &format!("must be between 1 and {}", MAX_TOKEN_TTL_HOURS),
            ));
        }
        if self.database.backend == DatabaseBackend::Mongodb
            && self.database.uri.as_deref().is_none_or(str::is_empty)
        {
            return Err(invalid(
                "database.uri",
                "",
                "required when database.backend is mongodb",
            ));
        }
        Ok(())
    }

    /// `host:port` to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn uses_development_secret(&self) -> bool {
        self.auth.jwt_secret == DEVELOPMENT_JWT_SECRET
    }
}

fn parse_value<T: std::str::FromStr>(field: &str, value: &str) -> LezitResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e: T::Err| invalid(field, value, &e.to_string()))
}

fn invalid(field: &str, value: &str, message: &str) -> crate::core::error::LezitError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.database.backend, DatabaseBackend::InMemory);
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert!(config.uses_development_secret());
    }

    #[test]
    fn test_yaml_partial_sections_use_defaults() {
        let config = AppConfig::from_yaml_str(
            r#"
server:
  port: 9000
database:
  backend: mongodb
  uri: mongodb://db:27017
bootstrap_admin:
  name: Ops
  email: ops@lezit.in
  password: long-enough-password
"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.database.backend, DatabaseBackend::Mongodb);
        assert_eq!(config.database.name, "lezit");
        assert_eq!(config.auth.token_ttl_hours, 24);
        assert_eq!(config.bootstrap_admin.unwrap().email, "ops@lezit.in");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("LEZIT_PORT", "7000"),
            ("LEZIT_DATABASE_BACKEND", "mongodb"),
            ("LEZIT_MONGODB_URI", "mongodb://mongo:27017"),
            ("LEZIT_JWT_SECRET", "an-overridden-secret-of-32-bytes-plus"),
        ]);
        let mut config = AppConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 7000);
        assert_eq!(config.database.backend, DatabaseBackend::Mongodb);
        assert_eq!(config.database.uri.as_deref(), Some("mongodb://mongo:27017"));
        assert!(!config.uses_development_secret());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_env_values_are_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_overrides(|key| (key == "LEZIT_PORT").then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("LEZIT_PORT"));

        let err = config
            .apply_overrides(|key| (key == "LEZIT_DATABASE_BACKEND").then(|| "redis".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("in_memory or mongodb"));
    }

    #[test]
    fn test_validate_rejects_short_secret_and_missing_uri() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "short".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.database.backend = DatabaseBackend::Mongodb;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("database.uri"));

        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_token_ttl_must_stay_within_a_year() {
        let mut config = AppConfig::default();
        config.auth.token_ttl_hours = 8760;
        assert!(config.validate().is_ok());

        for ttl in [0, 8761, i64::MAX] {
            config.auth.token_ttl_hours = ttl;
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("auth.token_ttl_hours"), "{err}");
        }
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "logging:\n  json: true\nserver:\n  host: 0.0.0.0").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert!(config.logging.json);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_from_yaml_file_reports_file_name() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server: [not, a, map]").unwrap();

        let err = AppConfig::from_yaml_file(file.path()).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        assert!(err.to_string().contains("Failed to parse config file"));

        let err = AppConfig::from_yaml_file("/definitely/not/here.yaml").unwrap_err();
        assert!(err.to_string().contains("IO error"));
    }
}
