//! TOML-based configuration for PetShelf
//!
//! Every section has defaults, so a missing `petshelf.toml` is fine. Secrets
//! are never written in the file: the file names the environment variable
//! that holds them.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 3001
//! log_level = "info"
//! log_format = "json"
//!
//! [auth]
//! jwt_secret_env = "JWT_SECRET"
//! token_expiry_secs = 3600
//!
//! [database]
//! url = "petshelf.db"
//! ```

use crate::auth::jwt::DEFAULT_TOKEN_EXPIRY_SECS;
use crate::db::DatabaseProvider;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Secrets shorter than this trigger a startup warning.
pub const MIN_SECRET_LEN: usize = 32;

/// Upper bound for `auth.token_expiry_secs` (30 days).
pub const MAX_TOKEN_EXPIRY_SECS: i64 = 30 * 24 * 60 * 60;

/// Root configuration structure loaded from petshelf.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PetShelfConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

// ============= Authentication Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable name containing the JWT secret
    #[serde(default = "default_jwt_secret_env")]
    pub jwt_secret_env: String,

    #[serde(default = "default_token_expiry")]
    pub token_expiry_secs: i64,
}

fn default_jwt_secret_env() -> String {
    "JWT_SECRET".to_string()
}

fn default_token_expiry() -> i64 {
    DEFAULT_TOKEN_EXPIRY_SECS
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret_env: default_jwt_secret_env(),
            token_expiry_secs: default_token_expiry(),
        }
    }
}

// ============= Database Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Local database path, or `:memory:`
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Environment variable for Turso URL (optional cloud config)
    pub turso_url_env: Option<String>,

    /// Environment variable for Turso auth token
    pub turso_token_env: Option<String>,
}

fn default_database_url() -> String {
    "petshelf.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            turso_url_env: None,
            turso_token_env: None,
        }
    }
}

// ============= Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {0}: {1}")]
    ReadError(PathBuf, std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl PetShelfConfig {
    /// Load configuration from a TOML file. A missing file yields defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let config = if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e))?;
            Self::from_toml(&content)?
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };

        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: PetShelfConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `HOST`, `PORT` and `DATABASE_URL` from the environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(host) = self.resolve_env("HOST") {
            self.server.host = host;
        }
        if let Some(port) = self.resolve_env("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::ValidationError(format!("PORT '{}' is not a valid port", port)))?;
        }
        if let Some(url) = self.resolve_env("DATABASE_URL") {
            self.database.url = url;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be non-zero".to_string(),
            ));
        }
        if self.auth.token_expiry_secs <= 0 {
            return Err(ConfigError::ValidationError(
                "auth.token_expiry_secs must be positive".to_string(),
            ));
        }
        if self.auth.token_expiry_secs > MAX_TOKEN_EXPIRY_SECS {
            return Err(ConfigError::ValidationError(format!(
                "auth.token_expiry_secs must not exceed {}",
                MAX_TOKEN_EXPIRY_SECS
            )));
        }
        if self.auth.jwt_secret_env.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.jwt_secret_env must name an environment variable".to_string(),
            ));
        }
        Ok(())
    }

    /// Get a resolved value from an env var reference. Empty counts as unset.
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok().filter(|v| !v.is_empty())
    }

    /// Get the JWT secret from the environment
    pub fn jwt_secret(&self) -> Result<String, ConfigError> {
        let secret = self
            .resolve_env(&self.auth.jwt_secret_env)
            .ok_or_else(|| ConfigError::MissingEnvVar(self.auth.jwt_secret_env.clone()))?;

        if secret.len() < MIN_SECRET_LEN {
            tracing::warn!(
                env = %self.auth.jwt_secret_env,
                min_len = MIN_SECRET_LEN,
                "JWT secret is shorter than recommended"
            );
        }

        Ok(secret)
    }

    /// Pick the database backend: remote Turso when both env references
    /// resolve (and the `turso` feature is on), the configured file otherwise.
    pub fn database_provider(&self) -> DatabaseProvider {
        #[cfg(feature = "turso")]
        {
            if let (Some(url_env), Some(token_env)) =
                (&self.database.turso_url_env, &self.database.turso_token_env)
            {
                if let (Some(url), Some(auth_token)) =
                    (self.resolve_env(url_env), self.resolve_env(token_env))
                {
                    return DatabaseProvider::Turso { url, auth_token };
                }
            }
        }

        DatabaseProvider::from_url(&self.database.url)
    }
}
