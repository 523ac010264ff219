use std::path::PathBuf;
use std::str::FromStr;

use restx_core::validation::RuleSet;
use restx_core::CoreError;
use validator::Validate;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has an invalid value '{value}'")]
    InvalidVar { var: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Failed to read rules from {path}: {source}")]
    RulesFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Rules(#[from] CoreError),
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone, Validate)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    #[validate(range(min = 1, max = 3600))]
    pub request_timeout_secs: u64,
    /// PostgreSQL URL; transactions are kept in memory when unset.
    pub database_url: Option<String>,
    /// JSON file with validation rules; no rules when unset.
    pub rules_path: Option<PathBuf>,
    /// Largest collection accepted without a batch-level violation.
    #[validate(range(min = 1, max = 10000))]
    pub max_batch_size: usize,
    /// Record field holding the primary key (default: `id`).
    #[validate(length(min = 1))]
    pub primary_key_field: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `DATABASE_URL`         | unset                      |
    /// | `RULES_PATH`           | unset                      |
    /// | `MAX_BATCH_SIZE`       | `500`                      |
    /// | `PRIMARY_KEY_FIELD`    | `id`                       |
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_var("PORT", 3000)?,
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", 30)?,
            database_url: std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            rules_path: std::env::var("RULES_PATH")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            max_batch_size: parse_var("MAX_BATCH_SIZE", 500)?,
            primary_key_field: std::env::var("PRIMARY_KEY_FIELD").unwrap_or_else(|_| "id".into()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load the validation rules named by `rules_path`.
    pub fn load_rules(&self) -> Result<RuleSet, ConfigError> {
        let Some(path) = &self.rules_path else {
            return Ok(RuleSet::default());
        };
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::RulesFile {
            path: path.clone(),
            source,
        })?;
        Ok(RuleSet::from_json(&json)?)
    }
}

fn parse_var<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidVar { var, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec![],
            request_timeout_secs: 30,
            database_url: None,
            rules_path: None,
            max_batch_size: 100,
            primary_key_field: "id".to_string(),
        }
    }

    #[test]
    fn defaults_validate() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let mut bad = config();
        bad.max_batch_size = 0;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn empty_primary_key_field_is_rejected() {
        let mut bad = config();
        bad.primary_key_field = String::new();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn no_rules_path_means_no_rules() {
        assert!(config().load_rules().unwrap().is_empty());
    }

    #[test]
    fn missing_rules_file_is_reported() {
        let mut bad = config();
        bad.rules_path = Some(PathBuf::from("/nonexistent/restx-rules.json"));
        assert_matches!(bad.load_rules(), Err(ConfigError::RulesFile { .. }));
    }
}
