//! Connection settings read from the environment

use url::Url;

use crate::database::constants::{DEFAULT_DB_HOST, DEFAULT_DB_NAME, DEFAULT_DB_PORT, DEFAULT_DB_USER};
use crate::error::ConfigError;

pub const ENV_DB_HOST: &str = "VOTE_DB_HOST";
pub const ENV_DB_PORT: &str = "VOTE_DB_PORT";
pub const ENV_DB_NAME: &str = "VOTE_DB_NAME";
pub const ENV_DB_USER: &str = "VOTE_DB_USER";
pub const ENV_DB_PASSWORD: &str = "VOTE_DB_PASSWORD";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_BOOTSTRAP_SCHEMA: &str = "VOTE_INGEST_BOOTSTRAP_SCHEMA";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: Option<String>,
    /// Full connection URL; replaces the individual fields when set
    pub url_override: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database: DatabaseConfig,
    pub bootstrap_schema: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database = DatabaseConfig {
            host: get(ENV_DB_HOST).unwrap_or_else(|| DEFAULT_DB_HOST.to_string()),
            port: env_parse(ENV_DB_PORT, get(ENV_DB_PORT), DEFAULT_DB_PORT)?,
            database: get(ENV_DB_NAME).unwrap_or_else(|| DEFAULT_DB_NAME.to_string()),
            user: get(ENV_DB_USER)
                .or_else(|| get("USER"))
                .unwrap_or_else(|| DEFAULT_DB_USER.to_string()),
            password: get(ENV_DB_PASSWORD),
            url_override: get(ENV_DATABASE_URL),
        };
        database.validate()?;

        Ok(Config {
            database,
            bootstrap_schema: env_parse(ENV_BOOTSTRAP_SCHEMA, get(ENV_BOOTSTRAP_SCHEMA), false)?,
        })
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.url_override {
            return check_text(ENV_DATABASE_URL, url);
        }

        check_text(ENV_DB_HOST, &self.host)?;
        check_text(ENV_DB_NAME, &self.database)?;
        check_text(ENV_DB_USER, &self.user)?;
        if let Some(password) = &self.password {
            if password.chars().any(char::is_control) {
                return Err(invalid(ENV_DB_PASSWORD, "control characters are not allowed"));
            }
        }
        if self.port == 0 {
            return Err(invalid(ENV_DB_PORT, "port must be non-zero"));
        }

        Ok(())
    }

    /// Connection URL with credentials percent-encoded
    pub fn connection_url(&self) -> Result<String, ConfigError> {
        if let Some(url) = &self.url_override {
            return Ok(url.clone());
        }

        let mut url = Url::parse("postgres://localhost")?;
        url.set_host(Some(&self.host))?;
        url.set_port(Some(self.port))
            .map_err(|_| invalid(ENV_DB_PORT, "cannot set port"))?;
        url.set_username(&self.user)
            .map_err(|_| invalid(ENV_DB_USER, "cannot set user"))?;
        url.set_password(self.password.as_deref())
            .map_err(|_| invalid(ENV_DB_PASSWORD, "cannot set password"))?;
        url.set_path(&format!("/{}", self.database));

        Ok(url.to_string())
    }

    /// Connection target safe to log
    pub fn redacted_url(&self) -> String {
        let Ok(raw) = self.connection_url() else {
            return "<invalid url>".to_string();
        };
        match Url::parse(&raw) {
            Ok(mut url) => {
                if url.password().is_some() {
                    let _ = url.set_password(Some("****"));
                }
                url.to_string()
            }
            Err(_) => raw,
        }
    }
}

/// Parse an optional raw value, falling back to `default` when unset
fn env_parse<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| invalid(key, &format!("cannot parse {:?}", v))),
    }
}

fn check_text(key: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(invalid(key, "must not be empty"));
    }
    if value.chars().any(char::is_control) {
        return Err(invalid(key, "control characters are not allowed"));
    }
    Ok(())
}

fn invalid(key: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: reason.to_string(),
    }
}
