//! Configuration management

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::constants::{
    DEFAULT_LOCKOUT_MINUTES, DEFAULT_MAX_FAILED_ACCESS_ATTEMPTS, DEFAULT_TOKEN_EXPIRATION_HOURS,
    MAX_FAILED_ACCESS_ATTEMPTS_LIMIT, MAX_LOCKOUT_MINUTES, MAX_TOKEN_EXPIRATION_HOURS,
    MIN_PASSWORD_LENGTH,
};
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub identity: IdentitySettings,
    pub log: LogSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub backend: DatabaseBackend,
    #[serde(default)]
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub run_migrations: bool,
}

#[derive(Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
    pub audience: String,
}

// Keep the signing secret out of logs.
impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"[REDACTED]")
            .field("expiration_hours", &self.expiration_hours)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct IdentitySettings {
    pub password: PasswordPolicySettings,
    pub lockout: LockoutSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordPolicySettings {
    pub required_length: usize,
    pub require_digit: bool,
    pub require_lowercase: bool,
    pub require_uppercase: bool,
    pub require_non_alphanumeric: bool,
}

impl Default for PasswordPolicySettings {
    fn default() -> Self {
        Self {
            required_length: MIN_PASSWORD_LENGTH,
            require_digit: true,
            require_lowercase: true,
            require_uppercase: true,
            require_non_alphanumeric: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LockoutSettings {
    pub enabled: bool,
    pub max_failed_attempts: u32,
    pub duration_minutes: i64,
}

impl Default for LockoutSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_failed_attempts: DEFAULT_MAX_FAILED_ACCESS_ATTEMPTS,
            duration_minutes: DEFAULT_LOCKOUT_MINUTES,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Builder pre-populated with every default, so a bare environment still deserializes.
    pub fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let password = PasswordPolicySettings::default();
        let lockout = LockoutSettings::default();

        Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "supplier-server")?
            .set_default("database.backend", "postgres")?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.acquire_timeout_seconds", 3)?
            .set_default("database.run_migrations", true)?
            .set_default("jwt.secret", "")?
            .set_default("jwt.expiration_hours", DEFAULT_TOKEN_EXPIRATION_HOURS)?
            .set_default("jwt.issuer", "supplier-server")?
            .set_default("jwt.audience", "https://localhost")?
            .set_default("identity.password.required_length", password.required_length as i64)?
            .set_default("identity.password.require_digit", password.require_digit)?
            .set_default("identity.password.require_lowercase", password.require_lowercase)?
            .set_default("identity.password.require_uppercase", password.require_uppercase)?
            .set_default(
                "identity.password.require_non_alphanumeric",
                password.require_non_alphanumeric,
            )?
            .set_default("identity.lockout.enabled", lockout.enabled)?
            .set_default("identity.lockout.max_failed_attempts", lockout.max_failed_attempts)?
            .set_default("identity.lockout.duration_minutes", lockout.duration_minutes)?
            .set_default("log.level", "info")?
            .set_default("log.json", true)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt.secret.len() < 32 {
            return Err(AppError::InvalidConfig(
                "jwt.secret must be at least 32 bytes".into(),
            ));
        }
        if !(1..=MAX_TOKEN_EXPIRATION_HOURS).contains(&self.jwt.expiration_hours) {
            return Err(AppError::InvalidConfig(format!(
                "jwt.expiration_hours must be between 1 and {}",
                MAX_TOKEN_EXPIRATION_HOURS
            )));
        }
        if self.database.backend == DatabaseBackend::Postgres && self.database.url.is_empty() {
            return Err(AppError::InvalidConfig(
                "database.url is required for the postgres backend".into(),
            ));
        }
        let lockout = &self.identity.lockout;
        if !(1..=MAX_FAILED_ACCESS_ATTEMPTS_LIMIT).contains(&lockout.max_failed_attempts) {
            return Err(AppError::InvalidConfig(format!(
                "identity.lockout.max_failed_attempts must be between 1 and {}",
                MAX_FAILED_ACCESS_ATTEMPTS_LIMIT
            )));
        }
        if !(1..=MAX_LOCKOUT_MINUTES).contains(&lockout.duration_minutes) {
            return Err(AppError::InvalidConfig(format!(
                "identity.lockout.duration_minutes must be between 1 and {}",
                MAX_LOCKOUT_MINUTES
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_with(overrides: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let mut builder = AppConfig::builder()?;
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }
        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn test_defaults_with_memory_backend() {
        let config = load_with(&[
            ("database.backend", "memory"),
            ("jwt.secret", "0123456789abcdef0123456789abcdef"),
        ])
        .unwrap();

        assert_eq!(config.app.port, 8080);
        assert_eq!(config.database.backend, DatabaseBackend::Memory);
        assert_eq!(config.identity.password.required_length, 6);
        assert_eq!(config.identity.lockout.max_failed_attempts, 5);
        assert!(config.log.directory.is_none());
    }

    #[test]
    fn test_short_secret_rejected() {
        let result = load_with(&[("database.backend", "memory"), ("jwt.secret", "short")]);
        assert!(matches!(result, Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn test_postgres_requires_url() {
        let result = load_with(&[("jwt.secret", "0123456789abcdef0123456789abcdef")]);
        assert!(matches!(result, Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn test_out_of_range_durations_rejected() {
        let base = [
            ("database.backend", "memory"),
            ("jwt.secret", "0123456789abcdef0123456789abcdef"),
        ];
        let bad = [
            ("jwt.expiration_hours", "0"),
            ("jwt.expiration_hours", "9223372036854775807"),
            ("identity.lockout.duration_minutes", "-5"),
            ("identity.lockout.duration_minutes", "9223372036854775807"),
            ("identity.lockout.max_failed_attempts", "0"),
            ("identity.lockout.max_failed_attempts", "4294967295"),
        ];

        for (key, value) in bad {
            let mut overrides = base.to_vec();
            overrides.push((key, value));
            let result = load_with(&overrides);
            assert!(
                matches!(result, Err(AppError::InvalidConfig(_))),
                "{}={} accepted",
                key,
                value
            );
        }
    }

    #[test]
    fn test_jwt_debug_redacts_secret() {
        let config = load_with(&[
            ("database.backend", "memory"),
            ("jwt.secret", "0123456789abcdef0123456789abcdef"),
        ])
        .unwrap();
        let printed = format!("{:?}", config.jwt);
        assert!(!printed.contains("0123456789abcdef"));
    }
}
