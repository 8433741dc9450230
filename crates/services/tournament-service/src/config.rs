//! Tournament service configuration.

use std::env;

use common::config::DatabaseConfig;

/// Deployment environment, read from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnvironment {
    #[default]
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "test" => Self::Test,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Tournament service configuration.
#[derive(Debug, Clone)]
pub struct TournamentServiceConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
    pub environment: AppEnvironment,
    /// Insert baseline data during bootstrap
    pub seed_on_startup: bool,
}

impl TournamentServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = DatabaseConfig::default();
        let environment = env::var("APP_ENV")
            .map(|name| AppEnvironment::from_name(&name))
            .unwrap_or_default();

        Self {
            database: DatabaseConfig {
                url: env::var("TOURNAMENT_SERVICE_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or(defaults.url),
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.max_connections),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.min_connections),
                sqlx_logging: env::var("DATABASE_SQLX_LOGGING")
                    .ok()
                    .and_then(|v| parse_flag(&v))
                    .unwrap_or(defaults.sqlx_logging),
            },
            environment,
            seed_on_startup: env::var("TOURNAMENT_SEED_ON_STARTUP")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(!environment.is_production()),
        }
    }

    /// Configuration for a given database URL with development defaults.
    pub fn with_database_url(url: impl Into<String>) -> Self {
        Self {
            database: DatabaseConfig {
                url: url.into(),
                ..DatabaseConfig::default()
            },
            ..Self::default()
        }
    }
}

impl Default for TournamentServiceConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            environment: AppEnvironment::Development,
            seed_on_startup: true,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
