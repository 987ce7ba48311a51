//! Connection settings resolution.

use serde::Serialize;

use crate::config::{ConfigError, ConfigFile};
use crate::dialect::Dialect;

/// Connection URL used when neither the config file nor the environment names one.
pub const DEFAULT_DATABASE_URL: &str = "./comet.db";

/// Environment variable consulted by [`DatabaseConfig::from_env`].
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Dialect plus connection string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseConfig {
    pub dialect: Dialect,
    pub url: String,
}

impl DatabaseConfig {
    /// Parse from a connection URL or file path.
    ///
    /// Supported formats:
    /// - `postgres://...`, `postgresql://...` → Postgres
    /// - `mysql://...` → Mysql
    /// - `sqlite://...`, `file:...`, `:memory:`, `./path/to/app.db` → Sqlite
    pub fn from_url(url: &str) -> Self {
        Self {
            dialect: Dialect::from_url(url),
            url: url.to_string(),
        }
    }

    /// Load from the `DATABASE_URL` environment variable.
    pub fn from_env() -> Option<Self> {
        std::env::var(DATABASE_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(|url| Self::from_url(&url))
    }

    /// Settings named by a config file, if it has a `database_url`.
    ///
    /// An explicit `dialect` key overrides the one detected from the URL.
    pub fn from_config_file(file: &ConfigFile) -> Option<Self> {
        let url = file.database_url.as_deref()?;
        let mut config = Self::from_url(url);
        if let Some(dialect) = file.dialect {
            config.dialect = dialect;
        }
        Some(config)
    }

    /// Resolve configuration from config file and environment.
    ///
    /// Priority: config file > `DATABASE_URL` > default (`./comet.db`, sqlite)
    pub fn resolve() -> Result<Self, ConfigError> {
        let file = ConfigFile::load()?;
        Ok(Self::resolve_from(file.as_ref(), Self::from_env()))
    }

    /// Apply the resolution order to already-loaded sources.
    pub fn resolve_from(file: Option<&ConfigFile>, env: Option<Self>) -> Self {
        file.and_then(Self::from_config_file)
            .or(env)
            .unwrap_or_else(|| Self::from_url(DEFAULT_DATABASE_URL))
    }
}
