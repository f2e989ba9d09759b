use std::str::FromStr;

use sqlx::postgres::PgConnectOptions;

/// Default pool size when `DB_MAX_CONNECTIONS` is unset.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Errors raised while reading database settings from the environment.
#[derive(Debug, thiserror::Error)]
pub enum DbConfigError {
    #[error("{var} must be a valid {expected}, got '{value}'")]
    InvalidValue {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Where the connection settings came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbTarget {
    /// A full connection URL (`DATABASE_URL`).
    Url(String),
    /// Individual `DB_*` settings.
    Parts {
        host: String,
        port: u16,
        user: String,
        password: Option<String>,
        database: String,
    },
}

/// Database connection configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub target: DbTarget,
    pub max_connections: u32,
}

impl DbConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var              | Default      |
    /// |----------------------|--------------|
    /// | `DATABASE_URL`       | --           |
    /// | `DB_HOST`            | `localhost`  |
    /// | `DB_PORT`            | `5432`       |
    /// | `DB_USER`            | `postgres`   |
    /// | `DB_PASSWORD`        | --           |
    /// | `DB_NAME`            | `notes_app`  |
    /// | `DB_MAX_CONNECTIONS` | `10`         |
    ///
    /// When `DATABASE_URL` is set the `DB_*` connection variables are ignored.
    pub fn from_env() -> Result<Self, DbConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DbConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let max_connections = match var("DB_MAX_CONNECTIONS") {
            Some(value) => parse_var("DB_MAX_CONNECTIONS", "u32", value)?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let target = match var("DATABASE_URL") {
            Some(url) => DbTarget::Url(url),
            None => DbTarget::Parts {
                host: var("DB_HOST").unwrap_or_else(|| "localhost".into()),
                port: match var("DB_PORT") {
                    Some(value) => parse_var("DB_PORT", "u16", value)?,
                    None => 5432,
                },
                user: var("DB_USER").unwrap_or_else(|| "postgres".into()),
                // `DB_PASSWORD=` in a `.env` template means "no password".
                password: var("DB_PASSWORD"),
                database: var("DB_NAME").unwrap_or_else(|| "notes_app".into()),
            },
        };

        Ok(Self {
            target,
            max_connections,
        })
    }

    /// Build sqlx connect options for the configured target.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        match &self.target {
            DbTarget::Url(url) => PgConnectOptions::from_str(url),
            DbTarget::Parts {
                host,
                port,
                user,
                password,
                database,
            } => {
                let mut options = PgConnectOptions::new()
                    .host(host)
                    .port(*port)
                    .username(user)
                    .database(database);
                if let Some(password) = password {
                    options = options.password(password);
                }
                Ok(options)
            }
        }
    }

    /// Target database name when assembled from parts, `None` for a URL.
    pub fn database_name(&self) -> Option<&str> {
        match &self.target {
            DbTarget::Url(_) => None,
            DbTarget::Parts { database, .. } => Some(database.as_str()),
        }
    }

    /// Whether a non-empty password was configured.
    ///
    /// A URL counts as configured: its credentials are embedded.
    pub fn has_password(&self) -> bool {
        match &self.target {
            DbTarget::Url(_) => true,
            DbTarget::Parts { password, .. } => password.is_some(),
        }
    }

    /// Connection description safe for logs (never includes the password).
    pub fn describe(&self) -> String {
        match &self.target {
            DbTarget::Url(_) => "DATABASE_URL".to_string(),
            DbTarget::Parts {
                host,
                port,
                user,
                database,
                ..
            } => format!("{user}@{host}:{port}/{database}"),
        }
    }
}

fn parse_var<T: FromStr>(
    var: &'static str,
    expected: &'static str,
    value: String,
) -> Result<T, DbConfigError> {
    value.trim().parse().map_err(|_| DbConfigError::InvalidValue {
        var,
        expected,
        value,
    })
}
