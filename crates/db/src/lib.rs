//! Storage layer for the notes service.
//!
//! Owns the connection configuration, the pool, the idempotent schema
//! bootstrap and the [`repositories::NoteRepo`] data-access functions.

pub mod config;
pub mod models;
pub mod repositories;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, Connection, PgConnection};

pub use config::{DbConfig, DbConfigError};

pub type DbPool = sqlx::PgPool;

/// Maintenance database used when the target database has to be created.
const MAINTENANCE_DATABASE: &str = "postgres";

/// Schema for the `notes` table. Every statement is idempotent.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS notes (
    id          BIGSERIAL PRIMARY KEY,
    title       VARCHAR(255) NOT NULL,
    content     TEXT NOT NULL DEFAULT '',
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT ck_notes_title_not_blank CHECK (btrim(title) <> '')
);

CREATE INDEX IF NOT EXISTS idx_notes_updated_at ON notes (updated_at DESC);
"#;

/// Create a connection pool from the resolved configuration.
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(config.connect_options()?)
        .await
}

/// Verify the pool can reach the database.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Create the `notes` table and its index if they do not exist yet.
pub async fn ensure_schema(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}

/// Create the target database when it does not exist.
///
/// Only applies to configurations assembled from `DB_*` parts. An explicit
/// `DATABASE_URL` is assumed to point at an existing database (hosted
/// providers rarely grant `CREATEDB`).
pub async fn ensure_database(config: &DbConfig) -> Result<(), sqlx::Error> {
    if config.database_name().is_none() {
        return Ok(());
    }
    ensure_database_exists(&config.connect_options()?).await
}

/// Connect to the database named in `options`, creating it first if the
/// server reports it missing.
///
/// The maintenance database is only contacted on SQLSTATE `3D000`, so roles
/// without access to it still start when their database already exists.
pub async fn ensure_database_exists(options: &PgConnectOptions) -> Result<(), sqlx::Error> {
    let Some(database) = options.get_database().map(str::to_owned) else {
        return Ok(());
    };

    let options = options.clone().disable_statement_logging();
    match PgConnection::connect_with(&options).await {
        Ok(conn) => return conn.close().await,
        Err(err) if is_missing_database(&err) => {
            tracing::info!(database = %database, "Database does not exist, creating it");
        }
        Err(err) => return Err(err),
    }

    let mut conn =
        PgConnection::connect_with(&options.database(MAINTENANCE_DATABASE)).await?;

    // CREATE DATABASE does not accept bind parameters.
    let statement = format!("CREATE DATABASE {}", quote_identifier(&database));
    match sqlx::raw_sql(&statement).execute(&mut conn).await {
        Ok(_) => tracing::info!(database = %database, "Created database"),
        // Another process created it between the two connections.
        Err(err) if sqlstate(&err).as_deref() == Some("42P04") => {}
        Err(err) => return Err(err),
    }

    conn.close().await
}

/// SQLSTATE of a database error, if any.
fn sqlstate(err: &sqlx::Error) -> Option<String> {
    err.as_database_error()
        .and_then(|db_err| db_err.code())
        .map(|code| code.into_owned())
}

/// Whether the error is Postgres reporting an unknown database (`3D000`).
pub fn is_missing_database(err: &sqlx::Error) -> bool {
    sqlstate(err).as_deref() == Some("3D000")
}

/// Whether the error is Postgres rejecting the supplied credentials.
///
/// SQLSTATE `28P01` is `invalid_password`, `28000` is
/// `invalid_authorization_specification`.
pub fn is_auth_failure(err: &sqlx::Error) -> bool {
    matches!(sqlstate(err).as_deref(), Some("28P01") | Some("28000"))
}

/// Whether a startup failure should suggest setting `DB_PASSWORD`.
///
/// True for a credential rejection when the `DB_*` configuration carries no
/// (or an empty) password.
pub fn should_hint_password(config: &DbConfig, err: &sqlx::Error) -> bool {
    is_auth_failure(err) && !config.has_password()
}

/// Quote a Postgres identifier, doubling any embedded double quotes.
fn quote_identifier(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
