//! PostgreSQL pool setup and schema bootstrap.

use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use tracing::debug;

use crate::config::DatabaseConfig;

const SCHEMA: [&str; 2] = [
    r"
    CREATE TABLE IF NOT EXISTS todos (
        id BIGSERIAL PRIMARY KEY,
        title TEXT NOT NULL CHECK (title <> ''),
        description TEXT NOT NULL DEFAULT '',
        completed BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_todos_created_at ON todos (created_at DESC)",
];

/// Connection options built from the individual config fields.
pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, sqlx::Error> {
    let port = config
        .port()
        .map_err(|e| sqlx::Error::Configuration(e.into()))?;
    let mut options = PgConnectOptions::new()
        .host(&config.host)
        .port(port)
        .username(&config.user)
        .database(&config.dbname)
        .ssl_mode(PgSslMode::from_str(&config.sslmode)?);
    if !config.password.is_empty() {
        options = options.password(&config.password);
    }
    Ok(options)
}

/// Open a pool and make sure at least one connection works.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let options = connect_options(config)?;
    debug!(
        host = %config.host,
        dbname = %config.dbname,
        max_connections = config.max_connections,
        "connecting to postgres"
    );
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
}

/// Create the `todos` table and its index if they don't exist yet.
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
