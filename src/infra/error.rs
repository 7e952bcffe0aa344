//! Startup failures of the service binary.

use std::net::SocketAddr;

use sqlx::migrate::MigrateError;
use thiserror::Error;
use tracing_subscriber::util::TryInitError;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("database url is not configured (set `database.url` or CALTRADE__DATABASE__URL)")]
    MissingDatabaseUrl,
    #[error("failed to connect to the database: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("failed to apply migrations: {0}")]
    Migration(#[from] MigrateError),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("http server terminated: {0}")]
    Serve(#[source] std::io::Error),
    #[error("tracing subscriber already installed: {0}")]
    Subscriber(#[from] TryInitError),
}
