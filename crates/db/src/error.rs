//! Errors raised while bringing up the database connection.

use thiserror::Error;

/// Any failure that leaves the service without a usable connection.
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("connection descriptor has no entity mappings")]
    NoEntities,

    #[error("failed to connect to {database} at {host}:{port}")]
    Connect {
        host: String,
        port: u16,
        database: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to synchronize schema for entity '{entity}'")]
    Synchronize {
        entity: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("database did not answer ping")]
    Ping(#[source] sqlx::Error),
}
