use std::sync::Arc;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::descriptor::ConnectionDescriptor;
use crate::error::ConnectionError;

/// Live connection handle shared by everything that needs database access.
///
/// Cloning is cheap; clones share the same pool.
#[derive(Clone, Debug)]
pub struct Database {
    pool: PgPool,
    descriptor: Arc<ConnectionDescriptor>,
}

impl Database {
    /// Wrap a pool that connects on first use instead of during construction.
    ///
    /// Intended for tests that need a `Database` value without a running
    /// server; the service itself always goes through [`initialize`].
    /// Must be called from within a Tokio runtime.
    pub fn lazy(descriptor: ConnectionDescriptor) -> Self {
        let pool = pool_options(&descriptor).connect_lazy_with(descriptor.connect_options());
        Self {
            pool,
            descriptor: Arc::new(descriptor),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn descriptor(&self) -> &ConnectionDescriptor {
        &self.descriptor
    }

    /// Round trip to the server.
    pub async fn ping(&self) -> Result<(), ConnectionError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(ConnectionError::Ping)
    }

    /// Close every pooled connection and wait for them to shut down.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!(
            target: "orders-db",
            database = %self.descriptor.database(),
            "database connection closed"
        );
    }

    async fn synchronize_schema(&self) -> Result<(), ConnectionError> {
        let statements = self.descriptor.schema_statements();

        for (entity, statement) in self.descriptor.entities().iter().zip(statements) {
            tracing::warn!(
                target: "orders-db",
                entity = entity.name,
                table = entity.table,
                "auto-synchronizing entity schema"
            );

            sqlx::query(&statement)
                .execute(&self.pool)
                .await
                .map_err(|source| ConnectionError::Synchronize {
                    entity: entity.name,
                    source,
                })?;
        }

        Ok(())
    }
}

/// Open the connection described by `descriptor`.
///
/// At least one connection is established before this returns, so an
/// unreachable server or rejected credentials surface here. When the
/// descriptor enables auto-synchronize, the mapped tables are created
/// afterwards; otherwise the schema is never touched.
pub async fn initialize(descriptor: ConnectionDescriptor) -> Result<Database, ConnectionError> {
    tracing::debug!(
        target: "orders-db",
        engine = %descriptor.engine(),
        host = %descriptor.host(),
        port = descriptor.port(),
        database = %descriptor.database(),
        "opening database connection"
    );

    let pool = pool_options(&descriptor)
        .connect_with(descriptor.connect_options())
        .await
        .map_err(|source| ConnectionError::Connect {
            host: descriptor.host().to_string(),
            port: descriptor.port(),
            database: descriptor.database().to_string(),
            source,
        })?;

    let database = Database {
        pool,
        descriptor: Arc::new(descriptor),
    };

    if let Err(err) = database.synchronize_schema().await {
        database.pool.close().await;
        return Err(err);
    }

    tracing::debug!(
        target: "orders-db",
        entities = ?database.descriptor.entity_names(),
        synchronize = database.descriptor.synchronize(),
        "database connection established"
    );

    Ok(database)
}

fn pool_options(descriptor: &ConnectionDescriptor) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(descriptor.max_connections())
        .acquire_timeout(descriptor.acquire_timeout())
}
