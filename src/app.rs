//! Startup context owning the database connection and the modules using it.

use std::future::Future;

use anyhow::Context;
use orders_db::Database;
use orders_kernel::{InitCtx, ModuleRegistry, Settings};

/// A bootstrapped service: settings, live database connection, and modules.
///
/// Components get database access through [`App::db`] or the [`InitCtx`]
/// handed to modules; there is no global handle.
pub struct App {
    settings: Settings,
    db: Database,
    registry: ModuleRegistry,
}

impl App {
    /// Connect to the database with every registered entity mapping, then
    /// initialize and start the modules.
    pub async fn bootstrap(settings: Settings, registry: ModuleRegistry) -> anyhow::Result<Self> {
        settings.validate().context("invalid settings")?;

        let descriptor = settings
            .database
            .descriptor_builder()
            .mappings(registry.collect_entities())
            .build()
            .context("invalid connection descriptor")?;

        let db = orders_db::initialize(descriptor)
            .await
            .context("error during database initialization")?;

        tracing::info!(
            host = %db.descriptor().host(),
            port = db.descriptor().port(),
            database = %db.descriptor().database(),
            entities = ?db.descriptor().entity_names(),
            modules = registry.module_count(),
            "connected to PostgreSQL for orders service"
        );

        let app = Self {
            settings,
            db,
            registry,
        };

        if let Err(err) = app.start_modules().await {
            app.db.close().await;
            return Err(err);
        }

        Ok(app)
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Context passed to module lifecycle hooks.
    fn ctx(&self) -> InitCtx<'_> {
        InitCtx {
            settings: &self.settings,
            db: &self.db,
        }
    }

    /// Keep running until `shutdown` resolves, then shut down cleanly.
    pub async fn run_until<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        tracing::info!("orders service running");
        shutdown.await;
        tracing::info!("shutdown requested");
        self.shutdown().await
    }

    /// Stop modules in reverse order and close the database connection.
    pub async fn shutdown(self) -> anyhow::Result<()> {
        let stopped = self.registry.stop_modules().await;
        self.db.close().await;
        stopped
    }

    async fn start_modules(&self) -> anyhow::Result<()> {
        let ctx = self.ctx();
        self.registry.init_modules(&ctx).await?;
        self.registry.start_modules(&ctx).await
    }
}
