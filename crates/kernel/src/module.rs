use async_trait::async_trait;
use orders_db::{Database, EntityMapping};

/// Context provided to modules during initialization
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
    pub db: &'a Database,
}

/// Core module trait that all service modules must implement
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module
    fn name(&self) -> &'static str;

    /// Entity mappings this module persists
    /// Registered with the connection descriptor before the database is initialized
    fn entities(&self) -> Vec<EntityMapping> {
        vec![]
    }

    /// Initialize the module with the provided context
    /// Called once the database connection is live
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Start background tasks for this module
    /// Called after every module is initialized
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Stop the module and clean up resources
    /// Called during application shutdown
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
