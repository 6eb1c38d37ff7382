pub mod models;

use async_trait::async_trait;
use orders_db::{Entity, EntityMapping};
use orders_kernel::{InitCtx, Module};

/// Orders module: owns the `Order` entity mapping
pub struct OrdersModule;

impl OrdersModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for OrdersModule {
    fn name(&self) -> &'static str {
        "orders"
    }

    fn entities(&self) -> Vec<EntityMapping> {
        vec![models::Order::mapping()]
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            database = %ctx.db.descriptor().database(),
            "orders module initialized"
        );
        Ok(())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "orders module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "orders module stopped");
        Ok(())
    }
}

/// Create a new instance of the orders module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(OrdersModule::new())
}
