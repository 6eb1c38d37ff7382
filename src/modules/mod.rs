pub mod orders;

use orders_kernel::ModuleRegistry;

/// Register all service modules with the registry
pub fn register_all(registry: &mut ModuleRegistry) {
    registry.register(orders::create_module());
}

/// Registry holding every service module
pub fn registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    register_all(&mut registry);
    registry
}
