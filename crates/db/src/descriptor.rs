//! Connection descriptor: everything needed to open the database connection.

use std::fmt;
use std::time::Duration;

use sqlx::postgres::PgConnectOptions;

use crate::entity::{Entity, EntityMapping};
use crate::error::ConnectionError;

const DEFAULT_PORT: u16 = 5432;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Database engine the descriptor targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineKind {
    #[default]
    Postgres,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Postgres => f.write_str("postgres"),
        }
    }
}

/// Immutable connection parameters plus the registered entity mappings.
///
/// Built once through [`DescriptorBuilder`]; there are no setters.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    engine: EngineKind,
    host: String,
    port: u16,
    username: String,
    password: String,
    database: String,
    entities: Vec<EntityMapping>,
    synchronize: bool,
    max_connections: u32,
    acquire_timeout: Duration,
}

impl ConnectionDescriptor {
    pub fn builder() -> DescriptorBuilder {
        DescriptorBuilder::default()
    }

    pub fn engine(&self) -> EngineKind {
        self.engine
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn entities(&self) -> &[EntityMapping] {
        &self.entities
    }

    pub fn entity_names(&self) -> Vec<&'static str> {
        self.entities.iter().map(|entity| entity.name).collect()
    }

    pub fn synchronize(&self) -> bool {
        self.synchronize
    }

    pub fn max_connections(&self) -> u32 {
        self.max_connections
    }

    pub fn acquire_timeout(&self) -> Duration {
        self.acquire_timeout
    }

    /// Driver-level options derived from the descriptor.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.database)
    }

    /// Schema statements the bootstrapper will run after connecting.
    ///
    /// Always empty unless auto-synchronize is enabled.
    pub fn schema_statements(&self) -> Vec<String> {
        if !self.synchronize {
            return Vec::new();
        }

        self.entities
            .iter()
            .map(EntityMapping::create_table_sql)
            .collect()
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("engine", &self.engine)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("entities", &self.entity_names())
            .field("synchronize", &self.synchronize)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

/// Builder for [`ConnectionDescriptor`].
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    host: String,
    port: u16,
    username: String,
    password: String,
    database: String,
    entities: Vec<EntityMapping>,
    synchronize: bool,
    max_connections: u32,
    acquire_timeout: Duration,
}

impl Default for DescriptorBuilder {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            username: "postgres".to_string(),
            password: String::new(),
            database: "postgres".to_string(),
            entities: Vec::new(),
            synchronize: false,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }
}

impl DescriptorBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Register the mapping of an [`Entity`] type.
    pub fn entity<E: Entity>(self) -> Self {
        self.mapping(E::mapping())
    }

    /// Register a mapping; a second mapping with the same name is ignored.
    pub fn mapping(mut self, mapping: EntityMapping) -> Self {
        if self.entities.iter().any(|existing| existing.name == mapping.name) {
            tracing::debug!(entity = mapping.name, "entity mapping already registered");
        } else {
            self.entities.push(mapping);
        }
        self
    }

    pub fn mappings(self, mappings: impl IntoIterator<Item = EntityMapping>) -> Self {
        mappings
            .into_iter()
            .fold(self, |builder, mapping| builder.mapping(mapping))
    }

    pub fn synchronize(mut self, synchronize: bool) -> Self {
        self.synchronize = synchronize;
        self
    }

    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn acquire_timeout(mut self, acquire_timeout: Duration) -> Self {
        self.acquire_timeout = acquire_timeout;
        self
    }

    pub fn build(self) -> Result<ConnectionDescriptor, ConnectionError> {
        if self.entities.is_empty() {
            return Err(ConnectionError::NoEntities);
        }

        Ok(ConnectionDescriptor {
            engine: EngineKind::Postgres,
            host: self.host,
            port: self.port,
            username: self.username,
            password: self.password,
            database: self.database,
            entities: self.entities,
            synchronize: self.synchronize,
            max_connections: self.max_connections,
            acquire_timeout: self.acquire_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ColumnDef;

    struct Order;

    impl Entity for Order {
        fn mapping() -> EntityMapping {
            EntityMapping::new(
                "Order",
                "orders",
                vec![
                    ColumnDef::new("id", "UUID").primary_key(),
                    ColumnDef::new("status", "TEXT"),
                ],
            )
        }
    }

    fn orders_descriptor(synchronize: bool) -> ConnectionDescriptor {
        ConnectionDescriptor::builder()
            .host("postgres")
            .port(5432)
            .username("myuser")
            .password("mypassword")
            .database("orders_db")
            .entity::<Order>()
            .synchronize(synchronize)
            .build()
            .unwrap()
    }

    #[test]
    fn build_requires_entities() {
        let result = ConnectionDescriptor::builder().database("orders_db").build();
        assert!(matches!(result, Err(ConnectionError::NoEntities)));
    }

    #[test]
    fn identical_parameters_yield_equal_descriptors() {
        assert_eq!(orders_descriptor(false), orders_descriptor(false));
        assert_ne!(orders_descriptor(false), orders_descriptor(true));
    }

    #[test]
    fn descriptor_exposes_parameters() {
        let descriptor = orders_descriptor(false);
        assert_eq!(descriptor.engine(), EngineKind::Postgres);
        assert_eq!(descriptor.host(), "postgres");
        assert_eq!(descriptor.port(), 5432);
        assert_eq!(descriptor.username(), "myuser");
        assert_eq!(descriptor.database(), "orders_db");
        assert_eq!(descriptor.entity_names(), vec!["Order"]);
        assert_eq!(descriptor.max_connections(), DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn duplicate_entities_are_registered_once() {
        let descriptor = ConnectionDescriptor::builder()
            .entity::<Order>()
            .entity::<Order>()
            .build()
            .unwrap();
        assert_eq!(descriptor.entities().len(), 1);
    }

    #[test]
    fn no_schema_statements_without_synchronize() {
        let descriptor = ConnectionDescriptor::builder()
            .entity::<Order>()
            .mapping(EntityMapping::new(
                "Audit",
                "audit_log",
                vec![ColumnDef::new("id", "BIGINT").primary_key()],
            ))
            .build()
            .unwrap();
        assert!(descriptor.schema_statements().is_empty());
    }

    #[test]
    fn synchronize_emits_one_statement_per_entity() {
        let statements = orders_descriptor(true).schema_statements();
        assert_eq!(
            statements,
            vec!["CREATE TABLE IF NOT EXISTS orders (id UUID PRIMARY KEY, status TEXT NOT NULL)"]
        );
    }

    #[test]
    fn debug_output_redacts_password() {
        let rendered = format!("{:?}", orders_descriptor(false));
        assert!(!rendered.contains("mypassword"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn engine_kind_displays_lowercase() {
        assert_eq!(EngineKind::Postgres.to_string(), "postgres");
    }
}
