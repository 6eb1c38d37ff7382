//! PostgreSQL connection bootstrap for the orders service.
//!
//! A [`ConnectionDescriptor`] collects the connection parameters and the
//! entity mappings; [`initialize`] turns it into a live [`Database`] or a
//! [`ConnectionError`]. Deciding what to do on failure is left to the caller.

mod connection;
mod descriptor;
mod entity;
mod error;

pub use connection::{initialize, Database};
pub use descriptor::{ConnectionDescriptor, DescriptorBuilder, EngineKind};
pub use entity::{ColumnDef, Entity, EntityMapping};
pub use error::ConnectionError;
