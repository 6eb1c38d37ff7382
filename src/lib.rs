//! Orders service library
//!
//! Service modules and the startup context that owns the database connection.

pub mod app;
pub mod modules;

pub use app::App;
