//! Database schema, models and queries

pub mod init;
pub mod maintenance;
pub mod models;
pub mod queries;
pub mod seed;

pub use init::*;
pub use models::*;
