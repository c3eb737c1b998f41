pub mod config;
pub mod records;
pub mod schema;

pub use config::Config;
pub use records::*;
pub use schema::{TableSchema, SCHEMA};
