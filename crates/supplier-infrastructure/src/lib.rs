//! # Supplier Infrastructure
//! 
//! Storage adapters for the repository ports: PostgreSQL and in-memory.

pub mod database;
pub mod memory;

pub use database::{create_pool, run_migrations, PgSupplierRepository, PgUserRepository};
pub use memory::{InMemorySupplierRepository, InMemoryUserRepository};
