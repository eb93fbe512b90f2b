//! In-memory adapters, used for tests and `database.backend = "memory"`

pub mod supplier_store;
pub mod user_store;

pub use supplier_store::InMemorySupplierRepository;
pub use user_store::InMemoryUserRepository;
