//! Domain services (business logic)

pub mod auth_service;
pub mod supplier_service;

pub use auth_service::{AuthService, AuthToken};
pub use supplier_service::SupplierService;
