//! # Supplier Core - Domain Module
//! 
//! Domain entities for the supplier registry.

pub mod supplier;
pub mod identity_user;

// Re-export all entities
pub use supplier::{Supplier, SupplierDraft};
pub use identity_user::{IdentityUser, UserClaim};
