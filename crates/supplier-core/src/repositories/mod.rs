//! Repository traits (ports)

pub mod supplier_repository;
pub mod user_repository;

pub use supplier_repository::SupplierRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use supplier_repository::MockSupplierRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
