//! Supplier repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::Supplier;
use crate::error::DomainError;

/// Persistence gateway for suppliers. Write operations return the number of
/// rows affected; each call commits on its own.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SupplierRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Supplier>, DomainError>;
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Supplier>, DomainError>;
    async fn create(&self, supplier: &Supplier) -> Result<u64, DomainError>;
    async fn replace(&self, supplier: &Supplier) -> Result<u64, DomainError>;
    async fn delete(&self, id: &Uuid) -> Result<u64, DomainError>;
}
