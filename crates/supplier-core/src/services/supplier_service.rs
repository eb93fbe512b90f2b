// ============================================================================
// Supplier Core - Supplier Service
// File: crates/supplier-core/src/services/supplier_service.rs
// ============================================================================
//! Supplier CRUD on top of the persistence gateway

use std::sync::Arc;
use tracing::{info, warn};
use supplier_shared::new_id;
use uuid::Uuid;

use crate::domain::{Supplier, SupplierDraft};
use crate::error::DomainError;
use crate::repositories::SupplierRepository;

#[derive(Clone)]
pub struct SupplierService {
    repo: Arc<dyn SupplierRepository>,
}

impl SupplierService {
    pub fn new(repo: Arc<dyn SupplierRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Supplier>, DomainError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Supplier, DomainError> {
        self.repo
            .find_by_id(&id)
            .await?
            .ok_or(DomainError::SupplierNotFound(id))
    }

    /// Validate, assign a fresh id, insert.
    pub async fn create(&self, draft: SupplierDraft) -> Result<Supplier, DomainError> {
        let supplier = draft.into_supplier(new_id())?;

        let affected = self.repo.create(&supplier).await?;
        if affected == 0 {
            warn!("Insert of supplier {} affected no rows", supplier.id);
            return Err(DomainError::NotPersisted);
        }

        info!("Supplier created: {}", supplier.id);
        Ok(supplier)
    }

    /// Full replace. The row must already exist; a missing row is never upserted.
    pub async fn replace(&self, id: Uuid, draft: SupplierDraft) -> Result<Supplier, DomainError> {
        if self.repo.find_by_id(&id).await?.is_none() {
            return Err(DomainError::SupplierNotFound(id));
        }

        if let Some(body_id) = draft.id {
            if body_id != id {
                return Err(DomainError::IdMismatch { path: id, body: body_id });
            }
        }

        let supplier = draft.into_supplier(id)?;

        let affected = self.repo.replace(&supplier).await?;
        if affected == 0 {
            warn!("Supplier {} vanished between lookup and update", id);
            return Err(DomainError::ConcurrentModification(id));
        }

        info!("Supplier replaced: {}", id);
        Ok(supplier)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        if self.repo.find_by_id(&id).await?.is_none() {
            return Err(DomainError::SupplierNotFound(id));
        }

        let affected = self.repo.delete(&id).await?;
        if affected == 0 {
            warn!("Supplier {} vanished between lookup and delete", id);
            return Err(DomainError::ConcurrentModification(id));
        }

        info!("Supplier deleted: {}", id);
        Ok(())
    }
}
