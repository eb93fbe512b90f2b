//! In-memory supplier table

use std::collections::HashMap;

use async_trait::async_trait;
use supplier_core::domain::Supplier;
use supplier_core::error::DomainError;
use supplier_core::repositories::SupplierRepository;
use supplier_shared::constants::{SUPPLIER_DOCUMENT_MAX_LENGTH, SUPPLIER_NAME_MAX_LENGTH};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemorySupplierRepository {
    rows: RwLock<HashMap<Uuid, Supplier>>,
}

impl InMemorySupplierRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same column limits as `VARCHAR(200)` / `VARCHAR(14)` in the SQL schema.
    fn check_columns(supplier: &Supplier) -> Result<(), DomainError> {
        if supplier.name.chars().count() as u64 > SUPPLIER_NAME_MAX_LENGTH {
            return Err(DomainError::ConstraintViolation(
                "value too long for column name".to_string(),
            ));
        }
        if supplier.document.chars().count() as u64 > SUPPLIER_DOCUMENT_MAX_LENGTH {
            return Err(DomainError::ConstraintViolation(
                "value too long for column document".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SupplierRepository for InMemorySupplierRepository {
    async fn list(&self) -> Result<Vec<Supplier>, DomainError> {
        let rows = self.rows.read().await;
        let mut suppliers: Vec<Supplier> = rows.values().cloned().collect();
        suppliers.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(suppliers)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Supplier>, DomainError> {
        Ok(self.rows.read().await.get(id).cloned())
    }

    async fn create(&self, supplier: &Supplier) -> Result<u64, DomainError> {
        Self::check_columns(supplier)?;

        let mut rows = self.rows.write().await;
        if rows.contains_key(&supplier.id) {
            return Err(DomainError::ConstraintViolation(format!(
                "duplicate key value violates primary key: {}",
                supplier.id
            )));
        }
        rows.insert(supplier.id, supplier.clone());
        Ok(1)
    }

    async fn replace(&self, supplier: &Supplier) -> Result<u64, DomainError> {
        Self::check_columns(supplier)?;

        let mut rows = self.rows.write().await;
        match rows.get_mut(&supplier.id) {
            Some(row) => {
                *row = supplier.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: &Uuid) -> Result<u64, DomainError> {
        Ok(self.rows.write().await.remove(id).map_or(0, |_| 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supplier(name: &str) -> Supplier {
        Supplier {
            id: Uuid::new_v4(),
            name: name.to_string(),
            document: "12345678901234".to_string(),
            active: true,
        }
    }

    #[tokio::test]
    async fn test_crud_cycle() {
        let repo = InMemorySupplierRepository::new();
        let mut acme = supplier("Acme");

        assert_eq!(repo.create(&acme).await.unwrap(), 1);
        assert_eq!(repo.find_by_id(&acme.id).await.unwrap(), Some(acme.clone()));

        acme.name = "Acme Corp".to_string();
        assert_eq!(repo.replace(&acme).await.unwrap(), 1);
        assert_eq!(repo.find_by_id(&acme.id).await.unwrap().unwrap().name, "Acme Corp");

        assert_eq!(repo.delete(&acme.id).await.unwrap(), 1);
        assert_eq!(repo.find_by_id(&acme.id).await.unwrap(), None);
        assert_eq!(repo.delete(&acme.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_replace_missing_affects_nothing() {
        let repo = InMemorySupplierRepository::new();
        let ghost = supplier("Ghost");

        assert_eq!(repo.replace(&ghost).await.unwrap(), 0);
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_name() {
        let repo = InMemorySupplierRepository::new();
        for name in ["Zeta", "Acme", "Mercado"] {
            repo.create(&supplier(name)).await.unwrap();
        }

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Acme", "Mercado", "Zeta"]);
    }

    #[tokio::test]
    async fn test_column_limits() {
        let repo = InMemorySupplierRepository::new();
        let mut too_long = supplier("Acme");
        too_long.document = "123456789012345".to_string();

        assert!(matches!(
            repo.create(&too_long).await,
            Err(DomainError::ConstraintViolation(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_primary_key() {
        let repo = InMemorySupplierRepository::new();
        let acme = supplier("Acme");
        repo.create(&acme).await.unwrap();

        assert!(matches!(
            repo.create(&acme).await,
            Err(DomainError::ConstraintViolation(_))
        ));
    }
}
