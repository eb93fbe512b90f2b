// ============================================================================
// Supplier Infrastructure - PostgreSQL Supplier Repository
// File: crates/supplier-infrastructure/src/database/postgres/supplier_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use supplier_core::domain::Supplier;
use supplier_core::error::DomainError;
use supplier_core::repositories::SupplierRepository;

use super::map_db_error;

pub struct PgSupplierRepository {
    pool: PgPool,
}

impl PgSupplierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct SupplierRow {
    pub id: Uuid,
    pub name: String,
    pub document: String,
    pub active: bool,
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        Supplier {
            id: row.id,
            name: row.name,
            document: row.document,
            active: row.active,
        }
    }
}

#[async_trait]
impl SupplierRepository for PgSupplierRepository {
    async fn list(&self) -> Result<Vec<Supplier>, DomainError> {
        let rows: Vec<SupplierRow> = sqlx::query_as(
            r#"
            SELECT id, name, document, active
            FROM fornecedores
            ORDER BY name, id
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("listing suppliers", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Supplier>, DomainError> {
        let row: Option<SupplierRow> = sqlx::query_as(
            r#"
            SELECT id, name, document, active
            FROM fornecedores
            WHERE id = $1
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("finding supplier by id", e))?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, supplier: &Supplier) -> Result<u64, DomainError> {
        info!("Inserting supplier: {}", supplier.id);

        let result = sqlx::query(
            r#"
            INSERT INTO fornecedores (id, name, document, active)
            VALUES ($1, $2, $3, $4)
            "#
        )
        .bind(supplier.id)
        .bind(&supplier.name)
        .bind(&supplier.document)
        .bind(supplier.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("creating supplier", e))?;

        Ok(result.rows_affected())
    }

    async fn replace(&self, supplier: &Supplier) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE fornecedores
            SET
                name = $2,
                document = $3,
                active = $4
            WHERE id = $1
            "#
        )
        .bind(supplier.id)
        .bind(&supplier.name)
        .bind(&supplier.document)
        .bind(supplier.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("replacing supplier", e))?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: &Uuid) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM fornecedores WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("deleting supplier", e))?;

        Ok(result.rows_affected())
    }
}
