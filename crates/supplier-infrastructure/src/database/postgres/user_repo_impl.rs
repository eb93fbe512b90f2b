// ============================================================================
// Supplier Infrastructure - PostgreSQL User Repository
// File: crates/supplier-infrastructure/src/database/postgres/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use supplier_core::domain::{IdentityUser, UserClaim};
use supplier_core::error::{DomainError, IdentityError};
use supplier_core::repositories::UserRepository;

use super::map_db_error;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row types for SQLx mapping
#[derive(Debug, FromRow)]
struct IdentityUserRow {
    pub id: Uuid,
    pub email: String,
    pub normalized_email: String,
    pub password_hash: String,
    pub email_confirmed: bool,
    pub lockout_enabled: bool,
    pub access_failed_count: i32,
    pub lockout_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<IdentityUserRow> for IdentityUser {
    fn from(row: IdentityUserRow) -> Self {
        IdentityUser {
            id: row.id,
            email: row.email,
            normalized_email: row.normalized_email,
            password_hash: row.password_hash,
            email_confirmed: row.email_confirmed,
            lockout_enabled: row.lockout_enabled,
            access_failed_count: row.access_failed_count,
            lockout_end: row.lockout_end,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct UserClaimRow {
    pub claim_type: String,
    pub claim_value: String,
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_normalized_email(&self, normalized_email: &str) -> Result<Option<IdentityUser>, DomainError> {
        let row: Option<IdentityUserRow> = sqlx::query_as(
            r#"
            SELECT
                id, email, normalized_email, password_hash,
                email_confirmed, lockout_enabled, access_failed_count,
                lockout_end, created_at
            FROM identity_users
            WHERE normalized_email = $1
            "#
        )
        .bind(normalized_email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("finding user by email", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn create(&self, user: &IdentityUser) -> Result<IdentityUser, DomainError> {
        info!("Creating identity user: {}", user.id);

        let row: IdentityUserRow = sqlx::query_as(
            r#"
            INSERT INTO identity_users (
                id, email, normalized_email, password_hash,
                email_confirmed, lockout_enabled, access_failed_count,
                lockout_end, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING
                id, email, normalized_email, password_hash,
                email_confirmed, lockout_enabled, access_failed_count,
                lockout_end, created_at
            "#
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.normalized_email)
        .bind(&user.password_hash)
        .bind(user.email_confirmed)
        .bind(user.lockout_enabled)
        .bind(user.access_failed_count)
        .bind(user.lockout_end)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
                error!("Duplicate email on insert: {}", user.id);
                DomainError::Identity(vec![IdentityError::duplicate_email(&user.email)])
            } else {
                map_db_error("creating user", e)
            }
        })?;

        Ok(row.into())
    }

    async fn record_access_failure(
        &self,
        user_id: &Uuid,
        max_failed_attempts: u32,
        now: DateTime<Utc>,
        lockout_until: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        // One statement, so concurrent failures serialize on the row lock.
        let lockout_end: Option<Option<DateTime<Utc>>> = sqlx::query_scalar(
            r#"
            UPDATE identity_users
            SET
                access_failed_count = CASE
                    WHEN lockout_end > $3 THEN access_failed_count
                    WHEN access_failed_count + 1 >= $2 THEN 0
                    ELSE access_failed_count + 1
                END,
                lockout_end = CASE
                    WHEN lockout_end > $3 THEN lockout_end
                    WHEN access_failed_count + 1 >= $2 THEN $4
                    ELSE lockout_end
                END
            WHERE id = $1 AND lockout_enabled
            RETURNING lockout_end
            "#
        )
        .bind(user_id)
        .bind(i64::from(max_failed_attempts))
        .bind(now)
        .bind(lockout_until)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("recording access failure", e))?;

        Ok(matches!(lockout_end, Some(Some(end)) if end > now))
    }

    async fn reset_access_failures(&self, user_id: &Uuid) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE identity_users
            SET
                access_failed_count = 0,
                lockout_end = NULL
            WHERE id = $1
            "#
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("resetting access failures", e))?;

        Ok(())
    }

    async fn find_claims(&self, user_id: &Uuid) -> Result<Vec<UserClaim>, DomainError> {
        let rows: Vec<UserClaimRow> = sqlx::query_as(
            r#"
            SELECT claim_type, claim_value
            FROM identity_user_claims
            WHERE user_id = $1
            ORDER BY id
            "#
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("finding user claims", e))?;

        Ok(rows
            .into_iter()
            .map(|r| UserClaim::new(r.claim_type, r.claim_value))
            .collect())
    }

    async fn add_claim(&self, user_id: &Uuid, claim: &UserClaim) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO identity_user_claims (user_id, claim_type, claim_value)
            VALUES ($1, $2, $3)
            "#
        )
        .bind(user_id)
        .bind(&claim.claim_type)
        .bind(&claim.claim_value)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("adding user claim", e))?;

        Ok(())
    }

    async fn find_roles(&self, user_id: &Uuid) -> Result<Vec<String>, DomainError> {
        sqlx::query_scalar::<_, String>(
            "SELECT role FROM identity_user_roles WHERE user_id = $1 ORDER BY role"
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("finding user roles", e))
    }

    async fn add_role(&self, user_id: &Uuid, role: &str) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO identity_user_roles (user_id, role)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#
        )
        .bind(user_id)
        .bind(role)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("adding user role", e))?;

        Ok(())
    }
}
