//! In-memory identity tables

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use supplier_core::domain::{IdentityUser, UserClaim};
use supplier_core::error::{DomainError, IdentityError};
use supplier_core::repositories::UserRepository;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct IdentityTables {
    users: HashMap<Uuid, IdentityUser>,
    claims: HashMap<Uuid, Vec<UserClaim>>,
    roles: HashMap<Uuid, Vec<String>>,
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    tables: RwLock<IdentityTables>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_normalized_email(&self, normalized_email: &str) -> Result<Option<IdentityUser>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.normalized_email == normalized_email)
            .cloned())
    }

    async fn create(&self, user: &IdentityUser) -> Result<IdentityUser, DomainError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.normalized_email == user.normalized_email)
        {
            return Err(DomainError::Identity(vec![IdentityError::duplicate_email(&user.email)]));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn record_access_failure(
        &self,
        user_id: &Uuid,
        max_failed_attempts: u32,
        now: DateTime<Utc>,
        lockout_until: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .users
            .get_mut(user_id)
            .is_some_and(|user| user.record_access_failure(max_failed_attempts, now, lockout_until)))
    }

    async fn reset_access_failures(&self, user_id: &Uuid) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if let Some(user) = tables.users.get_mut(user_id) {
            user.reset_access_failures();
        }
        Ok(())
    }

    async fn find_claims(&self, user_id: &Uuid) -> Result<Vec<UserClaim>, DomainError> {
        Ok(self
            .tables
            .read()
            .await
            .claims
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_claim(&self, user_id: &Uuid, claim: &UserClaim) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(user_id) {
            return Err(DomainError::ConstraintViolation(format!("unknown user {}", user_id)));
        }
        tables.claims.entry(*user_id).or_default().push(claim.clone());
        Ok(())
    }

    async fn find_roles(&self, user_id: &Uuid) -> Result<Vec<String>, DomainError> {
        let mut roles = self
            .tables
            .read()
            .await
            .roles
            .get(user_id)
            .cloned()
            .unwrap_or_default();
        roles.sort();
        Ok(roles)
    }

    async fn add_role(&self, user_id: &Uuid, role: &str) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(user_id) {
            return Err(DomainError::ConstraintViolation(format!("unknown user {}", user_id)));
        }
        let roles = tables.roles.entry(*user_id).or_default();
        if !roles.iter().any(|r| r == role) {
            roles.push(role.to_string());
        }
        Ok(())
    }
}
