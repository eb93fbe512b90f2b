//! User repository trait (port)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::domain::{IdentityUser, UserClaim};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_normalized_email(&self, normalized_email: &str) -> Result<Option<IdentityUser>, DomainError>;
    /// Fails with `DomainError::Identity` carrying `DuplicateEmail` on a taken email.
    async fn create(&self, user: &IdentityUser) -> Result<IdentityUser, DomainError>;
    /// Counts one failed sign-in as a single atomic step on the stored row.
    /// Reaching `max_failed_attempts` sets `lockout_end = lockout_until` and
    /// clears the counter. A lockout still in force at `now` is left untouched.
    /// Returns `true` when the account is locked afterwards.
    async fn record_access_failure(
        &self,
        user_id: &Uuid,
        max_failed_attempts: u32,
        now: DateTime<Utc>,
        lockout_until: DateTime<Utc>,
    ) -> Result<bool, DomainError>;
    /// Clears `access_failed_count` and `lockout_end`.
    async fn reset_access_failures(&self, user_id: &Uuid) -> Result<(), DomainError>;
    async fn find_claims(&self, user_id: &Uuid) -> Result<Vec<UserClaim>, DomainError>;
    async fn add_claim(&self, user_id: &Uuid, claim: &UserClaim) -> Result<(), DomainError>;
    async fn find_roles(&self, user_id: &Uuid) -> Result<Vec<String>, DomainError>;
    async fn add_role(&self, user_id: &Uuid, role: &str) -> Result<(), DomainError>;
}
