//! Identity user entity (account, lockout state, claims)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use supplier_shared::new_id;
use supplier_shared::utils::normalize_email;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaim {
    pub claim_type: String,
    pub claim_value: String,
}

impl UserClaim {
    pub fn new(claim_type: impl Into<String>, claim_value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            claim_value: claim_value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityUser {
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

impl IdentityUser {
    /// New account with the email already confirmed.
    pub fn new(email: &str, password_hash: String, lockout_enabled: bool) -> Self {
        let email = email.trim().to_string();
        Self {
            id: new_id(),
            normalized_email: normalize_email(&email),
            email,
            password_hash,
            email_confirmed: true,
            lockout_enabled,
            access_failed_count: 0,
            lockout_end: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_locked_out(&self, now: DateTime<Utc>) -> bool {
        self.lockout_enabled && self.lockout_end.is_some_and(|end| end > now)
    }

    /// Counts one failed sign-in. Returns `true` when the account is locked
    /// afterwards, either by this failure or by an earlier one still in force.
    pub fn record_access_failure(
        &mut self,
        max_failed_attempts: u32,
        now: DateTime<Utc>,
        lockout_until: DateTime<Utc>,
    ) -> bool {
        if !self.lockout_enabled {
            return false;
        }
        if self.is_locked_out(now) {
            return true;
        }

        self.access_failed_count = self.access_failed_count.saturating_add(1);
        if i64::from(self.access_failed_count) >= i64::from(max_failed_attempts) {
            self.lockout_end = Some(lockout_until);
            self.access_failed_count = 0;
            return true;
        }
        false
    }

    /// Returns `true` when there was something to reset.
    pub fn reset_access_failures(&mut self) -> bool {
        let dirty = self.access_failed_count != 0 || self.lockout_end.is_some();
        self.access_failed_count = 0;
        self.lockout_end = None;
        dirty
    }
}
