// ============================================================================
// Supplier Core - Authentication Service
// File: crates/supplier-core/src/services/auth_service.rs
// ============================================================================
//! Registration, lockout-aware login and token issuance

use std::sync::Arc;
use chrono::{Duration, Utc};
use tokio::sync::OnceCell;
use tracing::{error, info, warn};
use uuid::Uuid;

use supplier_security::{JwtService, PasswordPolicy, PasswordService};
use supplier_shared::config::LockoutSettings;
use supplier_shared::utils::{mask_email, normalize_email};

use crate::domain::{IdentityUser, UserClaim};
use crate::error::{DomainError, IdentityError};
use crate::repositories::UserRepository;

/// Authentication service for handling user login/register flows
#[derive(Clone)]
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    jwt: Arc<JwtService>,
    password_policy: PasswordPolicy,
    lockout: LockoutSettings,
    /// Hash checked against on unknown emails, so both paths cost one argon2 run.
    dummy_hash: Arc<OnceCell<String>>,
}

const DUMMY_PASSWORD: &str = "Dummy@Password#1";

impl AuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        jwt: Arc<JwtService>,
        password_policy: PasswordPolicy,
        lockout: LockoutSettings,
    ) -> Self {
        Self {
            user_repo,
            jwt,
            password_policy,
            lockout,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Register a new account (email pre-confirmed) and sign it in
    pub async fn register(&self, email: &str, password: &str) -> Result<AuthToken, DomainError> {
        info!("Registration attempt for email: {}", mask_email(email));

        let mut errors = Vec::new();

        // 1. Email uniqueness
        let normalized = normalize_email(email);
        if self.user_repo.find_by_normalized_email(&normalized).await?.is_some() {
            warn!("Registration failed: email already exists: {}", mask_email(email));
            errors.push(IdentityError::duplicate_email(email.trim()));
        }

        // 2. Password policy
        errors.extend(
            self.password_policy
                .check(password)
                .into_iter()
                .map(|rule| IdentityError::new(rule.code(), rule.description())),
        );

        if !errors.is_empty() {
            return Err(DomainError::Identity(errors));
        }

        // 3. Hash and store
        let password_hash = hash_password(password).await?;
        let user = IdentityUser::new(email, password_hash, self.lockout.enabled);
        let created = self.user_repo.create(&user).await?;

        info!("Registration successful for: {}", mask_email(email));
        self.build_token(&created).await
    }

    /// Login with email and password
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthToken, DomainError> {
        info!("Login attempt for email: {}", mask_email(email));

        // 1. Find user by email
        let Some(mut user) = self
            .user_repo
            .find_by_normalized_email(&normalize_email(email))
            .await?
        else {
            self.verify_dummy(password).await;
            warn!("Login failed: email not found: {}", mask_email(email));
            return Err(DomainError::InvalidCredentials);
        };

        // 2. Locked accounts are refused before the password is checked
        let now = Utc::now();
        if user.is_locked_out(now) {
            warn!("Login refused: user is locked out: {}", mask_email(email));
            return Err(DomainError::LockedOut);
        }

        // 3. Verify password; the counter is bumped atomically in storage
        if !verify_password(password, &user.password_hash).await? {
            let lockout_until = Duration::try_minutes(self.lockout.duration_minutes)
                .and_then(|duration| now.checked_add_signed(duration))
                .ok_or_else(|| DomainError::InternalError("lockout duration out of range".to_string()))?;
            let locked = self
                .user_repo
                .record_access_failure(
                    &user.id,
                    self.lockout.max_failed_attempts,
                    now,
                    lockout_until,
                )
                .await?;

            if locked {
                warn!("Login failed: user locked out after repeated failures: {}", mask_email(email));
                return Err(DomainError::LockedOut);
            }
            warn!("Login failed: invalid password for: {}", mask_email(email));
            return Err(DomainError::InvalidCredentials);
        }

        // 4. Clear failure counters
        if user.reset_access_failures() {
            if let Err(e) = self.user_repo.reset_access_failures(&user.id).await {
                error!("Failed to reset access failures: {}", e);
                // Don't fail login for this
            }
        }

        info!("Login successful for: {}", mask_email(email));
        self.build_token(&user).await
    }

    /// Attach a custom claim to an existing account
    pub async fn grant_claim(
        &self,
        email: &str,
        claim_type: &str,
        claim_value: &str,
    ) -> Result<(), DomainError> {
        let user = self.require_user(email).await?;

        let existing = self.user_repo.find_claims(&user.id).await?;
        let claim = UserClaim::new(claim_type, claim_value);
        if existing.contains(&claim) {
            info!("Claim {} already granted to {}", claim_type, mask_email(email));
            return Ok(());
        }

        self.user_repo.add_claim(&user.id, &claim).await?;
        info!("Claim {} granted to {}", claim_type, mask_email(email));
        Ok(())
    }

    pub async fn assign_role(&self, email: &str, role: &str) -> Result<(), DomainError> {
        let user = self.require_user(email).await?;

        if self.user_repo.find_roles(&user.id).await?.iter().any(|r| r == role) {
            return Ok(());
        }

        self.user_repo.add_role(&user.id, role).await?;
        info!("Role {} assigned to {}", role, mask_email(email));
        Ok(())
    }

    async fn verify_dummy(&self, password: &str) {
        match self
            .dummy_hash
            .get_or_try_init(|| hash_password(DUMMY_PASSWORD))
            .await
        {
            Ok(hash) => {
                let _ = verify_password(password, hash).await;
            }
            Err(e) => error!("Failed to prepare dummy hash: {}", e),
        }
    }

    async fn require_user(&self, email: &str) -> Result<IdentityUser, DomainError> {
        self.user_repo
            .find_by_normalized_email(&normalize_email(email))
            .await?
            .ok_or_else(|| DomainError::UserNotFound(email.to_string()))
    }

    /// Signs a token carrying the account's roles and custom claims
    async fn build_token(&self, user: &IdentityUser) -> Result<AuthToken, DomainError> {
        let claims = self.user_repo.find_claims(&user.id).await?;
        let roles = self.user_repo.find_roles(&user.id).await?;

        let pairs: Vec<(String, String)> = claims
            .iter()
            .map(|c| (c.claim_type.clone(), c.claim_value.clone()))
            .collect();

        let issued = self
            .jwt
            .issue(&user.id, &user.email, &roles, &pairs)
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;

        Ok(AuthToken {
            access_token: issued.access_token,
            expires_in: issued.expires_in,
            user_id: user.id,
            email: user.email.clone(),
            roles,
            claims,
        })
    }
}

async fn hash_password(password: &str) -> Result<String, DomainError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || PasswordService::hash(&password))
        .await
        .map_err(|e| DomainError::InternalError(e.to_string()))?
        .map_err(|e| DomainError::PasswordHashError(e.to_string()))
}

async fn verify_password(password: &str, hash: &str) -> Result<bool, DomainError> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || PasswordService::verify(&password, &hash))
        .await
        .map_err(|e| DomainError::InternalError(e.to_string()))?
        .map_err(|e| DomainError::PasswordHashError(e.to_string()))
}

/// Result of a successful registration or login
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub access_token: String,
    pub expires_in: i64,
    pub user_id: Uuid,
    pub email: String,
    pub roles: Vec<String>,
    pub claims: Vec<UserClaim>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockUserRepository;
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;
    use supplier_shared::config::JwtSettings;

    const PASSWORD: &str = "Teste@123";

    fn jwt() -> Arc<JwtService> {
        Arc::new(JwtService::new(&JwtSettings {
            secret: "0123456789abcdef0123456789abcdef".to_string(),
            expiration_hours: 1,
            issuer: "supplier-server".to_string(),
            audience: "https://localhost".to_string(),
        }))
    }

    fn service(repo: MockUserRepository) -> AuthService {
        AuthService::new(
            Arc::new(repo),
            jwt(),
            PasswordPolicy::default(),
            LockoutSettings {
                enabled: true,
                max_failed_attempts: 3,
                duration_minutes: 5,
            },
        )
    }

    fn stored_user(email: &str) -> IdentityUser {
        IdentityUser::new(email, PasswordService::hash(PASSWORD).unwrap(), true)
    }

    #[tokio::test]
    async fn test_register_issues_token() {
        let email: String = SafeEmail().fake();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_normalized_email().returning(|_| Ok(None));
        repo.expect_create()
            .withf(|u| u.email_confirmed && u.password_hash.starts_with("$argon2"))
            .times(1)
            .returning(|u| Ok(u.clone()));
        repo.expect_find_claims().returning(|_| Ok(vec![]));
        repo.expect_find_roles().returning(|_| Ok(vec![]));

        let token = service(repo).register(&email, PASSWORD).await.unwrap();
        assert_eq!(token.email, email);
        assert_eq!(token.expires_in, 3600);
        assert!(!token.access_token.is_empty());
    }

    #[tokio::test]
    async fn test_register_rejects_weak_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_normalized_email().returning(|_| Ok(None));
        repo.expect_create().never();

        let result = service(repo).register("a@b.com", "abc").await;
        match result {
            Err(DomainError::Identity(errors)) => {
                assert!(errors.iter().any(|e| e.code == "PasswordTooShort"));
            }
            other => panic!("expected identity errors, got {:?}", other.map(|t| t.email)),
        }
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_normalized_email()
            .withf(|normalized| normalized.to_string() == "A@B.COM")
            .returning(|_| Ok(Some(stored_user("a@b.com"))));
        repo.expect_create().never();

        let result = service(repo).register("A@b.com", PASSWORD).await;
        match result {
            Err(DomainError::Identity(errors)) => {
                assert_eq!(errors, vec![IdentityError::duplicate_email("A@b.com")]);
            }
            other => panic!("expected identity errors, got {:?}", other.map(|t| t.email)),
        }
    }

    #[tokio::test]
    async fn test_login_success_embeds_claims() {
        let user = stored_user("a@b.com");
        let mut repo = MockUserRepository::new();
        let found = user.clone();
        repo.expect_find_by_normalized_email().returning(move |_| Ok(Some(found.clone())));
        repo.expect_record_access_failure().never();
        repo.expect_reset_access_failures().never();
        repo.expect_find_claims()
            .returning(|_| Ok(vec![UserClaim::new("ExcluirFornecedor", "true")]));
        repo.expect_find_roles().returning(|_| Ok(vec!["Admin".to_string()]));

        let token = service(repo).login("a@b.com", PASSWORD).await.unwrap();
        assert_eq!(token.user_id, user.id);

        let claims = jwt().validate_token(&token.access_token).unwrap();
        assert!(claims.has_claim("ExcluirFornecedor"));
        assert_eq!(claims.role, vec!["Admin".to_string()]);
    }

    #[tokio::test]
    async fn test_login_unknown_email_still_runs_argon2() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_normalized_email().returning(|_| Ok(None));
        repo.expect_record_access_failure().never();

        let service = service(repo);
        assert!(!service.dummy_hash.initialized());

        let result = service.login("nobody@b.com", PASSWORD).await;
        assert!(matches!(result, Err(DomainError::InvalidCredentials)));
        assert!(service
            .dummy_hash
            .get()
            .is_some_and(|hash| hash.starts_with("$argon2")));
    }

    #[tokio::test]
    async fn test_login_wrong_password_counts_failure() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_normalized_email()
            .returning(|_| Ok(Some(stored_user("a@b.com"))));
        repo.expect_record_access_failure()
            .withf(|_, max, now, until| *max == 3 && *until - *now == Duration::minutes(5))
            .times(1)
            .returning(|_, _, _, _| Ok(false));

        let result = service(repo).login("a@b.com", "Wrong@123").await;
        assert!(matches!(result, Err(DomainError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_final_failure_locks_out() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_normalized_email().returning(|_| {
            let mut user = stored_user("a@b.com");
            user.access_failed_count = 2;
            Ok(Some(user))
        });
        repo.expect_record_access_failure()
            .times(1)
            .returning(|_, _, _, _| Ok(true));

        let result = service(repo).login("a@b.com", "Wrong@123").await;
        assert!(matches!(result, Err(DomainError::LockedOut)));
    }

    #[tokio::test]
    async fn test_login_success_clears_failures() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_normalized_email().returning(|_| {
            let mut user = stored_user("a@b.com");
            user.access_failed_count = 2;
            Ok(Some(user))
        });
        repo.expect_reset_access_failures().times(1).returning(|_| Ok(()));
        repo.expect_find_claims().returning(|_| Ok(vec![]));
        repo.expect_find_roles().returning(|_| Ok(vec![]));

        assert!(service(repo).login("a@b.com", PASSWORD).await.is_ok());
    }

    #[tokio::test]
    async fn test_locked_out_user_refused_even_with_right_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_normalized_email().returning(|_| {
            let mut user = stored_user("a@b.com");
            user.lockout_end = Some(Utc::now() + Duration::minutes(5));
            Ok(Some(user))
        });
        repo.expect_find_claims().never();

        let result = service(repo).login("a@b.com", PASSWORD).await;
        assert!(matches!(result, Err(DomainError::LockedOut)));
    }

    #[tokio::test]
    async fn test_grant_claim_is_idempotent() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_normalized_email()
            .returning(|_| Ok(Some(stored_user("a@b.com"))));
        repo.expect_find_claims()
            .returning(|_| Ok(vec![UserClaim::new("ExcluirFornecedor", "true")]));
        repo.expect_add_claim().never();

        assert!(service(repo)
            .grant_claim("a@b.com", "ExcluirFornecedor", "true")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_grant_claim_unknown_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_normalized_email().returning(|_| Ok(None));

        let result = service(repo).grant_claim("x@b.com", "ExcluirFornecedor", "true").await;
        assert!(matches!(result, Err(DomainError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_assign_role() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_normalized_email()
            .returning(|_| Ok(Some(stored_user("a@b.com"))));
        repo.expect_find_roles().returning(|_| Ok(vec![]));
        repo.expect_add_role()
            .withf(|_, role| role.to_string() == "Admin")
            .times(1)
            .returning(|_, _| Ok(()));

        assert!(service(repo).assign_role("a@b.com", "Admin").await.is_ok());
    }
}
