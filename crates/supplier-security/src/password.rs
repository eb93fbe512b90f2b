//! Password hashing with Argon2 and password policy checks

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use supplier_shared::config::PasswordPolicySettings;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Hash error: {0}")]
    HashError(String),
}

pub struct PasswordService;

impl PasswordService {
    pub fn hash(password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| PasswordError::HashError(e.to_string()))
    }

    pub fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::HashError(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

/// A single password rule that a candidate failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    TooShort { required_length: usize },
    RequiresDigit,
    RequiresLowercase,
    RequiresUppercase,
    RequiresNonAlphanumeric,
}

impl PasswordRule {
    pub fn code(&self) -> &'static str {
        match self {
            PasswordRule::TooShort { .. } => "PasswordTooShort",
            PasswordRule::RequiresDigit => "PasswordRequiresDigit",
            PasswordRule::RequiresLowercase => "PasswordRequiresLower",
            PasswordRule::RequiresUppercase => "PasswordRequiresUpper",
            PasswordRule::RequiresNonAlphanumeric => "PasswordRequiresNonAlphanumeric",
        }
    }

    pub fn description(&self) -> String {
        match self {
            PasswordRule::TooShort { required_length } => {
                format!("Passwords must be at least {} characters.", required_length)
            }
            PasswordRule::RequiresDigit => {
                "Passwords must have at least one digit ('0'-'9').".to_string()
            }
            PasswordRule::RequiresLowercase => {
                "Passwords must have at least one lowercase ('a'-'z').".to_string()
            }
            PasswordRule::RequiresUppercase => {
                "Passwords must have at least one uppercase ('A'-'Z').".to_string()
            }
            PasswordRule::RequiresNonAlphanumeric => {
                "Passwords must have at least one non alphanumeric character.".to_string()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub required_length: usize,
    pub require_digit: bool,
    pub require_lowercase: bool,
    pub require_uppercase: bool,
    pub require_non_alphanumeric: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::from(&PasswordPolicySettings::default())
    }
}

impl From<&PasswordPolicySettings> for PasswordPolicy {
    fn from(settings: &PasswordPolicySettings) -> Self {
        Self {
            required_length: settings.required_length,
            require_digit: settings.require_digit,
            require_lowercase: settings.require_lowercase,
            require_uppercase: settings.require_uppercase,
            require_non_alphanumeric: settings.require_non_alphanumeric,
        }
    }
}

impl PasswordPolicy {
    /// Returns every rule the password breaks; empty means accepted.
    pub fn check(&self, password: &str) -> Vec<PasswordRule> {
        let mut broken = Vec::new();

        if password.chars().count() < self.required_length {
            broken.push(PasswordRule::TooShort { required_length: self.required_length });
        }
        if self.require_non_alphanumeric && password.chars().all(|c| c.is_ascii_alphanumeric()) {
            broken.push(PasswordRule::RequiresNonAlphanumeric);
        }
        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            broken.push(PasswordRule::RequiresDigit);
        }
        if self.require_lowercase && !password.chars().any(|c| c.is_ascii_lowercase()) {
            broken.push(PasswordRule::RequiresLowercase);
        }
        if self.require_uppercase && !password.chars().any(|c| c.is_ascii_uppercase()) {
            broken.push(PasswordRule::RequiresUppercase);
        }

        broken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = PasswordService::hash("Teste@123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(PasswordService::verify("Teste@123", &hash).unwrap());
        assert!(!PasswordService::verify("Teste@124", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(PasswordService::verify("Teste@123", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_policy_accepts_strong_password() {
        assert!(PasswordPolicy::default().check("Teste@123").is_empty());
    }

    #[test]
    fn test_policy_reports_every_broken_rule() {
        let broken = PasswordPolicy::default().check("abc");
        assert_eq!(
            broken,
            vec![
                PasswordRule::TooShort { required_length: 6 },
                PasswordRule::RequiresNonAlphanumeric,
                PasswordRule::RequiresDigit,
                PasswordRule::RequiresUppercase,
            ]
        );
        assert_eq!(broken[0].code(), "PasswordTooShort");
    }

    #[test]
    fn test_relaxed_policy() {
        let policy = PasswordPolicy {
            required_length: 4,
            require_digit: false,
            require_lowercase: false,
            require_uppercase: false,
            require_non_alphanumeric: false,
        };
        assert!(policy.check("abcd").is_empty());
        assert_eq!(policy.check("abc").len(), 1);
    }
}
