//! # Supplier Security
//! 
//! Security utilities: JWT issuance/validation, password hashing and policy.

pub mod jwt;
pub mod password;

pub use jwt::{Claims, IssuedToken, JwtError, JwtService};
pub use password::{PasswordError, PasswordPolicy, PasswordRule, PasswordService};
