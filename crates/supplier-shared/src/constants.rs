//! Application-wide constants

pub const SUPPLIER_ROUTE: &str = "/fornecedor";
pub const REGISTER_ROUTE: &str = "/registro";
pub const LOGIN_ROUTE: &str = "/login";

/// Claim required to delete a supplier.
pub const DELETE_SUPPLIER_CLAIM: &str = "ExcluirFornecedor";

pub const SUPPLIER_NAME_MAX_LENGTH: u64 = 200;
pub const SUPPLIER_DOCUMENT_MAX_LENGTH: u64 = 14;

pub const DEFAULT_TOKEN_EXPIRATION_HOURS: i64 = 2;
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_PASSWORD_LENGTH: u64 = 100;
pub const DEFAULT_MAX_FAILED_ACCESS_ATTEMPTS: u32 = 5;
pub const DEFAULT_LOCKOUT_MINUTES: i64 = 5;

pub const MAX_TOKEN_EXPIRATION_HOURS: i64 = 24 * 365;
pub const MAX_LOCKOUT_MINUTES: i64 = 60 * 24 * 365;
pub const MAX_FAILED_ACCESS_ATTEMPTS_LIMIT: u32 = 1000;
