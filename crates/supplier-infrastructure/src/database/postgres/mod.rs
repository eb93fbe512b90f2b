//! PostgreSQL repository implementations

pub mod supplier_repo_impl;
pub mod user_repo_impl;

pub use supplier_repo_impl::PgSupplierRepository;
pub use user_repo_impl::PgUserRepository;

/// Maps a sqlx error to the domain, keeping constraint failures distinct.
pub(crate) fn map_db_error(context: &str, e: sqlx::Error) -> supplier_core::DomainError {
    use supplier_core::DomainError;

    tracing::error!("Database error {}: {}", context, e);
    match e.as_database_error() {
        Some(db_err)
            if db_err.is_unique_violation()
                || db_err.is_check_violation()
                || db_err.is_foreign_key_violation() =>
        {
            DomainError::ConstraintViolation(db_err.message().to_string())
        }
        // 22001: string_data_right_truncation, 23502: not_null_violation
        Some(db_err) if matches!(db_err.code().as_deref(), Some("22001") | Some("23502")) => {
            DomainError::ConstraintViolation(db_err.message().to_string())
        }
        _ => DomainError::DatabaseError(e.to_string()),
    }
}
