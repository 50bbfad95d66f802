//! Unified error handling for repository operations.
//!
//! Store failures are surfaced unchanged in meaning: constraint violations
//! and rejected writes become `StoreConflict`, everything else the database
//! reports is carried as `Database`.

use domain::DomainError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("Store rejected the change: {0}")]
    StoreConflict(String),

    // Query errors
    #[error("Invalid predicate: {0}")]
    InvalidPredicate(String),

    // Lifecycle
    #[error("Persistence context has been released")]
    ResourceDisposed,

    // Validation
    #[error("{0}")]
    Validation(String),

    // External service errors
    #[error("Database error")]
    Database(#[source] DbErr),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound => "NOT_FOUND",
            AppError::StoreConflict(_) => "STORE_CONFLICT",
            AppError::InvalidPredicate(_) => "INVALID_PREDICATE",
            AppError::ResourceDisposed => "RESOURCE_DISPOSED",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::Validation(msg) => msg.clone(),
            AppError::InvalidPredicate(msg) => format!("Invalid predicate: {}", msg),

            // Hide details for internal errors
            AppError::StoreConflict(msg) => {
                tracing::error!("Store conflict: {}", msg);
                "The store rejected the change".to_string()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }
}

// =============================================================================
// Database Error Conversion
// =============================================================================

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        if let DbErr::RecordNotUpdated = err {
            return AppError::StoreConflict("no record matched the update".to_string());
        }

        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                AppError::StoreConflict(format!("unique constraint violated: {}", msg))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                AppError::StoreConflict(format!("foreign key constraint violated: {}", msg))
            }
            _ => AppError::Database(err),
        }
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn store_conflict(msg: impl Into<String>) -> Self {
        AppError::StoreConflict(msg.into())
    }

    pub fn invalid_predicate(msg: impl Into<String>) -> Self {
        AppError::InvalidPredicate(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
