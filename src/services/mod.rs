//! Services Layer
//!
//! Pure business logic without the HTTP layer. Handlers call into these
//! modules; the modules only see the database connection and the external
//! service clients they need.

pub mod change_request_service;
pub mod moderation_service;
pub mod notification_service;
pub mod product_service;
pub mod store_service;

use std::fmt;

/// Error type for service operations.
///
/// Validation and not-found errors surface directly to the caller;
/// `External` covers screener/mailer failures that are not swallowed.
#[derive(Debug)]
pub enum ServiceError {
    Database(String),
    NotFound,
    /// A change request was already approved or rejected.
    InvalidState(String),
    /// An unrecognized change_type value.
    InvalidChangeType(String),
    /// product_id absent where the change_type requires one.
    MissingTarget,
    Validation(String),
    External(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Database(msg) => write!(f, "Database error: {}", msg),
            ServiceError::NotFound => write!(f, "Resource not found"),
            ServiceError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            ServiceError::InvalidChangeType(t) => write!(f, "Invalid change type: {}", t),
            ServiceError::MissingTarget => write!(f, "Change request has no target product"),
            ServiceError::Validation(msg) => write!(f, "Validation error: {}", msg),
            ServiceError::External(msg) => write!(f, "External service error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        ServiceError::Database(e.to_string())
    }
}
