//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error taxonomy.
///
/// Every error in the core is recoverable at the boundary; nothing here is
/// fatal at the process level. Validation errors carry the complete list of
/// violations so callers can render all of them at once.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed input, policy violation, or precondition not met.
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Credential mismatch.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Actor lacks the required role or permission.
    #[error("Access denied: {0}")]
    Security(String),

    /// Referenced account, permission, or request does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate pending request, duplicate assignment, or other uniqueness
    /// violation surfaced by the storage boundary.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Storage collaborator failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal error (programming or storage-boundary bug).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Builds a `Validation` error carrying a single violation.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Authentication(_) => 401,
            Self::Security(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Storage(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Authentication(_) => "AUTHENTICATION_ERROR",
            Self::Security(_) => "SECURITY_ERROR",
            Self::NotFound(_) => "ENTITY_NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the violation list for validation errors, empty otherwise.
    #[must_use]
    pub fn violations(&self) -> &[String] {
        match self {
            Self::Validation(violations) => violations,
            _ => &[],
        }
    }
}
