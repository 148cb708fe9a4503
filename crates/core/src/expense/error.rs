//! Expense error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during expense operations.
#[derive(Debug, Error)]
pub enum ExpenseError {
    // ========== Validation Errors ==========
    /// Service expenses must reference a service.
    #[error("Service expense requires a service reference")]
    ServiceRefRequired,

    /// Maintenance expenses must not reference a service.
    #[error("Maintenance expense cannot reference a service")]
    ServiceRefNotAllowed,

    /// Expense amount must be positive.
    #[error("Expense amount must be positive")]
    NonPositiveAmount,

    /// Expense concept is required.
    #[error("Expense concept is required")]
    ConceptRequired,

    /// Annulment motive is required.
    #[error("Annulment motive is required")]
    MotiveRequired,

    // ========== Lookup Errors ==========
    /// Expense not found.
    #[error("Expense not found: {0}")]
    ExpenseNotFound(Uuid),

    // ========== State Errors ==========
    /// Expense has already been annulled.
    #[error("Expense {0} is already annulled")]
    AlreadyAnnulled(Uuid),

    /// Annulled expenses cannot be modified.
    #[error("Expense {0} is annulled and cannot be modified")]
    CannotModifyAnnulled(Uuid),

    // ========== Database Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl ExpenseError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ServiceRefRequired => "SERVICE_REF_REQUIRED",
            Self::ServiceRefNotAllowed => "SERVICE_REF_NOT_ALLOWED",
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::ConceptRequired => "CONCEPT_REQUIRED",
            Self::MotiveRequired => "MOTIVE_REQUIRED",
            Self::ExpenseNotFound(_) => "EXPENSE_NOT_FOUND",
            Self::AlreadyAnnulled(_) => "ALREADY_ANNULLED",
            Self::CannotModifyAnnulled(_) => "CANNOT_MODIFY_ANNULLED",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::ServiceRefRequired
            | Self::ServiceRefNotAllowed
            | Self::NonPositiveAmount
            | Self::ConceptRequired
            | Self::MotiveRequired => 400,

            // 404 Not Found
            Self::ExpenseNotFound(_) => 404,

            // 409 Conflict - once-only violations
            Self::AlreadyAnnulled(_) | Self::CannotModifyAnnulled(_) => 409,

            // 500 Internal Server Error
            Self::Database(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ExpenseError::ServiceRefRequired.error_code(),
            "SERVICE_REF_REQUIRED"
        );
        assert_eq!(
            ExpenseError::AlreadyAnnulled(Uuid::nil()).error_code(),
            "ALREADY_ANNULLED"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(ExpenseError::ServiceRefRequired.http_status_code(), 400);
        assert_eq!(ExpenseError::ServiceRefNotAllowed.http_status_code(), 400);
        assert_eq!(
            ExpenseError::ExpenseNotFound(Uuid::nil()).http_status_code(),
            404
        );
        assert_eq!(
            ExpenseError::AlreadyAnnulled(Uuid::nil()).http_status_code(),
            409
        );
        assert_eq!(
            ExpenseError::Database("test".to_string()).http_status_code(),
            500
        );
    }
}
