//! Ledger error types for payment validation and state errors.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during payment ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Payment amount must be positive.
    #[error("Payment amount must be positive")]
    NonPositiveAmount,

    /// Annulment motive is required.
    #[error("Annulment motive is required")]
    MotiveRequired,

    // ========== Lookup Errors ==========
    /// Payment not found.
    #[error("Payment not found: {0}")]
    PaymentNotFound(Uuid),

    /// Deposit not found.
    #[error("Deposit not found: {0}")]
    DepositNotFound(Uuid),

    /// Monthly installment not found.
    #[error("Installment not found: {0}")]
    InstallmentNotFound(Uuid),

    // ========== State Errors ==========
    /// Payment has already been annulled.
    #[error("Payment {0} is already annulled")]
    AlreadyAnnulled(Uuid),

    // ========== Concurrency Errors ==========
    /// Concurrent modification of a balance record detected.
    #[error("Concurrent modification detected for balance record {0}, please retry")]
    ConcurrentModification(Uuid),

    // ========== Database Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::MotiveRequired => "MOTIVE_REQUIRED",
            Self::PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
            Self::DepositNotFound(_) => "DEPOSIT_NOT_FOUND",
            Self::InstallmentNotFound(_) => "INSTALLMENT_NOT_FOUND",
            Self::AlreadyAnnulled(_) => "ALREADY_ANNULLED",
            Self::ConcurrentModification(_) => "CONCURRENT_MODIFICATION",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::NonPositiveAmount | Self::MotiveRequired => 400,

            // 404 Not Found
            Self::PaymentNotFound(_)
            | Self::DepositNotFound(_)
            | Self::InstallmentNotFound(_) => 404,

            // 409 Conflict - once-only and concurrency violations
            Self::AlreadyAnnulled(_) | Self::ConcurrentModification(_) => 409,

            // 500 Internal Server Error
            Self::Database(_) => 500,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::NonPositiveAmount.error_code(),
            "NON_POSITIVE_AMOUNT"
        );
        assert_eq!(
            LedgerError::AlreadyAnnulled(Uuid::nil()).error_code(),
            "ALREADY_ANNULLED"
        );
        assert_eq!(
            LedgerError::ConcurrentModification(Uuid::nil()).error_code(),
            "CONCURRENT_MODIFICATION"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(LedgerError::NonPositiveAmount.http_status_code(), 400);
        assert_eq!(LedgerError::MotiveRequired.http_status_code(), 400);
        assert_eq!(
            LedgerError::PaymentNotFound(Uuid::nil()).http_status_code(),
            404
        );
        assert_eq!(
            LedgerError::AlreadyAnnulled(Uuid::nil()).http_status_code(),
            409
        );
        assert_eq!(
            LedgerError::Database("test".to_string()).http_status_code(),
            500
        );
    }

    #[test]
    fn test_retryable_errors() {
        assert!(LedgerError::ConcurrentModification(Uuid::nil()).is_retryable());
        assert!(!LedgerError::NonPositiveAmount.is_retryable());
        assert!(!LedgerError::AlreadyAnnulled(Uuid::nil()).is_retryable());
    }
}
