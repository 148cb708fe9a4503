//! Rental lifecycle error types.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use super::types::RentalState;

/// Errors that can occur during rental lifecycle transitions.
#[derive(Debug, Error)]
pub enum RentalError {
    // ========== Validation Errors ==========
    /// Cancellation motive is required.
    #[error("Cancellation motive is required")]
    MotiveRequired,

    /// Settlement amounts cannot be negative.
    #[error("Settlement amounts cannot be negative")]
    NegativeSettlementAmount,

    /// Settlement exceeds the deposit's current balance.
    #[error("Settlement of {requested} exceeds deposit balance {available}")]
    SettlementExceedsBalance {
        /// Returned amount plus penalty amount.
        requested: Decimal,
        /// The deposit's current balance.
        available: Decimal,
    },

    /// Rental has no deposit to settle.
    #[error("Rental {0} has no deposit")]
    MissingDeposit(Uuid),

    /// Not every installment is settled.
    #[error("Pending payments exist: {pending} installment(s) not settled")]
    PendingInstallments {
        /// Number of installments still open.
        pending: usize,
    },

    // ========== Lookup Errors ==========
    /// Rental not found.
    #[error("Rental not found: {0}")]
    RentalNotFound(Uuid),

    // ========== State Errors ==========
    /// Rental is not in the Active state.
    #[error("Rental is {state}, only active rentals can change state")]
    NotActive {
        /// The rental's current state.
        state: RentalState,
    },

    // ========== Concurrency Errors ==========
    /// Concurrent modification detected.
    #[error("Concurrent modification detected for rental {0}, please retry")]
    ConcurrentModification(Uuid),

    // ========== Database Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl RentalError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MotiveRequired => "MOTIVE_REQUIRED",
            Self::NegativeSettlementAmount => "NEGATIVE_SETTLEMENT_AMOUNT",
            Self::SettlementExceedsBalance { .. } => "SETTLEMENT_EXCEEDS_BALANCE",
            Self::MissingDeposit(_) => "MISSING_DEPOSIT",
            Self::PendingInstallments { .. } => "PENDING_INSTALLMENTS",
            Self::RentalNotFound(_) => "RENTAL_NOT_FOUND",
            Self::NotActive { .. } => "RENTAL_NOT_ACTIVE",
            Self::ConcurrentModification(_) => "CONCURRENT_MODIFICATION",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::MotiveRequired
            | Self::NegativeSettlementAmount
            | Self::SettlementExceedsBalance { .. }
            | Self::MissingDeposit(_)
            | Self::PendingInstallments { .. } => 400,

            // 404 Not Found
            Self::RentalNotFound(_) => 404,

            // 409 Conflict - duplicate transition or racing writers
            Self::NotActive { .. } | Self::ConcurrentModification(_) => 409,

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
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(RentalError::MotiveRequired.error_code(), "MOTIVE_REQUIRED");
        assert_eq!(
            RentalError::PendingInstallments { pending: 2 }.error_code(),
            "PENDING_INSTALLMENTS"
        );
        assert_eq!(
            RentalError::NotActive {
                state: RentalState::Cancelled
            }
            .error_code(),
            "RENTAL_NOT_ACTIVE"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(
            RentalError::SettlementExceedsBalance {
                requested: dec!(100),
                available: dec!(50),
            }
            .http_status_code(),
            400
        );
        assert_eq!(
            RentalError::RentalNotFound(Uuid::nil()).http_status_code(),
            404
        );
        assert_eq!(
            RentalError::NotActive {
                state: RentalState::Finished
            }
            .http_status_code(),
            409
        );
        assert_eq!(
            RentalError::Database("test".to_string()).http_status_code(),
            500
        );
    }

    #[test]
    fn test_error_display() {
        let err = RentalError::PendingInstallments { pending: 3 };
        assert_eq!(
            err.to_string(),
            "Pending payments exist: 3 installment(s) not settled"
        );

        let err = RentalError::NotActive {
            state: RentalState::Cancelled,
        };
        assert_eq!(
            err.to_string(),
            "Rental is cancelled, only active rentals can change state"
        );
    }
}
