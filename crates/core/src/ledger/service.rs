//! Ledger service for payment precondition checks.
//!
//! All checks run before any mutation: a failure here means nothing gets
//! persisted (fail-closed).

use super::error::LedgerError;
use super::types::{AnnulPaymentInput, ApplyPaymentInput, PaymentState};
use rust_decimal::Decimal;

/// Stateless service validating payment ledger operations.
///
/// This service contains pure business rules with no database dependencies.
/// The repositories call it inside the database transaction, before writing.
pub struct LedgerService;

impl LedgerService {
    /// Validates a payment application.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NonPositiveAmount` if the amount is zero or
    /// negative.
    pub fn validate_apply(input: &ApplyPaymentInput) -> Result<(), LedgerError> {
        if input.amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount);
        }
        Ok(())
    }

    /// Validates a payment annulment against the payment's current state.
    ///
    /// # Errors
    ///
    /// * `LedgerError::MotiveRequired` if the motive is blank
    /// * `LedgerError::AlreadyAnnulled` if the payment is not Active
    pub fn validate_annulment(
        current_state: PaymentState,
        input: &AnnulPaymentInput,
    ) -> Result<(), LedgerError> {
        if input.motive.trim().is_empty() {
            return Err(LedgerError::MotiveRequired);
        }

        match current_state {
            PaymentState::Active => Ok(()),
            PaymentState::Annulled => Err(LedgerError::AlreadyAnnulled(input.payment_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::PaymentTarget;
    use chrono::NaiveDate;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn apply_input(amount: Decimal) -> ApplyPaymentInput {
        ApplyPaymentInput {
            target: PaymentTarget::Deposit(Uuid::new_v4()),
            amount,
            payment_date: NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
            method: None,
            account: None,
            bank: None,
            reference: None,
            description: None,
        }
    }

    fn annul_input(motive: &str) -> AnnulPaymentInput {
        AnnulPaymentInput {
            payment_id: Uuid::new_v4(),
            motive: motive.to_string(),
            description: "entered against the wrong installment".to_string(),
            actor_user_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_validate_apply_positive_amount() {
        assert!(LedgerService::validate_apply(&apply_input(dec!(200000))).is_ok());
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-1))]
    #[case(dec!(-200000))]
    fn test_validate_apply_rejects_non_positive(#[case] amount: Decimal) {
        assert!(matches!(
            LedgerService::validate_apply(&apply_input(amount)),
            Err(LedgerError::NonPositiveAmount)
        ));
    }

    #[test]
    fn test_validate_annulment_active_payment() {
        let input = annul_input("duplicate entry");
        assert!(LedgerService::validate_annulment(PaymentState::Active, &input).is_ok());
    }

    #[test]
    fn test_validate_annulment_rejects_annulled_payment() {
        let input = annul_input("duplicate entry");
        let result = LedgerService::validate_annulment(PaymentState::Annulled, &input);
        assert!(matches!(result, Err(LedgerError::AlreadyAnnulled(id)) if id == input.payment_id));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn test_validate_annulment_requires_motive(#[case] motive: &str) {
        let input = annul_input(motive);
        assert!(matches!(
            LedgerService::validate_annulment(PaymentState::Active, &input),
            Err(LedgerError::MotiveRequired)
        ));
    }
}
