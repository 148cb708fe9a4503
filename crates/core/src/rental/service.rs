//! Rental lifecycle service: validates and executes state transitions.
//!
//! The repositories call these checks inside the database transaction that
//! persists the transition, so a failed precondition leaves every row
//! untouched.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::ledger::balance::DepositBalance;
use crate::ledger::types::InstallmentState;
use crate::rental::error::RentalError;
use crate::rental::types::{
    CancellationAction, CancellationRequest, DepositSettlement, FinalizeAction, RentalState,
};

/// Stateless service for rental state transitions.
pub struct RentalLifecycleService;

impl RentalLifecycleService {
    /// Validates a cancellation of an active rental.
    ///
    /// Preconditions:
    /// - the rental is Active (a rental cannot be cancelled twice)
    /// - the rental owns a deposit
    /// - the motive is present
    /// - `returned + penalty <= deposit.current_balance`
    ///
    /// The balance ceiling is enforced here, server-side, not left to the
    /// calling client.
    ///
    /// # Errors
    ///
    /// Returns `RentalError` if any precondition fails.
    pub fn cancel(
        rental_id: Uuid,
        current_state: RentalState,
        deposit: Option<DepositBalance>,
        request: &CancellationRequest,
    ) -> Result<CancellationAction, RentalError> {
        if request.motive.trim().is_empty() {
            return Err(RentalError::MotiveRequired);
        }

        if current_state != RentalState::Active {
            return Err(RentalError::NotActive {
                state: current_state,
            });
        }

        let deposit = deposit.ok_or(RentalError::MissingDeposit(rental_id))?;
        Self::validate_settlement(&request.settlement, deposit)?;

        Ok(CancellationAction {
            new_state: RentalState::Cancelled,
            cancelled_at: Utc::now(),
        })
    }

    /// Validates a finalization of an active rental.
    ///
    /// Preconditions:
    /// - the rental is Active
    /// - every installment is settled (Paid, or the Reversed terminal state
    ///   the gate recognizes)
    /// - the settlement fits within the deposit balance
    ///
    /// # Errors
    ///
    /// Returns `RentalError::PendingInstallments` when any installment is
    /// still open, or another `RentalError` for the remaining preconditions.
    pub fn finalize(
        rental_id: Uuid,
        current_state: RentalState,
        installment_states: &[InstallmentState],
        deposit: Option<DepositBalance>,
        settlement: &DepositSettlement,
    ) -> Result<FinalizeAction, RentalError> {
        if current_state != RentalState::Active {
            return Err(RentalError::NotActive {
                state: current_state,
            });
        }

        let pending = installment_states
            .iter()
            .filter(|s| !s.is_settled())
            .count();
        if pending > 0 {
            return Err(RentalError::PendingInstallments { pending });
        }

        let deposit = deposit.ok_or(RentalError::MissingDeposit(rental_id))?;
        Self::validate_settlement(settlement, deposit)?;

        Ok(FinalizeAction {
            new_state: RentalState::Finished,
            finalized_at: Utc::now(),
        })
    }

    /// Checks settlement amounts against the deposit balance.
    fn validate_settlement(
        settlement: &DepositSettlement,
        deposit: DepositBalance,
    ) -> Result<(), RentalError> {
        if settlement.returned_amount < Decimal::ZERO || settlement.penalty_amount < Decimal::ZERO
        {
            return Err(RentalError::NegativeSettlementAmount);
        }

        if !deposit.covers(settlement.returned_amount, settlement.penalty_amount) {
            return Err(RentalError::SettlementExceedsBalance {
                requested: settlement.returned_amount + settlement.penalty_amount,
                available: deposit.current_balance,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn settlement(returned: Decimal, penalty: Decimal) -> DepositSettlement {
        DepositSettlement {
            returned_amount: returned,
            penalty_amount: penalty,
            return_description: Some("deposit returned".to_string()),
            penalty_description: None,
            return_date: NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
        }
    }

    fn cancellation(returned: Decimal, penalty: Decimal) -> CancellationRequest {
        CancellationRequest {
            motive: "tenant moved out early".to_string(),
            return_motive: None,
            penalty_motive: None,
            settlement: settlement(returned, penalty),
        }
    }

    fn deposit(balance: Decimal) -> Option<DepositBalance> {
        Some(DepositBalance {
            total: dec!(500000),
            current_balance: balance,
        })
    }

    #[test]
    fn test_cancel_active_rental() {
        let result = RentalLifecycleService::cancel(
            Uuid::new_v4(),
            RentalState::Active,
            deposit(dec!(500000)),
            &cancellation(dec!(300000), dec!(200000)),
        );

        let action = result.unwrap();
        assert_eq!(action.new_state, RentalState::Cancelled);
    }

    #[rstest]
    #[case(RentalState::Cancelled)]
    #[case(RentalState::Finished)]
    fn test_cancel_rejects_terminal_states(#[case] state: RentalState) {
        let result = RentalLifecycleService::cancel(
            Uuid::new_v4(),
            state,
            deposit(dec!(500000)),
            &cancellation(dec!(0), dec!(0)),
        );
        assert!(matches!(result, Err(RentalError::NotActive { state: s }) if s == state));
    }

    #[test]
    fn test_cancel_requires_motive() {
        let mut request = cancellation(dec!(0), dec!(0));
        request.motive = "  ".to_string();

        let result = RentalLifecycleService::cancel(
            Uuid::new_v4(),
            RentalState::Active,
            deposit(dec!(500000)),
            &request,
        );
        assert!(matches!(result, Err(RentalError::MotiveRequired)));
    }

    #[test]
    fn test_cancel_requires_deposit() {
        let rental_id = Uuid::new_v4();
        let result = RentalLifecycleService::cancel(
            rental_id,
            RentalState::Active,
            None,
            &cancellation(dec!(0), dec!(0)),
        );
        assert!(matches!(result, Err(RentalError::MissingDeposit(id)) if id == rental_id));
    }

    #[test]
    fn test_cancel_enforces_balance_ceiling() {
        let result = RentalLifecycleService::cancel(
            Uuid::new_v4(),
            RentalState::Active,
            deposit(dec!(400000)),
            &cancellation(dec!(300000), dec!(200000)),
        );

        assert!(matches!(
            result,
            Err(RentalError::SettlementExceedsBalance {
                requested,
                available,
            }) if requested == dec!(500000) && available == dec!(400000)
        ));
    }

    #[test]
    fn test_cancel_allows_settlement_equal_to_balance() {
        let result = RentalLifecycleService::cancel(
            Uuid::new_v4(),
            RentalState::Active,
            deposit(dec!(500000)),
            &cancellation(dec!(400000), dec!(100000)),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_cancel_rejects_negative_settlement() {
        let result = RentalLifecycleService::cancel(
            Uuid::new_v4(),
            RentalState::Active,
            deposit(dec!(500000)),
            &cancellation(dec!(-1), dec!(0)),
        );
        assert!(matches!(result, Err(RentalError::NegativeSettlementAmount)));
    }

    #[test]
    fn test_finalize_all_installments_paid() {
        let states = vec![InstallmentState::Paid; 6];
        let result = RentalLifecycleService::finalize(
            Uuid::new_v4(),
            RentalState::Active,
            &states,
            deposit(dec!(500000)),
            &settlement(dec!(500000), dec!(0)),
        );

        let action = result.unwrap();
        assert_eq!(action.new_state, RentalState::Finished);
    }

    #[test]
    fn test_finalize_accepts_reversed_installments() {
        // The gate recognizes the Reversed terminal state even though no
        // operation produces it.
        let states = [
            InstallmentState::Paid,
            InstallmentState::Reversed,
            InstallmentState::Paid,
        ];
        let result = RentalLifecycleService::finalize(
            Uuid::new_v4(),
            RentalState::Active,
            &states,
            deposit(dec!(500000)),
            &settlement(dec!(0), dec!(0)),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_finalize_rejects_pending_installments() {
        let states = [
            InstallmentState::Paid,
            InstallmentState::Pending,
            InstallmentState::Pending,
        ];
        let result = RentalLifecycleService::finalize(
            Uuid::new_v4(),
            RentalState::Active,
            &states,
            deposit(dec!(500000)),
            &settlement(dec!(0), dec!(0)),
        );
        assert!(matches!(
            result,
            Err(RentalError::PendingInstallments { pending: 2 })
        ));
    }

    #[test]
    fn test_finalize_with_no_installments() {
        let result = RentalLifecycleService::finalize(
            Uuid::new_v4(),
            RentalState::Active,
            &[],
            deposit(dec!(500000)),
            &settlement(dec!(0), dec!(0)),
        );
        assert!(result.is_ok());
    }

    #[rstest]
    #[case(RentalState::Cancelled)]
    #[case(RentalState::Finished)]
    fn test_finalize_rejects_terminal_states(#[case] state: RentalState) {
        let result = RentalLifecycleService::finalize(
            Uuid::new_v4(),
            state,
            &[InstallmentState::Paid],
            deposit(dec!(500000)),
            &settlement(dec!(0), dec!(0)),
        );
        assert!(matches!(result, Err(RentalError::NotActive { .. })));
    }

    #[test]
    fn test_finalize_enforces_balance_ceiling() {
        let result = RentalLifecycleService::finalize(
            Uuid::new_v4(),
            RentalState::Active,
            &[InstallmentState::Paid],
            deposit(dec!(100000)),
            &settlement(dec!(100000), dec!(1)),
        );
        assert!(matches!(
            result,
            Err(RentalError::SettlementExceedsBalance { .. })
        ));
    }
}
