//! Expense service for creation, update, and annulment rules.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::ExpenseError;
use super::types::{AnnulExpenseInput, ExpenseKind, ExpenseState, NewExpense};

/// Stateless service validating expense operations.
pub struct ExpenseService;

impl ExpenseService {
    /// Validates a new expense.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseError` when the concept is blank, the amount is not
    /// positive, or the kind/service pairing is violated.
    pub fn validate_new(input: &NewExpense) -> Result<(), ExpenseError> {
        if input.concept.trim().is_empty() {
            return Err(ExpenseError::ConceptRequired);
        }
        if input.amount <= Decimal::ZERO {
            return Err(ExpenseError::NonPositiveAmount);
        }
        Self::validate_kind_pairing(input.kind, input.service_id)
    }

    /// Validates an update against the expense's current state and the
    /// effective (post-update) field values.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseError::CannotModifyAnnulled` for annulled expenses,
    /// or a validation error for the effective values.
    pub fn validate_update(
        expense_id: Uuid,
        current_state: ExpenseState,
        effective_kind: ExpenseKind,
        effective_service_id: Option<Uuid>,
        effective_concept: &str,
        effective_amount: Decimal,
    ) -> Result<(), ExpenseError> {
        if current_state == ExpenseState::Annulled {
            return Err(ExpenseError::CannotModifyAnnulled(expense_id));
        }
        if effective_concept.trim().is_empty() {
            return Err(ExpenseError::ConceptRequired);
        }
        if effective_amount <= Decimal::ZERO {
            return Err(ExpenseError::NonPositiveAmount);
        }
        Self::validate_kind_pairing(effective_kind, effective_service_id)
    }

    /// Validates an annulment against the expense's current state.
    ///
    /// `has_annulment` guards the one-to-one invariant independently of the
    /// state flag.
    ///
    /// # Errors
    ///
    /// * `ExpenseError::MotiveRequired` if the motive is blank
    /// * `ExpenseError::AlreadyAnnulled` if the expense is annulled or
    ///   already owns an annulment record
    pub fn validate_annulment(
        current_state: ExpenseState,
        has_annulment: bool,
        input: &AnnulExpenseInput,
    ) -> Result<(), ExpenseError> {
        if input.motive.trim().is_empty() {
            return Err(ExpenseError::MotiveRequired);
        }
        if current_state == ExpenseState::Annulled || has_annulment {
            return Err(ExpenseError::AlreadyAnnulled(input.expense_id));
        }
        Ok(())
    }

    /// Resolves the amounts recorded on an annulment: the original is the
    /// expense amount, the final is the caller override or zero.
    #[must_use]
    pub fn annulment_amounts(
        expense_amount: Decimal,
        final_override: Option<Decimal>,
    ) -> (Decimal, Decimal) {
        (expense_amount, final_override.unwrap_or(Decimal::ZERO))
    }

    /// Enforces the kind/service pairing:
    /// Service requires a reference, Maintenance forbids one.
    fn validate_kind_pairing(
        kind: ExpenseKind,
        service_id: Option<Uuid>,
    ) -> Result<(), ExpenseError> {
        match (kind, service_id) {
            (ExpenseKind::Service, None) => Err(ExpenseError::ServiceRefRequired),
            (ExpenseKind::Maintenance, Some(_)) => Err(ExpenseError::ServiceRefNotAllowed),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn new_expense(kind: ExpenseKind, service_id: Option<Uuid>) -> NewExpense {
        NewExpense {
            kind,
            concept: "electricity march".to_string(),
            description: None,
            amount: dec!(350000),
            expense_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            service_id,
            property_id: None,
            building_id: Uuid::new_v4(),
            actor_user_id: Some(Uuid::new_v4()),
        }
    }

    fn annul_input(motive: &str) -> AnnulExpenseInput {
        AnnulExpenseInput {
            expense_id: Uuid::new_v4(),
            motive: motive.to_string(),
            description: None,
            final_amount: None,
            actor_user_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_service_expense_requires_service_ref() {
        let input = new_expense(ExpenseKind::Service, None);
        assert!(matches!(
            ExpenseService::validate_new(&input),
            Err(ExpenseError::ServiceRefRequired)
        ));
    }

    #[test]
    fn test_maintenance_expense_rejects_service_ref() {
        let input = new_expense(ExpenseKind::Maintenance, Some(Uuid::new_v4()));
        assert!(matches!(
            ExpenseService::validate_new(&input),
            Err(ExpenseError::ServiceRefNotAllowed)
        ));
    }

    #[test]
    fn test_valid_pairings() {
        assert!(ExpenseService::validate_new(&new_expense(
            ExpenseKind::Service,
            Some(Uuid::new_v4())
        ))
        .is_ok());
        assert!(ExpenseService::validate_new(&new_expense(ExpenseKind::Maintenance, None)).is_ok());
    }

    #[test]
    fn test_new_expense_rejects_blank_concept() {
        let mut input = new_expense(ExpenseKind::Maintenance, None);
        input.concept = " ".to_string();
        assert!(matches!(
            ExpenseService::validate_new(&input),
            Err(ExpenseError::ConceptRequired)
        ));
    }

    #[test]
    fn test_new_expense_rejects_non_positive_amount() {
        let mut input = new_expense(ExpenseKind::Maintenance, None);
        input.amount = dec!(0);
        assert!(matches!(
            ExpenseService::validate_new(&input),
            Err(ExpenseError::NonPositiveAmount)
        ));
    }

    #[test]
    fn test_update_rejects_annulled_expense() {
        let id = Uuid::new_v4();
        let result = ExpenseService::validate_update(
            id,
            ExpenseState::Annulled,
            ExpenseKind::Maintenance,
            None,
            "roof repair",
            dec!(100000),
        );
        assert!(matches!(result, Err(ExpenseError::CannotModifyAnnulled(e)) if e == id));
    }

    #[test]
    fn test_update_revalidates_pairing() {
        let result = ExpenseService::validate_update(
            Uuid::new_v4(),
            ExpenseState::Active,
            ExpenseKind::Service,
            None,
            "water april",
            dec!(80000),
        );
        assert!(matches!(result, Err(ExpenseError::ServiceRefRequired)));
    }

    #[test]
    fn test_annulment_of_active_expense() {
        let input = annul_input("charged twice");
        assert!(ExpenseService::validate_annulment(ExpenseState::Active, false, &input).is_ok());
    }

    #[test]
    fn test_annulment_rejects_annulled_state() {
        let input = annul_input("charged twice");
        let result = ExpenseService::validate_annulment(ExpenseState::Annulled, false, &input);
        assert!(matches!(result, Err(ExpenseError::AlreadyAnnulled(_))));
    }

    #[test]
    fn test_annulment_rejects_existing_record() {
        // The one-to-one invariant holds even if the state flag disagrees.
        let input = annul_input("charged twice");
        let result = ExpenseService::validate_annulment(ExpenseState::Active, true, &input);
        assert!(matches!(result, Err(ExpenseError::AlreadyAnnulled(_))));
    }

    #[test]
    fn test_annulment_requires_motive() {
        let input = annul_input("");
        assert!(matches!(
            ExpenseService::validate_annulment(ExpenseState::Active, false, &input),
            Err(ExpenseError::MotiveRequired)
        ));
    }

    #[test]
    fn test_annulment_amounts_default_to_zero_final() {
        let (original, fin) = ExpenseService::annulment_amounts(dec!(350000), None);
        assert_eq!(original, dec!(350000));
        assert_eq!(fin, dec!(0));

        let (_, overridden) = ExpenseService::annulment_amounts(dec!(350000), Some(dec!(50000)));
        assert_eq!(overridden, dec!(50000));
    }
}
