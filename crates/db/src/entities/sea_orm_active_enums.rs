//! `SeaORM` active enums mapping PostgreSQL enum types.
//!
//! Conversions to and from the `arrenda-core` domain enums live here so the
//! repositories can hand rows straight to the business rules.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Rental contract state (`rental_state`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "rental_state")]
#[serde(rename_all = "lowercase")]
pub enum RentalState {
    /// Contract is running.
    #[sea_orm(string_value = "active")]
    Active,
    /// Contract ran to completion.
    #[sea_orm(string_value = "finished")]
    Finished,
    /// Contract was cancelled early.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Monthly installment state (`installment_state`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "installment_state")]
#[serde(rename_all = "lowercase")]
pub enum InstallmentState {
    /// Amount due not fully covered.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Amount paid covers the amount due.
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Terminal state recognized by the finalization gate only.
    #[sea_orm(string_value = "reversed")]
    Reversed,
}

/// Payment state (`payment_state`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_state")]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    /// Payment counts toward its target balance.
    #[sea_orm(string_value = "active")]
    Active,
    /// Payment has been reversed by an annulment.
    #[sea_orm(string_value = "annulled")]
    Annulled,
}

/// Expense state (`expense_state`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "expense_state")]
#[serde(rename_all = "lowercase")]
pub enum ExpenseState {
    /// Expense counts toward operating costs.
    #[sea_orm(string_value = "active")]
    Active,
    /// Expense has been annulled.
    #[sea_orm(string_value = "annulled")]
    Annulled,
}

/// Expense classification (`expense_kind`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "expense_kind")]
#[serde(rename_all = "lowercase")]
pub enum ExpenseKind {
    /// Payment for a contracted service.
    #[sea_orm(string_value = "service")]
    Service,
    /// One-off maintenance work.
    #[sea_orm(string_value = "maintenance")]
    Maintenance,
}

// ============================================================================
// Conversions to/from arrenda-core domain enums
// ============================================================================

impl From<RentalState> for arrenda_core::rental::RentalState {
    fn from(value: RentalState) -> Self {
        match value {
            RentalState::Active => Self::Active,
            RentalState::Finished => Self::Finished,
            RentalState::Cancelled => Self::Cancelled,
        }
    }
}

impl From<arrenda_core::rental::RentalState> for RentalState {
    fn from(value: arrenda_core::rental::RentalState) -> Self {
        match value {
            arrenda_core::rental::RentalState::Active => Self::Active,
            arrenda_core::rental::RentalState::Finished => Self::Finished,
            arrenda_core::rental::RentalState::Cancelled => Self::Cancelled,
        }
    }
}

impl From<InstallmentState> for arrenda_core::ledger::InstallmentState {
    fn from(value: InstallmentState) -> Self {
        match value {
            InstallmentState::Pending => Self::Pending,
            InstallmentState::Paid => Self::Paid,
            InstallmentState::Reversed => Self::Reversed,
        }
    }
}

impl From<arrenda_core::ledger::InstallmentState> for InstallmentState {
    fn from(value: arrenda_core::ledger::InstallmentState) -> Self {
        match value {
            arrenda_core::ledger::InstallmentState::Pending => Self::Pending,
            arrenda_core::ledger::InstallmentState::Paid => Self::Paid,
            arrenda_core::ledger::InstallmentState::Reversed => Self::Reversed,
        }
    }
}

impl From<PaymentState> for arrenda_core::ledger::PaymentState {
    fn from(value: PaymentState) -> Self {
        match value {
            PaymentState::Active => Self::Active,
            PaymentState::Annulled => Self::Annulled,
        }
    }
}

impl From<arrenda_core::ledger::PaymentState> for PaymentState {
    fn from(value: arrenda_core::ledger::PaymentState) -> Self {
        match value {
            arrenda_core::ledger::PaymentState::Active => Self::Active,
            arrenda_core::ledger::PaymentState::Annulled => Self::Annulled,
        }
    }
}

impl From<ExpenseState> for arrenda_core::expense::ExpenseState {
    fn from(value: ExpenseState) -> Self {
        match value {
            ExpenseState::Active => Self::Active,
            ExpenseState::Annulled => Self::Annulled,
        }
    }
}

impl From<arrenda_core::expense::ExpenseState> for ExpenseState {
    fn from(value: arrenda_core::expense::ExpenseState) -> Self {
        match value {
            arrenda_core::expense::ExpenseState::Active => Self::Active,
            arrenda_core::expense::ExpenseState::Annulled => Self::Annulled,
        }
    }
}

impl From<ExpenseKind> for arrenda_core::expense::ExpenseKind {
    fn from(value: ExpenseKind) -> Self {
        match value {
            ExpenseKind::Service => Self::Service,
            ExpenseKind::Maintenance => Self::Maintenance,
        }
    }
}

impl From<arrenda_core::expense::ExpenseKind> for ExpenseKind {
    fn from(value: arrenda_core::expense::ExpenseKind) -> Self {
        match value {
            arrenda_core::expense::ExpenseKind::Service => Self::Service,
            arrenda_core::expense::ExpenseKind::Maintenance => Self::Maintenance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rental_state_roundtrip() {
        for state in [
            arrenda_core::rental::RentalState::Active,
            arrenda_core::rental::RentalState::Finished,
            arrenda_core::rental::RentalState::Cancelled,
        ] {
            let db_state = RentalState::from(state);
            assert_eq!(arrenda_core::rental::RentalState::from(db_state), state);
        }
    }

    #[test]
    fn test_installment_state_roundtrip() {
        for state in [
            arrenda_core::ledger::InstallmentState::Pending,
            arrenda_core::ledger::InstallmentState::Paid,
            arrenda_core::ledger::InstallmentState::Reversed,
        ] {
            let db_state = InstallmentState::from(state);
            assert_eq!(arrenda_core::ledger::InstallmentState::from(db_state), state);
        }
    }

    #[test]
    fn test_payment_state_roundtrip() {
        for state in [
            arrenda_core::ledger::PaymentState::Active,
            arrenda_core::ledger::PaymentState::Annulled,
        ] {
            let db_state = PaymentState::from(state);
            assert_eq!(arrenda_core::ledger::PaymentState::from(db_state), state);
        }
    }

    #[test]
    fn test_expense_enums_roundtrip() {
        for kind in [
            arrenda_core::expense::ExpenseKind::Service,
            arrenda_core::expense::ExpenseKind::Maintenance,
        ] {
            let db_kind = ExpenseKind::from(kind);
            assert_eq!(arrenda_core::expense::ExpenseKind::from(db_kind), kind);
        }
        for state in [
            arrenda_core::expense::ExpenseState::Active,
            arrenda_core::expense::ExpenseState::Annulled,
        ] {
            let db_state = ExpenseState::from(state);
            assert_eq!(arrenda_core::expense::ExpenseState::from(db_state), state);
        }
    }
}
