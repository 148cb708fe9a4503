//! Expense domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Expense classification.
///
/// Service expenses reference the contracted service they pay for;
/// maintenance expenses must not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseKind {
    /// Payment for a contracted service (utilities, cleaning).
    Service,
    /// One-off maintenance work.
    Maintenance,
}

impl ExpenseKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Maintenance => "maintenance",
        }
    }

    /// Parses a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "service" => Some(Self::Service),
            "maintenance" => Some(Self::Maintenance),
            _ => None,
        }
    }
}

impl fmt::Display for ExpenseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Expense state.
///
/// An expense is created Active and flips to Annulled at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseState {
    /// Expense counts toward operating costs.
    Active,
    /// Expense has been annulled (immutable).
    Annulled,
}

impl ExpenseState {
    /// Returns the string representation of the state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Annulled => "annulled",
        }
    }

    /// Parses a state from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "annulled" => Some(Self::Annulled),
            _ => None,
        }
    }
}

impl fmt::Display for ExpenseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input for creating an expense.
#[derive(Debug, Clone)]
pub struct NewExpense {
    /// Service or maintenance.
    pub kind: ExpenseKind,
    /// Short concept line (required).
    pub concept: String,
    /// Optional free-form detail.
    pub description: Option<String>,
    /// The amount spent (must be positive).
    pub amount: Decimal,
    /// The date of the expense.
    pub expense_date: NaiveDate,
    /// The contracted service, required iff `kind` is Service.
    pub service_id: Option<Uuid>,
    /// Optional property the expense belongs to.
    pub property_id: Option<Uuid>,
    /// The building the expense belongs to.
    pub building_id: Uuid,
    /// The user registering the expense.
    pub actor_user_id: Option<Uuid>,
}

/// Partial update of an active expense. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ExpenseUpdate {
    /// New kind; re-validates the service reference pairing.
    pub kind: Option<ExpenseKind>,
    /// New concept line.
    pub concept: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New expense date.
    pub expense_date: Option<NaiveDate>,
    /// New service reference; the outer `None` leaves it unchanged,
    /// `Some(None)` clears it.
    pub service_id: Option<Option<Uuid>>,
    /// New property reference.
    pub property_id: Option<Uuid>,
}

/// Input for annulling an expense.
#[derive(Debug, Clone)]
pub struct AnnulExpenseInput {
    /// The expense to annul.
    pub expense_id: Uuid,
    /// The reason for the annulment (required).
    pub motive: String,
    /// Optional detail.
    pub description: Option<String>,
    /// Overrides the recorded final amount; defaults to zero.
    pub final_amount: Option<Decimal>,
    /// The user performing the annulment.
    pub actor_user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        assert_eq!(ExpenseKind::Service.as_str(), "service");
        assert_eq!(ExpenseKind::parse("maintenance"), Some(ExpenseKind::Maintenance));
        assert_eq!(ExpenseKind::parse("SERVICE"), Some(ExpenseKind::Service));
        assert_eq!(ExpenseKind::parse("repair"), None);
    }

    #[test]
    fn test_state_roundtrip() {
        assert_eq!(ExpenseState::parse("active"), Some(ExpenseState::Active));
        assert_eq!(ExpenseState::parse("Annulled"), Some(ExpenseState::Annulled));
        assert_eq!(ExpenseState::parse(""), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ExpenseKind::Maintenance), "maintenance");
        assert_eq!(format!("{}", ExpenseState::Annulled), "annulled");
    }
}
