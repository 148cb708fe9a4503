//! Rental lifecycle domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rental contract state.
///
/// The valid transitions are:
/// - Active -> Cancelled (cancel, terminal)
/// - Active -> Finished (finalize, terminal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RentalState {
    /// Contract is running; payments may be applied.
    Active,
    /// Contract ran to completion (immutable).
    Finished,
    /// Contract was cancelled early (immutable).
    Cancelled,
}

impl RentalState {
    /// Returns the string representation of the state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Finished => "finished",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a state from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "finished" => Some(Self::Finished),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if the rental can no longer change state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Cancelled)
    }
}

impl fmt::Display for RentalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Deposit settlement recorded when a rental leaves the Active state.
#[derive(Debug, Clone)]
pub struct DepositSettlement {
    /// Amount returned to the tenant.
    pub returned_amount: Decimal,
    /// Amount withheld as a penalty.
    pub penalty_amount: Decimal,
    /// Detail of the returned amount.
    pub return_description: Option<String>,
    /// Detail of the withheld penalty.
    pub penalty_description: Option<String>,
    /// Date the deposit was settled.
    pub return_date: NaiveDate,
}

/// Input for cancelling an active rental.
#[derive(Debug, Clone)]
pub struct CancellationRequest {
    /// The reason for the cancellation (required).
    pub motive: String,
    /// Reason attached to the returned amount.
    pub return_motive: Option<String>,
    /// Reason attached to the penalty.
    pub penalty_motive: Option<String>,
    /// How the deposit is settled.
    pub settlement: DepositSettlement,
}

/// Validated cancellation transition with audit data.
#[derive(Debug, Clone)]
pub struct CancellationAction {
    /// The new rental state (Cancelled).
    pub new_state: RentalState,
    /// When the cancellation happened.
    pub cancelled_at: DateTime<Utc>,
}

/// Validated finalization transition with audit data.
#[derive(Debug, Clone)]
pub struct FinalizeAction {
    /// The new rental state (Finished).
    pub new_state: RentalState,
    /// When the finalization happened.
    pub finalized_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_roundtrip() {
        assert_eq!(RentalState::Active.as_str(), "active");
        assert_eq!(RentalState::parse("finished"), Some(RentalState::Finished));
        assert_eq!(RentalState::parse("CANCELLED"), Some(RentalState::Cancelled));
        assert_eq!(RentalState::parse("open"), None);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!RentalState::Active.is_terminal());
        assert!(RentalState::Finished.is_terminal());
        assert!(RentalState::Cancelled.is_terminal());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(format!("{}", RentalState::Cancelled), "cancelled");
    }
}
