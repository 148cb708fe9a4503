//! Ledger domain types for payment application and annulment.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Payment state.
///
/// A payment is created Active and flips to Annulled at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    /// Payment counts toward its target balance.
    Active,
    /// Payment has been reversed by an annulment (immutable).
    Annulled,
}

impl PaymentState {
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

impl fmt::Display for PaymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Monthly installment state.
///
/// Reversed is a terminal state accepted by the rental finalization gate
/// but never produced by any ledger operation. Kept for compatibility with
/// historical rows; pending product clarification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallmentState {
    /// Amount due has not been fully covered.
    Pending,
    /// Amount paid covers the amount due.
    Paid,
    /// Terminal state recognized by the finalization gate only.
    Reversed,
}

impl InstallmentState {
    /// Returns the string representation of the state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Reversed => "reversed",
        }
    }

    /// Parses a state from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            "reversed" => Some(Self::Reversed),
            _ => None,
        }
    }

    /// Returns true if the installment requires no further payment.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Paid | Self::Reversed)
    }
}

impl fmt::Display for InstallmentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The balance record a payment is applied against.
///
/// Exactly one target per payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum PaymentTarget {
    /// A rental's security deposit.
    Deposit(Uuid),
    /// One of a rental's monthly installments.
    Installment(Uuid),
}

/// Input for applying a payment against a balance record.
#[derive(Debug, Clone)]
pub struct ApplyPaymentInput {
    /// The balance record to apply against.
    pub target: PaymentTarget,
    /// The amount to apply (must be positive).
    pub amount: Decimal,
    /// The date the payment was made.
    pub payment_date: NaiveDate,
    /// Optional payment method (cash, transfer, check).
    pub method: Option<String>,
    /// Optional account number.
    pub account: Option<String>,
    /// Optional bank name.
    pub bank: Option<String>,
    /// Optional operation reference number.
    pub reference: Option<String>,
    /// Optional free-form description.
    pub description: Option<String>,
}

/// Input for annulling a payment.
#[derive(Debug, Clone)]
pub struct AnnulPaymentInput {
    /// The payment to annul.
    pub payment_id: Uuid,
    /// The reason for the annulment (required).
    pub motive: String,
    /// Detail of the annulment.
    pub description: String,
    /// The user performing the annulment.
    pub actor_user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_state_roundtrip() {
        assert_eq!(PaymentState::Active.as_str(), "active");
        assert_eq!(PaymentState::Annulled.as_str(), "annulled");
        assert_eq!(PaymentState::parse("active"), Some(PaymentState::Active));
        assert_eq!(PaymentState::parse("ANNULLED"), Some(PaymentState::Annulled));
        assert_eq!(PaymentState::parse("voided"), None);
    }

    #[test]
    fn test_installment_state_roundtrip() {
        assert_eq!(
            InstallmentState::parse("pending"),
            Some(InstallmentState::Pending)
        );
        assert_eq!(InstallmentState::parse("Paid"), Some(InstallmentState::Paid));
        assert_eq!(
            InstallmentState::parse("reversed"),
            Some(InstallmentState::Reversed)
        );
        assert_eq!(InstallmentState::parse(""), None);
    }

    #[test]
    fn test_installment_state_settled() {
        assert!(!InstallmentState::Pending.is_settled());
        assert!(InstallmentState::Paid.is_settled());
        assert!(InstallmentState::Reversed.is_settled());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(format!("{}", PaymentState::Active), "active");
        assert_eq!(format!("{}", InstallmentState::Reversed), "reversed");
    }
}
