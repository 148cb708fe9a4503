//! Payment ledger: balance records and the apply/annul payment rules.
//!
//! A payment is applied against exactly one balance record - a rental's
//! security deposit or one of its monthly installments. Annulling a payment
//! creates an immutable reversal record and rolls the balance back.

pub mod balance;
pub mod error;
pub mod service;
pub mod types;

pub use balance::{DepositBalance, InstallmentBalance};
pub use error::LedgerError;
pub use service::LedgerService;
pub use types::{
    AnnulPaymentInput, ApplyPaymentInput, InstallmentState, PaymentState, PaymentTarget,
};
