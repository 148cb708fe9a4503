//! Expense ledger: Active/Annulled lifecycle for operating expenses.
//!
//! Independent of rental balances, but sharing the annulment pattern: an
//! immutable reversal record plus a single state flip.

pub mod error;
pub mod service;
pub mod types;

pub use error::ExpenseError;
pub use service::ExpenseService;
pub use types::{AnnulExpenseInput, ExpenseKind, ExpenseState, ExpenseUpdate, NewExpense};
