//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Every ledger-mutating operation runs inside a single
//! database transaction: the record write and the balance/state mutation
//! are never observably separated.

pub mod expense;
pub mod payment;
pub mod rental;

pub use expense::{ExpenseFilter, ExpenseRepository};
pub use payment::PaymentRepository;
pub use rental::{CancellationOutcome, FinalizationOutcome, RentalRepository, RentalWithLedger};
