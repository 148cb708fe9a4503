//! Rental contract lifecycle: Active -> {Finished, Cancelled}.
//!
//! Both transitions are terminal and settle the security deposit. The
//! finalization transition is gated on the state of the rental's monthly
//! installments.

pub mod error;
pub mod service;
pub mod types;

pub use error::RentalError;
pub use service::RentalLifecycleService;
pub use types::{
    CancellationAction, CancellationRequest, DepositSettlement, FinalizeAction, RentalState,
};
