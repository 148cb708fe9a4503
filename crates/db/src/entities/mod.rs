//! `SeaORM` entity definitions.

pub mod deposits;
pub mod expense_annulments;
pub mod expenses;
pub mod monthly_installments;
pub mod payment_annulments;
pub mod payments;
pub mod rental_cancellations;
pub mod rentals;
pub mod sea_orm_active_enums;
