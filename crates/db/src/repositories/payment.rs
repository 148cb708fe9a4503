//! Payment repository for the apply/annul ledger operations.
//!
//! Both operations are all-or-nothing: the payment (or annulment) row and
//! the balance mutation are written inside one database transaction, and
//! balance records carry a version column so concurrent writers abort with
//! a retryable conflict instead of losing updates.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use arrenda_core::ledger::{
    AnnulPaymentInput, ApplyPaymentInput, DepositBalance, InstallmentBalance, InstallmentState,
    LedgerError, LedgerService, PaymentTarget,
};

use crate::entities::{
    deposits, monthly_installments, payment_annulments, payments, sea_orm_active_enums,
};

/// Payment repository executing the atomic ledger operations.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Applies a payment against a deposit or monthly installment.
    ///
    /// Atomically creates the payment row and increments the target
    /// balance. An installment's state only ever advances toward Paid; a
    /// partial payment leaves it untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is not positive
    /// - The target balance record does not exist
    /// - A concurrent writer touched the same balance record
    /// - The database operation fails
    pub async fn apply_payment(
        &self,
        input: ApplyPaymentInput,
    ) -> Result<payments::Model, LedgerError> {
        LedgerService::validate_apply(&input)?;

        let txn = self.db.begin().await.map_err(db_err)?;

        match input.target {
            PaymentTarget::Deposit(deposit_id) => {
                let deposit = deposits::Entity::find_by_id(deposit_id)
                    .one(&txn)
                    .await
                    .map_err(db_err)?
                    .ok_or(LedgerError::DepositNotFound(deposit_id))?;

                let next = DepositBalance {
                    total: deposit.total,
                    current_balance: deposit.current_balance,
                }
                .apply(input.amount);

                persist_deposit(&txn, deposit, &next).await?;
            }
            PaymentTarget::Installment(installment_id) => {
                let installment = monthly_installments::Entity::find_by_id(installment_id)
                    .one(&txn)
                    .await
                    .map_err(db_err)?
                    .ok_or(LedgerError::InstallmentNotFound(installment_id))?;

                let next = InstallmentBalance {
                    amount_total: installment.amount_total,
                    amount_paid: installment.amount_paid,
                    state: installment.state.clone().into(),
                }
                .apply(input.amount);

                let date_patch = payment_date_on_apply(next.state, input.payment_date);
                persist_installment(&txn, installment, &next, date_patch).await?;
            }
        }

        let payment = insert_payment(&txn, &input).await?;

        txn.commit().await.map_err(db_err)?;

        Ok(payment)
    }

    /// Annuls an active payment.
    ///
    /// Atomically creates the immutable annulment record, flips the payment
    /// to Annulled, and rolls the target balance back. An installment's
    /// state is recomputed from the remaining totals, unlike the monotonic
    /// advance on apply.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The motive is blank
    /// - The payment does not exist or is already annulled
    /// - The target balance record is gone
    /// - A concurrent writer touched the same balance record
    /// - The database operation fails
    pub async fn annul_payment(
        &self,
        input: AnnulPaymentInput,
    ) -> Result<(payments::Model, payment_annulments::Model), LedgerError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let payment = payments::Entity::find_by_id(input.payment_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::PaymentNotFound(input.payment_id))?;

        LedgerService::validate_annulment(payment.state.clone().into(), &input)?;

        match (payment.deposit_id, payment.installment_id) {
            (Some(deposit_id), _) => {
                let deposit = deposits::Entity::find_by_id(deposit_id)
                    .one(&txn)
                    .await
                    .map_err(db_err)?
                    .ok_or(LedgerError::DepositNotFound(deposit_id))?;

                let next = DepositBalance {
                    total: deposit.total,
                    current_balance: deposit.current_balance,
                }
                .reverse(payment.amount);

                persist_deposit(&txn, deposit, &next).await?;
            }
            (None, Some(installment_id)) => {
                let installment = monthly_installments::Entity::find_by_id(installment_id)
                    .one(&txn)
                    .await
                    .map_err(db_err)?
                    .ok_or(LedgerError::InstallmentNotFound(installment_id))?;

                let next = InstallmentBalance {
                    amount_total: installment.amount_total,
                    amount_paid: installment.amount_paid,
                    state: installment.state.clone().into(),
                }
                .reverse(payment.amount);

                let date_patch = payment_date_on_reverse(next.state);
                persist_installment(&txn, installment, &next, date_patch).await?;
            }
            (None, None) => {
                // Unreachable under the payments CHECK constraint.
                return Err(LedgerError::Database(format!(
                    "payment {} has no target balance",
                    payment.id
                )));
            }
        }

        let payment = flip_payment_state(&txn, payment).await?;
        let annulment = insert_annulment(&txn, &payment, &input).await?;

        txn.commit().await.map_err(db_err)?;

        Ok((payment, annulment))
    }

    /// Gets a payment with its annulment record, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment is not found or the query fails.
    pub async fn get_payment(
        &self,
        payment_id: Uuid,
    ) -> Result<(payments::Model, Option<payment_annulments::Model>), LedgerError> {
        let payment = payments::Entity::find_by_id(payment_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::PaymentNotFound(payment_id))?;

        let annulment = payment_annulments::Entity::find()
            .filter(payment_annulments::Column::PaymentId.eq(payment_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok((payment, annulment))
    }
}

// ============================================================================
// Persistence Helpers
// ============================================================================

fn db_err(e: DbErr) -> LedgerError {
    LedgerError::Database(e.to_string())
}

/// Writes a deposit balance snapshot, guarded by the version column.
async fn persist_deposit(
    txn: &DatabaseTransaction,
    current: deposits::Model,
    next: &DepositBalance,
) -> Result<deposits::Model, LedgerError> {
    let id = current.id;
    let version = current.version;

    let mut active: deposits::ActiveModel = current.into();
    active.current_balance = Set(next.current_balance);
    active.version = Set(version + 1);
    active.updated_at = Set(Utc::now().into());

    match deposits::Entity::update(active)
        .filter(deposits::Column::Version.eq(version))
        .exec(txn)
        .await
    {
        Ok(model) => Ok(model),
        Err(DbErr::RecordNotUpdated) => Err(LedgerError::ConcurrentModification(id)),
        Err(e) => Err(db_err(e)),
    }
}

/// Writes an installment balance snapshot, guarded by the version column.
///
/// `payment_date` patches the column only when `Some`: `Some(Some(d))`
/// stamps the date, `Some(None)` clears it.
async fn persist_installment(
    txn: &DatabaseTransaction,
    current: monthly_installments::Model,
    next: &InstallmentBalance,
    payment_date: Option<Option<NaiveDate>>,
) -> Result<monthly_installments::Model, LedgerError> {
    let id = current.id;
    let version = current.version;

    let mut active: monthly_installments::ActiveModel = current.into();
    active.amount_paid = Set(next.amount_paid);
    active.state = Set(next.state.into());
    active.version = Set(version + 1);
    active.updated_at = Set(Utc::now().into());
    if let Some(date) = payment_date {
        active.payment_date = Set(date);
    }

    match monthly_installments::Entity::update(active)
        .filter(monthly_installments::Column::Version.eq(version))
        .exec(txn)
        .await
    {
        Ok(model) => Ok(model),
        Err(DbErr::RecordNotUpdated) => Err(LedgerError::ConcurrentModification(id)),
        Err(e) => Err(db_err(e)),
    }
}

/// Inserts the payment row in state Active.
async fn insert_payment(
    txn: &DatabaseTransaction,
    input: &ApplyPaymentInput,
) -> Result<payments::Model, LedgerError> {
    let now = Utc::now().into();
    let (deposit_id, installment_id) = split_target(input.target);

    let payment = payments::ActiveModel {
        id: Set(Uuid::new_v4()),
        amount: Set(input.amount),
        payment_date: Set(input.payment_date),
        state: Set(sea_orm_active_enums::PaymentState::Active),
        method: Set(input.method.clone()),
        account: Set(input.account.clone()),
        bank: Set(input.bank.clone()),
        reference: Set(input.reference.clone()),
        description: Set(input.description.clone()),
        deposit_id: Set(deposit_id),
        installment_id: Set(installment_id),
        created_at: Set(now),
        updated_at: Set(now),
    };

    payment.insert(txn).await.map_err(db_err)
}

/// Flips an Active payment to Annulled, guarded on the current state so a
/// racing annulment loses with a conflict instead of double-reversing.
async fn flip_payment_state(
    txn: &DatabaseTransaction,
    payment: payments::Model,
) -> Result<payments::Model, LedgerError> {
    let id = payment.id;

    let mut active: payments::ActiveModel = payment.into();
    active.state = Set(sea_orm_active_enums::PaymentState::Annulled);
    active.updated_at = Set(Utc::now().into());

    match payments::Entity::update(active)
        .filter(payments::Column::State.eq(sea_orm_active_enums::PaymentState::Active))
        .exec(txn)
        .await
    {
        Ok(model) => Ok(model),
        Err(DbErr::RecordNotUpdated) => Err(LedgerError::AlreadyAnnulled(id)),
        Err(e) => Err(db_err(e)),
    }
}

/// Inserts the immutable annulment record.
async fn insert_annulment(
    txn: &DatabaseTransaction,
    payment: &payments::Model,
    input: &AnnulPaymentInput,
) -> Result<payment_annulments::Model, LedgerError> {
    let now = Utc::now().into();

    let annulment = payment_annulments::ActiveModel {
        id: Set(Uuid::new_v4()),
        payment_id: Set(payment.id),
        motive: Set(input.motive.clone()),
        description: Set(input.description.clone()),
        original_amount: Set(payment.amount),
        final_amount: Set(Decimal::ZERO),
        annulled_at: Set(now),
        actor_user_id: Set(input.actor_user_id),
        created_at: Set(now),
    };

    annulment.insert(txn).await.map_err(db_err)
}

// ============================================================================
// Pure Helpers
// ============================================================================

/// Splits a payment target into the (deposit_id, installment_id) column pair.
#[must_use]
pub fn split_target(target: PaymentTarget) -> (Option<Uuid>, Option<Uuid>) {
    match target {
        PaymentTarget::Deposit(id) => (Some(id), None),
        PaymentTarget::Installment(id) => (None, Some(id)),
    }
}

/// Payment date column patch after applying a payment: stamped when the
/// installment becomes Paid, untouched otherwise.
#[must_use]
pub fn payment_date_on_apply(
    next_state: InstallmentState,
    date: NaiveDate,
) -> Option<Option<NaiveDate>> {
    if next_state == InstallmentState::Paid {
        Some(Some(date))
    } else {
        None
    }
}

/// Payment date column patch after reversing a payment: cleared when the
/// installment is no longer Paid, untouched otherwise.
#[must_use]
pub fn payment_date_on_reverse(next_state: InstallmentState) -> Option<Option<NaiveDate>> {
    if next_state == InstallmentState::Paid {
        None
    } else {
        Some(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 5).unwrap()
    }

    #[test]
    fn test_split_target() {
        let id = Uuid::new_v4();
        assert_eq!(split_target(PaymentTarget::Deposit(id)), (Some(id), None));
        assert_eq!(
            split_target(PaymentTarget::Installment(id)),
            (None, Some(id))
        );
    }

    #[test]
    fn test_payment_date_stamped_when_paid() {
        assert_eq!(
            payment_date_on_apply(InstallmentState::Paid, date()),
            Some(Some(date()))
        );
        assert_eq!(payment_date_on_apply(InstallmentState::Pending, date()), None);
    }

    #[test]
    fn test_payment_date_cleared_when_reversed_below_total() {
        assert_eq!(
            payment_date_on_reverse(InstallmentState::Pending),
            Some(None)
        );
        assert_eq!(payment_date_on_reverse(InstallmentState::Paid), None);
    }
}
