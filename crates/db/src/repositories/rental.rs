//! Rental repository for lifecycle transitions and ledger reads.
//!
//! Cancellation and finalization each run inside one database transaction:
//! the rental state flip, the deposit settlement, and (for cancellation)
//! the cancellation record are never observably separated. The rental
//! state flip is guarded on the Active state and the deposit write on its
//! version column, so racing transitions abort with a conflict.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use arrenda_core::ledger::DepositBalance;
use arrenda_core::rental::{
    CancellationRequest, DepositSettlement, RentalError, RentalLifecycleService,
};

use crate::entities::{
    deposits, monthly_installments, rental_cancellations, rentals, sea_orm_active_enums,
};

/// A rental with its deposit, installments, and cancellation record.
#[derive(Debug, Clone)]
pub struct RentalWithLedger {
    /// Rental header.
    pub rental: rentals::Model,
    /// The security deposit, if one was taken.
    pub deposit: Option<deposits::Model>,
    /// The rental's monthly installments, oldest first.
    pub installments: Vec<monthly_installments::Model>,
    /// The cancellation record, present once the rental is cancelled.
    pub cancellation: Option<rental_cancellations::Model>,
}

/// Result of a cancellation.
#[derive(Debug, Clone)]
pub struct CancellationOutcome {
    /// The cancelled rental.
    pub rental: rentals::Model,
    /// The settled deposit.
    pub deposit: deposits::Model,
    /// The cancellation record.
    pub cancellation: rental_cancellations::Model,
}

/// Result of a finalization.
#[derive(Debug, Clone)]
pub struct FinalizationOutcome {
    /// The finished rental.
    pub rental: rentals::Model,
    /// The settled deposit.
    pub deposit: deposits::Model,
}

/// Rental repository for lifecycle operations.
#[derive(Debug, Clone)]
pub struct RentalRepository {
    db: DatabaseConnection,
}

impl RentalRepository {
    /// Creates a new rental repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets a rental with its deposit, installments, and cancellation.
    ///
    /// # Errors
    ///
    /// Returns an error if the rental is not found or a query fails.
    pub async fn get_rental(&self, rental_id: Uuid) -> Result<RentalWithLedger, RentalError> {
        let rental = rentals::Entity::find_by_id(rental_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(RentalError::RentalNotFound(rental_id))?;

        let deposit = deposits::Entity::find()
            .filter(deposits::Column::RentalId.eq(rental_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let installments = monthly_installments::Entity::find()
            .filter(monthly_installments::Column::RentalId.eq(rental_id))
            .order_by_asc(monthly_installments::Column::PeriodStart)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let cancellation = rental_cancellations::Entity::find()
            .filter(rental_cancellations::Column::RentalId.eq(rental_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(RentalWithLedger {
            rental,
            deposit,
            installments,
            cancellation,
        })
    }

    /// Lists a rental's monthly installments, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the rental is not found or a query fails.
    pub async fn list_installments(
        &self,
        rental_id: Uuid,
    ) -> Result<Vec<monthly_installments::Model>, RentalError> {
        rentals::Entity::find_by_id(rental_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(RentalError::RentalNotFound(rental_id))?;

        monthly_installments::Entity::find()
            .filter(monthly_installments::Column::RentalId.eq(rental_id))
            .order_by_asc(monthly_installments::Column::PeriodStart)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Cancels an active rental.
    ///
    /// Atomically flips the rental to Cancelled, settles the deposit, and
    /// writes the cancellation record. Outstanding payments are left
    /// untouched; cancellation only touches the rental and deposit rows.
    ///
    /// # Errors
    ///
    /// Returns an error if any precondition of
    /// `RentalLifecycleService::cancel` fails, the rental was transitioned
    /// concurrently, or the database operation fails.
    pub async fn cancel_rental(
        &self,
        rental_id: Uuid,
        request: &CancellationRequest,
    ) -> Result<CancellationOutcome, RentalError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let rental = rentals::Entity::find_by_id(rental_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(RentalError::RentalNotFound(rental_id))?;

        let deposit = deposits::Entity::find()
            .filter(deposits::Column::RentalId.eq(rental_id))
            .one(&txn)
            .await
            .map_err(db_err)?;

        let balance = deposit.as_ref().map(|d| DepositBalance {
            total: d.total,
            current_balance: d.current_balance,
        });

        let action = RentalLifecycleService::cancel(
            rental_id,
            rental.state.clone().into(),
            balance,
            request,
        )?;
        let deposit = deposit.ok_or(RentalError::MissingDeposit(rental_id))?;

        let rental = transition_rental(&txn, rental, action.new_state.into()).await?;
        let deposit = persist_settlement(&txn, deposit, &request.settlement).await?;

        let now = Utc::now().into();
        let cancellation = rental_cancellations::ActiveModel {
            id: Set(Uuid::new_v4()),
            rental_id: Set(rental_id),
            motive: Set(request.motive.clone()),
            returned_amount: Set(request.settlement.returned_amount),
            penalty_amount: Set(request.settlement.penalty_amount),
            return_motive: Set(request.return_motive.clone()),
            penalty_motive: Set(request.penalty_motive.clone()),
            cancelled_at: Set(action.cancelled_at.into()),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        Ok(CancellationOutcome {
            rental,
            deposit,
            cancellation,
        })
    }

    /// Finalizes an active rental whose installments are all settled.
    ///
    /// Atomically flips the rental to Finished and settles the deposit.
    ///
    /// # Errors
    ///
    /// Returns an error if any precondition of
    /// `RentalLifecycleService::finalize` fails (pending installments
    /// included), the rental was transitioned concurrently, or the database
    /// operation fails.
    pub async fn finalize_rental(
        &self,
        rental_id: Uuid,
        settlement: &DepositSettlement,
    ) -> Result<FinalizationOutcome, RentalError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let rental = rentals::Entity::find_by_id(rental_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(RentalError::RentalNotFound(rental_id))?;

        let deposit = deposits::Entity::find()
            .filter(deposits::Column::RentalId.eq(rental_id))
            .one(&txn)
            .await
            .map_err(db_err)?;

        let balance = deposit.as_ref().map(|d| DepositBalance {
            total: d.total,
            current_balance: d.current_balance,
        });

        let installment_states: Vec<arrenda_core::ledger::InstallmentState> =
            monthly_installments::Entity::find()
                .filter(monthly_installments::Column::RentalId.eq(rental_id))
                .all(&txn)
                .await
                .map_err(db_err)?
                .into_iter()
                .map(|i| i.state.into())
                .collect();

        let action = RentalLifecycleService::finalize(
            rental_id,
            rental.state.clone().into(),
            &installment_states,
            balance,
            settlement,
        )?;
        let deposit = deposit.ok_or(RentalError::MissingDeposit(rental_id))?;

        let rental = transition_rental(&txn, rental, action.new_state.into()).await?;
        let deposit = persist_settlement(&txn, deposit, settlement).await?;

        txn.commit().await.map_err(db_err)?;

        Ok(FinalizationOutcome { rental, deposit })
    }
}

// ============================================================================
// Persistence Helpers
// ============================================================================

fn db_err(e: DbErr) -> RentalError {
    RentalError::Database(e.to_string())
}

/// Flips the rental into a terminal state, guarded on Active so a racing
/// transition loses with a conflict instead of overwriting a terminal row.
async fn transition_rental(
    txn: &DatabaseTransaction,
    rental: rentals::Model,
    new_state: sea_orm_active_enums::RentalState,
) -> Result<rentals::Model, RentalError> {
    let id = rental.id;

    let mut active: rentals::ActiveModel = rental.into();
    active.state = Set(new_state);
    active.updated_at = Set(Utc::now().into());

    match rentals::Entity::update(active)
        .filter(rentals::Column::State.eq(sea_orm_active_enums::RentalState::Active))
        .exec(txn)
        .await
    {
        Ok(model) => Ok(model),
        Err(DbErr::RecordNotUpdated) => Err(RentalError::ConcurrentModification(id)),
        Err(e) => Err(db_err(e)),
    }
}

/// Writes the deposit settlement fields, guarded by the version column.
async fn persist_settlement(
    txn: &DatabaseTransaction,
    deposit: deposits::Model,
    settlement: &DepositSettlement,
) -> Result<deposits::Model, RentalError> {
    let id = deposit.id;
    let version = deposit.version;

    let mut active: deposits::ActiveModel = deposit.into();
    active.returned_amount = Set(Some(settlement.returned_amount));
    active.penalty_amount = Set(Some(settlement.penalty_amount));
    active.return_description = Set(settlement.return_description.clone());
    active.penalty_description = Set(settlement.penalty_description.clone());
    active.return_date = Set(Some(settlement.return_date));
    active.version = Set(version + 1);
    active.updated_at = Set(Utc::now().into());

    match deposits::Entity::update(active)
        .filter(deposits::Column::Version.eq(version))
        .exec(txn)
        .await
    {
        Ok(model) => Ok(model),
        Err(DbErr::RecordNotUpdated) => Err(RentalError::ConcurrentModification(id)),
        Err(e) => Err(db_err(e)),
    }
}
