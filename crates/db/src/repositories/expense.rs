//! Expense repository for the expense ledger.
//!
//! Annulment is the only multi-row operation and runs inside one database
//! transaction; the state flip is guarded on Active and the annulment row
//! is unique per expense, so a double annulment loses with a conflict.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use arrenda_core::expense::{
    AnnulExpenseInput, ExpenseError, ExpenseKind, ExpenseService, ExpenseState, ExpenseUpdate,
    NewExpense,
};
use arrenda_shared::types::PageRequest;

use crate::entities::{expense_annulments, expenses, sea_orm_active_enums};

/// Filter options for listing expenses.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Filter by kind.
    pub kind: Option<ExpenseKind>,
    /// Filter by state.
    pub state: Option<ExpenseState>,
    /// Filter by building.
    pub building_id: Option<Uuid>,
    /// Filter by property.
    pub property_id: Option<Uuid>,
}

/// Expense repository for CRUD and annulment operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new expense in state Active.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails (blank concept, non-positive
    /// amount, kind/service pairing) or the insert fails.
    pub async fn create_expense(&self, input: NewExpense) -> Result<expenses::Model, ExpenseError> {
        ExpenseService::validate_new(&input)?;

        let now = Utc::now().into();
        let expense = expenses::ActiveModel {
            id: Set(Uuid::new_v4()),
            kind: Set(input.kind.into()),
            concept: Set(input.concept),
            description: Set(input.description),
            amount: Set(input.amount),
            expense_date: Set(input.expense_date),
            state: Set(sea_orm_active_enums::ExpenseState::Active),
            service_id: Set(input.service_id),
            property_id: Set(input.property_id),
            building_id: Set(input.building_id),
            actor_user_id: Set(input.actor_user_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        expense.insert(&self.db).await.map_err(db_err)
    }

    /// Updates an active expense.
    ///
    /// The kind/service pairing is re-validated against the effective
    /// (post-update) values; annulled expenses reject every update.
    ///
    /// # Errors
    ///
    /// Returns an error if the expense is not found, is annulled, the
    /// effective values fail validation, or the update fails.
    pub async fn update_expense(
        &self,
        expense_id: Uuid,
        update: ExpenseUpdate,
    ) -> Result<expenses::Model, ExpenseError> {
        let expense = expenses::Entity::find_by_id(expense_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(ExpenseError::ExpenseNotFound(expense_id))?;

        let effective_kind = update.kind.unwrap_or_else(|| expense.kind.clone().into());
        let effective_service_id = update.service_id.unwrap_or(expense.service_id);
        let effective_concept = update.concept.as_deref().unwrap_or(&expense.concept);
        let effective_amount = update.amount.unwrap_or(expense.amount);

        ExpenseService::validate_update(
            expense_id,
            expense.state.clone().into(),
            effective_kind,
            effective_service_id,
            effective_concept,
            effective_amount,
        )?;

        let mut active: expenses::ActiveModel = expense.into();
        if let Some(kind) = update.kind {
            active.kind = Set(kind.into());
        }
        if let Some(concept) = update.concept {
            active.concept = Set(concept);
        }
        if let Some(description) = update.description {
            active.description = Set(Some(description));
        }
        if let Some(amount) = update.amount {
            active.amount = Set(amount);
        }
        if let Some(expense_date) = update.expense_date {
            active.expense_date = Set(expense_date);
        }
        if let Some(service_id) = update.service_id {
            active.service_id = Set(service_id);
        }
        if let Some(property_id) = update.property_id {
            active.property_id = Set(Some(property_id));
        }
        active.updated_at = Set(Utc::now().into());

        active.update(&self.db).await.map_err(db_err)
    }

    /// Annuls an active expense.
    ///
    /// Atomically creates the immutable annulment record and flips the
    /// expense to Annulled. The recorded original amount is the expense
    /// amount; the final amount is the caller override or zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the motive is blank, the expense is not found,
    /// is already annulled or already owns an annulment, or the database
    /// operation fails.
    pub async fn annul_expense(
        &self,
        input: AnnulExpenseInput,
    ) -> Result<(expenses::Model, expense_annulments::Model), ExpenseError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let expense = expenses::Entity::find_by_id(input.expense_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(ExpenseError::ExpenseNotFound(input.expense_id))?;

        let has_annulment = expense_annulments::Entity::find()
            .filter(expense_annulments::Column::ExpenseId.eq(input.expense_id))
            .one(&txn)
            .await
            .map_err(db_err)?
            .is_some();

        ExpenseService::validate_annulment(expense.state.clone().into(), has_annulment, &input)?;

        let (original_amount, final_amount) =
            ExpenseService::annulment_amounts(expense.amount, input.final_amount);

        let expense_id = expense.id;
        let mut active: expenses::ActiveModel = expense.into();
        active.state = Set(sea_orm_active_enums::ExpenseState::Annulled);
        active.updated_at = Set(Utc::now().into());

        let expense = match expenses::Entity::update(active)
            .filter(expenses::Column::State.eq(sea_orm_active_enums::ExpenseState::Active))
            .exec(&txn)
            .await
        {
            Ok(model) => model,
            Err(DbErr::RecordNotUpdated) => {
                return Err(ExpenseError::AlreadyAnnulled(expense_id));
            }
            Err(e) => return Err(db_err(e)),
        };

        let now = Utc::now().into();
        let annulment = expense_annulments::ActiveModel {
            id: Set(Uuid::new_v4()),
            expense_id: Set(expense_id),
            motive: Set(input.motive.clone()),
            description: Set(input.description.clone()),
            original_amount: Set(original_amount),
            final_amount: Set(final_amount),
            annulled_at: Set(now),
            actor_user_id: Set(input.actor_user_id),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        Ok((expense, annulment))
    }

    /// Gets an expense with its annulment record, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the expense is not found or the query fails.
    pub async fn get_expense(
        &self,
        expense_id: Uuid,
    ) -> Result<(expenses::Model, Option<expense_annulments::Model>), ExpenseError> {
        let expense = expenses::Entity::find_by_id(expense_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(ExpenseError::ExpenseNotFound(expense_id))?;

        let annulment = expense_annulments::Entity::find()
            .filter(expense_annulments::Column::ExpenseId.eq(expense_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok((expense, annulment))
    }

    /// Lists expenses with optional filters, newest first.
    ///
    /// Returns the page of items and the total match count.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn list_expenses(
        &self,
        filter: &ExpenseFilter,
        page: &PageRequest,
    ) -> Result<(Vec<expenses::Model>, u64), ExpenseError> {
        let mut query = expenses::Entity::find();

        if let Some(kind) = filter.kind {
            query = query.filter(
                expenses::Column::Kind.eq(sea_orm_active_enums::ExpenseKind::from(kind)),
            );
        }
        if let Some(state) = filter.state {
            query = query.filter(
                expenses::Column::State.eq(sea_orm_active_enums::ExpenseState::from(state)),
            );
        }
        if let Some(building_id) = filter.building_id {
            query = query.filter(expenses::Column::BuildingId.eq(building_id));
        }
        if let Some(property_id) = filter.property_id {
            query = query.filter(expenses::Column::PropertyId.eq(property_id));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let items = query
            .order_by_desc(expenses::Column::ExpenseDate)
            .order_by_desc(expenses::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok((items, total))
    }
}

fn db_err(e: DbErr) -> ExpenseError {
    ExpenseError::Database(e.to_string())
}
