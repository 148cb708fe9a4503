//! Expense ledger routes: create, list, update, annul.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, patch, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::ActorId, response};
use arrenda_core::expense::{
    AnnulExpenseInput, ExpenseKind, ExpenseState, ExpenseUpdate, NewExpense,
};
use arrenda_db::{
    ExpenseRepository,
    entities::{expense_annulments, expenses},
    repositories::ExpenseFilter,
};
use arrenda_shared::types::{PageRequest, PageResponse};

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", post(create_expense))
        .route("/expenses", get(list_expenses))
        .route("/expenses/{expense_id}", get(get_expense))
        .route("/expenses/{expense_id}", patch(update_expense))
        .route("/expenses/{expense_id}/annulment", post(annul_expense))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating an expense.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    /// Kind: "service" or "maintenance".
    pub kind: String,
    /// Short concept line.
    pub concept: String,
    /// Optional detail.
    pub description: Option<String>,
    /// Amount spent (decimal string, positive).
    pub amount: String,
    /// Date of the expense (YYYY-MM-DD).
    pub expense_date: NaiveDate,
    /// Contracted service, required iff kind is "service".
    pub service_id: Option<Uuid>,
    /// Property the expense belongs to.
    pub property_id: Option<Uuid>,
    /// Building the expense belongs to.
    pub building_id: Uuid,
}

/// Request body for updating an expense.
#[derive(Debug, Deserialize)]
pub struct UpdateExpenseRequest {
    /// New kind; re-validates the service reference pairing.
    pub kind: Option<String>,
    /// New concept line.
    pub concept: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New amount (decimal string).
    pub amount: Option<String>,
    /// New expense date.
    pub expense_date: Option<NaiveDate>,
    /// New service reference; evaluated together with `kind`.
    pub service_id: Option<Uuid>,
    /// New property reference.
    pub property_id: Option<Uuid>,
}

/// Request body for annulling an expense.
#[derive(Debug, Deserialize)]
pub struct AnnulExpenseRequest {
    /// The reason for the annulment (required).
    pub motive: String,
    /// Optional detail.
    pub description: Option<String>,
    /// Overrides the recorded final amount (decimal string).
    pub final_amount: Option<String>,
}

/// Query parameters for listing expenses.
#[derive(Debug, Deserialize)]
pub struct ListExpensesQuery {
    /// Filter by kind.
    pub kind: Option<String>,
    /// Filter by state.
    pub state: Option<String>,
    /// Filter by building.
    pub building: Option<Uuid>,
    /// Filter by property.
    pub property: Option<Uuid>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Response for an expense.
#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    /// Expense ID.
    pub id: Uuid,
    /// Kind.
    pub kind: String,
    /// Concept line.
    pub concept: String,
    /// Detail.
    pub description: Option<String>,
    /// Amount.
    pub amount: String,
    /// Date of the expense.
    pub expense_date: String,
    /// State.
    pub state: String,
    /// Contracted service, if any.
    pub service_id: Option<Uuid>,
    /// Property, if any.
    pub property_id: Option<Uuid>,
    /// Building.
    pub building_id: Uuid,
    /// The user who registered the expense.
    pub actor_user_id: Option<Uuid>,
    /// Created at timestamp.
    pub created_at: String,
}

/// Response for an expense annulment.
#[derive(Debug, Serialize)]
pub struct ExpenseAnnulmentResponse {
    /// Annulment ID.
    pub id: Uuid,
    /// Annulled expense ID.
    pub expense_id: Uuid,
    /// Motive.
    pub motive: String,
    /// Detail.
    pub description: Option<String>,
    /// The expense's amount at annulment time.
    pub original_amount: String,
    /// The recorded final amount.
    pub final_amount: String,
    /// When the annulment happened.
    pub annulled_at: String,
    /// The user who annulled the expense.
    pub actor_user_id: Uuid,
}

impl From<expenses::Model> for ExpenseResponse {
    fn from(e: expenses::Model) -> Self {
        Self {
            id: e.id,
            kind: ExpenseKind::from(e.kind).as_str().to_string(),
            concept: e.concept,
            description: e.description,
            amount: e.amount.to_string(),
            expense_date: e.expense_date.to_string(),
            state: ExpenseState::from(e.state).as_str().to_string(),
            service_id: e.service_id,
            property_id: e.property_id,
            building_id: e.building_id,
            actor_user_id: e.actor_user_id,
            created_at: e.created_at.to_rfc3339(),
        }
    }
}

impl From<expense_annulments::Model> for ExpenseAnnulmentResponse {
    fn from(a: expense_annulments::Model) -> Self {
        Self {
            id: a.id,
            expense_id: a.expense_id,
            motive: a.motive,
            description: a.description,
            original_amount: a.original_amount.to_string(),
            final_amount: a.final_amount.to_string(),
            annulled_at: a.annulled_at.to_rfc3339(),
            actor_user_id: a.actor_user_id,
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/expenses` - Create a new expense.
async fn create_expense(
    State(state): State<AppState>,
    actor: ActorId,
    Json(payload): Json<CreateExpenseRequest>,
) -> impl IntoResponse {
    let Some(kind) = ExpenseKind::parse(&payload.kind) else {
        return response::error(
            400,
            "INVALID_KIND",
            "Expense kind must be 'service' or 'maintenance'",
        );
    };

    let Ok(amount) = Decimal::from_str(&payload.amount) else {
        return response::error(400, "INVALID_AMOUNT", "Invalid amount format");
    };

    let input = NewExpense {
        kind,
        concept: payload.concept,
        description: payload.description,
        amount,
        expense_date: payload.expense_date,
        service_id: payload.service_id,
        property_id: payload.property_id,
        building_id: payload.building_id,
        actor_user_id: Some(actor.user_id()),
    };

    let repo = ExpenseRepository::new((*state.db).clone());

    match repo.create_expense(input).await {
        Ok(expense) => {
            info!(expense_id = %expense.id, amount = %expense.amount, "Expense created");
            response::created(ExpenseResponse::from(expense))
        }
        Err(e) => {
            error!(error = %e, "Failed to create expense");
            response::error(e.http_status_code(), e.error_code(), &e.to_string())
        }
    }
}

/// GET `/expenses` - List expenses with filters and pagination.
async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<ListExpensesQuery>,
) -> impl IntoResponse {
    let filter = ExpenseFilter {
        kind: query.kind.as_deref().and_then(ExpenseKind::parse),
        state: query.state.as_deref().and_then(ExpenseState::parse),
        building_id: query.building,
        property_id: query.property,
    };

    let mut page = PageRequest::default();
    if let Some(p) = query.page {
        page.page = p;
    }
    if let Some(pp) = query.per_page {
        page.per_page = pp.min(100);
    }

    let repo = ExpenseRepository::new((*state.db).clone());

    match repo.list_expenses(&filter, &page).await {
        Ok((items, total)) => {
            let responses: Vec<ExpenseResponse> =
                items.into_iter().map(ExpenseResponse::from).collect();
            response::ok(PageResponse::new(responses, page.page, page.per_page, total))
        }
        Err(e) => {
            error!(error = %e, "Failed to list expenses");
            response::error(e.http_status_code(), e.error_code(), &e.to_string())
        }
    }
}

/// GET `/expenses/{expense_id}` - Get an expense with its annulment, if any.
async fn get_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ExpenseRepository::new((*state.db).clone());

    match repo.get_expense(expense_id).await {
        Ok((expense, annulment)) => response::ok(serde_json::json!({
            "expense": ExpenseResponse::from(expense),
            "annulment": annulment.map(ExpenseAnnulmentResponse::from),
        })),
        Err(e) => {
            error!(error = %e, expense_id = %expense_id, "Failed to get expense");
            response::error(e.http_status_code(), e.error_code(), &e.to_string())
        }
    }
}

/// PATCH `/expenses/{expense_id}` - Update an active expense.
async fn update_expense(
    State(state): State<AppState>,
    _actor: ActorId,
    Path(expense_id): Path<Uuid>,
    Json(payload): Json<UpdateExpenseRequest>,
) -> impl IntoResponse {
    let kind = match payload.kind.as_deref().map(ExpenseKind::parse) {
        Some(None) => {
            return response::error(
                400,
                "INVALID_KIND",
                "Expense kind must be 'service' or 'maintenance'",
            );
        }
        Some(Some(kind)) => Some(kind),
        None => None,
    };

    let amount = match payload.amount.as_deref().map(Decimal::from_str) {
        Some(Err(_)) => {
            return response::error(400, "INVALID_AMOUNT", "Invalid amount format");
        }
        Some(Ok(amount)) => Some(amount),
        None => None,
    };

    // Changing the kind re-evaluates the service reference as given in the
    // same request (absent means cleared); otherwise a bare service_id just
    // replaces the current one.
    let service_id = if kind.is_some() {
        Some(payload.service_id)
    } else {
        payload.service_id.map(Some)
    };

    let update = ExpenseUpdate {
        kind,
        concept: payload.concept,
        description: payload.description,
        amount,
        expense_date: payload.expense_date,
        service_id,
        property_id: payload.property_id,
    };

    let repo = ExpenseRepository::new((*state.db).clone());

    match repo.update_expense(expense_id, update).await {
        Ok(expense) => {
            info!(expense_id = %expense.id, "Expense updated");
            response::ok(ExpenseResponse::from(expense))
        }
        Err(e) => {
            error!(error = %e, expense_id = %expense_id, "Failed to update expense");
            response::error(e.http_status_code(), e.error_code(), &e.to_string())
        }
    }
}

/// POST `/expenses/{expense_id}/annulment` - Annul an active expense.
async fn annul_expense(
    State(state): State<AppState>,
    actor: ActorId,
    Path(expense_id): Path<Uuid>,
    Json(payload): Json<AnnulExpenseRequest>,
) -> impl IntoResponse {
    let final_amount = match payload.final_amount.as_deref().map(Decimal::from_str) {
        Some(Err(_)) => {
            return response::error(400, "INVALID_AMOUNT", "Invalid final_amount format");
        }
        Some(Ok(amount)) => Some(amount),
        None => None,
    };

    let input = AnnulExpenseInput {
        expense_id,
        motive: payload.motive,
        description: payload.description,
        final_amount,
        actor_user_id: actor.user_id(),
    };

    let repo = ExpenseRepository::new((*state.db).clone());

    match repo.annul_expense(input).await {
        Ok((expense, annulment)) => {
            info!(
                expense_id = %expense.id,
                annulment_id = %annulment.id,
                actor = %actor.user_id(),
                "Expense annulled"
            );
            response::created(serde_json::json!({
                "expense": ExpenseResponse::from(expense),
                "annulment": ExpenseAnnulmentResponse::from(annulment),
            }))
        }
        Err(e) => {
            error!(error = %e, expense_id = %expense_id, "Failed to annul expense");
            response::error(e.http_status_code(), e.error_code(), &e.to_string())
        }
    }
}
