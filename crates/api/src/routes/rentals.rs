//! Rental lifecycle routes: detail, installments, cancellation, finalization.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::ActorId, response};
use arrenda_core::rental::{CancellationRequest, DepositSettlement};
use arrenda_db::{
    RentalRepository,
    entities::{deposits, monthly_installments, rental_cancellations, rentals},
};

/// Creates the rental routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rentals/{rental_id}", get(get_rental))
        .route("/rentals/{rental_id}/installments", get(list_installments))
        .route("/rentals/{rental_id}/cancellation", post(cancel_rental))
        .route("/rentals/{rental_id}/finalization", post(finalize_rental))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Deposit settlement fields shared by cancellation and finalization.
#[derive(Debug, Deserialize)]
pub struct SettlementRequest {
    /// Amount returned to the tenant (decimal string).
    pub returned_amount: String,
    /// Amount withheld as a penalty (decimal string).
    pub penalty_amount: String,
    /// Detail of the returned amount.
    pub return_description: Option<String>,
    /// Detail of the withheld penalty.
    pub penalty_description: Option<String>,
    /// Date the deposit was settled (YYYY-MM-DD).
    pub return_date: NaiveDate,
}

/// Request body for cancelling a rental.
#[derive(Debug, Deserialize)]
pub struct CancelRentalRequest {
    /// The reason for the cancellation (required).
    pub motive: String,
    /// Reason attached to the returned amount.
    pub return_motive: Option<String>,
    /// Reason attached to the penalty.
    pub penalty_motive: Option<String>,
    /// How the deposit is settled.
    #[serde(flatten)]
    pub settlement: SettlementRequest,
}

/// Request body for finalizing a rental.
#[derive(Debug, Deserialize)]
pub struct FinalizeRentalRequest {
    /// How the deposit is settled.
    #[serde(flatten)]
    pub settlement: SettlementRequest,
}

/// Response for a rental header.
#[derive(Debug, Serialize)]
pub struct RentalResponse {
    /// Rental ID.
    pub id: Uuid,
    /// Property the rental is for.
    pub property_id: Uuid,
    /// Monthly rent amount.
    pub monthly_amount: String,
    /// Day of the month rent is due.
    pub payment_day: i16,
    /// State.
    pub state: String,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

/// Response for a deposit.
#[derive(Debug, Serialize)]
pub struct DepositResponse {
    /// Deposit ID.
    pub id: Uuid,
    /// Deposit cap.
    pub total: String,
    /// Running balance.
    pub current_balance: String,
    /// Returned amount, once settled.
    pub returned_amount: Option<String>,
    /// Penalty amount, once settled.
    pub penalty_amount: Option<String>,
    /// Detail of the returned amount.
    pub return_description: Option<String>,
    /// Detail of the withheld penalty.
    pub penalty_description: Option<String>,
    /// Settlement date.
    pub return_date: Option<String>,
}

/// Response for a monthly installment.
#[derive(Debug, Serialize)]
pub struct InstallmentResponse {
    /// Installment ID.
    pub id: Uuid,
    /// Human identifier (e.g. "2026-03").
    pub identifier: String,
    /// Period start date.
    pub period_start: String,
    /// Period end date.
    pub period_end: String,
    /// Amount due.
    pub amount_total: String,
    /// Amount paid so far.
    pub amount_paid: String,
    /// Date the installment was fully paid, if it is.
    pub payment_date: Option<String>,
    /// State.
    pub state: String,
}

/// Response for a rental cancellation record.
#[derive(Debug, Serialize)]
pub struct CancellationResponse {
    /// Cancellation ID.
    pub id: Uuid,
    /// Motive.
    pub motive: String,
    /// Returned amount.
    pub returned_amount: String,
    /// Penalty amount.
    pub penalty_amount: String,
    /// Reason attached to the returned amount.
    pub return_motive: Option<String>,
    /// Reason attached to the penalty.
    pub penalty_motive: Option<String>,
    /// When the cancellation happened.
    pub cancelled_at: String,
}

impl From<rentals::Model> for RentalResponse {
    fn from(r: rentals::Model) -> Self {
        Self {
            id: r.id,
            property_id: r.property_id,
            monthly_amount: r.monthly_amount.to_string(),
            payment_day: r.payment_day,
            state: arrenda_core::rental::RentalState::from(r.state).as_str().to_string(),
            created_at: r.created_at.to_rfc3339(),
            updated_at: r.updated_at.to_rfc3339(),
        }
    }
}

impl From<deposits::Model> for DepositResponse {
    fn from(d: deposits::Model) -> Self {
        Self {
            id: d.id,
            total: d.total.to_string(),
            current_balance: d.current_balance.to_string(),
            returned_amount: d.returned_amount.map(|a| a.to_string()),
            penalty_amount: d.penalty_amount.map(|a| a.to_string()),
            return_description: d.return_description,
            penalty_description: d.penalty_description,
            return_date: d.return_date.map(|d| d.to_string()),
        }
    }
}

impl From<monthly_installments::Model> for InstallmentResponse {
    fn from(i: monthly_installments::Model) -> Self {
        Self {
            id: i.id,
            identifier: i.identifier,
            period_start: i.period_start.to_string(),
            period_end: i.period_end.to_string(),
            amount_total: i.amount_total.to_string(),
            amount_paid: i.amount_paid.to_string(),
            payment_date: i.payment_date.map(|d| d.to_string()),
            state: arrenda_core::ledger::InstallmentState::from(i.state)
                .as_str()
                .to_string(),
        }
    }
}

impl From<rental_cancellations::Model> for CancellationResponse {
    fn from(c: rental_cancellations::Model) -> Self {
        Self {
            id: c.id,
            motive: c.motive,
            returned_amount: c.returned_amount.to_string(),
            penalty_amount: c.penalty_amount.to_string(),
            return_motive: c.return_motive,
            penalty_motive: c.penalty_motive,
            cancelled_at: c.cancelled_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/rentals/{rental_id}` - Rental detail with deposit and installments.
async fn get_rental(
    State(state): State<AppState>,
    Path(rental_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = RentalRepository::new((*state.db).clone());

    match repo.get_rental(rental_id).await {
        Ok(ledger) => response::ok(serde_json::json!({
            "rental": RentalResponse::from(ledger.rental),
            "deposit": ledger.deposit.map(DepositResponse::from),
            "installments": ledger
                .installments
                .into_iter()
                .map(InstallmentResponse::from)
                .collect::<Vec<_>>(),
            "cancellation": ledger.cancellation.map(CancellationResponse::from),
        })),
        Err(e) => {
            error!(error = %e, rental_id = %rental_id, "Failed to get rental");
            response::error(e.http_status_code(), e.error_code(), &e.to_string())
        }
    }
}

/// GET `/rentals/{rental_id}/installments` - List the rental's installments.
async fn list_installments(
    State(state): State<AppState>,
    Path(rental_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = RentalRepository::new((*state.db).clone());

    match repo.list_installments(rental_id).await {
        Ok(installments) => response::ok(serde_json::json!({
            "installments": installments
                .into_iter()
                .map(InstallmentResponse::from)
                .collect::<Vec<_>>(),
        })),
        Err(e) => {
            error!(error = %e, rental_id = %rental_id, "Failed to list installments");
            response::error(e.http_status_code(), e.error_code(), &e.to_string())
        }
    }
}

/// POST `/rentals/{rental_id}/cancellation` - Cancel an active rental.
async fn cancel_rental(
    State(state): State<AppState>,
    actor: ActorId,
    Path(rental_id): Path<Uuid>,
    Json(payload): Json<CancelRentalRequest>,
) -> impl IntoResponse {
    let settlement = match parse_settlement(&payload.settlement) {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    let request = CancellationRequest {
        motive: payload.motive,
        return_motive: payload.return_motive,
        penalty_motive: payload.penalty_motive,
        settlement,
    };

    let repo = RentalRepository::new((*state.db).clone());

    match repo.cancel_rental(rental_id, &request).await {
        Ok(outcome) => {
            info!(
                rental_id = %rental_id,
                cancellation_id = %outcome.cancellation.id,
                actor = %actor.user_id(),
                "Rental cancelled"
            );
            response::created(serde_json::json!({
                "rental": RentalResponse::from(outcome.rental),
                "deposit": DepositResponse::from(outcome.deposit),
                "cancellation": CancellationResponse::from(outcome.cancellation),
            }))
        }
        Err(e) => {
            error!(error = %e, rental_id = %rental_id, "Failed to cancel rental");
            response::error(e.http_status_code(), e.error_code(), &e.to_string())
        }
    }
}

/// POST `/rentals/{rental_id}/finalization` - Finalize an active rental.
async fn finalize_rental(
    State(state): State<AppState>,
    actor: ActorId,
    Path(rental_id): Path<Uuid>,
    Json(payload): Json<FinalizeRentalRequest>,
) -> impl IntoResponse {
    let settlement = match parse_settlement(&payload.settlement) {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    let repo = RentalRepository::new((*state.db).clone());

    match repo.finalize_rental(rental_id, &settlement).await {
        Ok(outcome) => {
            info!(
                rental_id = %rental_id,
                actor = %actor.user_id(),
                "Rental finalized"
            );
            response::ok(serde_json::json!({
                "rental": RentalResponse::from(outcome.rental),
                "deposit": DepositResponse::from(outcome.deposit),
            }))
        }
        Err(e) => {
            error!(error = %e, rental_id = %rental_id, "Failed to finalize rental");
            response::error(e.http_status_code(), e.error_code(), &e.to_string())
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_settlement(
    request: &SettlementRequest,
) -> Result<DepositSettlement, axum::response::Response> {
    let returned_amount = Decimal::from_str(&request.returned_amount).map_err(|_| {
        response::error(400, "INVALID_AMOUNT", "Invalid returned_amount format")
    })?;
    let penalty_amount = Decimal::from_str(&request.penalty_amount).map_err(|_| {
        response::error(400, "INVALID_AMOUNT", "Invalid penalty_amount format")
    })?;

    Ok(DepositSettlement {
        returned_amount,
        penalty_amount,
        return_description: request.return_description.clone(),
        penalty_description: request.penalty_description.clone(),
        return_date: request.return_date,
    })
}
