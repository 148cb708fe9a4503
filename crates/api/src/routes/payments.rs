//! Payment ledger routes: apply and annul payments.

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
use arrenda_core::ledger::{AnnulPaymentInput, ApplyPaymentInput, PaymentTarget};
use arrenda_db::{
    PaymentRepository,
    entities::{payment_annulments, payments},
};

/// Creates the payment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", post(apply_payment))
        .route("/payments/{payment_id}", get(get_payment))
        .route("/payments/{payment_id}/annulment", post(annul_payment))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for applying a payment.
#[derive(Debug, Deserialize)]
pub struct ApplyPaymentRequest {
    /// The balance record to apply against.
    pub target: TargetRequest,
    /// The amount to apply (decimal string, positive).
    pub amount: String,
    /// The date the payment was made (YYYY-MM-DD).
    pub payment_date: NaiveDate,
    /// Optional payment method.
    pub method: Option<String>,
    /// Optional account number.
    pub account: Option<String>,
    /// Optional bank name.
    pub bank: Option<String>,
    /// Optional operation reference.
    pub reference: Option<String>,
    /// Optional description.
    pub description: Option<String>,
}

/// Target balance record reference.
#[derive(Debug, Deserialize)]
pub struct TargetRequest {
    /// Target kind: "deposit" or "installment".
    pub kind: String,
    /// Target record id.
    pub id: Uuid,
}

/// Request body for annulling a payment.
#[derive(Debug, Deserialize)]
pub struct AnnulPaymentRequest {
    /// The reason for the annulment (required).
    pub motive: String,
    /// Detail of the annulment.
    #[serde(default)]
    pub description: String,
}

/// Response for a payment.
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    /// Payment ID.
    pub id: Uuid,
    /// Amount.
    pub amount: String,
    /// Payment date.
    pub payment_date: String,
    /// State.
    pub state: String,
    /// Payment method.
    pub method: Option<String>,
    /// Account number.
    pub account: Option<String>,
    /// Bank name.
    pub bank: Option<String>,
    /// Operation reference.
    pub reference: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Target deposit, if any.
    pub deposit_id: Option<Uuid>,
    /// Target installment, if any.
    pub installment_id: Option<Uuid>,
    /// Created at timestamp.
    pub created_at: String,
}

/// Response for a payment annulment.
#[derive(Debug, Serialize)]
pub struct AnnulmentResponse {
    /// Annulment ID.
    pub id: Uuid,
    /// Annulled payment ID.
    pub payment_id: Uuid,
    /// Motive.
    pub motive: String,
    /// Description.
    pub description: String,
    /// The payment's amount at annulment time.
    pub original_amount: String,
    /// The amount the payment stands at after annulment.
    pub final_amount: String,
    /// When the annulment happened.
    pub annulled_at: String,
    /// The user who annulled the payment.
    pub actor_user_id: Uuid,
}

impl From<payments::Model> for PaymentResponse {
    fn from(p: payments::Model) -> Self {
        Self {
            id: p.id,
            amount: p.amount.to_string(),
            payment_date: p.payment_date.to_string(),
            state: state_to_string(&p.state),
            method: p.method,
            account: p.account,
            bank: p.bank,
            reference: p.reference,
            description: p.description,
            deposit_id: p.deposit_id,
            installment_id: p.installment_id,
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

impl From<payment_annulments::Model> for AnnulmentResponse {
    fn from(a: payment_annulments::Model) -> Self {
        Self {
            id: a.id,
            payment_id: a.payment_id,
            motive: a.motive,
            description: a.description,
            original_amount: a.original_amount.to_string(),
            final_amount: a.final_amount.to_string(),
            annulled_at: a.annulled_at.to_rfc3339(),
            actor_user_id: a.actor_user_id,
        }
    }
}

fn state_to_string(state: &arrenda_db::entities::sea_orm_active_enums::PaymentState) -> String {
    arrenda_core::ledger::PaymentState::from(state.clone())
        .as_str()
        .to_string()
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/payments` - Apply a payment against a deposit or installment.
async fn apply_payment(
    State(state): State<AppState>,
    _actor: ActorId,
    Json(payload): Json<ApplyPaymentRequest>,
) -> impl IntoResponse {
    let Some(target) = parse_target(&payload.target) else {
        return response::error(
            400,
            "INVALID_TARGET",
            "Target kind must be 'deposit' or 'installment'",
        );
    };

    let Ok(amount) = Decimal::from_str(&payload.amount) else {
        return response::error(400, "INVALID_AMOUNT", "Invalid amount format");
    };

    let input = ApplyPaymentInput {
        target,
        amount,
        payment_date: payload.payment_date,
        method: payload.method,
        account: payload.account,
        bank: payload.bank,
        reference: payload.reference,
        description: payload.description,
    };

    let repo = PaymentRepository::new((*state.db).clone());

    match repo.apply_payment(input).await {
        Ok(payment) => {
            info!(payment_id = %payment.id, amount = %payment.amount, "Payment applied");
            response::created(PaymentResponse::from(payment))
        }
        Err(e) => {
            error!(error = %e, "Failed to apply payment");
            response::error(e.http_status_code(), e.error_code(), &e.to_string())
        }
    }
}

/// GET `/payments/{payment_id}` - Get a payment with its annulment, if any.
async fn get_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PaymentRepository::new((*state.db).clone());

    match repo.get_payment(payment_id).await {
        Ok((payment, annulment)) => response::ok(serde_json::json!({
            "payment": PaymentResponse::from(payment),
            "annulment": annulment.map(AnnulmentResponse::from),
        })),
        Err(e) => {
            error!(error = %e, payment_id = %payment_id, "Failed to get payment");
            response::error(e.http_status_code(), e.error_code(), &e.to_string())
        }
    }
}

/// POST `/payments/{payment_id}/annulment` - Annul an active payment.
async fn annul_payment(
    State(state): State<AppState>,
    actor: ActorId,
    Path(payment_id): Path<Uuid>,
    Json(payload): Json<AnnulPaymentRequest>,
) -> impl IntoResponse {
    let input = AnnulPaymentInput {
        payment_id,
        motive: payload.motive,
        description: payload.description,
        actor_user_id: actor.user_id(),
    };

    let repo = PaymentRepository::new((*state.db).clone());

    match repo.annul_payment(input).await {
        Ok((payment, annulment)) => {
            info!(
                payment_id = %payment.id,
                annulment_id = %annulment.id,
                actor = %actor.user_id(),
                "Payment annulled"
            );
            response::created(serde_json::json!({
                "payment": PaymentResponse::from(payment),
                "annulment": AnnulmentResponse::from(annulment),
            }))
        }
        Err(e) => {
            error!(error = %e, payment_id = %payment_id, "Failed to annul payment");
            response::error(e.http_status_code(), e.error_code(), &e.to_string())
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_target(target: &TargetRequest) -> Option<PaymentTarget> {
    match target.kind.to_lowercase().as_str() {
        "deposit" => Some(PaymentTarget::Deposit(target.id)),
        "installment" => Some(PaymentTarget::Installment(target.id)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target() {
        let id = Uuid::new_v4();
        assert_eq!(
            parse_target(&TargetRequest {
                kind: "deposit".to_string(),
                id
            }),
            Some(PaymentTarget::Deposit(id))
        );
        assert_eq!(
            parse_target(&TargetRequest {
                kind: "Installment".to_string(),
                id
            }),
            Some(PaymentTarget::Installment(id))
        );
        assert_eq!(
            parse_target(&TargetRequest {
                kind: "rental".to_string(),
                id
            }),
            None
        );
    }
}
