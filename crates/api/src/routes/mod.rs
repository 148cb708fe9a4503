//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod expenses;
pub mod health;
pub mod payments;
pub mod rentals;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(payments::routes())
        .merge(rentals::routes())
        .merge(expenses::routes())
}
