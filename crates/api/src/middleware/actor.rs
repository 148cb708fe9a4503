//! Actor identity extraction for mutating requests.
//!
//! The upstream identity provider authenticates users and forwards the
//! acting user's id in the `X-Actor-Id` header; this service treats it as
//! an opaque required UUID.

use axum::{extract::FromRequestParts, http::request::Parts, response::Response};
use uuid::Uuid;

use crate::response;
use arrenda_shared::AppError;

/// Header carrying the acting user's id.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Extractor for the acting user on mutating requests.
///
/// Use this in handlers that record an actor:
///
/// ```ignore
/// async fn handler(actor: ActorId) -> impl IntoResponse {
///     let user_id = actor.user_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ActorId(pub Uuid);

impl ActorId {
    /// Returns the acting user's id.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.0
    }
}

impl<S> FromRequestParts<S> for ActorId
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|h| h.to_str().ok());

        let Some(raw) = header else {
            return Err(reject("X-Actor-Id header is required"));
        };

        raw.parse::<Uuid>()
            .map(Self)
            .map_err(|_| reject("X-Actor-Id header must be a UUID"))
    }
}

fn reject(message: &str) -> Response {
    let err = AppError::Unauthorized(message.to_string());
    response::error(err.status_code(), err.error_code(), &err.to_string())
}
