//! Trusted identity extraction.
//!
//! Authentication happens in front of this service: a gateway verifies
//! credentials and forwards the resolved owner in the
//! [`IDENTITY_HEADER`] header. The middleware here only lifts that header
//! into an [`OwnerId`] request extension; it never re-validates anything.
//! Requests without the header are rejected before reaching a handler.

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};

use taskly_proto::task::OwnerId;
use taskly_proto::wire::{ErrorBody, IDENTITY_HEADER};

/// Middleware that requires a non-empty identity header.
///
/// On success the request gains an [`OwnerId`] extension for handlers to
/// extract; otherwise the request is answered with 401 and an
/// [`ErrorBody`].
pub async fn require_owner(mut request: Request, next: Next) -> Response {
    let owner = request
        .headers()
        .get(IDENTITY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(OwnerId::new);

    let Some(owner) = owner else {
        tracing::warn!("request without identity header rejected");
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorBody::new("authentication required")),
        )
            .into_response();
    };

    request.extensions_mut().insert(owner);
    next.run(request).await
}
