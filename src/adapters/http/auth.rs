//! Request authentication extractors.
//!
//! In production these would be populated from a validated identity token by
//! auth middleware. For development and testing, identity arrives in
//! `X-User-Id` / `X-User-Email` headers; the real authorization decisions
//! (admin gates) are made against the user record in the ledger either way.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::domain::foundation::UserId;

use super::error::ErrorResponse;

/// Authenticated user context extracted from the request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,

    /// Token-verified email, when the identity layer supplies one.
    pub email: Option<String>,
}

/// Optional caller identity: guest checkout flows accept both.
#[derive(Debug, Clone)]
pub struct MaybeAuthenticated(pub Option<AuthenticatedUser>);

/// Rejection type for AuthenticatedUser extraction.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::new("AUTHENTICATION_REQUIRED", "Authentication is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

fn identity_from_parts(parts: &axum::http::request::Parts) -> Option<AuthenticatedUser> {
    let user_id = parts
        .headers
        .get("X-User-Id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| UserId::new(s).ok())?;

    let email = parts
        .headers
        .get("X-User-Email")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    Some(AuthenticatedUser { user_id, email })
}

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move { identity_from_parts(parts).ok_or(AuthenticationRequired) })
    }
}

impl<S> axum::extract::FromRequestParts<S> for MaybeAuthenticated
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move { Ok(MaybeAuthenticated(identity_from_parts(parts))) })
    }
}
