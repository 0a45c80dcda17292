//! Bearer token middleware.
//!
//! [`require_identity`] resolves the caller before the handler runs and
//! stores an [`AuthContext`] in the request extensions. Handlers take the
//! context as an extractor argument.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::{error::AppError, models::AuthContext, AppState};

/// Reject the request with 401 unless its bearer token maps to a local user
pub async fn require_identity(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let ctx = state
        .services
        .identity
        .resolve(authorization.as_deref())
        .await
        .map_err(|e| {
            tracing::warn!(path = %req.uri().path(), "Authentication failed: {}", e);
            e
        })?;

    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("no resolved caller on request".to_string()))
    }
}
