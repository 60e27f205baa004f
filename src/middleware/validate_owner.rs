use axum::{
    extract::{Path, Request},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

use crate::auth::{self, AccessDecision, AuthenticatedIdentity};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct OwnerPath {
    pub user_id: String,
}

/// Middleware that compares the resource owner declared in the path
/// against the authenticated subject from the JWT middleware.
///
/// Runs before any handler logic so a mismatch is rejected without ever
/// consulting storage — a denial cannot reveal whether the target
/// resource exists.
pub async fn validate_owner_middleware(
    Path(path): Path<OwnerPath>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = request
        .extensions()
        .get::<AuthenticatedIdentity>()
        .ok_or_else(|| {
            ApiError::unauthorized("JWT authentication required before owner validation")
        })?;

    if let AccessDecision::Deny(reason) = auth::authorize(&path.user_id, identity) {
        tracing::warn!(
            "Owner validation failed for subject '{}': {:?}",
            identity.subject,
            reason
        );
        return Err(ApiError::forbidden("Access denied: user ID mismatch"));
    }

    Ok(next.run(request).await)
}
