use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::auth::{verify_bearer_header, AuthError, AuthenticatedIdentity};
use crate::error::ApiError;
use crate::state::AppState;

/// JWT authentication middleware: verifies the bearer token and injects
/// the authenticated identity into request extensions for downstream
/// stages (owner validation, handlers).
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = match request.headers().get(AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| {
            tracing::warn!("Authorization header contains non-ASCII bytes");
            ApiError::from(AuthError::MalformedHeader)
        })?),
        None => None,
    };

    let claims = verify_bearer_header(header, &state.config.security).map_err(|e| {
        tracing::warn!("Authentication failed: {}", e);
        ApiError::from(e)
    })?;

    let identity = AuthenticatedIdentity::from(claims);
    tracing::debug!("Authenticated subject '{}'", identity.subject);
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
