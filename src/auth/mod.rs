pub mod guard;
pub mod verifier;

pub use guard::{authorize, authorize_resource, AccessDecision, DenyReason};
pub use verifier::{verify_bearer_header, AuthError};

use serde::{Deserialize, Serialize};

/// Verified JWT claim set. Only produced by the token verifier, after the
/// signature, expiry, and subject checks have all passed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: Option<String>,
    pub exp: i64,
    pub iat: Option<i64>,
}

/// Authenticated user context extracted from verified claims.
///
/// Fixed-shape record rather than an open-ended map, so handlers get
/// compile-time guarantees about the fields available to them. Lives only
/// in the current request's extensions and is never persisted or shared.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedIdentity {
    pub subject: String,
    pub email: Option<String>,
    pub expiry: i64,
}

impl From<Claims> for AuthenticatedIdentity {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            email: claims.email,
            expiry: claims.exp,
        }
    }
}
