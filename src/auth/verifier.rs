use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

use crate::config::SecurityConfig;

use super::Claims;

/// How many characters of a rejected token are kept for diagnostic logging.
/// The full token is never logged.
const TOKEN_LOG_PREFIX_CHARS: usize = 8;

/// Authentication failures. All of these map to a 401 response; clients
/// must re-authenticate rather than retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Authorization header must use the 'Bearer <token>' format")]
    MalformedHeader,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token missing 'sub' claim (user ID)")]
    MissingSubjectClaim,
}

/// Claims as decoded off the wire, before the subject check.
#[derive(Debug, Deserialize)]
struct RawClaims {
    sub: Option<String>,
    email: Option<String>,
    exp: i64,
    iat: Option<i64>,
}

/// Verify a raw `Authorization` header value and return the signed claims.
///
/// The header must be exactly `Bearer <token>` (case-insensitive scheme);
/// the token must carry a valid HS256 signature for the configured secret,
/// an `exp` in the future (within the configured leeway), and a non-empty
/// `sub` claim. Pure and synchronous: verifying the same header twice
/// yields the same result.
pub fn verify_bearer_header(
    header: Option<&str>,
    security: &SecurityConfig,
) -> Result<Claims, AuthError> {
    let header = header.ok_or(AuthError::MissingHeader)?;
    let token = parse_bearer(header)?;
    verify_token(token, security)
}

/// Split the header into scheme and credential. Exactly two
/// whitespace-separated tokens are accepted, nothing else.
fn parse_bearer(header: &str) -> Result<&str, AuthError> {
    let mut parts = header.split_whitespace();
    let scheme = parts.next().ok_or(AuthError::MalformedHeader)?;
    let token = parts.next().ok_or(AuthError::MalformedHeader)?;

    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader);
    }

    Ok(token)
}

/// Decode and cryptographically verify a compact JWT.
///
/// The algorithm is pinned to HS256: tokens signed with any other
/// algorithm (including "none") are rejected regardless of their payload.
pub fn verify_token(token: &str, security: &SecurityConfig) -> Result<Claims, AuthError> {
    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = security.jwt_leeway_secs;

    let token_data = decode::<RawClaims>(token, &decoding_key, &validation).map_err(|e| {
        let prefix: String = token.chars().take(TOKEN_LOG_PREFIX_CHARS).collect();
        tracing::debug!("Token verification failed (prefix '{}..'): {}", prefix, e);

        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::ImmatureSignature => AuthError::InvalidSignature,
            // Garbage tokens (bad base64, wrong segment count, missing exp)
            _ => AuthError::MalformedHeader,
        }
    })?;

    let raw = token_data.claims;
    let sub = match raw.sub {
        Some(s) if !s.is_empty() => s,
        _ => return Err(AuthError::MissingSubjectClaim),
    };

    Ok(Claims {
        sub,
        email: raw.email,
        exp: raw.exp,
        iat: raw.iat,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    const SECRET: &str = "unit-test-secret-0123456789abcdefghij";

    fn security(leeway: u64) -> SecurityConfig {
        SecurityConfig {
            jwt_secret: SECRET.to_string(),
            jwt_leeway_secs: leeway,
            enable_cors: false,
            cors_origins: vec![],
        }
    }

    fn mint<T: Serialize>(claims: &T, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encode token")
    }

    fn valid_claims(sub: &str) -> Claims {
        Claims {
            sub: sub.to_string(),
            email: Some("user@example.com".to_string()),
            exp: Utc::now().timestamp() + 3600,
            iat: Some(Utc::now().timestamp()),
        }
    }

    #[test]
    fn valid_token_round_trips() {
        let claims = valid_claims("user-123");
        let header = format!("Bearer {}", mint(&claims, SECRET));

        let verified = verify_bearer_header(Some(&header), &security(30)).unwrap();
        assert_eq!(verified, claims);
    }

    #[test]
    fn verification_is_idempotent() {
        let header = format!("Bearer {}", mint(&valid_claims("user-123"), SECRET));
        let security = security(30);

        let first = verify_bearer_header(Some(&header), &security).unwrap();
        let second = verify_bearer_header(Some(&header), &security).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_header_rejected() {
        assert_eq!(
            verify_bearer_header(None, &security(30)),
            Err(AuthError::MissingHeader)
        );
    }

    #[test]
    fn malformed_header_shapes_rejected() {
        let security = security(30);
        let token = mint(&valid_claims("user-123"), SECRET);

        for header in [
            "Bearer".to_string(),
            format!("Token {}", token),
            format!("Bearer {} extra", token),
            token.clone(), // bare token without scheme
        ] {
            assert_eq!(
                verify_bearer_header(Some(&header), &security),
                Err(AuthError::MalformedHeader),
                "header {:?} should be malformed",
                header
            );
        }
    }

    #[test]
    fn scheme_match_is_case_insensitive() {
        let token = mint(&valid_claims("user-123"), SECRET);
        let security = security(30);

        for scheme in ["bearer", "BEARER", "BeArEr"] {
            let header = format!("{} {}", scheme, token);
            assert!(verify_bearer_header(Some(&header), &security).is_ok());
        }
    }

    #[test]
    fn expired_token_rejected_beyond_leeway() {
        let mut claims = valid_claims("user-123");
        claims.exp = Utc::now().timestamp() - 3600;
        let header = format!("Bearer {}", mint(&claims, SECRET));

        assert_eq!(
            verify_bearer_header(Some(&header), &security(30)),
            Err(AuthError::TokenExpired)
        );
    }

    #[test]
    fn expiry_within_leeway_accepted() {
        let mut claims = valid_claims("user-123");
        claims.exp = Utc::now().timestamp() - 5;
        let header = format!("Bearer {}", mint(&claims, SECRET));

        assert!(verify_bearer_header(Some(&header), &security(30)).is_ok());
    }

    #[test]
    fn wrong_secret_rejected() {
        let header = format!(
            "Bearer {}",
            mint(&valid_claims("user-123"), "a-completely-different-secret-value-123")
        );

        assert_eq!(
            verify_bearer_header(Some(&header), &security(30)),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn wrong_algorithm_rejected() {
        // Signed with the right secret but HS384: the pinned HS256
        // validation must refuse to negotiate.
        let token = encode(
            &Header::new(Algorithm::HS384),
            &valid_claims("user-123"),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        let header = format!("Bearer {}", token);

        assert_eq!(
            verify_bearer_header(Some(&header), &security(30)),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn missing_sub_claim_rejected() {
        #[derive(Serialize)]
        struct NoSub {
            email: String,
            exp: i64,
        }

        let claims = NoSub {
            email: "user@example.com".to_string(),
            exp: Utc::now().timestamp() + 3600,
        };
        let header = format!("Bearer {}", mint(&claims, SECRET));

        assert_eq!(
            verify_bearer_header(Some(&header), &security(30)),
            Err(AuthError::MissingSubjectClaim)
        );
    }

    #[test]
    fn empty_sub_claim_rejected() {
        let mut claims = valid_claims("");
        claims.email = None;
        let header = format!("Bearer {}", mint(&claims, SECRET));

        assert_eq!(
            verify_bearer_header(Some(&header), &security(30)),
            Err(AuthError::MissingSubjectClaim)
        );
    }

    #[test]
    fn garbage_token_rejected() {
        assert_eq!(
            verify_bearer_header(Some("Bearer not.a.jwt"), &security(30)),
            Err(AuthError::MalformedHeader)
        );
        assert_eq!(
            verify_bearer_header(Some("Bearer onlyonesegment"), &security(30)),
            Err(AuthError::MalformedHeader)
        );
    }
}
