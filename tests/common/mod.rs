#![allow(dead_code)] // each integration test binary uses a subset of these helpers

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;

use todo_api_rust::config::{AppConfig, Environment, SecurityConfig, ServerConfig};
use todo_api_rust::state::AppState;

/// Secret shared between the in-process server and the token-minting
/// helpers below. Test fixture only; the server itself never issues tokens.
pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

pub struct TestServer {
    pub base_url: String,
}

/// Spawn the app on an ephemeral port with fresh (empty) storage.
/// Each test that needs isolation spawns its own server.
pub async fn spawn_server() -> Result<TestServer> {
    let config = AppConfig {
        environment: Environment::Development,
        server: ServerConfig { port: 0 },
        security: SecurityConfig {
            jwt_secret: TEST_SECRET.to_string(),
            jwt_leeway_secs: 30,
            enable_cors: false,
            cors_origins: vec![],
        },
    };
    config.security.validate()?;

    let router = todo_api_rust::app(AppState::new(config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server");
    });

    Ok(TestServer {
        base_url: format!("http://{}", addr),
    })
}

#[derive(Serialize)]
struct TestClaims<'a> {
    sub: &'a str,
    email: Option<&'a str>,
    exp: i64,
    iat: i64,
}

/// Mint a valid token for `sub`, expiring in one hour.
pub fn mint_token(sub: &str) -> String {
    mint_token_with_exp(sub, (Utc::now() + Duration::hours(1)).timestamp())
}

pub fn mint_token_with_exp(sub: &str, exp: i64) -> String {
    let claims = TestClaims {
        sub,
        email: Some("user@example.com"),
        exp,
        iat: Utc::now().timestamp(),
    };
    mint_custom(&claims, TEST_SECRET)
}

pub fn mint_token_with_secret(sub: &str, secret: &str) -> String {
    let claims = TestClaims {
        sub,
        email: None,
        exp: (Utc::now() + Duration::hours(1)).timestamp(),
        iat: Utc::now().timestamp(),
    };
    mint_custom(&claims, secret)
}

/// Sign an arbitrary claim shape, for tests that need a token missing
/// standard claims.
pub fn mint_custom<T: Serialize>(claims: &T, secret: &str) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("encode token")
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
