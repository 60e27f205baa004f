pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;
pub mod store;

use axum::http::HeaderValue;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::SecurityConfig;
use crate::middleware::{jwt_auth_middleware, validate_owner_middleware};
use crate::state::AppState;

/// Build the application router.
///
/// Public routes (`/`, `/health`) are merged without the auth layers: the
/// allow-list of unauthenticated endpoints is the public route set itself,
/// resolved before the token verifier can run. Everything under
/// `/api/:user_id/tasks` passes through JWT verification and then owner
/// validation before a handler executes.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Protected task API
        .merge(task_routes(state))
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn task_routes(state: AppState) -> Router {
    use axum::routing::patch;
    use handlers::tasks;

    Router::new()
        // Collection operations
        .route(
            "/api/:user_id/tasks",
            get(tasks::task_list).post(tasks::task_create),
        )
        // Record operations
        .route(
            "/api/:user_id/tasks/:task_id",
            get(tasks::task_get)
                .put(tasks::task_update)
                .delete(tasks::task_delete),
        )
        .route(
            "/api/:user_id/tasks/:task_id/complete",
            patch(tasks::task_toggle_completed),
        )
        // Pipeline order: JWT auth runs first, then path-owner validation
        .layer(from_fn(validate_owner_middleware))
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
        .with_state(state)
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Todo API (Rust)",
            "version": version,
            "description": "Multi-user todo backend with per-user data isolation",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "tasks": "/api/:user_id/tasks[/:task_id] (protected)",
                "complete": "/api/:user_id/tasks/:task_id/complete (protected)",
            }
        }
    }))
}

async fn health() -> axum::response::Json<Value> {
    axum::response::Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now()
        }
    }))
}
