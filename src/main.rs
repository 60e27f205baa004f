use anyhow::Context;

use todo_api_rust::config::AppConfig;
use todo_api_rust::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up TODO_JWT_SECRET etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Fail fast: a missing, short, or placeholder JWT secret must stop the
    // process before it binds a port.
    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!("Starting Todo API in {:?} mode", config.environment);

    let port = config.server.port;
    let state = AppState::new(config);
    let app = todo_api_rust::app(state);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Todo API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}
