pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use rollcall_core::config::Config;
use state::SharedStore;
use tower_http::cors::{Any, CorsLayer};

/// Build the axum Router with both attendance routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(config: Config, store: SharedStore) -> Router {
    let app_state = state::AppState::new(config, store);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/mark", get(routes::mark::mark_attendance))
        .route("/log", post(routes::log::append_log))
        .layer(cors)
        .with_state(app_state)
}

/// Start the attendance server on `host:port`.
pub async fn serve(config: Config, store: SharedStore, host: &str, port: u16) -> anyhow::Result<()> {
    let app = build_router(config, store);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("rollcall server listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
