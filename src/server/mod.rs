//! The HTTP surface: report endpoints, database initialization and a health check.

mod routes;
mod state;

use crate::error::Res;
use crate::utils;
use anyhow::Context;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub(crate) use state::AppState;

/// Build the axum Router with all routes and middleware.
pub(crate) fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::report_routes())
        .merge(routes::seed_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // The dashboard is served from a different origin during local development.
        .layer(CorsLayer::permissive())
}

/// Start the HTTP server and run until Ctrl-C.
pub(crate) async fn serve(state: AppState, host: &str, port: u16) -> Res<()> {
    let router = build_router(state);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Unable to listen on {addr}"))?;
    info!("Starting server on {addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(utils::interrupted())
        .await
        .context("The server stopped unexpectedly")?;

    info!("Server stopped");
    Ok(())
}
