use crate::report::{self, CategoryCount, Combined, Histogram, Statistics};
use crate::seed::seed;
use crate::server::state::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tracing::error;

// ── Health ──────────────────────────────────────────────────────────────

pub(crate) fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
    transactions: u64,
}

async fn health(State(state): State<AppState>) -> Result<Json<Health>, ApiError> {
    let transactions = state
        .store
        .count()
        .await
        .map_err(|e| ApiError::log("Health check", e))?;
    Ok(Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        transactions,
    }))
}

// ── Reports ─────────────────────────────────────────────────────────────

pub(crate) fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/statistics", get(statistics))
        .route("/bar-chart", get(bar_chart))
        .route("/pie-chart", get(pie_chart))
        .route("/combined-data", get(combined_data))
}

/// `?month=` is optional; a missing value is handled like an unrecognized month.
#[derive(Debug, Default, Deserialize)]
struct MonthQuery {
    month: Option<String>,
}

impl MonthQuery {
    fn label(&self) -> &str {
        self.month.as_deref().unwrap_or_default()
    }
}

async fn statistics(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Statistics>, ApiError> {
    let stats = state
        .run_report(report::statistics(state.store.as_ref(), query.label()))
        .await
        .map_err(|e| ApiError::log("Statistics", e))?;
    Ok(Json(stats))
}

async fn bar_chart(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Histogram>, ApiError> {
    let histogram = state
        .run_report(report::bar_chart(state.store.as_ref(), query.label()))
        .await
        .map_err(|e| ApiError::log("Bar chart", e))?;
    Ok(Json(histogram))
}

async fn pie_chart(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<CategoryCount>>, ApiError> {
    let distribution = state
        .run_report(report::pie_chart(state.store.as_ref(), query.label()))
        .await
        .map_err(|e| ApiError::log("Pie chart", e))?;
    Ok(Json(distribution))
}

async fn combined_data(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Combined>, ApiError> {
    let combined = state
        .run_report(report::combined(state.store.as_ref(), query.label()))
        .await
        .map_err(|e| ApiError::log("Combined data", e))?;
    Ok(Json(combined))
}

// ── Seeding ─────────────────────────────────────────────────────────────

pub(crate) fn seed_routes() -> Router<AppState> {
    Router::new().route("/initialize-database", post(initialize_database))
}

#[derive(Debug, Serialize)]
struct Seeded {
    message: &'static str,
    upserted: u64,
    failed: usize,
}

async fn initialize_database(State(state): State<AppState>) -> Result<Json<Seeded>, ApiError> {
    let _guard = state.seed_lock.lock().await;
    let report = seed(
        state.source.as_ref(),
        state.store.as_ref(),
        state.fetch_timeout,
    )
    .await
    .map_err(|e| ApiError::log("Initialize database", e))?;
    Ok(Json(Seeded {
        message: "Database initialized with seed data.",
        upserted: report.upserted,
        failed: report.failed(),
    }))
}

// ── Errors ──────────────────────────────────────────────────────────────

/// Every failure is answered with the same opaque 500. The details only go to the log.
#[derive(Debug)]
pub(crate) struct ApiError;

impl ApiError {
    fn log(operation: &str, e: impl std::fmt::Display) -> Self {
        error!("{operation} failed: {e:#}");
        ApiError
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "Internal Server Error" })),
        )
            .into_response()
    }
}
