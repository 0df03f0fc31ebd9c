use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::{observability, types::Health};

use crate::state::AppState;

pub mod ledger;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics() -> (axum::http::StatusCode, String) {
    observability::encode_metrics()
}

/// Build the full application router: profile lookup, admin ledger routes, health and metrics.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let ops = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics));

    // Frontend-facing routes
    let public = Router::new()
        .route("/api/steam-info", post(ledger::steam_info))
        .route("/api/get-warning", post(ledger::get_warning));

    // Admin routes, unauthenticated
    let admin = Router::new()
        .route("/api/users", get(ledger::list_users))
        .route("/api/update-balance", post(ledger::update_balance))
        .route("/api/update-user", post(ledger::update_user))
        .route("/api/toggle-ban", post(ledger::toggle_ban))
        .route("/api/remove-user", post(ledger::remove_user))
        .route("/api/add-user", post(ledger::add_user));

    ops.merge(public)
        .merge(admin)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one span per request, method and path only
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status code and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
