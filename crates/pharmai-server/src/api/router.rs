//! API router.
//!
//! Layers (outermost → innermost): CORS → request tracing → handler.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::state::AppState;

/// Build the API router with every endpoint under `/api/`.
pub fn api_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/check-interaction", post(endpoints::interaction::check))
        .route("/inventory", get(endpoints::ledger::inventory))
        .route("/patient-history", get(endpoints::ledger::history))
        .route(
            "/sales",
            get(endpoints::ledger::sales).post(endpoints::ledger::record_sale),
        )
        .route("/analytics", get(endpoints::ledger::analytics))
        .route("/expiry-alerts", get(endpoints::ledger::expiry_alerts))
        .route("/drugs", get(endpoints::drugs::list))
        .route("/drugs/suggest", get(endpoints::drugs::suggest))
        .route("/chat", post(endpoints::chat::send))
        .route("/health", get(endpoints::health::check))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
