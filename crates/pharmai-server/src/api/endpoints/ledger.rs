//! Inventory, sales, history and dashboard endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use pharmai_core::ledger::EXPIRY_WINDOW_DAYS;
use pharmai_core::models::{
    Analytics, ExpiryAlert, HistoryEntry, InventoryItem, SaleRecord, SaleRequest,
};

use crate::api::error::ApiError;
use crate::state::AppState;

/// `GET /api/inventory`
pub async fn inventory(State(state): State<AppState>) -> Result<Json<Vec<InventoryItem>>, ApiError> {
    Ok(Json(state.ledger.list_inventory()?))
}

/// `GET /api/patient-history`, most recent first.
pub async fn history(State(state): State<AppState>) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    Ok(Json(state.ledger.list_history()?))
}

/// `GET /api/sales`
pub async fn sales(State(state): State<AppState>) -> Result<Json<Vec<SaleRecord>>, ApiError> {
    Ok(Json(state.ledger.list_sales()?))
}

/// `POST /api/sales`
pub async fn record_sale(
    State(state): State<AppState>,
    payload: Result<Json<SaleRequest>, JsonRejection>,
) -> Result<Json<SaleRecord>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    Ok(Json(state.ledger.record_sale(request)?))
}

/// `GET /api/analytics`
pub async fn analytics(State(state): State<AppState>) -> Result<Json<Analytics>, ApiError> {
    Ok(Json(state.ledger.analytics(Utc::now())?))
}

/// `GET /api/expiry-alerts`
pub async fn expiry_alerts(State(state): State<AppState>) -> Result<Json<Vec<ExpiryAlert>>, ApiError> {
    let today = Utc::now().date_naive();
    Ok(Json(state.ledger.expiry_alerts(today, EXPIRY_WINDOW_DAYS)?))
}
