//! Drug-name catalogue and typeahead.

use axum::extract::{Query, State};
use axum::Json;
use pharmai_core::store::{Suggestion, DEFAULT_SUGGESTION_LIMIT};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::state::AppState;

const MAX_SUGGESTIONS: usize = 25;

#[derive(Debug, Deserialize)]
pub struct SuggestParams {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

/// `GET /api/drugs`: inventory names plus every drug in the interaction table.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.ledger.catalogue(&state.store)?))
}

/// `GET /api/drugs/suggest?q=&limit=`
pub async fn suggest(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Json<Vec<Suggestion>> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_SUGGESTION_LIMIT)
        .min(MAX_SUGGESTIONS);
    Json(state.store.suggest(&params.q, limit))
}
