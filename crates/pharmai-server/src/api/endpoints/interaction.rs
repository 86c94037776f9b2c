//! Drug-pair interaction check.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use pharmai_core::{InteractionQueryResult, RiskLevel, Severity, Source};
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, MISSING_INPUT};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    pub drug1: Option<String>,
    #[serde(default)]
    pub drug2: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct InteractionResponse {
    pub interaction: bool,
    pub severity: Option<Severity>,
    pub title: String,
    pub risk: Option<RiskLevel>,
    pub effects: Option<String>,
    pub mechanism: Option<String>,
    pub recommendation: Option<String>,
    pub source: Source,
    pub message: Option<String>,
}

impl From<InteractionQueryResult> for InteractionResponse {
    fn from(result: InteractionQueryResult) -> Self {
        let title = match (result.found, result.severity) {
            (true, Some(severity)) => format!("{} Interaction", severity),
            (true, None) => "Possible Interaction".to_string(),
            (false, _) => "No Interaction Found".to_string(),
        };

        Self {
            interaction: result.found,
            severity: result.severity,
            title,
            risk: result.risk,
            effects: result.effects,
            mechanism: result.mechanism,
            recommendation: result.recommendation,
            source: result.source,
            message: result.message,
        }
    }
}

/// `POST /api/check-interaction`
///
/// The resolver may block on the inference service, so it runs on the
/// blocking pool under a deadline. A missed deadline or a crashed task yields
/// the same hedged answer as a failed inference call.
pub async fn check(
    State(state): State<AppState>,
    payload: Result<Json<CheckRequest>, JsonRejection>,
) -> Result<Json<InteractionResponse>, ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::BadRequest(MISSING_INPUT.into()))?;

    let (drug1, drug2) = match (request.drug1, request.drug2) {
        (Some(a), Some(b)) if !a.trim().is_empty() && !b.trim().is_empty() => (a, b),
        _ => return Err(ApiError::BadRequest(MISSING_INPUT.into())),
    };

    let resolver = state.resolver.clone();
    let task = tokio::task::spawn_blocking(move || resolver.check(&drug1, &drug2));

    let result = match tokio::time::timeout(state.config.request_timeout(), task).await {
        Ok(Ok(outcome)) => outcome?,
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Interaction check task failed");
            InteractionQueryResult::unverified()
        }
        Err(_) => {
            tracing::warn!(
                timeout_secs = state.config.request_timeout().as_secs(),
                "Interaction check timed out"
            );
            InteractionQueryResult::unverified()
        }
    };

    Ok(Json(result.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharmai_core::models::UNVERIFIED_MESSAGE;

    #[test]
    fn test_title_for_hit() {
        let response = InteractionResponse::from(InteractionQueryResult {
            found: true,
            severity: Some(Severity::Major),
            risk: Some(RiskLevel::High),
            effects: None,
            mechanism: None,
            recommendation: None,
            message: None,
            source: Source::Database,
        });
        assert_eq!(response.title, "Major Interaction");
        assert!(response.interaction);
    }

    #[test]
    fn test_title_for_miss() {
        let response = InteractionResponse::from(InteractionQueryResult::unverified());
        assert_eq!(response.title, "No Interaction Found");
        assert_eq!(response.message.as_deref(), Some(UNVERIFIED_MESSAGE));
        assert_eq!(response.source, Source::None);
    }
}
