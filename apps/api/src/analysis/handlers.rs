//! Axum route handlers for the Analysis API.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use serde::Deserialize;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::analysis::pipeline::run_pipeline;
use crate::analysis::{AnalysisMode, AnalysisRequest, AnalysisResult};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ModeQuery {
    pub mode: Option<String>,
}

/// POST /api/v1/competitor-analysis
///
/// Runs the selected mode's prompt chain. `?mode=` overrides the configured default.
/// Any step failure becomes a 500 whose `detail` is the provider's message.
pub async fn handle_competitor_analysis(
    State(state): State<AppState>,
    query: Result<Query<ModeQuery>, QueryRejection>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let Query(params) = query.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let Json(request) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    request.validate()?;

    let mode = match params.mode.as_deref() {
        Some(raw) => raw
            .parse::<AnalysisMode>()
            .map_err(|e| AppError::Validation(e.to_string()))?,
        None => state.config.default_mode,
    };

    let span = info_span!(
        "competitor_analysis",
        request_id = %Uuid::new_v4(),
        mode = %mode,
        company = %request.company_name,
    );

    let result = run_pipeline(state.completer.as_ref(), mode, &request)
        .instrument(span)
        .await?;

    Ok(Json(result))
}
