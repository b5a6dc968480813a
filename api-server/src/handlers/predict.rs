//! Prediction handlers

use axum::{extract::{rejection::JsonRejection, State}, Json};

use attrition_core::RawAttributes;

use crate::models::{EmployeeForm, PredictionResponse};
use crate::{AppResult, AppState};

/// Score one submitted form
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<EmployeeForm>, JsonRejection>,
) -> AppResult<Json<PredictionResponse>> {
    let Json(form) = payload?;
    form.check()?;

    let response = run_pipeline(&state, form.into_raw_attributes()).await?;
    tracing::info!(
        "Prediction {}: {} ({})",
        response.id,
        response.verdict,
        response.probability_percent
    );

    Ok(Json(response))
}

/// Run the (CPU-bound) core pipeline off the async workers
pub(crate) async fn run_pipeline(state: &AppState, raw: RawAttributes) -> AppResult<PredictionResponse> {
    let orchestrator = state.orchestrator.clone();
    let prediction = tokio::task::spawn_blocking(move || orchestrator.run(&raw)).await??;
    Ok(PredictionResponse::from(prediction))
}
