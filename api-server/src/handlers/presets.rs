//! Sample employee handlers

use axum::{
    extract::{Path, State},
    Json,
};

use attrition_core::logic::features::presets::{find_preset, presets};

use super::predict::run_pipeline;
use crate::models::{PredictionResponse, PresetSummary};
use crate::{AppError, AppResult, AppState};

/// List bundled sample employees
pub async fn list() -> Json<Vec<PresetSummary>> {
    Json(presets().iter().map(PresetSummary::from).collect())
}

/// Score a bundled sample employee
pub async fn predict(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<PredictionResponse>> {
    let preset = find_preset(&name)
        .ok_or_else(|| AppError::NotFound(format!("Preset '{}' not found", name)))?;

    let response = run_pipeline(&state, preset.attributes.clone()).await?;
    Ok(Json(response))
}
