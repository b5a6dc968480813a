//! Engine status handler

use axum::{extract::State, Json};

use attrition_core::EngineStatus;

use crate::AppState;

pub async fn get(State(state): State<AppState>) -> Json<EngineStatus> {
    Json(state.orchestrator.status())
}
