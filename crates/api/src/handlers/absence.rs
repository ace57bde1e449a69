use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tutorsync_core::models::{
    absence::{AbsenceRequest, CreateAbsenceRequest, UpdateAbsenceStatusRequest},
    AbsenceId,
};

use crate::{middleware::error_handling::AppError, services::absences::AbsenceService, ApiState};

#[axum::debug_handler]
pub async fn request_absence(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateAbsenceRequest>,
) -> Result<(StatusCode, Json<AbsenceRequest>), AppError> {
    let absence = AbsenceService::new(&state.context)
        .request_absence(payload)
        .await?;

    Ok((StatusCode::CREATED, Json(absence)))
}

#[axum::debug_handler]
pub async fn set_absence_status(
    State(state): State<Arc<ApiState>>,
    Path(absence_id): Path<AbsenceId>,
    Json(payload): Json<UpdateAbsenceStatusRequest>,
) -> Result<Json<AbsenceRequest>, AppError> {
    let absence = AbsenceService::new(&state.context)
        .set_absence_status(absence_id, payload.status)
        .await?;

    Ok(Json(absence))
}
