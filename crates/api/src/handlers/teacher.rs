use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tutorsync_core::models::{
    regular_schedule::{RegisterRegularScheduleRequest, RegularSchedule},
    teacher::{
        CreateTeacherRequest, ReleaseSummary, Teacher, UpdateRegularTimesRequest,
        UpdateRegularTimesResponse,
    },
    TeacherId,
};

use crate::{
    middleware::error_handling::AppError,
    services::{slots::SlotService, teachers::TeacherService},
    ApiState,
};

#[axum::debug_handler]
pub async fn create_teacher(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateTeacherRequest>,
) -> Result<(StatusCode, Json<Teacher>), AppError> {
    let teacher = TeacherService::new(&state.context)
        .create_teacher(payload)
        .await?;

    Ok((StatusCode::CREATED, Json(teacher)))
}

#[axum::debug_handler]
pub async fn get_teacher(
    State(state): State<Arc<ApiState>>,
    Path(teacher_id): Path<TeacherId>,
) -> Result<Json<Teacher>, AppError> {
    let teacher = TeacherService::new(&state.context)
        .get_teacher(teacher_id)
        .await?;

    Ok(Json(teacher))
}

/// Replaces the teacher's weekly offsets and reports how many ad-hoc
/// slots the new offsets superseded.
#[axum::debug_handler]
pub async fn update_regular_times(
    State(state): State<Arc<ApiState>>,
    Path(teacher_id): Path<TeacherId>,
    Json(payload): Json<UpdateRegularTimesRequest>,
) -> Result<Json<UpdateRegularTimesResponse>, AppError> {
    let response = TeacherService::new(&state.context)
        .update_regular_times(teacher_id, payload.regular_times)
        .await?;

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn release_teacher(
    State(state): State<Arc<ApiState>>,
    Path(teacher_id): Path<TeacherId>,
) -> Result<Json<ReleaseSummary>, AppError> {
    let summary = SlotService::new(&state.context)
        .release_teacher_future_slots(teacher_id)
        .await?;

    Ok(Json(summary))
}

#[axum::debug_handler]
pub async fn list_regular_schedules(
    State(state): State<Arc<ApiState>>,
    Path(teacher_id): Path<TeacherId>,
) -> Result<Json<Vec<RegularSchedule>>, AppError> {
    let schedules = TeacherService::new(&state.context)
        .list_regular_schedules(teacher_id)
        .await?;

    Ok(Json(schedules))
}

#[axum::debug_handler]
pub async fn register_regular_schedule(
    State(state): State<Arc<ApiState>>,
    Path(teacher_id): Path<TeacherId>,
    Json(payload): Json<RegisterRegularScheduleRequest>,
) -> Result<(StatusCode, Json<RegularSchedule>), AppError> {
    let schedule = TeacherService::new(&state.context)
        .register_regular_schedule(teacher_id, payload.regular_start_time)
        .await?;

    Ok((StatusCode::CREATED, Json(schedule)))
}
