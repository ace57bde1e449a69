//! # Availability Handlers
//!
//! Thin wrappers over the availability engine: one teacher's schedule view
//! over a window, and the set of teachers free at an instant.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tutorsync_core::models::{
    availability::{AvailabilityResult, AvailableTeachersResponse},
    TeacherId,
};

use super::{parse_millis, TimeWindowQuery};
use crate::{middleware::error_handling::AppError, services::availability::AvailabilityEngine, ApiState};

#[derive(Debug, Deserialize)]
pub struct InstantQuery {
    pub at: String,
}

/// `GET /api/teachers/:id/availability?start=..&end=..`
///
/// Windows outside the allowed horizon and unknown teachers produce an
/// empty result, not an error.
#[axum::debug_handler]
pub async fn get_schedules_active(
    State(state): State<Arc<ApiState>>,
    Path(teacher_id): Path<TeacherId>,
    Query(query): Query<TimeWindowQuery>,
) -> Result<Json<AvailabilityResult>, AppError> {
    let (start, end) = query.parse()?;

    let result = AvailabilityEngine::new(&state.context)
        .get_schedules_active(teacher_id, start, end)
        .await?;

    Ok(Json(result))
}

/// `GET /api/availability/teachers?at=..`
#[axum::debug_handler]
pub async fn find_available_teachers(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<InstantQuery>,
) -> Result<Json<AvailableTeachersResponse>, AppError> {
    let at = parse_millis("at", &query.at)?;

    let teacher_ids = AvailabilityEngine::new(&state.context)
        .find_available_teachers(at)
        .await?;

    Ok(Json(AvailableTeachersResponse {
        at,
        teacher_ids: teacher_ids.into_iter().collect(),
    }))
}
