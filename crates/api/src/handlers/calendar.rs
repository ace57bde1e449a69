//! # Calendar Handlers
//!
//! Opening, listing, counting and toggling ad-hoc calendar slots.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tutorsync_core::models::{
    calendar::{CalendarSlot, CountSlotsResponse, OpenSlotRequest, OpenSlotResponse},
    CalendarId, TeacherId,
};

use super::parse_millis;
use crate::{
    middleware::error_handling::AppError,
    services::{
        calendar::CalendarService,
        slots::{OpenSlotOptions, SlotService},
    },
    ApiState,
};

/// `?teacher_id=..&start=..&end=..`
#[derive(Debug, Deserialize)]
pub struct SlotRangeQuery {
    pub teacher_id: TeacherId,
    pub start: String,
    pub end: String,
}

impl SlotRangeQuery {
    fn window(&self) -> Result<(i64, i64), AppError> {
        Ok((parse_millis("start", &self.start)?, parse_millis("end", &self.end)?))
    }
}

#[axum::debug_handler]
pub async fn list_slots(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<SlotRangeQuery>,
) -> Result<Json<Vec<CalendarSlot>>, AppError> {
    let (start, end) = query.window()?;

    let slots = CalendarService::new(&state.context)
        .find_in_range(query.teacher_id, start, end)
        .await?;

    Ok(Json(slots))
}

#[axum::debug_handler]
pub async fn count_open_slots(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<SlotRangeQuery>,
) -> Result<Json<CountSlotsResponse>, AppError> {
    let (start, end) = query.window()?;

    let count = CalendarService::new(&state.context)
        .count_open_in_range(query.teacher_id, start, end)
        .await?;

    Ok(Json(CountSlotsResponse {
        teacher_id: query.teacher_id,
        count,
    }))
}

/// Teacher self-service: subject to the lead time and past checks.
#[axum::debug_handler]
pub async fn open_slot(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<OpenSlotRequest>,
) -> Result<(StatusCode, Json<OpenSlotResponse>), AppError> {
    open_with(&state, payload, false).await
}

/// Admin variant of [`open_slot`] that may open slots in the past.
#[axum::debug_handler]
pub async fn admin_open_slot(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<OpenSlotRequest>,
) -> Result<(StatusCode, Json<OpenSlotResponse>), AppError> {
    open_with(&state, payload, true).await
}

async fn open_with(
    state: &ApiState,
    payload: OpenSlotRequest,
    exempt: bool,
) -> Result<(StatusCode, Json<OpenSlotResponse>), AppError> {
    let options = OpenSlotOptions {
        exempt,
        external_id: payload.external_id,
    };

    let id = SlotService::new(&state.context)
        .open_slot(payload.teacher_id, payload.start_time, payload.end_time, options)
        .await?;

    Ok((StatusCode::CREATED, Json(OpenSlotResponse { id })))
}

#[axum::debug_handler]
pub async fn toggle_slot(
    State(state): State<Arc<ApiState>>,
    Path(calendar_id): Path<CalendarId>,
) -> Result<Json<CalendarSlot>, AppError> {
    let slot = SlotService::new(&state.context)
        .toggle_slot(calendar_id)
        .await?;

    Ok(Json(slot))
}
