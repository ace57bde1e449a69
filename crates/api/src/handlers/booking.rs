use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tutorsync_core::models::{
    booking::{Booking, CreateBookingRequest, UpdateBookingStatusRequest},
    BookingId,
};

use crate::{middleware::error_handling::AppError, services::bookings::BookingService, ApiState};

#[axum::debug_handler]
pub async fn book_slot(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let booking = BookingService::new(&state.context).book_slot(payload).await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

#[axum::debug_handler]
pub async fn update_booking_status(
    State(state): State<Arc<ApiState>>,
    Path(booking_id): Path<BookingId>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> Result<Json<Booking>, AppError> {
    let booking = BookingService::new(&state.context)
        .update_booking_status(booking_id, payload.status)
        .await?;

    Ok(Json(booking))
}
