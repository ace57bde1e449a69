use tracing::info;
use tutorsync_core::{
    errors::{TutorError, TutorResult},
    models::{
        booking::{Booking, BookingStatus, BookingUpdate, CreateBookingRequest},
        BookingId, Sequence,
    },
};

use super::ServiceContext;

pub struct BookingService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> BookingService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Reserves an open slot for a student. At most one booking may hold a
    /// slot at a time; a second claim is a conflict.
    pub async fn book_slot(&self, request: CreateBookingRequest) -> TutorResult<Booking> {
        let stores = &self.ctx.stores;
        let slot = stores
            .calendars
            .find_by_id(request.calendar_id)
            .await?
            .ok_or_else(|| {
                TutorError::NotFound(format!("Calendar slot {} not found", request.calendar_id))
            })?;

        if !slot.is_active {
            return Err(TutorError::Conflict(format!(
                "Calendar slot {} is not open",
                slot.id
            )));
        }

        let now = self.ctx.now();
        if slot.start_time < now {
            return Err(TutorError::Validation(format!(
                "Calendar slot {} has already started",
                slot.id
            )));
        }

        let id = stores.ids.next_id(Sequence::Booking).await?;
        let booking = stores
            .bookings
            .claim(Booking {
                id,
                teacher_id: slot.teacher_id,
                student_id: request.student_id,
                calendar_id: slot.id,
                start_time: slot.start_time,
                end_time: slot.end_time,
                status: BookingStatus::Pending,
                created_time: now,
            })
            .await?
            .ok_or_else(|| TutorError::Conflict(format!("Calendar slot {} is already booked", slot.id)))?;

        info!(booking_id = booking.id, calendar_id = slot.id, student_id = booking.student_id, "Booked slot");
        Ok(booking)
    }

    pub async fn update_booking_status(&self, id: BookingId, status: BookingStatus) -> TutorResult<Booking> {
        let stores = &self.ctx.stores;
        let current = stores
            .bookings
            .find_one(id)
            .await?
            .ok_or_else(|| TutorError::NotFound(format!("Booking {} not found", id)))?;

        if !current.status.can_transition_to(status) {
            return Err(TutorError::Conflict(format!(
                "Booking {} cannot move from {} to {}",
                id, current.status, status
            )));
        }

        let updated = stores
            .bookings
            .update(id, BookingUpdate { status: Some(status) })
            .await?
            .ok_or_else(|| TutorError::NotFound(format!("Booking {} not found", id)))?;

        info!(booking_id = id, from = %current.status, to = %status, "Updated booking status");
        Ok(updated)
    }
}
