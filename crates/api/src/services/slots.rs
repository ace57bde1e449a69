//! Teacher-facing slot operations: opening, toggling and the bulk release
//! performed when a teacher leaves the platform.

use tracing::{debug, info, warn};
use tutorsync_core::{
    errors::{TutorError, TutorResult},
    models::{
        booking::{BookingStatus, BookingUpdate},
        calendar::CalendarSlot,
        teacher::ReleaseSummary,
        CalendarId, TeacherId,
    },
    time::Millis,
};
use tutorsync_db::repositories::absence::AbsenceQuery;

use super::{calendar::CalendarService, ServiceContext};

/// Knobs for [`SlotService::open_slot`].
#[derive(Debug, Clone, Default)]
pub struct OpenSlotOptions {
    /// Skips the lead-time and past checks. Used for admin-created slots.
    pub exempt: bool,
    pub external_id: Option<String>,
}

pub struct SlotService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SlotService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn open_slot(
        &self,
        teacher_id: TeacherId,
        start_time: Millis,
        end_time: Millis,
        options: OpenSlotOptions,
    ) -> TutorResult<CalendarId> {
        self.validate_slot_bounds(start_time, end_time, options.exempt)?;

        let stores = &self.ctx.stores;
        if stores.teachers.get(teacher_id).await?.is_none() {
            return Err(TutorError::NotFound(format!("Teacher {} not found", teacher_id)));
        }

        let absences = stores
            .absences
            .find_approved_overlapping(AbsenceQuery {
                teacher_id: Some(teacher_id),
                start: start_time,
                end: end_time,
            })
            .await?;
        if !absences.is_empty() {
            return Err(TutorError::Conflict(format!(
                "Teacher {} has an approved absence during {}..{}",
                teacher_id, start_time, end_time
            )));
        }

        CalendarService::new(self.ctx)
            .create_or_reactivate(teacher_id, start_time, end_time, options.external_id)
            .await
    }

    fn validate_slot_bounds(&self, start_time: Millis, end_time: Millis, exempt: bool) -> TutorResult<()> {
        let clock = self.ctx.week_clock();
        if !clock.is_valid_slot_start(start_time) || !clock.is_valid_slot_start(end_time) {
            return Err(TutorError::Validation(format!(
                "Slot boundaries must align to the {} minute grid",
                self.ctx.policy.slot_grid_minutes
            )));
        }
        if start_time >= end_time {
            return Err(TutorError::Validation(
                "Slot start must be before its end".to_string(),
            ));
        }
        if exempt {
            return Ok(());
        }

        let now = self.ctx.now();
        if start_time < now + self.ctx.policy.min_lead_time() {
            return Err(TutorError::Validation(format!(
                "Slot must start at least {} minutes from now",
                self.ctx.policy.min_lead_time_minutes
            )));
        }
        if end_time < now {
            return Err(TutorError::Validation("Slot lies in the past".to_string()));
        }

        Ok(())
    }

    /// Flips a slot between open and closed.
    ///
    /// Closing is refused while a booking holds the slot; reopening is
    /// refused while an approved absence overlaps it.
    pub async fn toggle_slot(&self, calendar_id: CalendarId) -> TutorResult<CalendarSlot> {
        let stores = &self.ctx.stores;
        let slot = stores
            .calendars
            .find_by_id(calendar_id)
            .await?
            .ok_or_else(|| TutorError::NotFound(format!("Calendar slot {} not found", calendar_id)))?;

        if slot.is_active {
            if stores.bookings.has_occupying(slot.id).await? {
                return Err(TutorError::Conflict(format!(
                    "Calendar slot {} is booked",
                    calendar_id
                )));
            }
        } else {
            let absences = stores
                .absences
                .find_approved_overlapping(AbsenceQuery {
                    teacher_id: Some(slot.teacher_id),
                    start: slot.start_time,
                    end: slot.end_time,
                })
                .await?;
            if !absences.is_empty() {
                return Err(TutorError::Conflict(format!(
                    "Calendar slot {} overlaps an approved absence",
                    calendar_id
                )));
            }
        }

        let updated = stores
            .calendars
            .set_active(slot.id, !slot.is_active)
            .await?
            .ok_or_else(|| TutorError::NotFound(format!("Calendar slot {} not found", calendar_id)))?;

        info!(calendar_id, is_active = updated.is_active, "Toggled calendar slot");
        Ok(updated)
    }

    /// Deactivates the teacher and gives back everything they hold from now on.
    ///
    /// Future bookings still holding a slot are cancelled by admin unless
    /// the lesson is already under way. Free future slots are deleted and
    /// every regular schedule row goes.
    pub async fn release_teacher_future_slots(&self, teacher_id: TeacherId) -> TutorResult<ReleaseSummary> {
        let stores = &self.ctx.stores;
        stores
            .teachers
            .set_active(teacher_id, false)
            .await?
            .ok_or_else(|| TutorError::NotFound(format!("Teacher {} not found", teacher_id)))?;

        let now = self.ctx.now();
        let mut summary = ReleaseSummary {
            teacher_id,
            ..ReleaseSummary::default()
        };

        for booking in stores.bookings.find_occupying_from(teacher_id, now).await? {
            if !booking.status.can_transition_to(BookingStatus::CancelByAdmin) {
                debug!(booking_id = booking.id, status = %booking.status, "Keeping booking on release");
                continue;
            }
            let update = BookingUpdate {
                status: Some(BookingStatus::CancelByAdmin),
            };
            match stores.bookings.update(booking.id, update).await? {
                Some(_) => summary.cancelled_bookings += 1,
                None => warn!(booking_id = booking.id, "Booking vanished during release"),
            }
        }

        for slot in stores.calendars.find_from(teacher_id, now).await? {
            if stores.bookings.has_occupying(slot.id).await? {
                continue;
            }
            if stores.calendars.delete(slot.id).await? {
                summary.removed_slots += 1;
            }
        }

        summary.removed_regular_schedules = stores
            .regular_schedules
            .remove_all_for_inactive_teacher(teacher_id)
            .await?;

        info!(
            teacher_id,
            removed_slots = summary.removed_slots,
            cancelled_bookings = summary.cancelled_bookings,
            removed_regular_schedules = summary.removed_regular_schedules,
            "Released teacher"
        );
        Ok(summary)
    }
}
