use std::collections::HashSet;

use tracing::{debug, info};
use tutorsync_core::{
    errors::{TutorError, TutorResult},
    models::{
        calendar::{CalendarSlot, NewCalendarSlot, SlotLookup},
        CalendarId, Sequence, TeacherId,
    },
    time::{normalize_offset, Millis},
};
use tutorsync_db::repositories::calendar::SlotQuery;

use super::ServiceContext;

/// Calendar slot operations shared by the slot handlers and the teacher
/// services.
pub struct CalendarService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CalendarService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Every slot of the teacher starting inside `[start, end)`, active or not.
    pub async fn find_in_range(
        &self,
        teacher_id: TeacherId,
        start: Millis,
        end: Millis,
    ) -> TutorResult<Vec<CalendarSlot>> {
        if start >= end {
            return Err(TutorError::Validation(
                "Range start must be before its end".to_string(),
            ));
        }

        let slots = self
            .ctx
            .stores
            .calendars
            .find_in_range(SlotQuery {
                teacher_id,
                start,
                end,
                active_only: false,
            })
            .await?;

        Ok(slots)
    }

    pub async fn find_one(&self, lookup: SlotLookup) -> TutorResult<Option<CalendarSlot>> {
        let calendars = &self.ctx.stores.calendars;
        let slot = match lookup {
            SlotLookup::Id(id) => calendars.find_by_id(id).await?,
            SlotLookup::Key {
                teacher_id,
                start_time,
                end_time,
            } => calendars.find_by_key(teacher_id, start_time, end_time).await?,
        };

        Ok(slot)
    }

    /// Reactivates the slot with this natural key or inserts a fresh one.
    ///
    /// Losing an insert race against an identical slot falls back to
    /// reactivating the winner, so the caller always gets the one row that
    /// holds the key.
    pub async fn create_or_reactivate(
        &self,
        teacher_id: TeacherId,
        start_time: Millis,
        end_time: Millis,
        external_id: Option<String>,
    ) -> TutorResult<CalendarId> {
        let stores = &self.ctx.stores;

        if let Some(id) = stores
            .calendars
            .reactivate(teacher_id, start_time, end_time)
            .await?
        {
            info!(teacher_id, calendar_id = id, "Reactivated calendar slot");
            return Ok(id);
        }

        let id = stores.ids.next_id(Sequence::Calendar).await?;
        let inserted = stores
            .calendars
            .insert(NewCalendarSlot {
                id,
                teacher_id,
                start_time,
                end_time,
                external_id,
            })
            .await?;

        match inserted {
            Some(slot) => {
                info!(teacher_id, calendar_id = slot.id, start_time, end_time, "Opened calendar slot");
                Ok(slot.id)
            }
            None => stores
                .calendars
                .reactivate(teacher_id, start_time, end_time)
                .await?
                .ok_or_else(|| {
                    TutorError::Conflict(format!(
                        "Slot {}..{} of teacher {} could not be created",
                        start_time, end_time, teacher_id
                    ))
                }),
        }
    }

    /// Removes the teacher's future ad-hoc slots that fall on one of
    /// `offsets`, now that a regular schedule covers those times. Slots that
    /// still hold a booking are kept.
    pub async fn deactivate_all_matching_regular_offsets(
        &self,
        teacher_id: TeacherId,
        offsets: &[Millis],
    ) -> TutorResult<u64> {
        let wanted: HashSet<Millis> = offsets.iter().map(|&o| normalize_offset(o)).collect();
        if wanted.is_empty() {
            return Ok(0);
        }

        let stores = &self.ctx.stores;
        let clock = self.ctx.week_clock();
        let slots = stores
            .calendars
            .find_from(teacher_id, self.ctx.now())
            .await?;

        let mut removed = 0;
        for slot in slots
            .into_iter()
            .filter(|slot| wanted.contains(&clock.week_offset(slot.start_time)))
        {
            if stores.bookings.has_occupying(slot.id).await? {
                debug!(calendar_id = slot.id, "Keeping booked slot on a regular offset");
                continue;
            }
            if stores.calendars.delete(slot.id).await? {
                removed += 1;
            }
        }

        info!(teacher_id, removed, "Removed ad-hoc slots superseded by regular times");
        Ok(removed)
    }

    /// Closes the teacher's open slots that overlap `[start, end)`. A slot
    /// still held by a booking is left open.
    pub async fn close_open_slots_overlapping(
        &self,
        teacher_id: TeacherId,
        start: Millis,
        end: Millis,
    ) -> TutorResult<u64> {
        let stores = &self.ctx.stores;
        let from = start.saturating_sub(self.ctx.policy.max_window());
        let slots = stores.calendars.find_from(teacher_id, from).await?;

        let mut closed = 0;
        for slot in slots
            .into_iter()
            .filter(|slot| slot.is_active && slot.overlaps(start, end))
        {
            if stores.bookings.has_occupying(slot.id).await? {
                debug!(calendar_id = slot.id, "Keeping booked slot inside absence");
                continue;
            }
            if stores.calendars.set_active(slot.id, false).await?.is_some() {
                closed += 1;
            }
        }

        info!(teacher_id, closed, "Closed open slots inside absence");
        Ok(closed)
    }

    pub async fn count_open_in_range(
        &self,
        teacher_id: TeacherId,
        start: Millis,
        end: Millis,
    ) -> TutorResult<u64> {
        if start >= end {
            return Ok(0);
        }

        Ok(self
            .ctx
            .stores
            .calendars
            .count_open_in_range(teacher_id, start, end)
            .await?)
    }
}
