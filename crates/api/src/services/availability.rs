//! # Availability Reconciliation
//!
//! Combines the four scheduling sources into one view of a teacher's time:
//!
//! - ad-hoc calendar slots opened by the teacher,
//! - weekly regular offsets (declared on the teacher, committed by
//!   regular schedule rows),
//! - bookings, whose status decides whether they still hold their slot,
//! - approved absences.
//!
//! The engine only reads. Writes go through the other services.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use futures::future::try_join_all;
use tracing::{debug, warn};
use tutorsync_core::{
    errors::TutorResult,
    models::{
        availability::AvailabilityResult,
        booking::{Booking, BookingStatus},
        regular_schedule::RegularScheduleStatus,
        CalendarId, TeacherId,
    },
    time::{normalize_offset, Millis},
};
use tutorsync_db::repositories::{
    absence::AbsenceQuery, booking::BookingQuery, calendar::SlotQuery,
    regular_schedule::RegularScheduleQuery,
};

use super::ServiceContext;

pub struct AvailabilityEngine<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AvailabilityEngine<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// A window is answerable when it is non-empty, no wider than the
    /// configured horizon, and lies within that horizon around now.
    pub fn window_in_bounds(&self, start: Millis, end: Millis) -> bool {
        let now = self.ctx.now();
        let horizon = self.ctx.policy.max_window();

        start < end
            && start >= now - horizon
            && end <= now + horizon
            && end - start <= horizon
    }

    /// Booked, open, registered-regular, open-regular and absent time of one
    /// teacher inside `[start, end)`.
    ///
    /// Out-of-bounds windows and unknown teachers yield the empty result
    /// rather than an error. Store failures propagate.
    pub async fn get_schedules_active(
        &self,
        teacher_id: TeacherId,
        start: Millis,
        end: Millis,
    ) -> TutorResult<AvailabilityResult> {
        if !self.window_in_bounds(start, end) {
            debug!(teacher_id, start, end, "Availability window out of bounds");
            return Ok(AvailabilityResult::default());
        }

        let stores = &self.ctx.stores;
        let Some(teacher) = stores.teachers.get(teacher_id).await? else {
            debug!(teacher_id, "Availability requested for unknown teacher");
            return Ok(AvailabilityResult::default());
        };

        let (registered_regular, bookings, slots, on_absence) = tokio::try_join!(
            stores.regular_schedules.find_all(RegularScheduleQuery {
                teacher_id: Some(teacher_id),
                regular_start_time: None,
                statuses: RegularScheduleStatus::registered(),
            }),
            stores.bookings.find_in_range(BookingQuery {
                teacher_id: Some(teacher_id),
                start,
                end,
            }),
            stores.calendars.find_in_range(SlotQuery {
                teacher_id,
                start,
                end,
                active_only: true,
            }),
            stores.absences.find_approved_overlapping(AbsenceQuery {
                teacher_id: Some(teacher_id),
                start,
                end,
            }),
        )?;

        let registered_offsets: HashSet<Millis> = registered_regular
            .iter()
            .map(|row| normalize_offset(row.regular_start_time))
            .collect();
        let open_offsets = teacher
            .regular_times
            .iter()
            .map(|&offset| normalize_offset(offset))
            .filter(|offset| !registered_offsets.contains(offset));
        let available_regular = self
            .ctx
            .week_clock()
            .occurrences_in_range(open_offsets, start, end);

        let occupying: Vec<Booking> = bookings.into_iter().filter(Booking::is_occupying).collect();
        let booked_calendar_ids: HashSet<CalendarId> =
            occupying.iter().map(|booking| booking.calendar_id).collect();
        let booked = self.retain_existing_calendars(occupying).await?;

        let available = slots
            .into_iter()
            .filter(|slot| !booked_calendar_ids.contains(&slot.id))
            .collect();

        Ok(AvailabilityResult {
            booked,
            available,
            registered_regular,
            available_regular,
            on_absence,
        })
    }

    /// Teachers who can start a lesson at `instant`, judged over the
    /// lookahead window that begins there.
    ///
    /// Past instants and instants beyond the horizon match nobody.
    pub async fn find_available_teachers(&self, instant: Millis) -> TutorResult<BTreeSet<TeacherId>> {
        let now = self.ctx.now();
        if instant < now || instant > now + self.ctx.policy.max_window() {
            debug!(instant, "Instant outside the availability horizon");
            return Ok(BTreeSet::new());
        }

        let end = instant + self.ctx.policy.lookahead();
        let offset = self.ctx.week_clock().week_offset(instant);
        let stores = &self.ctx.stores;

        let (covering, offering, committed, bookings, absences) = tokio::try_join!(
            stores.calendars.find_active_covering(instant, end),
            stores.teachers.find_active_offering(offset),
            stores.regular_schedules.find_all(RegularScheduleQuery {
                teacher_id: None,
                regular_start_time: Some(offset),
                statuses: RegularScheduleStatus::committed(),
            }),
            stores.bookings.find_in_range(BookingQuery {
                teacher_id: None,
                start: instant,
                end,
            }),
            stores.absences.find_approved_overlapping(AbsenceQuery {
                teacher_id: None,
                start: instant,
                end,
            }),
        )?;

        // Teachers with some open capacity here, before commitments and bookings.
        let with_capacity: BTreeSet<TeacherId> = covering
            .iter()
            .map(|slot| slot.teacher_id)
            .chain(offering.iter().map(|teacher| teacher.id))
            .collect();

        let mut candidates = with_capacity.clone();
        for row in &committed {
            candidates.remove(&row.teacher_id);
        }

        for (teacher_id, latest) in latest_booking_per_teacher(&bookings) {
            if latest.status.is_released() {
                if rebooked_at_same_start(&bookings, latest) {
                    candidates.remove(&teacher_id);
                } else if with_capacity.contains(&teacher_id) {
                    candidates.insert(teacher_id);
                }
            } else {
                candidates.remove(&teacher_id);
            }
        }

        for absence in &absences {
            candidates.remove(&absence.teacher_id);
        }

        debug!(instant, count = candidates.len(), "Matched available teachers");
        Ok(candidates)
    }

    /// Drops bookings whose calendar slot no longer exists. The slot lookups
    /// run concurrently; a missing slot is logged, never raised.
    async fn retain_existing_calendars(&self, bookings: Vec<Booking>) -> TutorResult<Vec<Booking>> {
        let calendars = &self.ctx.stores.calendars;
        let found = try_join_all(
            bookings
                .iter()
                .map(|booking| calendars.find_by_id(booking.calendar_id)),
        )
        .await?;

        Ok(bookings
            .into_iter()
            .zip(found)
            .filter_map(|(booking, slot)| match slot {
                Some(_) => Some(booking),
                None => {
                    warn!(
                        booking_id = booking.id,
                        calendar_id = booking.calendar_id,
                        "Booking references a missing calendar slot; excluding it"
                    );
                    None
                }
            })
            .collect())
    }
}

/// Latest booking of each teacher by `(created_time, id)`, so equal
/// creation times resolve to the higher id.
fn latest_booking_per_teacher(bookings: &[Booking]) -> BTreeMap<TeacherId, &Booking> {
    let mut latest: BTreeMap<TeacherId, &Booking> = BTreeMap::new();
    for booking in bookings {
        latest
            .entry(booking.teacher_id)
            .and_modify(|current| {
                if (booking.created_time, booking.id) > (current.created_time, current.id) {
                    *current = booking;
                }
            })
            .or_insert(booking);
    }
    latest
}

fn rebooked_at_same_start(bookings: &[Booking], released: &Booking) -> bool {
    bookings.iter().any(|other| {
        other.id != released.id
            && other.teacher_id == released.teacher_id
            && other.start_time == released.start_time
            && other.status == BookingStatus::Confirmed
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(id: i64, teacher_id: i64, created_time: i64, status: BookingStatus) -> Booking {
        Booking {
            id,
            teacher_id,
            student_id: 100,
            calendar_id: id,
            start_time: 0,
            end_time: 1_800_000,
            status,
            created_time,
        }
    }

    #[test]
    fn latest_booking_prefers_newest_then_highest_id() {
        let bookings = vec![
            booking(1, 7, 10, BookingStatus::Confirmed),
            booking(3, 7, 20, BookingStatus::ChangeTime),
            booking(2, 7, 20, BookingStatus::Confirmed),
            booking(4, 8, 5, BookingStatus::Pending),
        ];

        let latest = latest_booking_per_teacher(&bookings);
        assert_eq!(latest[&7].id, 3);
        assert_eq!(latest[&8].id, 4);
    }

    #[test]
    fn rebooking_requires_a_confirmed_booking_at_the_same_start() {
        let released = booking(1, 7, 10, BookingStatus::CancelByStudent);
        let pending = booking(2, 7, 11, BookingStatus::Pending);
        let confirmed = booking(3, 7, 12, BookingStatus::Confirmed);

        assert!(!rebooked_at_same_start(&[released.clone(), pending], &released));
        assert!(rebooked_at_same_start(&[released.clone(), confirmed], &released));
    }
}
