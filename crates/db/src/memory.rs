//! In-memory store.
//!
//! Implements every store trait over ordered maps behind one async lock, so
//! each operation is atomic with respect to the others. Used for local
//! development without PostgreSQL and as the backing store of the test
//! suites.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use eyre::Result;
use tokio::sync::RwLock;
use tutorsync_core::{
    models::{
        absence::{AbsenceRequest, AbsenceStatus, NewAbsence},
        booking::{Booking, BookingUpdate, NewBooking},
        calendar::{CalendarSlot, NewCalendarSlot},
        regular_schedule::{NewRegularSchedule, RegularSchedule, RegularScheduleStatus},
        teacher::{NewTeacher, Teacher},
        AbsenceId, BookingId, CalendarId, RegularScheduleId, Sequence, TeacherId,
    },
    time::{normalize_offset, Millis},
};

use crate::repositories::{
    absence::{AbsenceQuery, AbsenceStore},
    booking::{BookingQuery, BookingStore},
    calendar::{CalendarStore, SlotQuery},
    counter::IdAllocator,
    regular_schedule::{RegularScheduleQuery, RegularScheduleStore},
    teacher::TeacherStore,
};

#[derive(Debug, Default)]
struct MemoryData {
    counters: HashMap<Sequence, i64>,
    teachers: BTreeMap<TeacherId, Teacher>,
    calendars: BTreeMap<CalendarId, CalendarSlot>,
    regular_schedules: BTreeMap<RegularScheduleId, RegularSchedule>,
    absences: BTreeMap<AbsenceId, AbsenceRequest>,
    bookings: BTreeMap<BookingId, Booking>,
}

impl MemoryData {
    fn calendar_by_key(
        &mut self,
        teacher_id: TeacherId,
        start_time: Millis,
        end_time: Millis,
    ) -> Option<&mut CalendarSlot> {
        self.calendars.values_mut().find(|slot| {
            slot.teacher_id == teacher_id && slot.start_time == start_time && slot.end_time == end_time
        })
    }

    fn is_occupied(&self, calendar_id: CalendarId) -> bool {
        self.bookings
            .values()
            .any(|b| b.calendar_id == calendar_id && b.is_occupying())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<MemoryData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdAllocator for MemoryStore {
    async fn next_id(&self, sequence: Sequence) -> Result<i64> {
        let mut data = self.data.write().await;
        let value = data.counters.entry(sequence).or_insert(0);
        *value += 1;
        Ok(*value)
    }
}

#[async_trait]
impl TeacherStore for MemoryStore {
    async fn get(&self, id: TeacherId) -> Result<Option<Teacher>> {
        Ok(self.data.read().await.teachers.get(&id).cloned())
    }

    async fn insert(&self, teacher: NewTeacher) -> Result<Teacher> {
        let mut data = self.data.write().await;
        if data.teachers.contains_key(&teacher.id) {
            eyre::bail!("Teacher with ID {} already exists", teacher.id);
        }
        data.teachers.insert(teacher.id, teacher.clone());
        Ok(teacher)
    }

    async fn find_active_offering(&self, week_offset: Millis) -> Result<Vec<Teacher>> {
        let wanted = normalize_offset(week_offset);
        let data = self.data.read().await;
        Ok(data
            .teachers
            .values()
            .filter(|t| t.is_active && t.regular_times.contains(&wanted))
            .cloned()
            .collect())
    }

    async fn update_regular_times(
        &self,
        id: TeacherId,
        regular_times: Vec<Millis>,
    ) -> Result<Option<Teacher>> {
        let mut data = self.data.write().await;
        Ok(data.teachers.get_mut(&id).map(|teacher| {
            teacher.regular_times = regular_times;
            teacher.clone()
        }))
    }

    async fn set_active(&self, id: TeacherId, is_active: bool) -> Result<Option<Teacher>> {
        let mut data = self.data.write().await;
        Ok(data.teachers.get_mut(&id).map(|teacher| {
            teacher.is_active = is_active;
            teacher.clone()
        }))
    }
}

#[async_trait]
impl CalendarStore for MemoryStore {
    async fn find_in_range(&self, query: SlotQuery) -> Result<Vec<CalendarSlot>> {
        let data = self.data.read().await;
        let mut slots: Vec<CalendarSlot> = data
            .calendars
            .values()
            .filter(|slot| {
                slot.teacher_id == query.teacher_id
                    && slot.start_time >= query.start
                    && slot.start_time < query.end
                    && (!query.active_only || slot.is_active)
            })
            .cloned()
            .collect();
        slots.sort_by_key(|slot| (slot.start_time, slot.id));
        Ok(slots)
    }

    async fn find_by_id(&self, id: CalendarId) -> Result<Option<CalendarSlot>> {
        Ok(self.data.read().await.calendars.get(&id).cloned())
    }

    async fn find_by_key(
        &self,
        teacher_id: TeacherId,
        start_time: Millis,
        end_time: Millis,
    ) -> Result<Option<CalendarSlot>> {
        let data = self.data.read().await;
        Ok(data
            .calendars
            .values()
            .find(|slot| {
                slot.teacher_id == teacher_id
                    && slot.start_time == start_time
                    && slot.end_time == end_time
            })
            .cloned())
    }

    async fn find_active_covering(&self, start: Millis, end: Millis) -> Result<Vec<CalendarSlot>> {
        let data = self.data.read().await;
        let mut slots: Vec<CalendarSlot> = data
            .calendars
            .values()
            .filter(|slot| slot.is_active && slot.covers(start, end))
            .cloned()
            .collect();
        slots.sort_by_key(|slot| (slot.teacher_id, slot.start_time));
        Ok(slots)
    }

    async fn find_from(&self, teacher_id: TeacherId, from: Millis) -> Result<Vec<CalendarSlot>> {
        let data = self.data.read().await;
        let mut slots: Vec<CalendarSlot> = data
            .calendars
            .values()
            .filter(|slot| slot.teacher_id == teacher_id && slot.start_time >= from)
            .cloned()
            .collect();
        slots.sort_by_key(|slot| (slot.start_time, slot.id));
        Ok(slots)
    }

    async fn reactivate(
        &self,
        teacher_id: TeacherId,
        start_time: Millis,
        end_time: Millis,
    ) -> Result<Option<CalendarId>> {
        let mut data = self.data.write().await;
        Ok(data.calendar_by_key(teacher_id, start_time, end_time).map(|slot| {
            slot.is_active = true;
            slot.id
        }))
    }

    async fn insert(&self, slot: NewCalendarSlot) -> Result<Option<CalendarSlot>> {
        let mut data = self.data.write().await;
        if data
            .calendar_by_key(slot.teacher_id, slot.start_time, slot.end_time)
            .is_some()
        {
            return Ok(None);
        }
        let slot = slot.into_slot();
        data.calendars.insert(slot.id, slot.clone());
        Ok(Some(slot))
    }

    async fn set_active(&self, id: CalendarId, is_active: bool) -> Result<Option<CalendarSlot>> {
        let mut data = self.data.write().await;
        Ok(data.calendars.get_mut(&id).map(|slot| {
            slot.is_active = is_active;
            slot.clone()
        }))
    }

    async fn delete(&self, id: CalendarId) -> Result<bool> {
        Ok(self.data.write().await.calendars.remove(&id).is_some())
    }

    async fn count_open_in_range(
        &self,
        teacher_id: TeacherId,
        start: Millis,
        end: Millis,
    ) -> Result<u64> {
        let data = self.data.read().await;
        let count = data
            .calendars
            .values()
            .filter(|slot| {
                slot.teacher_id == teacher_id
                    && slot.is_active
                    && slot.start_time >= start
                    && slot.start_time < end
            })
            .count();
        Ok(count as u64)
    }
}

#[async_trait]
impl RegularScheduleStore for MemoryStore {
    async fn find_all(&self, query: RegularScheduleQuery) -> Result<Vec<RegularSchedule>> {
        let data = self.data.read().await;
        Ok(data
            .regular_schedules
            .values()
            .filter(|row| query.matches(row))
            .cloned()
            .collect())
    }

    async fn find_one(&self, query: RegularScheduleQuery) -> Result<Option<RegularSchedule>> {
        let data = self.data.read().await;
        Ok(data
            .regular_schedules
            .values()
            .find(|row| query.matches(row))
            .cloned())
    }

    async fn remove_all_for_inactive_teacher(&self, teacher_id: TeacherId) -> Result<u64> {
        let mut data = self.data.write().await;
        let before = data.regular_schedules.len();
        data.regular_schedules.retain(|_, row| row.teacher_id != teacher_id);
        Ok((before - data.regular_schedules.len()) as u64)
    }

    async fn insert(&self, schedule: NewRegularSchedule) -> Result<RegularSchedule> {
        let mut data = self.data.write().await;
        data.regular_schedules.insert(schedule.id, schedule.clone());
        Ok(schedule)
    }

    async fn update_status(
        &self,
        id: RegularScheduleId,
        status: RegularScheduleStatus,
    ) -> Result<Option<RegularSchedule>> {
        let mut data = self.data.write().await;
        Ok(data.regular_schedules.get_mut(&id).map(|row| {
            row.status = status;
            row.clone()
        }))
    }
}

#[async_trait]
impl AbsenceStore for MemoryStore {
    async fn find_approved_overlapping(&self, query: AbsenceQuery) -> Result<Vec<AbsenceRequest>> {
        let data = self.data.read().await;
        let mut absences: Vec<AbsenceRequest> = data
            .absences
            .values()
            .filter(|absence| {
                absence.status == AbsenceStatus::Approved
                    && query.teacher_id.map_or(true, |id| absence.teacher_id == id)
                    && absence.overlaps(query.start, query.end)
            })
            .cloned()
            .collect();
        absences.sort_by_key(|absence| (absence.start_time, absence.id));
        Ok(absences)
    }

    async fn find_one(&self, id: AbsenceId) -> Result<Option<AbsenceRequest>> {
        Ok(self.data.read().await.absences.get(&id).cloned())
    }

    async fn insert(&self, absence: NewAbsence) -> Result<AbsenceRequest> {
        let mut data = self.data.write().await;
        data.absences.insert(absence.id, absence.clone());
        Ok(absence)
    }

    async fn update_status(
        &self,
        id: AbsenceId,
        status: AbsenceStatus,
    ) -> Result<Option<AbsenceRequest>> {
        let mut data = self.data.write().await;
        Ok(data.absences.get_mut(&id).map(|absence| {
            absence.status = status;
            absence.clone()
        }))
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn find_in_range(&self, query: BookingQuery) -> Result<Vec<Booking>> {
        let data = self.data.read().await;
        let mut bookings: Vec<Booking> = data
            .bookings
            .values()
            .filter(|booking| {
                query.teacher_id.map_or(true, |id| booking.teacher_id == id)
                    && booking.overlaps(query.start, query.end)
            })
            .cloned()
            .collect();
        bookings.sort_by_key(|booking| (booking.start_time, booking.id));
        Ok(bookings)
    }

    async fn find_one(&self, id: BookingId) -> Result<Option<Booking>> {
        Ok(self.data.read().await.bookings.get(&id).cloned())
    }

    async fn update(&self, id: BookingId, update: BookingUpdate) -> Result<Option<Booking>> {
        let mut data = self.data.write().await;
        Ok(data.bookings.get_mut(&id).map(|booking| {
            if let Some(status) = update.status {
                booking.status = status;
            }
            booking.clone()
        }))
    }

    async fn has_occupying(&self, calendar_id: CalendarId) -> Result<bool> {
        Ok(self.data.read().await.is_occupied(calendar_id))
    }

    async fn find_occupying_from(
        &self,
        teacher_id: TeacherId,
        from: Millis,
    ) -> Result<Vec<Booking>> {
        let data = self.data.read().await;
        let mut bookings: Vec<Booking> = data
            .bookings
            .values()
            .filter(|b| b.teacher_id == teacher_id && b.start_time >= from && b.is_occupying())
            .cloned()
            .collect();
        bookings.sort_by_key(|booking| (booking.start_time, booking.id));
        Ok(bookings)
    }

    async fn claim(&self, booking: NewBooking) -> Result<Option<Booking>> {
        let mut data = self.data.write().await;
        if data.is_occupied(booking.calendar_id) {
            return Ok(None);
        }
        data.bookings.insert(booking.id, booking.clone());
        Ok(Some(booking))
    }
}
