#![allow(dead_code)]

use std::sync::Arc;

use tutorsync_api::{
    services::{
        absences::AbsenceService,
        bookings::BookingService,
        slots::{OpenSlotOptions, SlotService},
        teachers::TeacherService,
        ServiceContext,
    },
    ApiState,
};
use tutorsync_core::{
    models::{
        absence::{AbsenceRequest, AbsenceStatus, CreateAbsenceRequest},
        booking::{Booking, BookingStatus, CreateBookingRequest},
        teacher::{CreateTeacherRequest, Teacher},
        CalendarId, TeacherId,
    },
    policy::SchedulingPolicy,
    time::{FixedClock, Millis, HOUR_MS},
};
use tutorsync_db::Stores;

/// 2024-01-01T00:00:00Z, a Monday.
pub const MONDAY: Millis = 1_704_067_200_000;
/// Monday 08:00 UTC of that week.
pub const NOW: Millis = MONDAY + 8 * HOUR_MS;

pub struct TestContext {
    pub clock: Arc<FixedClock>,
    pub context: ServiceContext,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_stores(Stores::memory())
    }

    pub fn with_stores(stores: Stores) -> Self {
        let clock = Arc::new(FixedClock::new(NOW));
        let context = ServiceContext::new(stores, SchedulingPolicy::default(), clock.clone());
        Self { clock, context }
    }

    pub fn stores(&self) -> &Stores {
        &self.context.stores
    }

    pub fn state(&self) -> Arc<ApiState> {
        ApiState::new(self.context.clone())
    }

    pub async fn teacher(&self, regular_times: Vec<Millis>) -> Teacher {
        TeacherService::new(&self.context)
            .create_teacher(CreateTeacherRequest {
                name: "Test Teacher".to_string(),
                regular_times,
            })
            .await
            .unwrap()
    }

    /// Opens a slot bypassing the lead-time rule.
    pub async fn slot(&self, teacher_id: TeacherId, start: Millis, end: Millis) -> CalendarId {
        let options = OpenSlotOptions {
            exempt: true,
            external_id: None,
        };
        SlotService::new(&self.context)
            .open_slot(teacher_id, start, end, options)
            .await
            .unwrap()
    }

    pub async fn book(&self, calendar_id: CalendarId) -> Booking {
        BookingService::new(&self.context)
            .book_slot(CreateBookingRequest {
                student_id: 500,
                calendar_id,
            })
            .await
            .unwrap()
    }

    pub async fn set_booking_status(&self, booking: &Booking, status: BookingStatus) -> Booking {
        BookingService::new(&self.context)
            .update_booking_status(booking.id, status)
            .await
            .unwrap()
    }

    pub async fn approved_absence(&self, teacher_id: TeacherId, start: Millis, end: Millis) -> AbsenceRequest {
        let service = AbsenceService::new(&self.context);
        let absence = service
            .request_absence(CreateAbsenceRequest {
                teacher_id,
                start_time: start,
                end_time: end,
            })
            .await
            .unwrap();
        service
            .set_absence_status(absence.id, AbsenceStatus::Approved)
            .await
            .unwrap()
    }
}
