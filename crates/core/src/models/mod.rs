pub mod absence;
pub mod availability;
pub mod booking;
pub mod calendar;
pub mod regular_schedule;
pub mod teacher;

use serde::{Deserialize, Serialize};

pub type TeacherId = i64;
pub type StudentId = i64;
pub type CalendarId = i64;
pub type BookingId = i64;
pub type AbsenceId = i64;
pub type RegularScheduleId = i64;

/// Named id sequences handed out by the id allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sequence {
    Teacher,
    Calendar,
    RegularSchedule,
    Absence,
    Booking,
}

impl Sequence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sequence::Teacher => "teacher",
            Sequence::Calendar => "calendar",
            Sequence::RegularSchedule => "regular_schedule",
            Sequence::Absence => "absence",
            Sequence::Booking => "booking",
        }
    }
}
