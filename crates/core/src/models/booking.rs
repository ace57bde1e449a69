use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{BookingId, CalendarId, StudentId, TeacherId};
use crate::errors::TutorError;
use crate::time::{overlaps, Millis};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Teaching,
    Completed,
    CancelByStudent,
    CancelByTeacher,
    CancelByAdmin,
    ChangeTime,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 8] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Teaching,
        BookingStatus::Completed,
        BookingStatus::CancelByStudent,
        BookingStatus::CancelByTeacher,
        BookingStatus::CancelByAdmin,
        BookingStatus::ChangeTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Teaching => "teaching",
            BookingStatus::Completed => "completed",
            BookingStatus::CancelByStudent => "cancel_by_student",
            BookingStatus::CancelByTeacher => "cancel_by_teacher",
            BookingStatus::CancelByAdmin => "cancel_by_admin",
            BookingStatus::ChangeTime => "change_time",
        }
    }

    /// A released booking stays on record but gives its slot back.
    /// Teacher and admin cancellations keep the slot held.
    pub fn is_released(&self) -> bool {
        match self {
            BookingStatus::CancelByStudent | BookingStatus::ChangeTime => true,
            BookingStatus::Pending
            | BookingStatus::Confirmed
            | BookingStatus::Teaching
            | BookingStatus::Completed
            | BookingStatus::CancelByTeacher
            | BookingStatus::CancelByAdmin => false,
        }
    }

    pub fn is_occupying(&self) -> bool {
        !self.is_released()
    }

    /// Statuses that give their slot back.
    pub fn released() -> Vec<BookingStatus> {
        Self::ALL.into_iter().filter(|s| s.is_released()).collect()
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;

        match (self, next) {
            (Pending, Confirmed) => true,
            (Confirmed, Teaching) => true,
            (Teaching, Completed) => true,
            (Pending | Confirmed, CancelByStudent | CancelByTeacher | CancelByAdmin | ChangeTime) => {
                true
            }
            (Pending | Confirmed | Teaching, _) => false,
            (Completed | CancelByStudent | CancelByTeacher | CancelByAdmin | ChangeTime, _) => false,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = TutorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| TutorError::Validation(format!("Unknown booking status: {}", s)))
    }
}

/// A student's reservation of one calendar slot. `start_time` and
/// `end_time` are a snapshot of the slot taken when the booking was made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub teacher_id: TeacherId,
    pub student_id: StudentId,
    pub calendar_id: CalendarId,
    pub start_time: Millis,
    pub end_time: Millis,
    pub status: BookingStatus,
    pub created_time: Millis,
}

impl Booking {
    pub fn is_occupying(&self) -> bool {
        self.status.is_occupying()
    }

    pub fn overlaps(&self, start: Millis, end: Millis) -> bool {
        overlaps(self.start_time, self.end_time, start, end)
    }
}

pub type NewBooking = Booking;

/// Fields a booking update may change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingUpdate {
    pub status: Option<BookingStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub student_id: StudentId,
    pub calendar_id: CalendarId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}
