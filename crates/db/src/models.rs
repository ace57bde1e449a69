use eyre::Result;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tutorsync_core::models::{
    absence::AbsenceRequest, booking::Booking, calendar::CalendarSlot,
    regular_schedule::RegularSchedule, teacher::Teacher,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTeacher {
    pub id: i64,
    pub name: String,
    pub regular_times: Vec<i64>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCalendar {
    pub id: i64,
    pub teacher_id: i64,
    pub start_time: i64,
    pub end_time: i64,
    pub is_active: bool,
    pub external_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbRegularSchedule {
    pub id: i64,
    pub teacher_id: i64,
    pub regular_start_time: i64,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAbsence {
    pub id: i64,
    pub teacher_id: i64,
    pub start_time: i64,
    pub end_time: i64,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: i64,
    pub teacher_id: i64,
    pub student_id: i64,
    pub calendar_id: i64,
    pub start_time: i64,
    pub end_time: i64,
    pub status: String,
    pub created_time: i64,
}

impl From<DbTeacher> for Teacher {
    fn from(row: DbTeacher) -> Self {
        Teacher {
            id: row.id,
            name: row.name,
            regular_times: row.regular_times,
            is_active: row.is_active,
        }
    }
}

impl From<DbCalendar> for CalendarSlot {
    fn from(row: DbCalendar) -> Self {
        CalendarSlot {
            id: row.id,
            teacher_id: row.teacher_id,
            start_time: row.start_time,
            end_time: row.end_time,
            is_active: row.is_active,
            external_id: row.external_id,
        }
    }
}

impl TryFrom<DbRegularSchedule> for RegularSchedule {
    type Error = eyre::Report;

    fn try_from(row: DbRegularSchedule) -> Result<Self> {
        Ok(RegularSchedule {
            id: row.id,
            teacher_id: row.teacher_id,
            regular_start_time: row.regular_start_time,
            status: row.status.parse()?,
        })
    }
}

impl TryFrom<DbAbsence> for AbsenceRequest {
    type Error = eyre::Report;

    fn try_from(row: DbAbsence) -> Result<Self> {
        Ok(AbsenceRequest {
            id: row.id,
            teacher_id: row.teacher_id,
            start_time: row.start_time,
            end_time: row.end_time,
            status: row.status.parse()?,
        })
    }
}

impl TryFrom<DbBooking> for Booking {
    type Error = eyre::Report;

    fn try_from(row: DbBooking) -> Result<Self> {
        Ok(Booking {
            id: row.id,
            teacher_id: row.teacher_id,
            student_id: row.student_id,
            calendar_id: row.calendar_id,
            start_time: row.start_time,
            end_time: row.end_time,
            status: row.status.parse()?,
            created_time: row.created_time,
        })
    }
}

/// Converts a batch of rows, failing on the first row with an unknown status.
pub(crate) fn convert_rows<R, T>(rows: Vec<R>) -> Result<Vec<T>>
where
    T: TryFrom<R, Error = eyre::Report>,
{
    rows.into_iter().map(T::try_from).collect()
}
