use serde::{Deserialize, Serialize};

use super::TeacherId;
use crate::time::{normalize_offset, Millis};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    /// Week offsets the teacher is willing to teach every week.
    pub regular_times: Vec<Millis>,
    pub is_active: bool,
}

impl Teacher {
    pub fn offers_regular(&self, week_offset: Millis) -> bool {
        let wanted = normalize_offset(week_offset);
        self.regular_times.iter().any(|&t| normalize_offset(t) == wanted)
    }
}

pub type NewTeacher = Teacher;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeacherRequest {
    pub name: String,
    #[serde(default)]
    pub regular_times: Vec<Millis>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRegularTimesRequest {
    pub regular_times: Vec<Millis>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRegularTimesResponse {
    pub teacher: Teacher,
    /// Ad-hoc slots removed because a new regular offset supersedes them.
    pub removed_slots: u64,
}

/// Outcome of releasing everything a deactivated teacher still holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseSummary {
    pub teacher_id: TeacherId,
    pub removed_slots: u64,
    pub cancelled_bookings: u64,
    pub removed_regular_schedules: u64,
}
