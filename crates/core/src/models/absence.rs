use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{AbsenceId, TeacherId};
use crate::errors::TutorError;
use crate::time::{overlaps, Millis};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl AbsenceStatus {
    pub const ALL: [AbsenceStatus; 4] = [
        AbsenceStatus::Pending,
        AbsenceStatus::Approved,
        AbsenceStatus::Rejected,
        AbsenceStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AbsenceStatus::Pending => "pending",
            AbsenceStatus::Approved => "approved",
            AbsenceStatus::Rejected => "rejected",
            AbsenceStatus::Cancelled => "cancelled",
        }
    }

    /// Pending requests are decided once; an approval can only be withdrawn.
    pub fn can_transition_to(&self, next: AbsenceStatus) -> bool {
        use AbsenceStatus::*;

        match (self, next) {
            (Pending, Approved | Rejected | Cancelled) => true,
            (Approved, Cancelled) => true,
            (Pending | Approved, _) => false,
            (Rejected | Cancelled, _) => false,
        }
    }

    pub fn vetoes_availability(&self) -> bool {
        match self {
            AbsenceStatus::Approved => true,
            AbsenceStatus::Pending | AbsenceStatus::Rejected | AbsenceStatus::Cancelled => false,
        }
    }
}

impl fmt::Display for AbsenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AbsenceStatus {
    type Err = TutorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| TutorError::Validation(format!("Unknown absence status: {}", s)))
    }
}

/// Time off requested by a teacher. Once approved it vetoes availability
/// in `[start_time, end_time)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceRequest {
    pub id: AbsenceId,
    pub teacher_id: TeacherId,
    pub start_time: Millis,
    pub end_time: Millis,
    pub status: AbsenceStatus,
}

impl AbsenceRequest {
    pub fn overlaps(&self, start: Millis, end: Millis) -> bool {
        overlaps(self.start_time, self.end_time, start, end)
    }
}

pub type NewAbsence = AbsenceRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAbsenceRequest {
    pub teacher_id: TeacherId,
    pub start_time: Millis,
    pub end_time: Millis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAbsenceStatusRequest {
    pub status: AbsenceStatus,
}
