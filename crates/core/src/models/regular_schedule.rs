use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{RegularScheduleId, TeacherId};
use crate::errors::TutorError;
use crate::time::Millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegularScheduleStatus {
    Active,
    /// Still running, but the teacher has asked to stop after the current cycle.
    ActivePendingCancel,
    Expired,
    Cancelled,
}

impl RegularScheduleStatus {
    pub const ALL: [RegularScheduleStatus; 4] = [
        RegularScheduleStatus::Active,
        RegularScheduleStatus::ActivePendingCancel,
        RegularScheduleStatus::Expired,
        RegularScheduleStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RegularScheduleStatus::Active => "active",
            RegularScheduleStatus::ActivePendingCancel => "active_pending_cancel",
            RegularScheduleStatus::Expired => "expired",
            RegularScheduleStatus::Cancelled => "cancelled",
        }
    }

    /// Rows reported as "registered" in a teacher's availability and
    /// subtracted from the offsets they can still offer.
    pub fn is_registered(&self) -> bool {
        match self {
            RegularScheduleStatus::Active
            | RegularScheduleStatus::ActivePendingCancel
            | RegularScheduleStatus::Expired => true,
            RegularScheduleStatus::Cancelled => false,
        }
    }

    /// Rows that hold their week offset right now.
    pub fn commits_offset(&self) -> bool {
        match self {
            RegularScheduleStatus::Active | RegularScheduleStatus::ActivePendingCancel => true,
            RegularScheduleStatus::Expired | RegularScheduleStatus::Cancelled => false,
        }
    }

    pub fn registered() -> Vec<RegularScheduleStatus> {
        Self::ALL.into_iter().filter(|s| s.is_registered()).collect()
    }

    pub fn committed() -> Vec<RegularScheduleStatus> {
        Self::ALL.into_iter().filter(|s| s.commits_offset()).collect()
    }
}

impl fmt::Display for RegularScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegularScheduleStatus {
    type Err = TutorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| TutorError::Validation(format!("Unknown regular schedule status: {}", s)))
    }
}

/// A weekly commitment of a teacher, keyed by its offset within the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegularSchedule {
    pub id: RegularScheduleId,
    pub teacher_id: TeacherId,
    pub regular_start_time: Millis,
    pub status: RegularScheduleStatus,
}

pub type NewRegularSchedule = RegularSchedule;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRegularScheduleRequest {
    pub regular_start_time: Millis,
}
