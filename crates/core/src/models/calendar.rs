use serde::{Deserialize, Serialize};

use super::{CalendarId, TeacherId};
use crate::time::{overlaps, Millis};

/// One ad-hoc, bookable time unit of a teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSlot {
    pub id: CalendarId,
    pub teacher_id: TeacherId,
    pub start_time: Millis,
    pub end_time: Millis,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl CalendarSlot {
    /// True when the slot spans the whole of `[start, end)`.
    pub fn covers(&self, start: Millis, end: Millis) -> bool {
        self.start_time <= start && self.end_time >= end
    }

    pub fn overlaps(&self, start: Millis, end: Millis) -> bool {
        overlaps(self.start_time, self.end_time, start, end)
    }
}

/// Insert payload; new slots are always created active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCalendarSlot {
    pub id: CalendarId,
    pub teacher_id: TeacherId,
    pub start_time: Millis,
    pub end_time: Millis,
    pub external_id: Option<String>,
}

impl NewCalendarSlot {
    pub fn into_slot(self) -> CalendarSlot {
        CalendarSlot {
            id: self.id,
            teacher_id: self.teacher_id,
            start_time: self.start_time,
            end_time: self.end_time,
            is_active: true,
            external_id: self.external_id,
        }
    }
}

/// How a single slot is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotLookup {
    Id(CalendarId),
    Key {
        teacher_id: TeacherId,
        start_time: Millis,
        end_time: Millis,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenSlotRequest {
    pub teacher_id: TeacherId,
    pub start_time: Millis,
    pub end_time: Millis,
    pub external_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenSlotResponse {
    pub id: CalendarId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountSlotsResponse {
    pub teacher_id: TeacherId,
    pub count: u64,
}
