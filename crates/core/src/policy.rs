use serde::{Deserialize, Serialize};

use crate::time::{Millis, WeekClock, DAY_MS, MINUTE_MS};

/// Tunable scheduling rules.
///
/// The defaults match the production platform: a 60 day query horizon,
/// one hour of lead time for self-service slots, a 30 minute slot grid and
/// a 30 minute matching lookahead on UTC weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingPolicy {
    /// Bound on how far back, how far ahead and how wide an availability window may be.
    pub max_window_days: i64,
    /// Minimum distance between now and the start of a teacher-opened slot.
    pub min_lead_time_minutes: i64,
    pub slot_grid_minutes: u32,
    /// Width of the window used when matching teachers to an instant.
    pub lookahead_minutes: i64,
    pub week_utc_offset_minutes: i32,
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        Self {
            max_window_days: 60,
            min_lead_time_minutes: 60,
            slot_grid_minutes: 30,
            lookahead_minutes: 30,
            week_utc_offset_minutes: 0,
        }
    }
}

impl SchedulingPolicy {
    pub fn week_clock(&self) -> WeekClock {
        WeekClock::new(self.week_utc_offset_minutes, self.slot_grid_minutes)
    }

    pub fn max_window(&self) -> Millis {
        self.max_window_days * DAY_MS
    }

    pub fn min_lead_time(&self) -> Millis {
        self.min_lead_time_minutes * MINUTE_MS
    }

    pub fn lookahead(&self) -> Millis {
        self.lookahead_minutes * MINUTE_MS
    }
}
