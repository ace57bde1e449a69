//! # Week and Period Arithmetic
//!
//! All instants are epoch milliseconds. A recurring ("regular") commitment is
//! identified by its offset from the start of the week, so matching a
//! concrete instant against a regular offset is plain modulo arithmetic.
//!
//! The platform week starts on Monday 00:00 in a fixed UTC offset. No
//! daylight-saving shifts are applied, which keeps every week exactly
//! [`WEEK_MS`] long.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Epoch milliseconds.
pub type Millis = i64;

pub const MINUTE_MS: Millis = 60_000;
pub const HOUR_MS: Millis = 60 * MINUTE_MS;
pub const DAY_MS: Millis = 24 * HOUR_MS;
pub const WEEK_MS: Millis = 7 * DAY_MS;

// 1970-01-01 was a Thursday; the first Monday is four days later.
const EPOCH_MONDAY_MS: Millis = 4 * DAY_MS;

/// Maps any offset into `[0, WEEK_MS)`.
pub fn normalize_offset(offset: Millis) -> Millis {
    offset.rem_euclid(WEEK_MS)
}

/// Normalizes, sorts and deduplicates a list of week offsets.
pub fn normalize_offsets<I>(offsets: I) -> Vec<Millis>
where
    I: IntoIterator<Item = Millis>,
{
    offsets
        .into_iter()
        .map(normalize_offset)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Half-open interval intersection: `[a_start, a_end)` and `[b_start, b_end)`
/// overlap when each starts before the other ends. Intervals that only touch
/// at an edge do not overlap.
pub fn overlaps(a_start: Millis, a_end: Millis, b_start: Millis, b_end: Millis) -> bool {
    a_start < b_end && a_end > b_start
}

/// Week geometry of the platform: where weeks start and how slots are gridded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekClock {
    utc_offset: Millis,
    slot_size: Millis,
}

impl WeekClock {
    pub fn new(utc_offset_minutes: i32, slot_minutes: u32) -> Self {
        Self {
            utc_offset: Millis::from(utc_offset_minutes) * MINUTE_MS,
            slot_size: Millis::from(slot_minutes) * MINUTE_MS,
        }
    }

    /// UTC weeks with a 30 minute slot grid.
    pub fn utc() -> Self {
        Self::new(0, 30)
    }

    pub fn slot_size(&self) -> Millis {
        self.slot_size
    }

    /// Milliseconds elapsed since the start of the week containing `t`.
    pub fn week_offset(&self, t: Millis) -> Millis {
        let shifted = i128::from(t) + i128::from(self.utc_offset) - i128::from(EPOCH_MONDAY_MS);
        // The remainder is below WEEK_MS, so narrowing back is lossless.
        shifted.rem_euclid(i128::from(WEEK_MS)) as Millis
    }

    /// Beginning of the week containing `t`.
    pub fn start_of_week(&self, t: Millis) -> Millis {
        t - self.week_offset(t)
    }

    /// Every instant in `[start, end)` whose week offset equals one of
    /// `offsets` (modulo one week). The result is sorted and free of
    /// duplicates.
    pub fn occurrences_in_range<I>(&self, offsets: I, start: Millis, end: Millis) -> Vec<Millis>
    where
        I: IntoIterator<Item = Millis>,
    {
        if start >= end {
            return Vec::new();
        }

        let first_week = self.start_of_week(start);
        let mut occurrences = BTreeSet::new();
        for offset in offsets {
            let mut instant = first_week + normalize_offset(offset);
            while instant < end {
                if instant >= start {
                    occurrences.insert(instant);
                }
                instant += WEEK_MS;
            }
        }

        occurrences.into_iter().collect()
    }

    /// True when `t` sits on a slot boundary of the platform grid.
    pub fn is_valid_slot_start(&self, t: Millis) -> bool {
        self.slot_size > 0
            && (i128::from(t) + i128::from(self.utc_offset)).rem_euclid(i128::from(self.slot_size)) == 0
    }
}

impl Default for WeekClock {
    fn default() -> Self {
        Self::utc()
    }
}

/// Source of "now", injectable so that time-dependent rules can be tested.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Millis;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Millis {
        Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct FixedClock(AtomicI64);

impl FixedClock {
    pub fn new(now: Millis) -> Self {
        Self(AtomicI64::new(now))
    }

    pub fn set(&self, now: Millis) {
        self.0.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Millis) {
        self.0.fetch_add(by, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Millis {
        self.0.load(Ordering::SeqCst)
    }
}
