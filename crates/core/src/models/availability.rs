use serde::{Deserialize, Serialize};

use super::{
    absence::AbsenceRequest, booking::Booking, calendar::CalendarSlot,
    regular_schedule::RegularSchedule, TeacherId,
};
use crate::time::Millis;

/// A teacher's availability over one window, split by source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResult {
    /// Occupying bookings whose slot still exists.
    pub booked: Vec<Booking>,
    /// Active ad-hoc slots nobody occupies.
    pub available: Vec<CalendarSlot>,
    pub registered_regular: Vec<RegularSchedule>,
    /// Concrete instants of regular offsets that are not yet registered.
    pub available_regular: Vec<Millis>,
    pub on_absence: Vec<AbsenceRequest>,
}

impl AvailabilityResult {
    pub fn is_empty(&self) -> bool {
        self.booked.is_empty()
            && self.available.is_empty()
            && self.registered_regular.is_empty()
            && self.available_regular.is_empty()
            && self.on_absence.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableTeachersResponse {
    pub at: Millis,
    pub teacher_ids: Vec<TeacherId>,
}
