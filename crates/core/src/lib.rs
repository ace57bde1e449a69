//! # TutorSync Core
//!
//! Domain types shared by the storage and API crates: teachers, calendar
//! slots, regular schedules, absences and bookings, together with the error
//! taxonomy, the scheduling policy and the week/period arithmetic the
//! availability engine is built on.

pub mod errors;
pub mod models;
pub mod policy;
pub mod time;
