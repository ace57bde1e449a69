pub mod absence;
pub mod availability;
pub mod booking;
pub mod calendar;
pub mod teacher;

use serde::Deserialize;
use tutorsync_core::{errors::TutorError, time::Millis};

use crate::middleware::error_handling::AppError;

/// Epoch milliseconds arrive as query strings and are parsed here so a
/// malformed value is reported as a validation error naming the field.
pub fn parse_millis(field: &str, value: &str) -> Result<Millis, AppError> {
    value.trim().parse::<Millis>().map_err(|_| {
        AppError(TutorError::Validation(format!(
            "{} must be epoch milliseconds, got {:?}",
            field, value
        )))
    })
}

/// `?start=..&end=..` window shared by the range queries.
#[derive(Debug, Deserialize)]
pub struct TimeWindowQuery {
    pub start: String,
    pub end: String,
}

impl TimeWindowQuery {
    pub fn parse(&self) -> Result<(Millis, Millis), AppError> {
        Ok((parse_millis("start", &self.start)?, parse_millis("end", &self.end)?))
    }
}
