use std::error::Error;
use tutorsync_core::errors::{TutorError, TutorResult};

#[test]
fn test_tutor_error_display() {
    let not_found = TutorError::NotFound("Teacher 7 not found".to_string());
    let validation = TutorError::Validation("Invalid input".to_string());
    let conflict = TutorError::Conflict("Calendar slot 3 is already booked".to_string());
    let database = TutorError::Database(eyre::eyre!("Database connection failed"));
    let internal = TutorError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));

    assert_eq!(not_found.to_string(), "Resource not found: Teacher 7 not found");
    assert_eq!(validation.to_string(), "Validation error: Invalid input");
    assert_eq!(conflict.to_string(), "Conflict: Calendar slot 3 is already booked");
    assert!(database.to_string().contains("Database error:"));
    assert!(internal.to_string().contains("Internal server error:"));
}

#[test]
fn test_error_conversion() {
    let report = eyre::eyre!("connection reset");
    let error: TutorError = report.into();
    assert!(matches!(error, TutorError::Database(_)));

    let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
    let boxed: Box<dyn Error + Send + Sync> = Box::new(io);
    let error: TutorError = boxed.into();
    assert!(matches!(error, TutorError::Internal(_)));
}

#[test]
fn test_result_propagation() {
    fn lookup(found: bool) -> TutorResult<i64> {
        if found {
            Ok(1)
        } else {
            Err(TutorError::NotFound("missing".to_string()))
        }
    }

    fn wrapper() -> TutorResult<i64> {
        let id = lookup(false)?;
        Ok(id + 1)
    }

    assert_eq!(lookup(true).ok(), Some(1));
    assert!(matches!(wrapper(), Err(TutorError::NotFound(_))));
}
