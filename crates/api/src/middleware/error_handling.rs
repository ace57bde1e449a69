//! # Error Handling Middleware
//!
//! Maps [`TutorError`] onto HTTP status codes and a `{"error": message}`
//! JSON body, so every handler reports failures the same way.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;
use tutorsync_core::errors::TutorError;

/// Application error wrapper that provides HTTP status code mapping.
///
/// # Example
///
/// ```
/// use axum::Json;
/// use tutorsync_api::middleware::error_handling::AppError;
/// use tutorsync_core::errors::TutorError;
///
/// async fn handler(id: i64) -> Result<Json<i64>, AppError> {
///     if id < 0 {
///         return Err(AppError(TutorError::Validation("negative id".into())));
///     }
///     Ok(Json(id))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub TutorError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            TutorError::NotFound(_) => StatusCode::NOT_FOUND,
            TutorError::Validation(_) => StatusCode::BAD_REQUEST,
            TutorError::Conflict(_) => StatusCode::CONFLICT,
            TutorError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TutorError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = ?self.0, "Request failed");
        }

        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

impl From<TutorError> for AppError {
    fn from(err: TutorError) -> Self {
        AppError(err)
    }
}

/// Store failures surface as database errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(TutorError::Database(err))
    }
}

/// Maps a TutorError straight to a response.
pub fn map_error(err: TutorError) -> Response {
    AppError(err).into_response()
}
