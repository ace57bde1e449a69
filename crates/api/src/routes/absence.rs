use axum::{
    routing::{post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/absences", post(handlers::absence::request_absence))
        .route(
            "/api/absences/:id/status",
            put(handlers::absence::set_absence_status),
        )
}
