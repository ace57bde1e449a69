use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/teachers/:id/availability",
            get(handlers::availability::get_schedules_active),
        )
        .route(
            "/api/availability/teachers",
            get(handlers::availability::find_available_teachers),
        )
}
