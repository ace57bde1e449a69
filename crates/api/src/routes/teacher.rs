use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/teachers", post(handlers::teacher::create_teacher))
        .route("/api/teachers/:id", get(handlers::teacher::get_teacher))
        .route(
            "/api/teachers/:id/regular-times",
            put(handlers::teacher::update_regular_times),
        )
        .route(
            "/api/teachers/:id/release",
            post(handlers::teacher::release_teacher),
        )
        .route(
            "/api/teachers/:id/regular-schedules",
            get(handlers::teacher::list_regular_schedules)
                .post(handlers::teacher::register_regular_schedule),
        )
}
