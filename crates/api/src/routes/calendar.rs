use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/calendars",
            get(handlers::calendar::list_slots).post(handlers::calendar::open_slot),
        )
        .route("/api/calendars/count", get(handlers::calendar::count_open_slots))
        .route("/api/admin/calendars", post(handlers::calendar::admin_open_slot))
        .route("/api/calendars/:id/toggle", put(handlers::calendar::toggle_slot))
}
