mod test_utils;

use axum::http::StatusCode;
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tutorsync_api::{app, middleware::error_handling::map_error};
use tutorsync_core::{
    errors::TutorError,
    models::{
        availability::{AvailabilityResult, AvailableTeachersResponse},
        booking::Booking,
        calendar::{CountSlotsResponse, OpenSlotResponse},
        teacher::Teacher,
    },
    time::{DAY_MS, HOUR_MS, MINUTE_MS, WEEK_MS},
};

use test_utils::{TestContext, NOW};

const LESSON: i64 = NOW + 2 * HOUR_MS;

fn server(ctx: &TestContext) -> TestServer {
    TestServer::new(app(ctx.state())).unwrap()
}

async fn create_teacher(server: &TestServer, regular_times: Value) -> Teacher {
    let response = server
        .post("/api/teachers")
        .json(&json!({ "name": "Ada", "regular_times": regular_times }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Teacher>()
}

async fn open_slot(server: &TestServer, teacher_id: i64, start: i64) -> i64 {
    let response = server
        .post("/api/calendars")
        .json(&json!({
            "teacher_id": teacher_id,
            "start_time": start,
            "end_time": start + 30 * MINUTE_MS,
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<OpenSlotResponse>().id
}

async fn teachers_at(server: &TestServer, at: i64) -> Vec<i64> {
    let response = server
        .get("/api/availability/teachers")
        .add_query_param("at", at)
        .await;
    response.assert_status_ok();
    response.json::<AvailableTeachersResponse>().teacher_ids
}

#[tokio::test]
async fn test_health_and_version() {
    let ctx = TestContext::new();
    let server = server(&ctx);

    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "ok" }));

    let response = server.get("/version").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["name"], "tutorsync-api");
}

#[tokio::test]
async fn test_teacher_round_trip() {
    let ctx = TestContext::new();
    let server = server(&ctx);

    let teacher = create_teacher(&server, json!([10 * HOUR_MS])).await;

    let response = server.get(&format!("/api/teachers/{}", teacher.id)).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Teacher>(), teacher);

    server
        .get("/api/teachers/999")
        .expect_failure()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_availability_over_http() {
    let ctx = TestContext::new();
    let server = server(&ctx);
    let teacher = create_teacher(&server, json!([])).await;
    let slot = open_slot(&server, teacher.id, LESSON).await;

    let response = server
        .get(&format!("/api/teachers/{}/availability", teacher.id))
        .add_query_param("start", NOW)
        .add_query_param("end", NOW + DAY_MS)
        .await;
    response.assert_status_ok();
    let result = response.json::<AvailabilityResult>();
    assert_eq!(result.available.len(), 1);
    assert_eq!(result.available[0].id, slot);

    let response = server
        .get("/api/availability/teachers")
        .add_query_param("at", LESSON)
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<AvailableTeachersResponse>().teacher_ids, vec![teacher.id]);
}

#[tokio::test]
async fn test_non_numeric_time_is_rejected() {
    let ctx = TestContext::new();
    let server = server(&ctx);

    let response = server
        .get("/api/availability/teachers")
        .add_query_param("at", "tomorrow")
        .expect_failure()
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert!(body["error"].as_str().unwrap().contains("at must be epoch milliseconds"));

    server
        .get("/api/teachers/1/availability")
        .add_query_param("start", "1x")
        .add_query_param("end", NOW)
        .expect_failure()
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_instants_beyond_the_horizon_match_nobody() {
    let ctx = TestContext::new();
    let server = server(&ctx);
    let teacher = create_teacher(&server, json!([10 * HOUR_MS])).await;

    assert_eq!(teachers_at(&server, LESSON + 8 * WEEK_MS).await, vec![teacher.id]);
    assert!(teachers_at(&server, LESSON + 9 * WEEK_MS).await.is_empty());
    assert!(teachers_at(&server, i64::MAX).await.is_empty());
}

#[tokio::test]
async fn test_double_booking_is_a_conflict() {
    let ctx = TestContext::new();
    let server = server(&ctx);
    let teacher = create_teacher(&server, json!([])).await;
    let slot = open_slot(&server, teacher.id, LESSON).await;

    let response = server
        .post("/api/bookings")
        .json(&json!({ "student_id": 1, "calendar_id": slot }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let booking = response.json::<Booking>();

    server
        .post("/api/bookings")
        .json(&json!({ "student_id": 2, "calendar_id": slot }))
        .expect_failure()
        .await
        .assert_status(StatusCode::CONFLICT);

    let response = server
        .put(&format!("/api/bookings/{}/status", booking.id))
        .json(&json!({ "status": "cancel_by_student" }))
        .await;
    response.assert_status_ok();

    server
        .put(&format!("/api/calendars/{}/toggle", slot))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_slot_listing_and_count() {
    let ctx = TestContext::new();
    let server = server(&ctx);
    let teacher = create_teacher(&server, json!([])).await;
    open_slot(&server, teacher.id, LESSON).await;
    open_slot(&server, teacher.id, LESSON + HOUR_MS).await;

    let response = server
        .get("/api/calendars")
        .add_query_param("teacher_id", teacher.id)
        .add_query_param("start", NOW)
        .add_query_param("end", NOW + DAY_MS)
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Vec<Value>>().len(), 2);

    let response = server
        .get("/api/calendars/count")
        .add_query_param("teacher_id", teacher.id)
        .add_query_param("start", LESSON)
        .add_query_param("end", LESSON + HOUR_MS)
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<CountSlotsResponse>().count, 1);
}

#[tokio::test]
async fn test_admin_can_open_past_slots() {
    let ctx = TestContext::new();
    let server = server(&ctx);
    let teacher = create_teacher(&server, json!([])).await;
    let body = json!({
        "teacher_id": teacher.id,
        "start_time": NOW - 2 * HOUR_MS,
        "end_time": NOW - HOUR_MS,
    });

    server
        .post("/api/calendars")
        .json(&body)
        .expect_failure()
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .post("/api/admin/calendars")
        .json(&body)
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_regular_schedules_and_release() {
    let ctx = TestContext::new();
    let server = server(&ctx);
    let teacher = create_teacher(&server, json!([10 * HOUR_MS])).await;
    let path = format!("/api/teachers/{}/regular-schedules", teacher.id);

    server
        .post(&path)
        .json(&json!({ "regular_start_time": 10 * HOUR_MS }))
        .await
        .assert_status(StatusCode::CREATED);
    server
        .post(&path)
        .json(&json!({ "regular_start_time": 10 * HOUR_MS }))
        .expect_failure()
        .await
        .assert_status(StatusCode::CONFLICT);

    let response = server.get(&path).await;
    assert_eq!(response.json::<Vec<Value>>().len(), 1);

    let response = server
        .post(&format!("/api/teachers/{}/release", teacher.id))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["removed_regular_schedules"], 1);
}

#[tokio::test]
async fn test_absence_endpoints() {
    let ctx = TestContext::new();
    let server = server(&ctx);
    let teacher = create_teacher(&server, json!([])).await;

    let response = server
        .post("/api/absences")
        .json(&json!({
            "teacher_id": teacher.id,
            "start_time": NOW,
            "end_time": NOW + DAY_MS,
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let id = response.json::<Value>()["id"].as_i64().unwrap();

    let response = server
        .put(&format!("/api/absences/{}/status", id))
        .json(&json!({ "status": "approved" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "approved");

    server
        .put(&format!("/api/absences/{}/status", id))
        .json(&json!({ "status": "vacation" }))
        .expect_failure()
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
fn test_error_mapping() {
    let cases = [
        (TutorError::NotFound("x".into()), StatusCode::NOT_FOUND),
        (TutorError::Validation("x".into()), StatusCode::BAD_REQUEST),
        (TutorError::Conflict("x".into()), StatusCode::CONFLICT),
        (TutorError::Database(eyre::eyre!("x")), StatusCode::INTERNAL_SERVER_ERROR),
        (
            TutorError::Internal(Box::new(std::io::Error::new(std::io::ErrorKind::Other, "x"))),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (error, status) in cases {
        assert_eq!(map_error(error).status(), status);
    }
}
