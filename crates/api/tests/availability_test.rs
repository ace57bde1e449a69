mod test_utils;

use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use rstest::rstest;
use tutorsync_api::services::{availability::AvailabilityEngine, teachers::TeacherService};
use tutorsync_core::{
    models::{availability::AvailabilityResult, booking::BookingStatus},
    time::{WeekClock, DAY_MS, HOUR_MS, MINUTE_MS, WEEK_MS},
};

use test_utils::{TestContext, MONDAY, NOW};

const HALF_HOUR: i64 = 30 * MINUTE_MS;
// Monday 10:00, two hours after NOW.
const LESSON: i64 = NOW + 2 * HOUR_MS;

#[tokio::test]
async fn test_booked_and_available_are_disjoint() {
    let ctx = TestContext::new();
    let teacher = ctx.teacher(vec![]).await;
    let first = ctx.slot(teacher.id, LESSON, LESSON + HALF_HOUR).await;
    let second = ctx.slot(teacher.id, LESSON + HOUR_MS, LESSON + HOUR_MS + HALF_HOUR).await;
    let booking = ctx.book(first).await;

    let engine = AvailabilityEngine::new(&ctx.context);
    let result = engine
        .get_schedules_active(teacher.id, NOW, NOW + DAY_MS)
        .await
        .unwrap();

    assert_eq!(result.booked, vec![booking.clone()]);
    let available: Vec<i64> = result.available.iter().map(|s| s.id).collect();
    assert_eq!(available, vec![second]);

    ctx.set_booking_status(&booking, BookingStatus::CancelByStudent).await;
    let result = engine
        .get_schedules_active(teacher.id, NOW, NOW + DAY_MS)
        .await
        .unwrap();

    assert!(result.booked.is_empty());
    let available: Vec<i64> = result.available.iter().map(|s| s.id).collect();
    assert_eq!(available, vec![first, second]);
}

#[tokio::test]
async fn test_teacher_cancellation_keeps_slot_booked() {
    let ctx = TestContext::new();
    let teacher = ctx.teacher(vec![]).await;
    let slot = ctx.slot(teacher.id, LESSON, LESSON + HALF_HOUR).await;
    let booking = ctx.book(slot).await;
    ctx.set_booking_status(&booking, BookingStatus::CancelByTeacher).await;

    let result = AvailabilityEngine::new(&ctx.context)
        .get_schedules_active(teacher.id, NOW, NOW + DAY_MS)
        .await
        .unwrap();

    assert_eq!(result.booked.len(), 1);
    assert!(result.available.is_empty());
}

#[rstest]
#[case::empty_window(NOW, NOW)]
#[case::reversed(NOW + DAY_MS, NOW)]
#[case::too_wide(NOW - 31 * DAY_MS, NOW + 30 * DAY_MS)]
#[case::too_far_back(NOW - 61 * DAY_MS, NOW - 60 * DAY_MS)]
#[case::too_far_ahead(NOW + 60 * DAY_MS, NOW + 61 * DAY_MS)]
#[tokio::test]
async fn test_out_of_bounds_windows_are_empty(#[case] start: i64, #[case] end: i64) {
    let ctx = TestContext::new();
    let teacher = ctx.teacher(vec![10 * HOUR_MS]).await;
    ctx.slot(teacher.id, LESSON, LESSON + HALF_HOUR).await;

    let result = AvailabilityEngine::new(&ctx.context)
        .get_schedules_active(teacher.id, start, end)
        .await
        .unwrap();

    assert_eq!(result, AvailabilityResult::default());
}

#[tokio::test]
async fn test_full_horizon_window_is_answered() {
    let ctx = TestContext::new();
    let teacher = ctx.teacher(vec![]).await;
    ctx.slot(teacher.id, LESSON, LESSON + HALF_HOUR).await;

    let result = AvailabilityEngine::new(&ctx.context)
        .get_schedules_active(teacher.id, NOW, NOW + 60 * DAY_MS)
        .await
        .unwrap();

    assert_eq!(result.available.len(), 1);
}

#[tokio::test]
async fn test_unknown_teacher_is_empty() {
    let ctx = TestContext::new();

    let result = AvailabilityEngine::new(&ctx.context)
        .get_schedules_active(404, NOW, NOW + DAY_MS)
        .await
        .unwrap();

    assert!(result.is_empty());
}

#[tokio::test]
async fn test_registered_offsets_leave_available_regular() {
    let ctx = TestContext::new();
    let monday_ten = 10 * HOUR_MS;
    let wednesday_two = 2 * DAY_MS + 14 * HOUR_MS;
    let teacher = ctx.teacher(vec![monday_ten, wednesday_two]).await;
    TeacherService::new(&ctx.context)
        .register_regular_schedule(teacher.id, monday_ten)
        .await
        .unwrap();

    let result = AvailabilityEngine::new(&ctx.context)
        .get_schedules_active(teacher.id, NOW, NOW + 2 * WEEK_MS)
        .await
        .unwrap();

    assert_eq!(result.registered_regular.len(), 1);
    assert_eq!(
        result.available_regular,
        vec![MONDAY + wednesday_two, MONDAY + WEEK_MS + wednesday_two]
    );

    let clock = WeekClock::utc();
    for instant in &result.available_regular {
        let offset = clock.week_offset(*instant);
        assert!(teacher.regular_times.contains(&offset));
        assert_ne!(offset, monday_ten);
    }
}

#[test_log::test(tokio::test)]
async fn test_booking_on_missing_slot_is_dropped() {
    let ctx = TestContext::new();
    let teacher = ctx.teacher(vec![]).await;
    let slot = ctx.slot(teacher.id, LESSON, LESSON + HALF_HOUR).await;
    ctx.book(slot).await;
    ctx.stores().calendars.delete(slot).await.unwrap();

    let result = AvailabilityEngine::new(&ctx.context)
        .get_schedules_active(teacher.id, NOW, NOW + DAY_MS)
        .await
        .unwrap();

    assert!(result.booked.is_empty());
    assert!(result.available.is_empty());
}

#[tokio::test]
async fn test_approved_absences_are_reported() {
    let ctx = TestContext::new();
    let teacher = ctx.teacher(vec![]).await;
    let absence = ctx
        .approved_absence(teacher.id, NOW + DAY_MS, NOW + 2 * DAY_MS)
        .await;

    let result = AvailabilityEngine::new(&ctx.context)
        .get_schedules_active(teacher.id, NOW, NOW + WEEK_MS)
        .await
        .unwrap();

    assert_eq!(result.on_absence, vec![absence]);
}

#[tokio::test]
async fn test_past_instant_matches_nobody() {
    let ctx = TestContext::new();
    let teacher = ctx.teacher(vec![]).await;
    ctx.slot(teacher.id, NOW - HOUR_MS, NOW).await;

    let engine = AvailabilityEngine::new(&ctx.context);

    assert!(engine.find_available_teachers(NOW - HOUR_MS).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_open_slot_and_regular_offer_both_count() {
    let ctx = TestContext::new();
    let by_slot = ctx.teacher(vec![]).await;
    ctx.slot(by_slot.id, LESSON, LESSON + HOUR_MS).await;
    let by_regular = ctx.teacher(vec![10 * HOUR_MS]).await;
    let elsewhere = ctx.teacher(vec![11 * HOUR_MS]).await;
    ctx.slot(elsewhere.id, LESSON + HALF_HOUR, LESSON + HOUR_MS).await;

    let found = AvailabilityEngine::new(&ctx.context)
        .find_available_teachers(LESSON)
        .await
        .unwrap();

    assert_eq!(found, BTreeSet::from([by_slot.id, by_regular.id]));
}

#[tokio::test]
async fn test_committed_regular_offset_excludes_teacher() {
    let ctx = TestContext::new();
    let teacher = ctx.teacher(vec![10 * HOUR_MS]).await;
    let engine = AvailabilityEngine::new(&ctx.context);

    assert!(engine.find_available_teachers(LESSON).await.unwrap().contains(&teacher.id));

    TeacherService::new(&ctx.context)
        .register_regular_schedule(teacher.id, 10 * HOUR_MS)
        .await
        .unwrap();

    assert!(!engine.find_available_teachers(LESSON).await.unwrap().contains(&teacher.id));
    // The commitment repeats every week.
    assert!(!engine
        .find_available_teachers(LESSON + WEEK_MS)
        .await
        .unwrap()
        .contains(&teacher.id));
}

#[tokio::test]
async fn test_occupying_booking_excludes_teacher() {
    let ctx = TestContext::new();
    let teacher = ctx.teacher(vec![]).await;
    let slot = ctx.slot(teacher.id, LESSON, LESSON + HALF_HOUR).await;
    ctx.book(slot).await;

    let found = AvailabilityEngine::new(&ctx.context)
        .find_available_teachers(LESSON)
        .await
        .unwrap();

    assert!(!found.contains(&teacher.id));
}

#[tokio::test]
async fn test_released_latest_booking_restores_teacher() {
    let ctx = TestContext::new();
    let teacher = ctx.teacher(vec![]).await;
    let slot = ctx.slot(teacher.id, LESSON, LESSON + HALF_HOUR).await;
    let booking = ctx.book(slot).await;
    ctx.set_booking_status(&booking, BookingStatus::ChangeTime).await;

    let found = AvailabilityEngine::new(&ctx.context)
        .find_available_teachers(LESSON)
        .await
        .unwrap();

    assert!(found.contains(&teacher.id));
}

#[tokio::test]
async fn test_released_booking_with_regular_commitment_restores_teacher() {
    let ctx = TestContext::new();
    let teacher = ctx.teacher(vec![10 * HOUR_MS]).await;
    TeacherService::new(&ctx.context)
        .register_regular_schedule(teacher.id, 10 * HOUR_MS)
        .await
        .unwrap();
    let slot = ctx.slot(teacher.id, LESSON, LESSON + HALF_HOUR).await;
    let booking = ctx.book(slot).await;
    ctx.set_booking_status(&booking, BookingStatus::CancelByStudent).await;

    let found = AvailabilityEngine::new(&ctx.context)
        .find_available_teachers(LESSON)
        .await
        .unwrap();

    assert!(found.contains(&teacher.id));
}

#[tokio::test]
async fn test_confirmed_rebooking_at_same_start_excludes_teacher() {
    let ctx = TestContext::new();
    let teacher = ctx.teacher(vec![]).await;
    let short = ctx.slot(teacher.id, LESSON, LESSON + HALF_HOUR).await;
    let long = ctx.slot(teacher.id, LESSON, LESSON + HOUR_MS).await;

    let kept = ctx.book(short).await;
    ctx.set_booking_status(&kept, BookingStatus::Confirmed).await;
    let dropped = ctx.book(long).await;
    ctx.set_booking_status(&dropped, BookingStatus::CancelByStudent).await;

    let found = AvailabilityEngine::new(&ctx.context)
        .find_available_teachers(LESSON)
        .await
        .unwrap();

    assert!(!found.contains(&teacher.id));
}

#[tokio::test]
async fn test_approved_absence_excludes_teacher() {
    let ctx = TestContext::new();
    let teacher = ctx.teacher(vec![10 * HOUR_MS]).await;
    ctx.slot(teacher.id, LESSON, LESSON + HOUR_MS).await;
    ctx.approved_absence(teacher.id, LESSON - HOUR_MS, LESSON + 15 * MINUTE_MS)
        .await;

    let found = AvailabilityEngine::new(&ctx.context)
        .find_available_teachers(LESSON)
        .await
        .unwrap();

    assert!(!found.contains(&teacher.id));
}

#[tokio::test]
async fn test_released_teacher_is_not_offered() {
    let ctx = TestContext::new();
    let teacher = ctx.teacher(vec![10 * HOUR_MS]).await;
    tutorsync_api::services::slots::SlotService::new(&ctx.context)
        .release_teacher_future_slots(teacher.id)
        .await
        .unwrap();

    let found = AvailabilityEngine::new(&ctx.context)
        .find_available_teachers(LESSON)
        .await
        .unwrap();

    assert!(found.is_empty());
}
