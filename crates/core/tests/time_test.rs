use pretty_assertions::assert_eq;
use rstest::rstest;
use tutorsync_core::time::{
    normalize_offset, normalize_offsets, overlaps, Clock, FixedClock, WeekClock, DAY_MS, HOUR_MS,
    MINUTE_MS, WEEK_MS,
};

// 2024-01-01T00:00:00Z, a Monday.
const MONDAY: i64 = 1_704_067_200_000;

#[test]
fn test_week_starts_on_monday_utc() {
    let clock = WeekClock::utc();

    assert_eq!(clock.week_offset(MONDAY), 0);
    assert_eq!(clock.week_offset(MONDAY + 2 * DAY_MS + 9 * HOUR_MS), 2 * DAY_MS + 9 * HOUR_MS);
    assert_eq!(clock.week_offset(MONDAY - 1), WEEK_MS - 1);
    assert_eq!(clock.start_of_week(MONDAY + 3 * DAY_MS), MONDAY);
}

#[test]
fn test_week_offset_respects_utc_offset() {
    // UTC+9: Monday 00:00 local is Sunday 15:00 UTC.
    let clock = WeekClock::new(9 * 60, 30);
    let local_monday = MONDAY - 9 * HOUR_MS;

    assert_eq!(clock.week_offset(local_monday), 0);
    assert_eq!(clock.start_of_week(MONDAY), local_monday);
}

#[rstest]
#[case(0)]
#[case(9 * HOUR_MS)]
#[case(6 * DAY_MS + 23 * HOUR_MS + 30 * MINUTE_MS)]
fn test_occurrences_map_back_to_their_offset(#[case] offset: i64) {
    let clock = WeekClock::utc();
    let start = MONDAY - WEEK_MS + 5 * HOUR_MS;
    let end = MONDAY + 3 * WEEK_MS;

    let occurrences = clock.occurrences_in_range([offset], start, end);

    assert!(!occurrences.is_empty());
    for instant in &occurrences {
        assert!(*instant >= start && *instant < end);
        assert_eq!(clock.week_offset(*instant), offset);
    }
    for pair in occurrences.windows(2) {
        assert_eq!(pair[1] - pair[0], WEEK_MS);
    }
}

#[test]
fn test_occurrences_are_sorted_and_deduplicated() {
    let clock = WeekClock::utc();
    let offsets = [DAY_MS, 0, DAY_MS + WEEK_MS];

    let occurrences = clock.occurrences_in_range(offsets, MONDAY, MONDAY + WEEK_MS);

    assert_eq!(occurrences, vec![MONDAY, MONDAY + DAY_MS]);
}

#[test]
fn test_occurrences_exclude_window_end() {
    let clock = WeekClock::utc();

    assert_eq!(clock.occurrences_in_range([0], MONDAY - HOUR_MS, MONDAY), Vec::<i64>::new());
    assert_eq!(clock.occurrences_in_range([0], MONDAY, MONDAY + HOUR_MS), vec![MONDAY]);
    assert_eq!(clock.occurrences_in_range([0], MONDAY, MONDAY), Vec::<i64>::new());
}

#[rstest]
#[case(0, 10, 10, 20, false)]
#[case(10, 20, 0, 10, false)]
#[case(0, 10, 5, 15, true)]
#[case(0, 20, 5, 10, true)]
#[case(5, 10, 0, 20, true)]
#[case(0, 10, 20, 30, false)]
fn test_half_open_overlap(
    #[case] a_start: i64,
    #[case] a_end: i64,
    #[case] b_start: i64,
    #[case] b_end: i64,
    #[case] expected: bool,
) {
    assert_eq!(overlaps(a_start, a_end, b_start, b_end), expected);
    assert_eq!(overlaps(b_start, b_end, a_start, a_end), expected);
}

#[test]
fn test_normalize_offsets() {
    assert_eq!(normalize_offset(-HOUR_MS), WEEK_MS - HOUR_MS);
    assert_eq!(normalize_offset(WEEK_MS + 5), 5);
    assert_eq!(
        normalize_offsets(vec![WEEK_MS + HOUR_MS, HOUR_MS, 0, -WEEK_MS]),
        vec![0, HOUR_MS]
    );
}

#[rstest]
#[case(i64::MAX)]
#[case(i64::MIN)]
fn test_week_offset_at_the_extremes(#[case] instant: i64) {
    let clock = WeekClock::new(14 * 60, 30);

    let offset = clock.week_offset(instant);
    assert!((0..WEEK_MS).contains(&offset));
    assert!(!clock.is_valid_slot_start(instant));
}

#[rstest]
#[case(MONDAY, true)]
#[case(MONDAY + 30 * MINUTE_MS, true)]
#[case(MONDAY + 15 * MINUTE_MS, false)]
#[case(MONDAY + 1, false)]
fn test_slot_grid(#[case] instant: i64, #[case] valid: bool) {
    assert_eq!(WeekClock::utc().is_valid_slot_start(instant), valid);
}

#[test]
fn test_fixed_clock_moves_only_when_told() {
    let clock = FixedClock::new(MONDAY);
    assert_eq!(clock.now(), MONDAY);

    clock.advance(HOUR_MS);
    assert_eq!(clock.now(), MONDAY + HOUR_MS);

    clock.set(0);
    assert_eq!(clock.now(), 0);
}
