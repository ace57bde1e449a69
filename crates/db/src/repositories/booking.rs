use async_trait::async_trait;
use eyre::Result;
use mockall::automock;
use tutorsync_core::{
    models::{
        booking::{Booking, BookingStatus, BookingUpdate, NewBooking},
        BookingId, CalendarId, TeacherId,
    },
    time::Millis,
};

use super::PgStore;
use crate::models::{convert_rows, DbBooking};

/// Bookings whose slot snapshot intersects `[start, end)`, in any status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingQuery {
    pub teacher_id: Option<TeacherId>,
    pub start: Millis,
    pub end: Millis,
}

#[automock]
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn find_in_range(&self, query: BookingQuery) -> Result<Vec<Booking>>;

    async fn find_one(&self, id: BookingId) -> Result<Option<Booking>>;

    async fn update(&self, id: BookingId, update: BookingUpdate) -> Result<Option<Booking>>;

    /// True when some non-released booking references the calendar.
    async fn has_occupying(&self, calendar_id: CalendarId) -> Result<bool>;

    /// Occupying bookings of the teacher whose slot starts at or after `from`.
    async fn find_occupying_from(&self, teacher_id: TeacherId, from: Millis)
        -> Result<Vec<Booking>>;

    /// Inserts the booking unless its calendar is already occupied, in which
    /// case `None` is returned.
    async fn claim(&self, booking: NewBooking) -> Result<Option<Booking>>;
}

fn released_names() -> Vec<String> {
    BookingStatus::released()
        .iter()
        .map(|s| s.as_str().to_string())
        .collect()
}

#[async_trait]
impl BookingStore for PgStore {
    async fn find_in_range(&self, query: BookingQuery) -> Result<Vec<Booking>> {
        let rows = sqlx::query_as::<_, DbBooking>(
            r#"
            SELECT id, teacher_id, student_id, calendar_id, start_time, end_time, status, created_time
            FROM bookings
            WHERE ($1::BIGINT IS NULL OR teacher_id = $1)
              AND start_time < $3
              AND end_time > $2
            ORDER BY start_time ASC, id ASC
            "#,
        )
        .bind(query.teacher_id)
        .bind(query.start)
        .bind(query.end)
        .fetch_all(self.pool())
        .await?;

        convert_rows(rows)
    }

    async fn find_one(&self, id: BookingId) -> Result<Option<Booking>> {
        let row = sqlx::query_as::<_, DbBooking>(
            r#"
            SELECT id, teacher_id, student_id, calendar_id, start_time, end_time, status, created_time
            FROM bookings
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.map(Booking::try_from).transpose()
    }

    async fn update(&self, id: BookingId, update: BookingUpdate) -> Result<Option<Booking>> {
        let row = sqlx::query_as::<_, DbBooking>(
            r#"
            UPDATE bookings
            SET status = COALESCE($2, status)
            WHERE id = $1
            RETURNING id, teacher_id, student_id, calendar_id, start_time, end_time, status, created_time
            "#,
        )
        .bind(id)
        .bind(update.status.map(|s| s.as_str()))
        .fetch_optional(self.pool())
        .await?;

        row.map(Booking::try_from).transpose()
    }

    async fn has_occupying(&self, calendar_id: CalendarId) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM bookings
                WHERE calendar_id = $1 AND NOT (status = ANY($2))
            )
            "#,
        )
        .bind(calendar_id)
        .bind(released_names())
        .fetch_one(self.pool())
        .await?;

        Ok(exists)
    }

    async fn find_occupying_from(
        &self,
        teacher_id: TeacherId,
        from: Millis,
    ) -> Result<Vec<Booking>> {
        let rows = sqlx::query_as::<_, DbBooking>(
            r#"
            SELECT id, teacher_id, student_id, calendar_id, start_time, end_time, status, created_time
            FROM bookings
            WHERE teacher_id = $1 AND start_time >= $2 AND NOT (status = ANY($3))
            ORDER BY start_time ASC, id ASC
            "#,
        )
        .bind(teacher_id)
        .bind(from)
        .bind(released_names())
        .fetch_all(self.pool())
        .await?;

        convert_rows(rows)
    }

    async fn claim(&self, booking: NewBooking) -> Result<Option<Booking>> {
        // The partial unique index on occupying bookings backs this check up
        // when two claims race past the NOT EXISTS.
        let row = sqlx::query_as::<_, DbBooking>(
            r#"
            INSERT INTO bookings
                (id, teacher_id, student_id, calendar_id, start_time, end_time, status, created_time)
            SELECT $1::BIGINT, $2::BIGINT, $3::BIGINT, $4::BIGINT, $5::BIGINT, $6::BIGINT, $7::VARCHAR, $8::BIGINT
            WHERE NOT EXISTS (
                SELECT 1 FROM bookings WHERE calendar_id = $4 AND NOT (status = ANY($9::VARCHAR[]))
            )
            ON CONFLICT DO NOTHING
            RETURNING id, teacher_id, student_id, calendar_id, start_time, end_time, status, created_time
            "#,
        )
        .bind(booking.id)
        .bind(booking.teacher_id)
        .bind(booking.student_id)
        .bind(booking.calendar_id)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(booking.status.as_str())
        .bind(booking.created_time)
        .bind(released_names())
        .fetch_optional(self.pool())
        .await?;

        row.map(Booking::try_from).transpose()
    }
}
