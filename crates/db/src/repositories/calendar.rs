use async_trait::async_trait;
use eyre::Result;
use mockall::automock;
use tutorsync_core::{
    models::{
        calendar::{CalendarSlot, NewCalendarSlot},
        CalendarId, TeacherId,
    },
    time::Millis,
};

use super::PgStore;
use crate::models::DbCalendar;

/// Slots of one teacher starting inside `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotQuery {
    pub teacher_id: TeacherId,
    pub start: Millis,
    pub end: Millis,
    pub active_only: bool,
}

#[automock]
#[async_trait]
pub trait CalendarStore: Send + Sync {
    /// Ordered by start time.
    async fn find_in_range(&self, query: SlotQuery) -> Result<Vec<CalendarSlot>>;

    async fn find_by_id(&self, id: CalendarId) -> Result<Option<CalendarSlot>>;

    async fn find_by_key(
        &self,
        teacher_id: TeacherId,
        start_time: Millis,
        end_time: Millis,
    ) -> Result<Option<CalendarSlot>>;

    /// Active slots of any teacher spanning the whole of `[start, end)`.
    async fn find_active_covering(&self, start: Millis, end: Millis) -> Result<Vec<CalendarSlot>>;

    /// Every slot of the teacher starting at or after `from`, active or not.
    async fn find_from(&self, teacher_id: TeacherId, from: Millis) -> Result<Vec<CalendarSlot>>;

    /// Marks the slot with this natural key active and returns its id.
    async fn reactivate(
        &self,
        teacher_id: TeacherId,
        start_time: Millis,
        end_time: Millis,
    ) -> Result<Option<CalendarId>>;

    /// Inserts an active slot. `None` means the natural key is already taken.
    async fn insert(&self, slot: NewCalendarSlot) -> Result<Option<CalendarSlot>>;

    async fn set_active(&self, id: CalendarId, is_active: bool) -> Result<Option<CalendarSlot>>;

    async fn delete(&self, id: CalendarId) -> Result<bool>;

    /// Number of active slots of the teacher starting inside `[start, end)`.
    async fn count_open_in_range(
        &self,
        teacher_id: TeacherId,
        start: Millis,
        end: Millis,
    ) -> Result<u64>;
}

#[async_trait]
impl CalendarStore for PgStore {
    async fn find_in_range(&self, query: SlotQuery) -> Result<Vec<CalendarSlot>> {
        let slots = sqlx::query_as::<_, DbCalendar>(
            r#"
            SELECT id, teacher_id, start_time, end_time, is_active, external_id
            FROM calendars
            WHERE teacher_id = $1
              AND start_time >= $2
              AND start_time < $3
              AND (NOT $4 OR is_active)
            ORDER BY start_time ASC, id ASC
            "#,
        )
        .bind(query.teacher_id)
        .bind(query.start)
        .bind(query.end)
        .bind(query.active_only)
        .fetch_all(self.pool())
        .await?;

        Ok(slots.into_iter().map(CalendarSlot::from).collect())
    }

    async fn find_by_id(&self, id: CalendarId) -> Result<Option<CalendarSlot>> {
        let slot = sqlx::query_as::<_, DbCalendar>(
            r#"
            SELECT id, teacher_id, start_time, end_time, is_active, external_id
            FROM calendars
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(slot.map(CalendarSlot::from))
    }

    async fn find_by_key(
        &self,
        teacher_id: TeacherId,
        start_time: Millis,
        end_time: Millis,
    ) -> Result<Option<CalendarSlot>> {
        let slot = sqlx::query_as::<_, DbCalendar>(
            r#"
            SELECT id, teacher_id, start_time, end_time, is_active, external_id
            FROM calendars
            WHERE teacher_id = $1 AND start_time = $2 AND end_time = $3
            "#,
        )
        .bind(teacher_id)
        .bind(start_time)
        .bind(end_time)
        .fetch_optional(self.pool())
        .await?;

        Ok(slot.map(CalendarSlot::from))
    }

    async fn find_active_covering(&self, start: Millis, end: Millis) -> Result<Vec<CalendarSlot>> {
        let slots = sqlx::query_as::<_, DbCalendar>(
            r#"
            SELECT id, teacher_id, start_time, end_time, is_active, external_id
            FROM calendars
            WHERE is_active AND start_time <= $1 AND end_time >= $2
            ORDER BY teacher_id ASC, start_time ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(self.pool())
        .await?;

        Ok(slots.into_iter().map(CalendarSlot::from).collect())
    }

    async fn find_from(&self, teacher_id: TeacherId, from: Millis) -> Result<Vec<CalendarSlot>> {
        let slots = sqlx::query_as::<_, DbCalendar>(
            r#"
            SELECT id, teacher_id, start_time, end_time, is_active, external_id
            FROM calendars
            WHERE teacher_id = $1 AND start_time >= $2
            ORDER BY start_time ASC, id ASC
            "#,
        )
        .bind(teacher_id)
        .bind(from)
        .fetch_all(self.pool())
        .await?;

        Ok(slots.into_iter().map(CalendarSlot::from).collect())
    }

    async fn reactivate(
        &self,
        teacher_id: TeacherId,
        start_time: Millis,
        end_time: Millis,
    ) -> Result<Option<CalendarId>> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE calendars
            SET is_active = TRUE
            WHERE teacher_id = $1 AND start_time = $2 AND end_time = $3
            RETURNING id
            "#,
        )
        .bind(teacher_id)
        .bind(start_time)
        .bind(end_time)
        .fetch_optional(self.pool())
        .await?;

        Ok(id)
    }

    async fn insert(&self, slot: NewCalendarSlot) -> Result<Option<CalendarSlot>> {
        tracing::debug!(
            "Inserting calendar slot: id={}, teacher_id={}, start={}, end={}",
            slot.id,
            slot.teacher_id,
            slot.start_time,
            slot.end_time
        );

        let slot = sqlx::query_as::<_, DbCalendar>(
            r#"
            INSERT INTO calendars (id, teacher_id, start_time, end_time, is_active, external_id)
            VALUES ($1, $2, $3, $4, TRUE, $5)
            ON CONFLICT (teacher_id, start_time, end_time) DO NOTHING
            RETURNING id, teacher_id, start_time, end_time, is_active, external_id
            "#,
        )
        .bind(slot.id)
        .bind(slot.teacher_id)
        .bind(slot.start_time)
        .bind(slot.end_time)
        .bind(&slot.external_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(slot.map(CalendarSlot::from))
    }

    async fn set_active(&self, id: CalendarId, is_active: bool) -> Result<Option<CalendarSlot>> {
        let slot = sqlx::query_as::<_, DbCalendar>(
            r#"
            UPDATE calendars
            SET is_active = $2
            WHERE id = $1
            RETURNING id, teacher_id, start_time, end_time, is_active, external_id
            "#,
        )
        .bind(id)
        .bind(is_active)
        .fetch_optional(self.pool())
        .await?;

        Ok(slot.map(CalendarSlot::from))
    }

    async fn delete(&self, id: CalendarId) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM calendars
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_open_in_range(
        &self,
        teacher_id: TeacherId,
        start: Millis,
        end: Millis,
    ) -> Result<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM calendars
            WHERE teacher_id = $1 AND is_active AND start_time >= $2 AND start_time < $3
            "#,
        )
        .bind(teacher_id)
        .bind(start)
        .bind(end)
        .fetch_one(self.pool())
        .await?;

        Ok(u64::try_from(count)?)
    }
}
