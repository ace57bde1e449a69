use async_trait::async_trait;
use eyre::Result;
use mockall::automock;
use tutorsync_core::{
    models::{
        regular_schedule::{NewRegularSchedule, RegularSchedule, RegularScheduleStatus},
        RegularScheduleId, TeacherId,
    },
    time::Millis,
};

use super::PgStore;
use crate::models::{convert_rows, DbRegularSchedule};

/// Filter for regular schedule rows. `None` fields and an empty status list
/// match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegularScheduleQuery {
    pub teacher_id: Option<TeacherId>,
    pub regular_start_time: Option<Millis>,
    pub statuses: Vec<RegularScheduleStatus>,
}

impl RegularScheduleQuery {
    pub fn matches(&self, row: &RegularSchedule) -> bool {
        self.teacher_id.map_or(true, |id| row.teacher_id == id)
            && self
                .regular_start_time
                .map_or(true, |offset| row.regular_start_time == offset)
            && (self.statuses.is_empty() || self.statuses.contains(&row.status))
    }

    fn status_names(&self) -> Vec<String> {
        self.statuses.iter().map(|s| s.as_str().to_string()).collect()
    }
}

#[automock]
#[async_trait]
pub trait RegularScheduleStore: Send + Sync {
    async fn find_all(&self, query: RegularScheduleQuery) -> Result<Vec<RegularSchedule>>;

    async fn find_one(&self, query: RegularScheduleQuery) -> Result<Option<RegularSchedule>>;

    /// Deletes every row of the teacher; returns how many were removed.
    async fn remove_all_for_inactive_teacher(&self, teacher_id: TeacherId) -> Result<u64>;

    async fn insert(&self, schedule: NewRegularSchedule) -> Result<RegularSchedule>;

    async fn update_status(
        &self,
        id: RegularScheduleId,
        status: RegularScheduleStatus,
    ) -> Result<Option<RegularSchedule>>;
}

#[async_trait]
impl RegularScheduleStore for PgStore {
    async fn find_all(&self, query: RegularScheduleQuery) -> Result<Vec<RegularSchedule>> {
        let rows = sqlx::query_as::<_, DbRegularSchedule>(
            r#"
            SELECT id, teacher_id, regular_start_time, status
            FROM regular_schedules
            WHERE ($1::BIGINT IS NULL OR teacher_id = $1)
              AND ($2::BIGINT IS NULL OR regular_start_time = $2)
              AND (cardinality($3::VARCHAR[]) = 0 OR status = ANY($3))
            ORDER BY id ASC
            "#,
        )
        .bind(query.teacher_id)
        .bind(query.regular_start_time)
        .bind(query.status_names())
        .fetch_all(self.pool())
        .await?;

        convert_rows(rows)
    }

    async fn find_one(&self, query: RegularScheduleQuery) -> Result<Option<RegularSchedule>> {
        let row = sqlx::query_as::<_, DbRegularSchedule>(
            r#"
            SELECT id, teacher_id, regular_start_time, status
            FROM regular_schedules
            WHERE ($1::BIGINT IS NULL OR teacher_id = $1)
              AND ($2::BIGINT IS NULL OR regular_start_time = $2)
              AND (cardinality($3::VARCHAR[]) = 0 OR status = ANY($3))
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(query.teacher_id)
        .bind(query.regular_start_time)
        .bind(query.status_names())
        .fetch_optional(self.pool())
        .await?;

        row.map(RegularSchedule::try_from).transpose()
    }

    async fn remove_all_for_inactive_teacher(&self, teacher_id: TeacherId) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM regular_schedules
            WHERE teacher_id = $1
            "#,
        )
        .bind(teacher_id)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected())
    }

    async fn insert(&self, schedule: NewRegularSchedule) -> Result<RegularSchedule> {
        let row = sqlx::query_as::<_, DbRegularSchedule>(
            r#"
            INSERT INTO regular_schedules (id, teacher_id, regular_start_time, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, teacher_id, regular_start_time, status
            "#,
        )
        .bind(schedule.id)
        .bind(schedule.teacher_id)
        .bind(schedule.regular_start_time)
        .bind(schedule.status.as_str())
        .fetch_one(self.pool())
        .await?;

        row.try_into()
    }

    async fn update_status(
        &self,
        id: RegularScheduleId,
        status: RegularScheduleStatus,
    ) -> Result<Option<RegularSchedule>> {
        let row = sqlx::query_as::<_, DbRegularSchedule>(
            r#"
            UPDATE regular_schedules
            SET status = $2
            WHERE id = $1
            RETURNING id, teacher_id, regular_start_time, status
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(self.pool())
        .await?;

        row.map(RegularSchedule::try_from).transpose()
    }
}
