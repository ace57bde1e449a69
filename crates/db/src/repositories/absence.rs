use async_trait::async_trait;
use eyre::Result;
use mockall::automock;
use tutorsync_core::{
    models::{
        absence::{AbsenceRequest, AbsenceStatus, NewAbsence},
        AbsenceId, TeacherId,
    },
    time::Millis,
};

use super::PgStore;
use crate::models::{convert_rows, DbAbsence};

/// Absences intersecting `[start, end)`, optionally for a single teacher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbsenceQuery {
    pub teacher_id: Option<TeacherId>,
    pub start: Millis,
    pub end: Millis,
}

#[automock]
#[async_trait]
pub trait AbsenceStore: Send + Sync {
    /// Approved absences with `absence.start < end && absence.end > start`.
    async fn find_approved_overlapping(&self, query: AbsenceQuery) -> Result<Vec<AbsenceRequest>>;

    async fn find_one(&self, id: AbsenceId) -> Result<Option<AbsenceRequest>>;

    async fn insert(&self, absence: NewAbsence) -> Result<AbsenceRequest>;

    async fn update_status(
        &self,
        id: AbsenceId,
        status: AbsenceStatus,
    ) -> Result<Option<AbsenceRequest>>;
}

#[async_trait]
impl AbsenceStore for PgStore {
    async fn find_approved_overlapping(&self, query: AbsenceQuery) -> Result<Vec<AbsenceRequest>> {
        let rows = sqlx::query_as::<_, DbAbsence>(
            r#"
            SELECT id, teacher_id, start_time, end_time, status
            FROM absence_requests
            WHERE status = $1
              AND ($2::BIGINT IS NULL OR teacher_id = $2)
              AND start_time < $4
              AND end_time > $3
            ORDER BY start_time ASC, id ASC
            "#,
        )
        .bind(AbsenceStatus::Approved.as_str())
        .bind(query.teacher_id)
        .bind(query.start)
        .bind(query.end)
        .fetch_all(self.pool())
        .await?;

        convert_rows(rows)
    }

    async fn find_one(&self, id: AbsenceId) -> Result<Option<AbsenceRequest>> {
        let row = sqlx::query_as::<_, DbAbsence>(
            r#"
            SELECT id, teacher_id, start_time, end_time, status
            FROM absence_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.map(AbsenceRequest::try_from).transpose()
    }

    async fn insert(&self, absence: NewAbsence) -> Result<AbsenceRequest> {
        let row = sqlx::query_as::<_, DbAbsence>(
            r#"
            INSERT INTO absence_requests (id, teacher_id, start_time, end_time, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, teacher_id, start_time, end_time, status
            "#,
        )
        .bind(absence.id)
        .bind(absence.teacher_id)
        .bind(absence.start_time)
        .bind(absence.end_time)
        .bind(absence.status.as_str())
        .fetch_one(self.pool())
        .await?;

        row.try_into()
    }

    async fn update_status(
        &self,
        id: AbsenceId,
        status: AbsenceStatus,
    ) -> Result<Option<AbsenceRequest>> {
        let row = sqlx::query_as::<_, DbAbsence>(
            r#"
            UPDATE absence_requests
            SET status = $2
            WHERE id = $1
            RETURNING id, teacher_id, start_time, end_time, status
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(self.pool())
        .await?;

        row.map(AbsenceRequest::try_from).transpose()
    }
}
