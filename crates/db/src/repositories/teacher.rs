use async_trait::async_trait;
use eyre::Result;
use mockall::automock;
use tutorsync_core::{
    models::{
        teacher::{NewTeacher, Teacher},
        TeacherId,
    },
    time::Millis,
};

use super::PgStore;
use crate::models::DbTeacher;

#[automock]
#[async_trait]
pub trait TeacherStore: Send + Sync {
    async fn get(&self, id: TeacherId) -> Result<Option<Teacher>>;

    async fn insert(&self, teacher: NewTeacher) -> Result<Teacher>;

    /// Active teachers whose `regular_times` contains `week_offset`.
    async fn find_active_offering(&self, week_offset: Millis) -> Result<Vec<Teacher>>;

    async fn update_regular_times(
        &self,
        id: TeacherId,
        regular_times: Vec<Millis>,
    ) -> Result<Option<Teacher>>;

    async fn set_active(&self, id: TeacherId, is_active: bool) -> Result<Option<Teacher>>;
}

#[async_trait]
impl TeacherStore for PgStore {
    async fn get(&self, id: TeacherId) -> Result<Option<Teacher>> {
        let teacher = sqlx::query_as::<_, DbTeacher>(
            r#"
            SELECT id, name, regular_times, is_active
            FROM teachers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(teacher.map(Teacher::from))
    }

    async fn insert(&self, teacher: NewTeacher) -> Result<Teacher> {
        let teacher = sqlx::query_as::<_, DbTeacher>(
            r#"
            INSERT INTO teachers (id, name, regular_times, is_active)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, regular_times, is_active
            "#,
        )
        .bind(teacher.id)
        .bind(&teacher.name)
        .bind(&teacher.regular_times)
        .bind(teacher.is_active)
        .fetch_one(self.pool())
        .await?;

        Ok(teacher.into())
    }

    async fn find_active_offering(&self, week_offset: Millis) -> Result<Vec<Teacher>> {
        let teachers = sqlx::query_as::<_, DbTeacher>(
            r#"
            SELECT id, name, regular_times, is_active
            FROM teachers
            WHERE is_active AND $1 = ANY(regular_times)
            ORDER BY id ASC
            "#,
        )
        .bind(week_offset)
        .fetch_all(self.pool())
        .await?;

        Ok(teachers.into_iter().map(Teacher::from).collect())
    }

    async fn update_regular_times(
        &self,
        id: TeacherId,
        regular_times: Vec<Millis>,
    ) -> Result<Option<Teacher>> {
        let teacher = sqlx::query_as::<_, DbTeacher>(
            r#"
            UPDATE teachers
            SET regular_times = $2
            WHERE id = $1
            RETURNING id, name, regular_times, is_active
            "#,
        )
        .bind(id)
        .bind(&regular_times)
        .fetch_optional(self.pool())
        .await?;

        Ok(teacher.map(Teacher::from))
    }

    async fn set_active(&self, id: TeacherId, is_active: bool) -> Result<Option<Teacher>> {
        let teacher = sqlx::query_as::<_, DbTeacher>(
            r#"
            UPDATE teachers
            SET is_active = $2
            WHERE id = $1
            RETURNING id, name, regular_times, is_active
            "#,
        )
        .bind(id)
        .bind(is_active)
        .fetch_optional(self.pool())
        .await?;

        Ok(teacher.map(Teacher::from))
    }
}
