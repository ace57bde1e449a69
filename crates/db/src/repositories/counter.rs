use async_trait::async_trait;
use eyre::Result;
use mockall::automock;
use tutorsync_core::models::Sequence;

use super::PgStore;

/// Hands out monotonically increasing ids per sequence.
#[automock]
#[async_trait]
pub trait IdAllocator: Send + Sync {
    async fn next_id(&self, sequence: Sequence) -> Result<i64>;
}

#[async_trait]
impl IdAllocator for PgStore {
    async fn next_id(&self, sequence: Sequence) -> Result<i64> {
        // One statement, so concurrent allocations never observe the same value.
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO counters (name, value)
            VALUES ($1, 1)
            ON CONFLICT (name)
            DO UPDATE SET value = counters.value + 1
            RETURNING value
            "#,
        )
        .bind(sequence.as_str())
        .fetch_one(self.pool())
        .await?;

        tracing::debug!("Allocated id {} from sequence {}", id, sequence.as_str());
        Ok(id)
    }
}
