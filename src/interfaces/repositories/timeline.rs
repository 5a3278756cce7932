use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    entities::timeline::{plan_reorder, TimelineEvent, TimelineInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxTimelineRepo,
};

const TIMELINE_COLUMNS: &str = "id, date_range, title, description, chapter, details, icon, position";

/// Positions stay contiguous `0..N-1`: appends go to the end, deletes close
/// the gap, reorders rewrite every position in one transaction. Every write
/// that moves positions holds the table lock taken by `lock_positions`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TimelineRepository: Send + Sync {
    async fn list_events(&self) -> Result<Vec<TimelineEvent>, AppError>;
    async fn create_event(&self, event: &TimelineInsert) -> Result<TimelineEvent, AppError>;
    async fn update_event(&self, id: &Uuid, event: &TimelineInsert) -> Result<TimelineEvent, AppError>;
    async fn delete_event(&self, id: &Uuid) -> Result<(), AppError>;
    /// `ids` must list every current event exactly once.
    async fn reorder_events(&self, ids: &[Uuid]) -> Result<Vec<TimelineEvent>, AppError>;
}

impl SqlxTimelineRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxTimelineRepo { pool }
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Timeline event not found".to_string())
}

/// Serialises position writers; plain reads are not blocked.
async fn lock_positions(tx: &mut Transaction<'_, Postgres>) -> Result<(), AppError> {
    sqlx::query("LOCK TABLE timeline_events IN SHARE ROW EXCLUSIVE MODE")
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn events_in(tx: &mut Transaction<'_, Postgres>) -> Result<Vec<TimelineEvent>, AppError> {
    let query = format!("SELECT {TIMELINE_COLUMNS} FROM timeline_events ORDER BY position ASC");
    let events = sqlx::query_as::<_, TimelineEvent>(&query)
        .fetch_all(&mut **tx)
        .await?;
    Ok(events)
}

#[async_trait]
impl TimelineRepository for SqlxTimelineRepo {
    async fn list_events(&self) -> Result<Vec<TimelineEvent>, AppError> {
        let query = format!("SELECT {TIMELINE_COLUMNS} FROM timeline_events ORDER BY position ASC");
        let events = sqlx::query_as::<_, TimelineEvent>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    async fn create_event(&self, event: &TimelineInsert) -> Result<TimelineEvent, AppError> {
        let query = format!(
            r#"
            INSERT INTO timeline_events (date_range, title, description, chapter, details, icon, position)
            VALUES ($1, $2, $3, $4, $5, $6, (SELECT COALESCE(MAX(position) + 1, 0) FROM timeline_events))
            RETURNING {TIMELINE_COLUMNS}
            "#
        );

        let mut tx = self.pool.begin().await?;
        lock_positions(&mut tx).await?;

        let created = sqlx::query_as::<_, TimelineEvent>(&query)
            .bind(&event.date_range)
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.chapter)
            .bind(&event.details)
            .bind(&event.icon)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn update_event(&self, id: &Uuid, event: &TimelineInsert) -> Result<TimelineEvent, AppError> {
        let query = format!(
            r#"
            UPDATE timeline_events SET
                date_range = $1,
                title = $2,
                description = $3,
                chapter = $4,
                details = $5,
                icon = $6
            WHERE id = $7
            RETURNING {TIMELINE_COLUMNS}
            "#
        );

        sqlx::query_as::<_, TimelineEvent>(&query)
            .bind(&event.date_range)
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.chapter)
            .bind(&event.details)
            .bind(&event.icon)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found)
    }

    async fn delete_event(&self, id: &Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        lock_positions(&mut tx).await?;

        let removed: Option<i32> = sqlx::query_scalar(
            "DELETE FROM timeline_events WHERE id = $1 RETURNING position",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let position = removed.ok_or_else(not_found)?;

        sqlx::query("UPDATE timeline_events SET position = position - 1 WHERE position > $1")
            .bind(position)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn reorder_events(&self, ids: &[Uuid]) -> Result<Vec<TimelineEvent>, AppError> {
        let mut tx = self.pool.begin().await?;
        lock_positions(&mut tx).await?;

        let current = events_in(&mut tx).await?;
        let positions = plan_reorder(&current, ids)?;

        for (id, position) in &positions {
            let result = sqlx::query("UPDATE timeline_events SET position = $1 WHERE id = $2")
                .bind(position)
                .bind(id)
                .execute(&mut *tx)
                .await?;

            // Dropping the transaction rolls back the earlier updates.
            if result.rows_affected() == 0 {
                return Err(not_found());
            }
        }

        let events = events_in(&mut tx).await?;
        tx.commit().await?;
        Ok(events)
    }
}
