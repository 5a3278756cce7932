use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::message::{Message, MessageInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxMessageRepo,
};

const MESSAGE_COLUMNS: &str = "id, name, email, subject, content, kind, preferred_date, preferred_time, created_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create_message(&self, message: &MessageInsert) -> Result<Uuid, AppError>;
    async fn list_messages(&self) -> Result<Vec<Message>, AppError>;
    async fn get_message_by_id(&self, id: &Uuid) -> Result<Message, AppError>;
    async fn delete_message(&self, id: &Uuid) -> Result<(), AppError>;
    async fn count_messages(&self) -> Result<i64, AppError>;
    async fn recent_messages(&self, limit: i64) -> Result<Vec<Message>, AppError>;
}

impl SqlxMessageRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxMessageRepo { pool }
    }
}

#[async_trait]
impl MessageRepository for SqlxMessageRepo {
    async fn create_message(&self, message: &MessageInsert) -> Result<Uuid, AppError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO messages (name, email, subject, content, kind, preferred_date, preferred_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.subject)
        .bind(&message.content)
        .bind(message.kind)
        .bind(&message.preferred_date)
        .bind(&message.preferred_time)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_messages(&self) -> Result<Vec<Message>, AppError> {
        let query = format!("SELECT {MESSAGE_COLUMNS} FROM messages ORDER BY created_at DESC");
        let messages = sqlx::query_as::<_, Message>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(messages)
    }

    async fn get_message_by_id(&self, id: &Uuid) -> Result<Message, AppError> {
        let query = format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = $1");
        sqlx::query_as::<_, Message>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Message not found".to_string()))
    }

    async fn delete_message(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Message not found".to_string()));
        }
        Ok(())
    }

    async fn count_messages(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM messages")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn recent_messages(&self, limit: i64) -> Result<Vec<Message>, AppError> {
        let query = format!("SELECT {MESSAGE_COLUMNS} FROM messages ORDER BY created_at DESC LIMIT $1");
        let messages = sqlx::query_as::<_, Message>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(messages)
    }
}
