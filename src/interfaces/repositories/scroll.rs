use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::scroll::{Scroll, ScrollInsert},
    errors::{slug_conflict, AppError},
    repositories::sqlx_repo::SqlxScrollRepo,
};

const SCROLL_COLUMNS: &str = "id, title, slug, excerpt, content, category, published, icon, \
                              display_date, read_time, created_at, updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScrollRepository: Send + Sync {
    async fn list_scrolls(&self, published_only: bool) -> Result<Vec<Scroll>, AppError>;
    async fn get_scroll_by_id(&self, id: &Uuid) -> Result<Scroll, AppError>;
    async fn get_published_scroll_by_slug(&self, slug: &str) -> Result<Option<Scroll>, AppError>;
    async fn create_scroll(&self, scroll: &ScrollInsert) -> Result<Scroll, AppError>;
    async fn replace_scroll(&self, id: &Uuid, scroll: &ScrollInsert) -> Result<Scroll, AppError>;
    async fn set_scroll_published(&self, id: &Uuid, published: bool) -> Result<Scroll, AppError>;
    async fn delete_scroll(&self, id: &Uuid) -> Result<(), AppError>;
    async fn count_scrolls(&self) -> Result<i64, AppError>;
    async fn recent_scrolls(&self, limit: i64) -> Result<Vec<Scroll>, AppError>;
}

impl SqlxScrollRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxScrollRepo { pool }
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Scroll not found".to_string())
}

#[async_trait]
impl ScrollRepository for SqlxScrollRepo {
    async fn list_scrolls(&self, published_only: bool) -> Result<Vec<Scroll>, AppError> {
        let mut builder = QueryBuilder::new(format!("SELECT {SCROLL_COLUMNS} FROM scrolls"));
        if published_only {
            builder.push(" WHERE published = TRUE");
        }
        builder.push(" ORDER BY created_at DESC");

        let scrolls = builder
            .build_query_as::<Scroll>()
            .fetch_all(&self.pool)
            .await?;

        Ok(scrolls)
    }

    async fn get_scroll_by_id(&self, id: &Uuid) -> Result<Scroll, AppError> {
        let query = format!("SELECT {SCROLL_COLUMNS} FROM scrolls WHERE id = $1");
        sqlx::query_as::<_, Scroll>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found)
    }

    async fn get_published_scroll_by_slug(&self, slug: &str) -> Result<Option<Scroll>, AppError> {
        let query = format!("SELECT {SCROLL_COLUMNS} FROM scrolls WHERE slug = $1 AND published = TRUE");
        let scroll = sqlx::query_as::<_, Scroll>(&query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(scroll)
    }

    async fn create_scroll(&self, scroll: &ScrollInsert) -> Result<Scroll, AppError> {
        let query = format!(
            r#"
            INSERT INTO scrolls (
                title, slug, excerpt, content, category, published, icon, display_date, read_time
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {SCROLL_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Scroll>(&query)
            .bind(&scroll.title)
            .bind(&scroll.slug)
            .bind(&scroll.excerpt)
            .bind(&scroll.content)
            .bind(scroll.category)
            .bind(scroll.published)
            .bind(&scroll.icon)
            .bind(&scroll.date)
            .bind(&scroll.read_time)
            .fetch_one(&self.pool)
            .await
            .map_err(slug_conflict)
    }

    async fn replace_scroll(&self, id: &Uuid, scroll: &ScrollInsert) -> Result<Scroll, AppError> {
        let query = format!(
            r#"
            UPDATE scrolls SET
                title = $1,
                slug = $2,
                excerpt = $3,
                content = $4,
                category = $5,
                published = $6,
                icon = $7,
                display_date = $8,
                read_time = $9,
                updated_at = NOW()
            WHERE id = $10
            RETURNING {SCROLL_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Scroll>(&query)
            .bind(&scroll.title)
            .bind(&scroll.slug)
            .bind(&scroll.excerpt)
            .bind(&scroll.content)
            .bind(scroll.category)
            .bind(scroll.published)
            .bind(&scroll.icon)
            .bind(&scroll.date)
            .bind(&scroll.read_time)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(slug_conflict)?
            .ok_or_else(not_found)
    }

    async fn set_scroll_published(&self, id: &Uuid, published: bool) -> Result<Scroll, AppError> {
        let query = format!(
            "UPDATE scrolls SET published = $1, updated_at = NOW() WHERE id = $2 RETURNING {SCROLL_COLUMNS}"
        );
        sqlx::query_as::<_, Scroll>(&query)
            .bind(published)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found)
    }

    async fn delete_scroll(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM scrolls WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }

    async fn count_scrolls(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM scrolls")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn recent_scrolls(&self, limit: i64) -> Result<Vec<Scroll>, AppError> {
        let query = format!("SELECT {SCROLL_COLUMNS} FROM scrolls ORDER BY created_at DESC LIMIT $1");
        let scrolls = sqlx::query_as::<_, Scroll>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(scrolls)
    }
}
