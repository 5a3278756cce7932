use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    entities::profile::{Profile, ProfileForm},
    errors::AppError,
    repositories::sqlx_repo::SqlxProfileRepo,
};

const PROFILE_COLUMNS: &str = "id, title, bio, image_url, skills, email, phone, location, \
                               linkedin_url, github_url, resume_url, updated_at";

/// The about page is a single row.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn get_profile(&self) -> Result<Option<Profile>, AppError>;
    async fn update_profile(&self, profile: &ProfileForm) -> Result<Profile, AppError>;
}

impl SqlxProfileRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProfileRepo { pool }
    }
}

#[async_trait]
impl ProfileRepository for SqlxProfileRepo {
    async fn get_profile(&self) -> Result<Option<Profile>, AppError> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM about_page LIMIT 1");
        let profile = sqlx::query_as::<_, Profile>(&query)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn update_profile(&self, profile: &ProfileForm) -> Result<Profile, AppError> {
        // `singleton` is unique, so concurrent first saves collapse onto one row.
        let upsert = format!(
            r#"
            INSERT INTO about_page (
                title, bio, image_url, skills, email, phone, location,
                linkedin_url, github_url, resume_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (singleton) DO UPDATE SET
                title = EXCLUDED.title,
                bio = EXCLUDED.bio,
                image_url = EXCLUDED.image_url,
                skills = EXCLUDED.skills,
                email = EXCLUDED.email,
                phone = EXCLUDED.phone,
                location = EXCLUDED.location,
                linkedin_url = EXCLUDED.linkedin_url,
                github_url = EXCLUDED.github_url,
                resume_url = EXCLUDED.resume_url,
                updated_at = NOW()
            RETURNING {PROFILE_COLUMNS}
            "#
        );

        let saved = sqlx::query_as::<_, Profile>(&upsert)
            .bind(&profile.title)
            .bind(&profile.bio)
            .bind(&profile.image_url)
            .bind(&profile.skills)
            .bind(&profile.email)
            .bind(&profile.phone)
            .bind(&profile.location)
            .bind(&profile.linkedin_url)
            .bind(&profile.github_url)
            .bind(&profile.resume_url)
            .fetch_one(&self.pool)
            .await?;
        Ok(saved)
    }
}
