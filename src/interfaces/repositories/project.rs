use async_trait::async_trait;
use sqlx::{types::Json, PgPool, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::project::{Project, ProjectDiagnostics, ProjectInsert, ProjectRow},
    errors::{slug_conflict, AppError},
    repositories::sqlx_repo::SqlxProjectRepo,
};

const PROJECT_COLUMNS: &str = "id, title, slug, subtitle, content, tech_stack, demo_url, repo_url, \
                               thumbnail, published, innovations, technical_summary, demo_checklist, \
                               created_at, updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn list_projects(&self, published_only: bool) -> Result<Vec<Project>, AppError>;
    async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError>;
    async fn get_published_project_by_slug(&self, slug: &str) -> Result<Option<Project>, AppError>;
    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError>;
    async fn replace_project(&self, id: &Uuid, project: &ProjectInsert) -> Result<Project, AppError>;
    async fn set_project_published(&self, id: &Uuid, published: bool) -> Result<Project, AppError>;
    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError>;
    async fn count_projects(&self) -> Result<i64, AppError>;
    async fn recent_projects(&self, limit: i64) -> Result<Vec<Project>, AppError>;
    async fn list_project_diagnostics(&self) -> Result<Vec<ProjectDiagnostics>, AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Project not found".to_string())
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn list_projects(&self, published_only: bool) -> Result<Vec<Project>, AppError> {
        let mut builder = QueryBuilder::new(format!("SELECT {PROJECT_COLUMNS} FROM projects"));
        if published_only {
            builder.push(" WHERE published = TRUE");
        }
        builder.push(" ORDER BY created_at DESC");

        let rows = builder
            .build_query_as::<ProjectRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError> {
        let query = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Project::from)
            .ok_or_else(not_found)
    }

    async fn get_published_project_by_slug(&self, slug: &str) -> Result<Option<Project>, AppError> {
        let query = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE slug = $1 AND published = TRUE");
        let row = sqlx::query_as::<_, ProjectRow>(&query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Project::from))
    }

    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError> {
        let query = format!(
            r#"
            INSERT INTO projects (
                title, slug, subtitle, content, tech_stack, demo_url, repo_url,
                thumbnail, published, innovations, technical_summary, demo_checklist
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {PROJECT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(&project.title)
            .bind(&project.slug)
            .bind(&project.subtitle)
            .bind(&project.content)
            .bind(&project.tech_stack)
            .bind(&project.demo_url)
            .bind(&project.repo_url)
            .bind(&project.thumbnail)
            .bind(project.published)
            .bind(Json(&project.innovations))
            .bind(Json(&project.technical_summary))
            .bind(&project.demo_checklist)
            .fetch_one(&self.pool)
            .await
            .map(Project::from)
            .map_err(slug_conflict)
    }

    async fn replace_project(&self, id: &Uuid, project: &ProjectInsert) -> Result<Project, AppError> {
        let query = format!(
            r#"
            UPDATE projects SET
                title = $1,
                slug = $2,
                subtitle = $3,
                content = $4,
                tech_stack = $5,
                demo_url = $6,
                repo_url = $7,
                thumbnail = $8,
                published = $9,
                innovations = $10,
                technical_summary = $11,
                demo_checklist = $12,
                updated_at = NOW()
            WHERE id = $13
            RETURNING {PROJECT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(&project.title)
            .bind(&project.slug)
            .bind(&project.subtitle)
            .bind(&project.content)
            .bind(&project.tech_stack)
            .bind(&project.demo_url)
            .bind(&project.repo_url)
            .bind(&project.thumbnail)
            .bind(project.published)
            .bind(Json(&project.innovations))
            .bind(Json(&project.technical_summary))
            .bind(&project.demo_checklist)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(slug_conflict)?
            .map(Project::from)
            .ok_or_else(not_found)
    }

    async fn set_project_published(&self, id: &Uuid, published: bool) -> Result<Project, AppError> {
        let query = format!(
            "UPDATE projects SET published = $1, updated_at = NOW() WHERE id = $2 RETURNING {PROJECT_COLUMNS}"
        );
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(published)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Project::from)
            .ok_or_else(not_found)
    }

    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }

    async fn count_projects(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn recent_projects(&self, limit: i64) -> Result<Vec<Project>, AppError> {
        let query = format!("SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at DESC LIMIT $1");
        let rows = sqlx::query_as::<_, ProjectRow>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn list_project_diagnostics(&self) -> Result<Vec<ProjectDiagnostics>, AppError> {
        let rows = sqlx::query_as::<_, ProjectDiagnostics>(
            "SELECT slug, title, technical_summary, demo_checklist FROM projects ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
