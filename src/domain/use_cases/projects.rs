use std::sync::Arc;

use crate::{
    entities::project::{Project, ProjectDetail, ProjectDiagnostics, ProjectForm, ProjectInsert, ProjectSummary},
    errors::AppError,
    repositories::project::ProjectRepository,
    utils::{search::filter_rows, valid_uuid::valid_uuid},
};

pub struct ProjectHandler {
    pub project_repo: Arc<dyn ProjectRepository>,
}

impl ProjectHandler {
    pub fn new(project_repo: Arc<dyn ProjectRepository>) -> Self {
        ProjectHandler { project_repo }
    }

    /// Every project, newest first, filtered by title or subtitle.
    pub async fn list_projects(&self, query: Option<&str>) -> Result<Vec<Project>, AppError> {
        let projects = self.project_repo.list_projects(false).await?;
        Ok(filter_rows(projects, query, |p: &Project| {
            vec![p.title.as_str(), p.subtitle.as_deref().unwrap_or_default()]
        }))
    }

    pub async fn get_project(&self, id: &str) -> Result<Project, AppError> {
        let id = valid_uuid(id)?;
        self.project_repo.get_project_by_id(&id).await
    }

    pub async fn create_project(&self, form: ProjectForm) -> Result<Project, AppError> {
        let insert = ProjectInsert::try_from(form)?;
        let project = self.project_repo.create_project(&insert).await?;
        tracing::info!(project_id = %project.id, slug = %project.slug, "Project created");
        Ok(project)
    }

    pub async fn replace_project(&self, id: &str, form: ProjectForm) -> Result<Project, AppError> {
        let id = valid_uuid(id)?;
        let insert = ProjectInsert::try_from(form)?;
        self.project_repo.replace_project(&id, &insert).await
    }

    pub async fn set_published(&self, id: &str, published: bool) -> Result<Project, AppError> {
        let id = valid_uuid(id)?;
        let project = self.project_repo.set_project_published(&id, published).await?;
        tracing::info!(project_id = %project.id, published, "Project visibility changed");
        Ok(project)
    }

    pub async fn delete_project(&self, id: &str, confirmed: bool) -> Result<(), AppError> {
        let id = valid_uuid(id)?;
        if !confirmed {
            return Err(AppError::ConfirmationRequired("project".into()));
        }
        self.project_repo.delete_project(&id).await?;
        tracing::info!(project_id = %id, "Project deleted");
        Ok(())
    }

    pub async fn public_projects(&self) -> Result<Vec<ProjectSummary>, AppError> {
        let projects = self.project_repo.list_projects(true).await?;
        Ok(projects.into_iter().map(ProjectSummary::from).collect())
    }

    pub async fn public_project(&self, slug: &str) -> Result<ProjectDetail, AppError> {
        self.project_repo
            .get_published_project_by_slug(slug)
            .await?
            .map(ProjectDetail::from)
            .ok_or_else(|| AppError::NotFound("Project not found".into()))
    }

    pub async fn diagnostics(&self) -> Result<Vec<ProjectDiagnostics>, AppError> {
        self.project_repo.list_project_diagnostics().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::project::TechnicalSummary;
    use crate::repositories::project::MockProjectRepository;
    use chrono::Utc;
    use uuid::Uuid;

    fn project(title: &str, subtitle: Option<&str>) -> Project {
        Project {
            id: Uuid::new_v4(),
            title: title.into(),
            slug: crate::entities::validators::slugify_title(title),
            subtitle: subtitle.map(str::to_string),
            content: String::new(),
            tech_stack: vec!["Rust".into()],
            demo_url: None,
            repo_url: None,
            thumbnail: None,
            published: true,
            innovations: vec![],
            technical_summary: TechnicalSummary::default(),
            demo_checklist: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[actix_rt::test]
    async fn search_covers_subtitle() {
        let mut repo = MockProjectRepository::new();
        repo.expect_list_projects().returning(|_| {
            Ok(vec![
                project("Ledger", Some("Realtime double-entry engine")),
                project("Garden", None),
            ])
        });

        let handler = ProjectHandler::new(Arc::new(repo));
        let found = handler.list_projects(Some("REALTIME")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Ledger");
    }

    #[actix_rt::test]
    async fn slug_conflict_is_passed_through() {
        let mut repo = MockProjectRepository::new();
        repo.expect_create_project()
            .returning(|_| Err(AppError::Conflict("Slug already exists".into())));

        let handler = ProjectHandler::new(Arc::new(repo));
        let form: ProjectForm = serde_json::from_value(serde_json::json!({ "title": "Realtime Ledger" })).unwrap();
        assert!(matches!(handler.create_project(form).await, Err(AppError::Conflict(_))));
    }

    #[actix_rt::test]
    async fn bad_id_is_rejected_before_lookup() {
        let mut repo = MockProjectRepository::new();
        repo.expect_get_project_by_id().never();

        let handler = ProjectHandler::new(Arc::new(repo));
        assert!(matches!(handler.get_project("not-a-uuid").await, Err(AppError::InvalidInput(_))));
    }
}
