use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    errors::AppError,
    repositories::{
        media::MediaStore, message::MessageRepository, project::ProjectRepository,
        scroll::ScrollRepository,
    },
};

const RECENT_ACTIVITY_LIMIT: usize = 5;

#[derive(Debug, Serialize)]
pub struct DashboardCounts {
    pub scrolls: i64,
    pub projects: i64,
    pub media: i64,
    pub messages: i64,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Scroll,
    Project,
    Message,
}

#[derive(Debug, Serialize)]
pub struct ActivityEntry {
    pub kind: ActivityKind,
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub counts: DashboardCounts,
    pub recent_activity: Vec<ActivityEntry>,
}

pub struct DashboardHandler {
    pub scroll_repo: Arc<dyn ScrollRepository>,
    pub project_repo: Arc<dyn ProjectRepository>,
    pub message_repo: Arc<dyn MessageRepository>,
    pub store: Arc<dyn MediaStore>,
}

impl DashboardHandler {
    pub fn new(
        scroll_repo: Arc<dyn ScrollRepository>,
        project_repo: Arc<dyn ProjectRepository>,
        message_repo: Arc<dyn MessageRepository>,
        store: Arc<dyn MediaStore>,
    ) -> Self {
        DashboardHandler {
            scroll_repo,
            project_repo,
            message_repo,
            store,
        }
    }

    /// Counts plus the newest entries across scrolls, projects and messages.
    /// An unreachable bucket counts as zero media rather than failing the page.
    pub async fn summary(&self) -> Result<DashboardSummary, AppError> {
        let limit = RECENT_ACTIVITY_LIMIT as i64;
        let (scrolls, projects, messages, recent_scrolls, recent_projects, recent_messages) = tokio::try_join!(
            self.scroll_repo.count_scrolls(),
            self.project_repo.count_projects(),
            self.message_repo.count_messages(),
            self.scroll_repo.recent_scrolls(limit),
            self.project_repo.recent_projects(limit),
            self.message_repo.recent_messages(limit),
        )?;

        let media = match self.store.list_objects().await {
            Ok(objects) => objects.len() as i64,
            Err(e) => {
                tracing::warn!(error = %e, "Media count unavailable");
                0
            }
        };

        let mut recent_activity: Vec<ActivityEntry> = recent_scrolls
            .into_iter()
            .map(|s| ActivityEntry { kind: ActivityKind::Scroll, id: s.id, title: s.title, created_at: s.created_at })
            .chain(recent_projects.into_iter().map(|p| ActivityEntry {
                kind: ActivityKind::Project,
                id: p.id,
                title: p.title,
                created_at: p.created_at,
            }))
            .chain(recent_messages.into_iter().map(|m| ActivityEntry {
                kind: ActivityKind::Message,
                id: m.id,
                title: format!("{} ({})", m.name, m.kind),
                created_at: m.created_at,
            }))
            .collect();
        recent_activity.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent_activity.truncate(RECENT_ACTIVITY_LIMIT);

        Ok(DashboardSummary {
            counts: DashboardCounts { scrolls, projects, media, messages },
            recent_activity,
        })
    }
}
