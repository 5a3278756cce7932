use std::sync::Arc;

use crate::{
    entities::{
        profile::{Profile, ProfileForm, PublicProfile},
        timeline::{TimelineEvent, TimelineForm, TimelineInsert},
    },
    errors::AppError,
    repositories::{profile::ProfileRepository, timeline::TimelineRepository},
    utils::valid_uuid::valid_uuid,
};

/// About page: the singleton profile row plus its ordered timeline.
pub struct ProfileHandler {
    pub profile_repo: Arc<dyn ProfileRepository>,
    pub timeline_repo: Arc<dyn TimelineRepository>,
    pub admin_email_label: Option<String>,
}

impl ProfileHandler {
    pub fn new(
        profile_repo: Arc<dyn ProfileRepository>,
        timeline_repo: Arc<dyn TimelineRepository>,
        admin_email_label: Option<String>,
    ) -> Self {
        ProfileHandler {
            profile_repo,
            timeline_repo,
            admin_email_label,
        }
    }

    pub async fn get_profile(&self) -> Result<Profile, AppError> {
        self.profile_repo
            .get_profile()
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found".into()))
    }

    pub async fn update_profile(&self, form: ProfileForm) -> Result<Profile, AppError> {
        let form = form.normalized()?;
        let profile = self.profile_repo.update_profile(&form).await?;
        tracing::info!("Profile updated");
        Ok(profile)
    }

    pub async fn public_profile(&self) -> Result<PublicProfile, AppError> {
        let profile = self.get_profile().await?;
        let timeline = self.timeline_repo.list_events().await?;
        Ok(PublicProfile::new(profile, timeline, self.admin_email_label.clone()))
    }

    pub async fn list_timeline(&self) -> Result<Vec<TimelineEvent>, AppError> {
        self.timeline_repo.list_events().await
    }

    /// Appends the event after the current last one.
    pub async fn create_event(&self, form: TimelineForm) -> Result<TimelineEvent, AppError> {
        let insert = TimelineInsert::try_from(form)?;
        let event = self.timeline_repo.create_event(&insert).await?;
        tracing::info!(event_id = %event.id, position = event.order, "Timeline event created");
        Ok(event)
    }

    pub async fn update_event(&self, id: &str, form: TimelineForm) -> Result<TimelineEvent, AppError> {
        let id = valid_uuid(id)?;
        let insert = TimelineInsert::try_from(form)?;
        self.timeline_repo.update_event(&id, &insert).await
    }

    pub async fn delete_event(&self, id: &str, confirmed: bool) -> Result<(), AppError> {
        let id = valid_uuid(id)?;
        if !confirmed {
            return Err(AppError::ConfirmationRequired("timeline event".into()));
        }
        self.timeline_repo.delete_event(&id).await?;
        tracing::info!(event_id = %id, "Timeline event deleted");
        Ok(())
    }

    /// Applies a full new arrangement; `ids` must list every event once.
    pub async fn reorder_timeline(&self, ids: &[uuid::Uuid]) -> Result<Vec<TimelineEvent>, AppError> {
        let events = self.timeline_repo.reorder_events(ids).await?;
        tracing::info!(count = events.len(), "Timeline reordered");
        Ok(events)
    }
}
