use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, password, use_cases};
pub use interfaces::{handlers, middlewares, repositories, routes};
pub use infrastructure::{auth, db, limiter, mail, storage, utils};

use auth::jwt::JwtService;
use entities::notification::MailIdentity;
use errors::StorageError;
use limiter::rate_limiter::SubmissionLimiter;
use mail::smtp::SmtpMailer;
use repositories::{
    mailer::Mailer,
    media::MediaStore,
    message::MessageRepository,
    profile::ProfileRepository,
    project::ProjectRepository,
    scroll::ScrollRepository,
    sqlx_repo::{
        SqlxMessageRepo, SqlxProfileRepo, SqlxProjectRepo, SqlxScrollRepo, SqlxTimelineRepo,
        SqlxUserRepo,
    },
    timeline::TimelineRepository,
    user::UserRepository,
};
use settings::AppConfig;
use storage::supabase::SupabaseStorage;
use use_cases::{
    auth::AuthHandler, dashboard::DashboardHandler, media::MediaHandler,
    messages::MessageHandler, notifications::NotificationSender, profile::ProfileHandler,
    projects::ProjectHandler, scrolls::ScrollHandler,
};

pub struct AppState {
    pub config: AppConfig,
    pub auth_handler: AuthHandler,
    pub scroll_handler: ScrollHandler,
    pub project_handler: ProjectHandler,
    pub profile_handler: ProfileHandler,
    pub message_handler: MessageHandler,
    pub media_handler: MediaHandler,
    pub dashboard_handler: DashboardHandler,
    pub notifier: NotificationSender,
    pub submission_limiter: SubmissionLimiter,
}

/// Everything the handlers talk to outside the process.
pub struct Backends {
    pub users: Arc<dyn UserRepository>,
    pub scrolls: Arc<dyn ScrollRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub profile: Arc<dyn ProfileRepository>,
    pub timeline: Arc<dyn TimelineRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub media: Arc<dyn MediaStore>,
    pub mailer: Arc<dyn Mailer>,
}

impl Backends {
    /// Postgres repositories, the storage bucket and the SMTP relay.
    pub fn connect(config: &AppConfig, pool: sqlx::PgPool) -> Result<Self, StorageError> {
        Ok(Backends {
            users: Arc::new(SqlxUserRepo::new(pool.clone())),
            scrolls: Arc::new(SqlxScrollRepo::new(pool.clone())),
            projects: Arc::new(SqlxProjectRepo::new(pool.clone())),
            profile: Arc::new(SqlxProfileRepo::new(pool.clone())),
            timeline: Arc::new(SqlxTimelineRepo::new(pool.clone())),
            messages: Arc::new(SqlxMessageRepo::new(pool)),
            media: Arc::new(SupabaseStorage::new(config)?),
            mailer: Arc::new(SmtpMailer::new(config)),
        })
    }
}

impl AppState {
    pub fn new(config: &AppConfig, pool: sqlx::PgPool) -> Result<Self, StorageError> {
        let backends = Backends::connect(config, pool)?;
        Ok(AppState::from_backends(config, backends))
    }

    pub fn from_backends(config: &AppConfig, backends: Backends) -> Self {
        let identity = MailIdentity {
            account: config.mail_credentials().map(|(user, _)| user),
            display_name: config.mail_sender_name.clone(),
        };
        let notifier = NotificationSender::new(backends.mailer, identity);

        AppState {
            auth_handler: AuthHandler::new(
                backends.users,
                JwtService::new(config),
                notifier.clone(),
                config.site_url.clone(),
            ),
            scroll_handler: ScrollHandler::new(backends.scrolls.clone()),
            project_handler: ProjectHandler::new(backends.projects.clone()),
            profile_handler: ProfileHandler::new(
                backends.profile,
                backends.timeline,
                config.admin_email_label.clone(),
            ),
            message_handler: MessageHandler::new(backends.messages.clone(), notifier.clone()),
            media_handler: MediaHandler::new(backends.media.clone(), config.max_upload_bytes),
            dashboard_handler: DashboardHandler::new(
                backends.scrolls,
                backends.projects,
                backends.messages,
                backends.media,
            ),
            notifier,
            submission_limiter: SubmissionLimiter::per_hour(config.contact_rate_limit_per_hour),
            config: config.clone(),
        }
    }
}
