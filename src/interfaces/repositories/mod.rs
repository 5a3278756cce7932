pub mod mailer;
pub mod media;
pub mod message;
pub mod profile;
pub mod project;
pub mod scroll;
pub mod sqlx_repo;
pub mod timeline;
pub mod user;
