pub mod auth;
pub mod dashboard;
pub mod extractors;
pub mod media;
pub mod messages;
pub mod notifications;
pub mod profile;
pub mod projects;
pub mod scrolls;
