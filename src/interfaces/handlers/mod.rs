pub mod auth;
pub mod dashboard;
pub mod home;
pub mod json_error;
pub mod media;
pub mod messages;
pub mod notifications;
pub mod profile;
pub mod projects;
pub mod query;
pub mod scrolls;
pub mod settings;
pub mod system;
