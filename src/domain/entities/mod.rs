pub mod media;
pub mod message;
pub mod notification;
pub mod profile;
pub mod project;
pub mod scroll;
pub mod timeline;
pub mod token;
pub mod user;
pub mod validators;
