use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        timeline::TimelineEvent,
        validators::{non_blank, normalize_list, validate_string_list, validate_url, MAX_TITLE_LENGTH},
    },
    errors::AppError,
    utils::markdown::safe_markdown_to_html,
};

const MAX_BIO_LENGTH: u64 = 10_000;
const MAX_CONTACT_LENGTH: u64 = 120;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub title: String,
    pub bio: String,
    pub image_url: Option<String>,
    pub skills: Vec<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub resume_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProfileForm {
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH, message = "Title must be between 1 and 120 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = MAX_BIO_LENGTH, message = "Bio is too long"))]
    pub bio: String,

    #[serde(default)]
    #[validate(custom(function = "validate_url"))]
    pub image_url: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_string_list"))]
    pub skills: Vec<String>,

    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[serde(default)]
    #[validate(length(max = MAX_CONTACT_LENGTH))]
    pub phone: Option<String>,

    #[serde(default)]
    #[validate(length(max = MAX_CONTACT_LENGTH))]
    pub location: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_url"))]
    pub linkedin_url: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_url"))]
    pub github_url: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_url"))]
    pub resume_url: Option<String>,
}

impl ProfileForm {
    /// Blank optional fields become NULL and skills are de-duplicated before validation.
    pub fn normalized(self) -> Result<Self, AppError> {
        let form = ProfileForm {
            title: self.title.trim().to_string(),
            bio: self.bio,
            image_url: non_blank(self.image_url),
            skills: normalize_list(self.skills),
            email: non_blank(self.email),
            phone: non_blank(self.phone),
            location: non_blank(self.location),
            linkedin_url: non_blank(self.linkedin_url),
            github_url: non_blank(self.github_url),
            resume_url: non_blank(self.resume_url),
        };
        form.validate()?;
        Ok(form)
    }
}

/// Public about page: profile, rendered bio and the ordered timeline.
#[derive(Debug, Serialize)]
pub struct PublicProfile {
    #[serde(flatten)]
    pub profile: Profile,
    pub bio_html: String,
    pub admin_email: Option<String>,
    pub timeline: Vec<TimelineEvent>,
}

impl PublicProfile {
    pub fn new(profile: Profile, timeline: Vec<TimelineEvent>, admin_email: Option<String>) -> Self {
        PublicProfile {
            bio_html: safe_markdown_to_html(&profile.bio),
            profile,
            admin_email,
            timeline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_links_are_cleared() {
        let form: ProfileForm = serde_json::from_value(json!({
            "title": " Systems Engineer ",
            "github_url": "  ",
            "skills": ["Rust", "Rust", "Go"]
        }))
        .unwrap();

        let form = form.normalized().unwrap();
        assert_eq!(form.title, "Systems Engineer");
        assert_eq!(form.github_url, None);
        assert_eq!(form.skills, vec!["Rust", "Go"]);
    }

    #[test]
    fn rejects_invalid_email() {
        let form: ProfileForm = serde_json::from_value(json!({
            "title": "Engineer",
            "email": "not-an-email"
        }))
        .unwrap();

        assert!(matches!(form.normalized(), Err(AppError::ValidationError(_))));
    }
}
