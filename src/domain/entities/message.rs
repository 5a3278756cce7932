use chrono::{DateTime, NaiveDate, Utc};
use derive_more::Display;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::entities::validators::{new_validation_error, non_blank, trimmed};

const MAX_NAME_LENGTH: u64 = 120;
const MAX_SUBJECT_LENGTH: u64 = 200;
const MAX_BODY_LENGTH: u64 = 5_000;

static TIME_OF_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("time of day pattern")
});

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "message_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[display("contact")]
    Contact,
    #[display("appointment")]
    Appointment,
    #[display("demo")]
    Demo,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Message {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub preferred_date: Option<String>,
    pub preferred_time: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageInsert {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub content: String,
    pub kind: MessageKind,
    pub preferred_date: Option<String>,
    pub preferred_time: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ContactForm {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 2, max = MAX_NAME_LENGTH, message = "Name must be at least 2 characters"))]
    pub name: String,

    #[serde(deserialize_with = "trimmed")]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = MAX_SUBJECT_LENGTH, message = "Subject is too long"))]
    pub subject: Option<String>,

    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 10, max = MAX_BODY_LENGTH, message = "Message must be at least 10 characters"))]
    pub message: String,
}

impl From<ContactForm> for MessageInsert {
    fn from(form: ContactForm) -> Self {
        MessageInsert {
            name: form.name,
            email: form.email,
            subject: non_blank(form.subject),
            content: form.message,
            kind: MessageKind::Contact,
            preferred_date: None,
            preferred_time: None,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AppointmentForm {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 2, max = MAX_NAME_LENGTH, message = "Name must be at least 2 characters"))]
    pub name: String,

    #[serde(deserialize_with = "trimmed")]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(custom(function = "validate_calendar_date"))]
    pub date: String,

    #[validate(regex(path = *TIME_OF_DAY, message = "Please select a time"))]
    pub time: String,

    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 5, max = MAX_BODY_LENGTH, message = "Topic must be at least 5 characters"))]
    pub topic: String,
}

impl From<AppointmentForm> for MessageInsert {
    fn from(form: AppointmentForm) -> Self {
        MessageInsert {
            name: form.name,
            email: form.email,
            subject: Some("Appointment Request".to_string()),
            content: form.topic,
            kind: MessageKind::Appointment,
            preferred_date: Some(form.date),
            preferred_time: Some(form.time),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct DemoRequestForm {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 2, max = MAX_NAME_LENGTH, message = "Name must be at least 2 characters"))]
    pub name: String,

    #[serde(deserialize_with = "trimmed")]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = MAX_NAME_LENGTH, message = "Organization is too long"))]
    pub organization: Option<String>,

    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 10, max = MAX_BODY_LENGTH, message = "Please provide some details (min 10 chars)"))]
    pub details: String,

    #[serde(alias = "projectTitle", deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = MAX_SUBJECT_LENGTH, message = "Project title is required"))]
    pub project_title: String,
}

impl From<DemoRequestForm> for MessageInsert {
    fn from(form: DemoRequestForm) -> Self {
        let organization = non_blank(form.organization).unwrap_or_else(|| "N/A".to_string());
        MessageInsert {
            name: form.name,
            email: form.email,
            subject: Some(format!("Demo Request: {}", form.project_title)),
            content: format!(
                "Project: {}\nOrganization: {}\n\nDetails:\n{}",
                form.project_title, organization, form.details
            ),
            kind: MessageKind::Demo,
            preferred_date: None,
            preferred_time: None,
        }
    }
}

fn validate_calendar_date(date: &str) -> Result<(), ValidationError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| new_validation_error("date_invalid", "Please select a date"))
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub id: Uuid,
    pub message: String,
    pub notification_sent: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReplyRequest {
    #[serde(default)]
    #[validate(length(max = MAX_SUBJECT_LENGTH))]
    pub subject: Option<String>,

    #[validate(length(min = 1, max = MAX_BODY_LENGTH, message = "Reply cannot be empty"))]
    pub content: String,
}
