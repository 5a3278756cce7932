use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::types::Json;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    entities::validators::{
        new_validation_error, non_blank, normalize_list, resolve_slug, validate_slug,
        validate_string_list, validate_title, validate_url, MAX_SLUG_LENGTH, MAX_TITLE_LENGTH,
        MIN_SLUG_LENGTH, MIN_TITLE_LENGTH,
    },
    errors::AppError,
    utils::markdown::safe_markdown_to_html,
};

const MAX_SUBTITLE_LENGTH: u64 = 200;
const MAX_INNOVATIONS: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Innovation {
    pub title: String,
    pub desc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub key: String,
    pub value: String,
}

/// Ordered key/value pairs. Accepts either `[{key, value}]` or a JSON object,
/// the latter flattened in key order with non-string values rendered as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TechnicalSummary(pub Vec<SummaryEntry>);

#[derive(Deserialize)]
#[serde(untagged)]
enum SummaryShape {
    Pairs(Vec<SummaryEntry>),
    Map(serde_json::Map<String, serde_json::Value>),
}

impl<'de> Deserialize<'de> for TechnicalSummary {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = match Option::<SummaryShape>::deserialize(deserializer)? {
            None => Vec::new(),
            Some(SummaryShape::Pairs(pairs)) => pairs,
            Some(SummaryShape::Map(map)) => map
                .into_iter()
                .map(|(key, value)| SummaryEntry {
                    key,
                    value: match value {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    },
                })
                .collect(),
        };
        Ok(TechnicalSummary(entries))
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub subtitle: Option<String>,
    pub content: String,
    pub tech_stack: Vec<String>,
    pub demo_url: Option<String>,
    pub repo_url: Option<String>,
    pub thumbnail: Option<String>,
    pub published: bool,
    pub innovations: Json<Vec<Innovation>>,
    pub technical_summary: Json<TechnicalSummary>,
    pub demo_checklist: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub subtitle: Option<String>,
    pub content: String,
    pub tech_stack: Vec<String>,
    pub demo_url: Option<String>,
    pub repo_url: Option<String>,
    pub thumbnail: Option<String>,
    pub published: bool,
    pub innovations: Vec<Innovation>,
    pub technical_summary: TechnicalSummary,
    pub demo_checklist: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: row.id,
            title: row.title,
            slug: row.slug,
            subtitle: row.subtitle,
            content: row.content,
            tech_stack: row.tech_stack,
            demo_url: row.demo_url,
            repo_url: row.repo_url,
            thumbnail: row.thumbnail,
            published: row.published,
            innovations: row.innovations.0,
            technical_summary: row.technical_summary.0,
            demo_checklist: row.demo_checklist,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Validate)]
pub struct ProjectInsert {
    #[validate(
        length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH, message = "Title must be between 3 and 120 characters"),
        custom(function = "validate_title")
    )]
    pub title: String,

    #[validate(
        length(min = MIN_SLUG_LENGTH, max = MAX_SLUG_LENGTH, message = "Slug must be between 3 and 80 characters"),
        custom(function = "validate_slug")
    )]
    pub slug: String,

    #[validate(length(max = MAX_SUBTITLE_LENGTH, message = "Subtitle must be at most 200 characters"))]
    pub subtitle: Option<String>,

    pub content: String,

    #[validate(custom(function = "validate_string_list"))]
    pub tech_stack: Vec<String>,

    #[validate(custom(function = "validate_url"))]
    pub demo_url: Option<String>,

    #[validate(custom(function = "validate_url"))]
    pub repo_url: Option<String>,

    #[validate(custom(function = "validate_url"))]
    pub thumbnail: Option<String>,

    pub published: bool,

    #[validate(custom(function = "validate_innovations"))]
    pub innovations: Vec<Innovation>,

    pub technical_summary: TechnicalSummary,

    #[validate(custom(function = "validate_string_list"))]
    pub demo_checklist: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectForm {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub repo_url: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub innovations: Vec<Innovation>,
    #[serde(default)]
    pub technical_summary: TechnicalSummary,
    #[serde(default)]
    pub demo_checklist: Vec<String>,
}

impl TryFrom<ProjectForm> for ProjectInsert {
    type Error = AppError;

    fn try_from(form: ProjectForm) -> Result<Self, Self::Error> {
        let innovations = form
            .innovations
            .into_iter()
            .map(|i| Innovation { title: i.title.trim().to_string(), desc: i.desc.trim().to_string() })
            .filter(|i| !i.title.is_empty() || !i.desc.is_empty())
            .collect();

        let technical_summary = TechnicalSummary(
            form.technical_summary
                .0
                .into_iter()
                .map(|e| SummaryEntry { key: e.key.trim().to_string(), value: e.value.trim().to_string() })
                .filter(|e| !e.key.is_empty())
                .collect(),
        );

        let insert = ProjectInsert {
            slug: resolve_slug(form.slug.as_deref(), &form.title),
            title: form.title.trim().to_string(),
            subtitle: non_blank(form.subtitle),
            content: form.content,
            tech_stack: normalize_list(form.tech_stack),
            demo_url: non_blank(form.demo_url),
            repo_url: non_blank(form.repo_url),
            thumbnail: non_blank(form.thumbnail),
            published: form.published,
            innovations,
            technical_summary,
            demo_checklist: form
                .demo_checklist
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        };
        insert.validate()?;
        Ok(insert)
    }
}

fn validate_innovations(innovations: &[Innovation]) -> Result<(), ValidationError> {
    if innovations.len() > MAX_INNOVATIONS {
        return Err(new_validation_error("innovations_too_many", "At most 12 innovations are allowed"));
    }
    if innovations.iter().any(|i| i.title.is_empty()) {
        return Err(new_validation_error("innovation_title_missing", "Each innovation needs a title"));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub subtitle: Option<String>,
    pub tech_stack: Vec<String>,
    pub thumbnail: Option<String>,
    pub demo_url: Option<String>,
    pub repo_url: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Project> for ProjectSummary {
    fn from(project: Project) -> Self {
        ProjectSummary {
            id: project.id,
            title: project.title,
            slug: project.slug,
            subtitle: project.subtitle,
            tech_stack: project.tech_stack,
            thumbnail: project.thumbnail,
            demo_url: project.demo_url,
            repo_url: project.repo_url,
            published: project.published,
            created_at: project.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub subtitle: Option<String>,
    pub content_html: String,
    pub tech_stack: Vec<String>,
    pub demo_url: Option<String>,
    pub repo_url: Option<String>,
    pub thumbnail: Option<String>,
    pub innovations: Vec<Innovation>,
    pub technical_summary: TechnicalSummary,
    pub demo_checklist: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Project> for ProjectDetail {
    fn from(project: Project) -> Self {
        ProjectDetail {
            content_html: safe_markdown_to_html(&project.content),
            id: project.id,
            title: project.title,
            slug: project.slug,
            subtitle: project.subtitle,
            tech_stack: project.tech_stack,
            demo_url: project.demo_url,
            repo_url: project.repo_url,
            thumbnail: project.thumbnail,
            innovations: project.innovations,
            technical_summary: project.technical_summary,
            demo_checklist: project.demo_checklist,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

/// Raw structured fields, as inspected by the diagnostics endpoint.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ProjectDiagnostics {
    pub slug: String,
    pub title: String,
    pub technical_summary: Json<serde_json::Value>,
    pub demo_checklist: Vec<String>,
}
