use std::str::FromStr;

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::validators::{
        non_blank, resolve_slug, validate_icon, validate_slug, validate_title,
        MAX_LABEL_LENGTH, MAX_SLUG_LENGTH, MAX_TITLE_LENGTH, MIN_SLUG_LENGTH, MIN_TITLE_LENGTH,
    },
    errors::AppError,
    utils::markdown::safe_markdown_to_html,
};

const MAX_EXCERPT_LENGTH: u64 = 300;
pub const DEFAULT_SCROLL_ICON: &str = "Scroll";
pub const DEFAULT_READ_TIME: &str = "5 min read";

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "scroll_category")]
pub enum ScrollCategory {
    #[default]
    #[display("Spellbook")]
    Spellbook,
    #[display("Reflections")]
    Reflections,
    #[display("Lore")]
    Lore,
}

impl FromStr for ScrollCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spellbook" => Ok(ScrollCategory::Spellbook),
            "reflections" => Ok(ScrollCategory::Reflections),
            "lore" => Ok(ScrollCategory::Lore),
            other => Err(AppError::InvalidInput(format!("Unknown scroll category: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Scroll {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub category: ScrollCategory,
    pub published: bool,
    pub icon: String,
    #[sqlx(rename = "display_date")]
    pub date: String,
    pub read_time: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated row ready for insert or full replacement.
#[derive(Debug, Clone, Validate)]
pub struct ScrollInsert {
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

    #[validate(length(max = MAX_EXCERPT_LENGTH, message = "Excerpt must be at most 300 characters"))]
    pub excerpt: String,

    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: String,

    pub category: ScrollCategory,
    pub published: bool,

    #[validate(custom(function = "validate_icon"))]
    pub icon: String,

    #[validate(length(min = 1, max = MAX_LABEL_LENGTH, message = "Date label must be between 1 and 40 characters"))]
    pub date: String,

    #[validate(length(min = 1, max = MAX_LABEL_LENGTH, message = "Read time must be between 1 and 40 characters"))]
    pub read_time: String,
}

/// Editor form: every field the admin screen submits on save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollForm {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub excerpt: String,
    pub content: String,
    #[serde(default)]
    pub category: ScrollCategory,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub read_time: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl TryFrom<ScrollForm> for ScrollInsert {
    type Error = AppError;

    fn try_from(form: ScrollForm) -> Result<Self, Self::Error> {
        let insert = ScrollInsert {
            slug: resolve_slug(form.slug.as_deref(), &form.title),
            title: form.title.trim().to_string(),
            excerpt: form.excerpt.trim().to_string(),
            content: form.content,
            category: form.category,
            published: form.published,
            icon: non_blank(form.icon).unwrap_or_else(|| DEFAULT_SCROLL_ICON.to_string()),
            date: non_blank(form.date).unwrap_or_else(default_date_label),
            read_time: non_blank(form.read_time).unwrap_or_else(|| DEFAULT_READ_TIME.to_string()),
        };
        insert.validate()?;
        Ok(insert)
    }
}

/// Today's date as shown on scroll cards, e.g. `Mar 7, 2025`.
pub fn default_date_label() -> String {
    Utc::now().format("%b %-d, %Y").to_string()
}

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub published: bool,
}

#[derive(Debug, Serialize)]
pub struct ScrollSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub category: ScrollCategory,
    pub published: bool,
    pub icon: String,
    pub date: String,
    pub read_time: String,
    pub created_at: DateTime<Utc>,
}

impl From<Scroll> for ScrollSummary {
    fn from(scroll: Scroll) -> Self {
        ScrollSummary {
            id: scroll.id,
            title: scroll.title,
            slug: scroll.slug,
            excerpt: scroll.excerpt,
            category: scroll.category,
            published: scroll.published,
            icon: scroll.icon,
            date: scroll.date,
            read_time: scroll.read_time,
            created_at: scroll.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScrollDetail {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content_html: String,
    pub category: ScrollCategory,
    pub icon: String,
    pub date: String,
    pub read_time: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Scroll> for ScrollDetail {
    fn from(scroll: Scroll) -> Self {
        ScrollDetail {
            content_html: safe_markdown_to_html(&scroll.content),
            id: scroll.id,
            title: scroll.title,
            slug: scroll.slug,
            excerpt: scroll.excerpt,
            category: scroll.category,
            icon: scroll.icon,
            date: scroll.date,
            read_time: scroll.read_time,
            created_at: scroll.created_at,
            updated_at: scroll.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str) -> ScrollForm {
        ScrollForm {
            title: title.to_string(),
            slug: None,
            excerpt: String::new(),
            content: "# Heading\n\nBody".to_string(),
            category: ScrollCategory::default(),
            published: false,
            date: None,
            read_time: None,
            icon: None,
        }
    }

    #[test]
    fn fills_editor_defaults() {
        let insert = ScrollInsert::try_from(form("Summoning Lifetimes")).unwrap();
        assert_eq!(insert.slug, "summoning-lifetimes");
        assert_eq!(insert.category, ScrollCategory::Spellbook);
        assert_eq!(insert.icon, DEFAULT_SCROLL_ICON);
        assert_eq!(insert.read_time, DEFAULT_READ_TIME);
        assert_eq!(insert.date, default_date_label());
    }

    #[test]
    fn rejects_empty_content() {
        let mut input = form("A valid title");
        input.content = String::new();
        match ScrollInsert::try_from(input) {
            Err(AppError::ValidationError(errors)) => {
                assert!(errors.iter().any(|e| e.field == "content"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_bad_explicit_slug() {
        let mut input = form("A valid title");
        input.slug = Some("Not A Slug".into());
        assert!(ScrollInsert::try_from(input).is_err());
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("lore".parse::<ScrollCategory>().unwrap(), ScrollCategory::Lore);
        assert_eq!("Reflections".parse::<ScrollCategory>().unwrap(), ScrollCategory::Reflections);
        assert!("poetry".parse::<ScrollCategory>().is_err());
    }

    #[test]
    fn date_label_format() {
        let label = default_date_label();
        let parts: Vec<&str> = label.split(' ').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts[1].ends_with(','));
    }
}
