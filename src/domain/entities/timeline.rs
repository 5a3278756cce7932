use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::validators::{non_blank, validate_icon, validate_string_list, MAX_LABEL_LENGTH, MAX_TITLE_LENGTH},
    errors::AppError,
};

pub const DEFAULT_TIMELINE_ICON: &str = "Circle";

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct TimelineEvent {
    pub id: Uuid,
    pub date_range: String,
    pub title: String,
    pub description: String,
    pub chapter: Option<String>,
    pub details: Vec<String>,
    pub icon: String,
    #[sqlx(rename = "position")]
    pub order: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TimelineForm {
    #[validate(length(min = 1, max = MAX_LABEL_LENGTH, message = "Date range must be between 1 and 40 characters"))]
    pub date_range: String,

    #[validate(length(min = 1, max = MAX_TITLE_LENGTH, message = "Title must be between 1 and 120 characters"))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    #[validate(length(max = MAX_LABEL_LENGTH))]
    pub chapter: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_string_list"))]
    pub details: Vec<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_icon"))]
    pub icon: Option<String>,
}

/// Validated timeline row, minus the position which the store assigns.
#[derive(Debug, Clone)]
pub struct TimelineInsert {
    pub date_range: String,
    pub title: String,
    pub description: String,
    pub chapter: Option<String>,
    pub details: Vec<String>,
    pub icon: String,
}

impl TryFrom<TimelineForm> for TimelineInsert {
    type Error = AppError;

    fn try_from(form: TimelineForm) -> Result<Self, Self::Error> {
        let form = TimelineForm {
            date_range: form.date_range.trim().to_string(),
            title: form.title.trim().to_string(),
            chapter: non_blank(form.chapter),
            icon: non_blank(form.icon),
            details: form
                .details
                .into_iter()
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .collect(),
            description: form.description,
        };
        form.validate()?;

        Ok(TimelineInsert {
            date_range: form.date_range,
            title: form.title,
            description: form.description,
            chapter: form.chapter,
            details: form.details,
            icon: form.icon.unwrap_or_else(|| DEFAULT_TIMELINE_ICON.to_string()),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub ids: Vec<Uuid>,
}

/// Checks that `ids` is a permutation of the current events and returns the
/// `(id, position)` assignments, positions running `0..N-1`.
pub fn plan_reorder(current: &[TimelineEvent], ids: &[Uuid]) -> Result<Vec<(Uuid, i32)>, AppError> {
    if ids.len() != current.len() {
        return Err(AppError::InvalidInput(format!(
            "Reorder must list all {} events, got {}",
            current.len(),
            ids.len()
        )));
    }

    let known: HashSet<Uuid> = current.iter().map(|e| e.id).collect();
    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        if !known.contains(id) {
            return Err(AppError::InvalidInput(format!("Unknown timeline event {}", id)));
        }
        if !seen.insert(*id) {
            return Err(AppError::InvalidInput(format!("Timeline event {} listed twice", id)));
        }
    }

    Ok(ids.iter().enumerate().map(|(position, id)| (*id, position as i32)).collect())
}
