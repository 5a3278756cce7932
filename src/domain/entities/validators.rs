use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use validator::ValidationError;

pub const MIN_TITLE_LENGTH: u64 = 3;
pub const MAX_TITLE_LENGTH: u64 = 120;
pub const MIN_SLUG_LENGTH: u64 = 3;
pub const MAX_SLUG_LENGTH: u64 = 80;
pub const MAX_LABEL_LENGTH: u64 = 40;
pub const MAX_LIST_ITEMS: usize = 30;
pub const MAX_LIST_ITEM_LENGTH: usize = 200;

/// Icon tags name a glyph in the front-end icon set, e.g. `Scroll` or `BookOpen`.
pub static ICON_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9]*$").expect("icon tag pattern")
});

pub fn new_validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(new_validation_error("title_blank", "Title cannot be blank"));
    }
    if title.chars().any(|c| c.is_control()) {
        return Err(new_validation_error("title_control_chars", "Title contains invalid characters"));
    }
    Ok(())
}

pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() {
        return Err(new_validation_error("slug_empty", "Slug cannot be empty"));
    }
    if !slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return Err(new_validation_error("slug_invalid_chars", "Slug must contain only lowercase letters, digits, or hyphens"));
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(new_validation_error("slug_edge_hyphen", "Slug must not start or end with a hyphen"));
    }
    if slug.contains("--") {
        return Err(new_validation_error("slug_double_hyphen", "Slug must not contain consecutive hyphens"));
    }
    Ok(())
}

pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    match url::Url::parse(url) {
        Ok(parsed) => {
            if parsed.scheme() == "http" || parsed.scheme() == "https" {
                Ok(())
            } else {
                Err(new_validation_error("invalid_url_scheme", "URL must start with http:// or https://"))
            }
        }
        Err(_) => Err(new_validation_error("invalid_url", "Invalid URL format")),
    }
}

pub fn validate_icon(icon: &str) -> Result<(), ValidationError> {
    if icon.len() as u64 > MAX_LABEL_LENGTH || !ICON_TAG.is_match(icon) {
        return Err(new_validation_error("icon_invalid", "Icon must be an icon name such as \"Scroll\""));
    }
    Ok(())
}

pub fn validate_string_list(items: &[String]) -> Result<(), ValidationError> {
    if items.len() > MAX_LIST_ITEMS {
        return Err(new_validation_error("list_too_long", "Too many entries"));
    }
    if items.iter().any(|item| item.chars().count() > MAX_LIST_ITEM_LENGTH) {
        return Err(new_validation_error("list_item_too_long", "An entry is too long"));
    }
    Ok(())
}

/// Derives a URL-safe slug: lower-case, non-alphanumeric runs collapsed to
/// a single `-`, no leading or trailing hyphen.
pub fn slugify_title(title: &str) -> String {
    slug::slugify(title)
}

/// Uses the given slug unless it is missing or blank.
pub fn resolve_slug(slug: Option<&str>, title: &str) -> String {
    match slug.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => slugify_title(title),
    }
}

/// Trims entries, drops blanks and repeats while keeping first-seen order.
pub fn normalize_list(items: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(items.len());
    for item in items {
        let trimmed = item.trim();
        if !trimmed.is_empty() && !seen.iter().any(|s: &String| s == trimmed) {
            seen.push(trimmed.to_string());
        }
    }
    seen
}

/// Strips surrounding whitespace while deserializing, so length rules see
/// what will be stored.
pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().to_string())
}

/// Treats blank strings as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
