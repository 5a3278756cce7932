use serde::Deserialize;

use crate::{entities::scroll::ScrollCategory, errors::AppError};

/// `?q=` substring filter on admin lists.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
}

/// Deletes only go through with `?confirm=true`.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    pub confirm: Option<bool>,
}

impl DeleteQuery {
    pub fn confirmed(&self) -> bool {
        self.confirm.unwrap_or(false)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

impl CategoryQuery {
    pub fn category(&self) -> Result<Option<ScrollCategory>, AppError> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
            .map(str::parse)
            .transpose()
    }
}
