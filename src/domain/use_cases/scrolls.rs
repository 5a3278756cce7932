use std::sync::Arc;

use crate::{
    entities::scroll::{Scroll, ScrollCategory, ScrollDetail, ScrollForm, ScrollInsert, ScrollSummary},
    errors::AppError,
    repositories::scroll::ScrollRepository,
    utils::{search::filter_rows, valid_uuid::valid_uuid},
};

pub struct ScrollHandler {
    pub scroll_repo: Arc<dyn ScrollRepository>,
}

impl ScrollHandler {
    pub fn new(scroll_repo: Arc<dyn ScrollRepository>) -> Self {
        ScrollHandler { scroll_repo }
    }

    /// Every scroll, newest first, filtered by title when `query` is set.
    pub async fn list_scrolls(&self, query: Option<&str>) -> Result<Vec<Scroll>, AppError> {
        let scrolls = self.scroll_repo.list_scrolls(false).await?;
        Ok(filter_rows(scrolls, query, |s: &Scroll| vec![s.title.as_str()]))
    }

    pub async fn get_scroll(&self, id: &str) -> Result<Scroll, AppError> {
        let id = valid_uuid(id)?;
        self.scroll_repo.get_scroll_by_id(&id).await
    }

    pub async fn create_scroll(&self, form: ScrollForm) -> Result<Scroll, AppError> {
        let insert = ScrollInsert::try_from(form)?;
        let scroll = self.scroll_repo.create_scroll(&insert).await?;
        tracing::info!(scroll_id = %scroll.id, slug = %scroll.slug, "Scroll created");
        Ok(scroll)
    }

    /// Full-form save; last write wins.
    pub async fn replace_scroll(&self, id: &str, form: ScrollForm) -> Result<Scroll, AppError> {
        let id = valid_uuid(id)?;
        let insert = ScrollInsert::try_from(form)?;
        self.scroll_repo.replace_scroll(&id, &insert).await
    }

    pub async fn set_published(&self, id: &str, published: bool) -> Result<Scroll, AppError> {
        let id = valid_uuid(id)?;
        let scroll = self.scroll_repo.set_scroll_published(&id, published).await?;
        tracing::info!(scroll_id = %scroll.id, published, "Scroll visibility changed");
        Ok(scroll)
    }

    pub async fn delete_scroll(&self, id: &str, confirmed: bool) -> Result<(), AppError> {
        let id = valid_uuid(id)?;
        if !confirmed {
            return Err(AppError::ConfirmationRequired("scroll".into()));
        }
        self.scroll_repo.delete_scroll(&id).await?;
        tracing::info!(scroll_id = %id, "Scroll deleted");
        Ok(())
    }

    /// Published scrolls for the codex, optionally narrowed to one category.
    pub async fn public_scrolls(&self, category: Option<ScrollCategory>) -> Result<Vec<ScrollSummary>, AppError> {
        let scrolls = self.scroll_repo.list_scrolls(true).await?;
        Ok(scrolls
            .into_iter()
            .filter(|s| category.is_none_or(|c| s.category == c))
            .map(ScrollSummary::from)
            .collect())
    }

    pub async fn public_scroll(&self, slug: &str) -> Result<ScrollDetail, AppError> {
        self.scroll_repo
            .get_published_scroll_by_slug(slug)
            .await?
            .map(ScrollDetail::from)
            .ok_or_else(|| AppError::NotFound("Scroll not found".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::scroll::MockScrollRepository;
    use chrono::Utc;
    use uuid::Uuid;

    fn scroll(title: &str, category: ScrollCategory, published: bool) -> Scroll {
        Scroll {
            id: Uuid::new_v4(),
            title: title.into(),
            slug: crate::entities::validators::slugify_title(title),
            excerpt: String::new(),
            content: "# Heading".into(),
            category,
            published,
            icon: "Scroll".into(),
            date: "Jan 1, 2025".into(),
            read_time: "5 min read".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[actix_rt::test]
    async fn list_filters_by_title_substring() {
        let mut repo = MockScrollRepository::new();
        repo.expect_list_scrolls().returning(|_| {
            Ok(vec![
                scroll("Borrow Checker Notes", ScrollCategory::Spellbook, true),
                scroll("On Patience", ScrollCategory::Reflections, false),
            ])
        });

        let handler = ScrollHandler::new(Arc::new(repo));
        let found = handler.list_scrolls(Some("  borrow ")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Borrow Checker Notes");
    }

    #[actix_rt::test]
    async fn delete_without_confirmation_touches_nothing() {
        let mut repo = MockScrollRepository::new();
        repo.expect_delete_scroll().never();

        let handler = ScrollHandler::new(Arc::new(repo));
        let err = handler.delete_scroll(&Uuid::new_v4().to_string(), false).await.unwrap_err();
        assert!(matches!(err, AppError::ConfirmationRequired(_)));
    }

    #[actix_rt::test]
    async fn public_listing_narrows_by_category() {
        let mut repo = MockScrollRepository::new();
        repo.expect_list_scrolls()
            .withf(|published_only| *published_only)
            .returning(|_| {
                Ok(vec![
                    scroll("Lifetimes Explained", ScrollCategory::Spellbook, true),
                    scroll("The Old Forge", ScrollCategory::Lore, true),
                ])
            });

        let handler = ScrollHandler::new(Arc::new(repo));
        let lore = handler.public_scrolls(Some(ScrollCategory::Lore)).await.unwrap();
        assert_eq!(lore.len(), 1);
        assert_eq!(lore[0].title, "The Old Forge");
    }

    #[actix_rt::test]
    async fn missing_slug_is_not_found() {
        let mut repo = MockScrollRepository::new();
        repo.expect_get_published_scroll_by_slug().returning(|_| Ok(None));

        let handler = ScrollHandler::new(Arc::new(repo));
        assert!(matches!(handler.public_scroll("draft-post").await, Err(AppError::NotFound(_))));
    }

    #[actix_rt::test]
    async fn invalid_form_never_reaches_the_store() {
        let mut repo = MockScrollRepository::new();
        repo.expect_create_scroll().never();

        let handler = ScrollHandler::new(Arc::new(repo));
        let form: ScrollForm = serde_json::from_value(serde_json::json!({
            "title": "ab",
            "content": ""
        }))
        .unwrap();
        assert!(matches!(handler.create_scroll(form).await, Err(AppError::ValidationError(_))));
    }
}
