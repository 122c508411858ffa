use async_trait::async_trait;
use ntr_core::{Article, ArticleInput, ArticleStorage, CategoryInfo, CategoryQuery, Result};
use std::sync::Arc;
use tracing::error;

use crate::backends::memory::MemoryStorage;

/// Serves reads from the sample set when the primary backend fails.
/// Writes always go to the primary and report its errors.
pub struct FallbackStorage {
    primary: Arc<dyn ArticleStorage>,
    fallback: MemoryStorage,
}

impl FallbackStorage {
    pub fn new(primary: Arc<dyn ArticleStorage>) -> Self {
        Self {
            primary,
            fallback: MemoryStorage::with_fixtures(),
        }
    }
}

#[async_trait]
impl ArticleStorage for FallbackStorage {
    async fn create_article(&self, input: &ArticleInput) -> Result<Article> {
        self.primary.create_article(input).await
    }

    async fn update_article(&self, id: &str, input: &ArticleInput) -> Result<Article> {
        self.primary.update_article(id, input).await
    }

    async fn get_article_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        match self.primary.get_article_by_slug(slug).await {
            Ok(article) => Ok(article),
            Err(e) => {
                error!("[articles] get_article_by_slug error: {}", e);
                self.fallback.get_article_by_slug(slug).await
            }
        }
    }

    async fn get_article_by_id(&self, id: &str) -> Result<Option<Article>> {
        match self.primary.get_article_by_id(id).await {
            Ok(article) => Ok(article),
            Err(e) => {
                error!("[articles] get_article_by_id error: {}", e);
                Ok(None)
            }
        }
    }

    async fn get_all_articles(&self) -> Result<Vec<Article>> {
        match self.primary.get_all_articles().await {
            Ok(articles) => Ok(articles),
            Err(e) => {
                error!("[articles] get_all_articles error: {}", e);
                self.fallback.get_all_articles().await
            }
        }
    }

    async fn get_articles_by_category(
        &self,
        category_slug: &str,
        query: &CategoryQuery,
    ) -> Result<Vec<Article>> {
        match self.primary.get_articles_by_category(category_slug, query).await {
            Ok(articles) => Ok(articles),
            Err(e) => {
                error!("[articles] get_articles_by_category error: {}", e);
                self.fallback.get_articles_by_category(category_slug, query).await
            }
        }
    }

    async fn get_categories(&self) -> Result<Vec<CategoryInfo>> {
        match self.primary.get_categories().await {
            Ok(categories) if !categories.is_empty() => Ok(categories),
            Ok(_) => self.fallback.get_categories().await,
            Err(e) => {
                error!("[articles] get_categories error: {}", e);
                self.fallback.get_categories().await
            }
        }
    }
}
