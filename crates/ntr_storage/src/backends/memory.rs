use async_trait::async_trait;
use chrono::Utc;
use ntr_core::storage::{canonical_categories, select_by_category, sort_newest_first};
use ntr_core::{Article, ArticleInput, ArticleStorage, CategoryInfo, CategoryQuery, Error, Result};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::fixtures;

const DUPLICATE_SLUG_MESSAGE: &str = "duplicate key value violates unique constraint \"articles_slug_key\"";

pub struct MemoryStore {
    articles: Vec<Article>,
}

impl MemoryStore {
    pub fn new(articles: Vec<Article>) -> Self {
        Self { articles }
    }

    fn slug_taken(&self, slug: &str, except_id: Option<&str>) -> bool {
        self.articles
            .iter()
            .any(|a| a.slug.eq_ignore_ascii_case(slug) && Some(a.id.as_str()) != except_id)
    }

    pub fn create_article(&mut self, input: &ArticleInput) -> Result<Article> {
        let input = input.normalized();
        if self.slug_taken(&input.slug, None) {
            return Err(Error::duplicate_slug(DUPLICATE_SLUG_MESSAGE));
        }
        let article = input.into_article(uuid::Uuid::new_v4().to_string(), Utc::now());
        self.articles.push(article.clone());
        Ok(article)
    }

    pub fn update_article(&mut self, id: &str, input: &ArticleInput) -> Result<Article> {
        let input = input.normalized();
        let index = self
            .articles
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| Error::NotFound("No row was updated. The article may not exist.".to_string()))?;
        if self.slug_taken(&input.slug, Some(id)) {
            return Err(Error::duplicate_slug(DUPLICATE_SLUG_MESSAGE));
        }
        let existing = &mut self.articles[index];

        // Publication date is fixed at creation.
        let published_at = existing.published_at;
        let mut updated = input.into_article(existing.id.clone(), published_at);
        updated.published_at = published_at;
        *existing = updated.clone();
        Ok(updated)
    }

    pub fn get_by_slug(&self, slug: &str) -> Option<Article> {
        let slug = slug.trim();
        self.articles
            .iter()
            .find(|a| a.slug.eq_ignore_ascii_case(slug))
            .cloned()
    }

    pub fn get_by_id(&self, id: &str) -> Option<Article> {
        self.articles.iter().find(|a| a.id == id).cloned()
    }

    pub fn all(&self) -> Vec<Article> {
        let mut articles = self.articles.clone();
        sort_newest_first(&mut articles);
        articles
    }
}

/// Process-local article store. Starts empty or seeded with the sample set.
#[derive(Clone)]
pub struct MemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::from_articles(Vec::new())
    }

    pub fn with_fixtures() -> Self {
        Self::from_articles(fixtures::sample_articles())
    }

    pub fn from_articles(articles: Vec<Article>) -> Self {
        Self {
            store: Arc::new(RwLock::new(MemoryStore::new(articles))),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArticleStorage for MemoryStorage {
    async fn create_article(&self, input: &ArticleInput) -> Result<Article> {
        let mut store = self.store.write().await;
        store.create_article(input)
    }

    async fn update_article(&self, id: &str, input: &ArticleInput) -> Result<Article> {
        let mut store = self.store.write().await;
        store.update_article(id, input)
    }

    async fn get_article_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        let store = self.store.read().await;
        Ok(store.get_by_slug(slug))
    }

    async fn get_article_by_id(&self, id: &str) -> Result<Option<Article>> {
        let store = self.store.read().await;
        Ok(store.get_by_id(id))
    }

    async fn get_all_articles(&self) -> Result<Vec<Article>> {
        let store = self.store.read().await;
        Ok(store.all())
    }

    async fn get_articles_by_category(
        &self,
        category_slug: &str,
        query: &CategoryQuery,
    ) -> Result<Vec<Article>> {
        let store = self.store.read().await;
        Ok(select_by_category(store.all(), category_slug, query))
    }

    async fn get_categories(&self) -> Result<Vec<CategoryInfo>> {
        Ok(canonical_categories())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(slug: &str) -> ArticleInput {
        ArticleInput {
            slug: slug.to_string(),
            title: "Test Article".to_string(),
            excerpt: "This is a test article.".to_string(),
            category: "Tech".to_string(),
            author: "ntr".to_string(),
            image: "https://picsum.photos/800/450".to_string(),
            body: Some("First paragraph.\n\nSecond paragraph.".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryStorage::new();
        let created = storage.create_article(&input("test-article")).await.unwrap();
        assert_eq!(created.category_slug, "tech");
        assert!(!created.id.is_empty());

        let found = storage.get_article_by_slug(" TEST-ARTICLE ").await.unwrap();
        assert_eq!(found.map(|a| a.id), Some(created.id.clone()));

        let by_id = storage.get_article_by_id(&created.id).await.unwrap();
        assert!(by_id.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_typed() {
        let storage = MemoryStorage::new();
        storage.create_article(&input("same-slug")).await.unwrap();
        let err = storage.create_article(&input("Same-Slug")).await.unwrap_err();
        assert!(err.is_duplicate_slug());
    }

    #[tokio::test]
    async fn test_update_article() {
        let storage = MemoryStorage::new();
        let created = storage.create_article(&input("before")).await.unwrap();

        let mut changed = input("after");
        changed.title = "Updated".to_string();
        let updated = storage.update_article(&created.id, &changed).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.slug, "after");
        assert_eq!(updated.published_at, created.published_at);
        assert!(storage.get_article_by_slug("before").await.unwrap().is_none());

        let err = storage.update_article("missing", &changed).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_missing_id_with_taken_slug_is_not_found() {
        let storage = MemoryStorage::new();
        storage.create_article(&input("taken")).await.unwrap();
        let err = storage.update_article("missing", &input("taken")).await.unwrap_err();
        match err {
            Error::NotFound(message) => {
                assert_eq!(message, "No row was updated. The article may not exist.")
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_cannot_steal_slug() {
        let storage = MemoryStorage::new();
        storage.create_article(&input("taken")).await.unwrap();
        let other = storage.create_article(&input("other")).await.unwrap();
        let err = storage.update_article(&other.id, &input("taken")).await.unwrap_err();
        assert!(err.is_duplicate_slug());
    }

    #[tokio::test]
    async fn test_category_query_excludes_and_limits() {
        let storage = MemoryStorage::with_fixtures();
        let all = storage.get_all_articles().await.unwrap();
        assert!(all.windows(2).all(|w| w[0].published_at >= w[1].published_at));

        let movies = storage
            .get_articles_by_category("MOVIES", &CategoryQuery::default())
            .await
            .unwrap();
        assert_eq!(movies.len(), 4);

        let first = movies[0].id.clone();
        let related = storage
            .get_articles_by_category("movies", &CategoryQuery::excluding(first.clone(), 3))
            .await
            .unwrap();
        assert_eq!(related.len(), 3);
        assert!(related.iter().all(|a| a.id != first));
    }
}
