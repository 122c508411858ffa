use async_trait::async_trait;
use crate::categories::Category;
use crate::types::{Article, ArticleInput, CategoryInfo};
use crate::Result;

pub const DEFAULT_CATEGORY_LIMIT: usize = 6;

/// Options for [`ArticleStorage::get_articles_by_category`].
#[derive(Debug, Clone, Default)]
pub struct CategoryQuery {
    pub exclude_id: Option<String>,
    pub limit: Option<usize>,
}

impl CategoryQuery {
    pub fn excluding(id: impl Into<String>, limit: usize) -> Self {
        Self {
            exclude_id: Some(id.into()),
            limit: Some(limit),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_CATEGORY_LIMIT)
    }
}

#[async_trait]
pub trait ArticleStorage: Send + Sync {
    /// Insert a new article. A slug clash surfaces as `Error::DuplicateKey`.
    async fn create_article(&self, input: &ArticleInput) -> Result<Article>;

    /// Replace the editable fields of an existing article.
    async fn update_article(&self, id: &str, input: &ArticleInput) -> Result<Article>;

    /// Case-insensitive lookup.
    async fn get_article_by_slug(&self, slug: &str) -> Result<Option<Article>>;

    async fn get_article_by_id(&self, id: &str) -> Result<Option<Article>>;

    /// Every article, newest first.
    async fn get_all_articles(&self) -> Result<Vec<Article>>;

    /// Newest articles in a category.
    async fn get_articles_by_category(
        &self,
        category_slug: &str,
        query: &CategoryQuery,
    ) -> Result<Vec<Article>>;

    async fn get_categories(&self) -> Result<Vec<CategoryInfo>>;
}

/// In-process filtering shared by the backends that hold rows in memory.
pub fn select_by_category(articles: Vec<Article>, category_slug: &str, query: &CategoryQuery) -> Vec<Article> {
    let slug = category_slug.trim().to_lowercase();
    articles
        .into_iter()
        .filter(|a| a.category_slug.to_lowercase() == slug)
        .filter(|a| query.exclude_id.as_deref() != Some(a.id.as_str()))
        .take(query.limit())
        .collect()
}

pub fn sort_newest_first(articles: &mut [Article]) {
    articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

pub fn canonical_categories() -> Vec<CategoryInfo> {
    Category::ALL
        .into_iter()
        .map(|c| CategoryInfo {
            name: c.name().to_string(),
            slug: c.slug(),
        })
        .collect()
}
