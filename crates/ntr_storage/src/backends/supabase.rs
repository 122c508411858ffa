//! Hosted Postgres reached through its PostgREST interface.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ntr_core::storage::canonical_categories;
use ntr_core::{
    Article, ArticleInput, ArticleStorage, BackendSettings, CategoryInfo, CategoryQuery, Error, Result,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::fmt;

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Deserialize)]
struct ArticleRow {
    id: String,
    slug: String,
    title: String,
    excerpt: String,
    category: String,
    category_slug: String,
    author: String,
    published_at: DateTime<Utc>,
    image: String,
    image_alt: Option<String>,
    featured: Option<bool>,
    read_time: Option<u32>,
    body: Option<String>,
}

impl From<ArticleRow> for Article {
    fn from(row: ArticleRow) -> Self {
        Article {
            id: row.id,
            slug: row.slug,
            title: row.title,
            excerpt: row.excerpt,
            category: row.category,
            category_slug: row.category_slug,
            author: row.author,
            published_at: row.published_at,
            image: row.image,
            image_alt: row.image_alt,
            featured: row.featured,
            read_time: row.read_time,
            body: row.body,
        }
    }
}

#[derive(Debug, Serialize)]
struct WriteRow {
    slug: String,
    title: String,
    excerpt: String,
    category: String,
    category_slug: String,
    author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    published_at: Option<DateTime<Utc>>,
    image: String,
    image_alt: Option<String>,
    featured: bool,
    read_time: Option<u32>,
    body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

impl WriteRow {
    fn insert(input: &ArticleInput) -> Self {
        let mut row = Self::update(input);
        row.published_at = Some(input.published_at.unwrap_or_else(Utc::now));
        row.updated_at = None;
        row
    }

    fn update(input: &ArticleInput) -> Self {
        let input = input.normalized();
        Self {
            slug: input.slug,
            title: input.title,
            excerpt: input.excerpt,
            category: input.category,
            category_slug: input.category_slug,
            author: input.author,
            published_at: None,
            image: input.image,
            image_alt: input.image_alt,
            featured: input.featured,
            read_time: input.read_time,
            body: input.body,
            updated_at: Some(Utc::now()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PostgrestError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CategoryRow {
    slug: String,
    name: String,
}

pub struct SupabaseStorage {
    client: Client,
    base_url: String,
    anon_key: String,
    service_role_key: Option<String>,
}

impl fmt::Debug for SupabaseStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseStorage")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url)
            .field("anon_key", &"<redacted>")
            .field("service_role_key", &self.service_role_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl SupabaseStorage {
    pub fn new(settings: &BackendSettings) -> Result<Self> {
        let (Some(url), Some(anon_key)) = (settings.url.as_ref(), settings.anon_key.as_ref()) else {
            return Err(Error::Config(
                "Supabase is not configured. Set NEXT_PUBLIC_SUPABASE_URL and NEXT_PUBLIC_SUPABASE_ANON_KEY."
                    .to_string(),
            ));
        };
        url::Url::parse(url).map_err(|e| Error::Config(format!("Invalid Supabase URL {}: {}", url, e)))?;

        Ok(Self {
            client: Client::new(),
            base_url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.clone(),
            service_role_key: settings.service_role_key.clone(),
        })
    }

    fn table(&self, name: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, name)
    }

    fn authorized(&self, request: RequestBuilder, key: &str) -> RequestBuilder {
        request
            .header("apikey", key)
            .header("Authorization", format!("Bearer {}", key))
    }

    fn admin_key(&self, action: &str) -> Result<&str> {
        self.service_role_key.as_deref().ok_or_else(|| {
            Error::Config(format!(
                "Supabase admin (service role) is not configured. Set SUPABASE_SERVICE_ROLE_KEY for admin {}.",
                action
            ))
        })
    }

    async fn select(&self, query: &[(&str, String)]) -> Result<Vec<Article>> {
        let request = self
            .client
            .get(self.table("articles"))
            .query(&[("select", "*")])
            .query(query);
        let response = self.authorized(request, &self.anon_key).send().await?;
        let rows: Vec<ArticleRow> = Self::check(response).await?.json().await?;
        Ok(rows.into_iter().map(Article::from).collect())
    }

    async fn write(&self, request: RequestBuilder, key: &str) -> Result<Option<Article>> {
        let response = self
            .authorized(request, key)
            .header("Prefer", "return=representation")
            .send()
            .await?;
        let rows: Vec<ArticleRow> = Self::check(response).await?.json().await?;
        Ok(rows.into_iter().next().map(Article::from))
    }

    /// Turns an error status into a typed error.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        let Ok(err) = serde_json::from_str::<PostgrestError>(&text) else {
            return Err(Error::from_backend_message(format!("HTTP {}: {}", status, text)));
        };
        let message = err.message.unwrap_or_else(|| format!("HTTP {}", status));
        if err.code.as_deref() == Some(UNIQUE_VIOLATION) {
            let details = err.details.unwrap_or_default();
            let field = if format!("{} {}", message, details).to_lowercase().contains("slug") {
                "slug"
            } else {
                "unknown"
            };
            return Err(Error::DuplicateKey {
                field: field.to_string(),
                message,
            });
        }
        Err(Error::from_backend_message(message))
    }
}

#[async_trait]
impl ArticleStorage for SupabaseStorage {
    async fn create_article(&self, input: &ArticleInput) -> Result<Article> {
        let key = self.admin_key("create")?;
        let request = self.client.post(self.table("articles")).json(&WriteRow::insert(input));
        self.write(request, key)
            .await?
            .ok_or_else(|| Error::Database("Insert returned no row.".to_string()))
    }

    async fn update_article(&self, id: &str, input: &ArticleInput) -> Result<Article> {
        let key = self.admin_key("update")?;
        let request = self
            .client
            .patch(self.table("articles"))
            .query(&[("id", format!("eq.{}", id))])
            .json(&WriteRow::update(input));
        self.write(request, key)
            .await?
            .ok_or_else(|| Error::NotFound("No row was updated. The article may not exist.".to_string()))
    }

    async fn get_article_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        let normalized = slug.trim().to_lowercase();
        let rows = self
            .select(&[("slug", format!("ilike.{}", normalized)), ("limit", "1".to_string())])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn get_article_by_id(&self, id: &str) -> Result<Option<Article>> {
        let rows = self.select(&[("id", format!("eq.{}", id)), ("limit", "1".to_string())]).await?;
        Ok(rows.into_iter().next())
    }

    async fn get_all_articles(&self) -> Result<Vec<Article>> {
        self.select(&[("order", "published_at.desc".to_string())]).await
    }

    async fn get_articles_by_category(
        &self,
        category_slug: &str,
        query: &CategoryQuery,
    ) -> Result<Vec<Article>> {
        let limit = query.limit();
        let mut params = vec![
            ("category_slug", format!("ilike.{}", category_slug.trim().to_lowercase())),
            ("order", "published_at.desc".to_string()),
            ("limit", (limit + usize::from(query.exclude_id.is_some())).to_string()),
        ];
        if let Some(id) = &query.exclude_id {
            params.push(("id", format!("neq.{}", id)));
        }
        let mut rows = self.select(&params).await?;
        rows.truncate(limit);
        Ok(rows)
    }

    async fn get_categories(&self) -> Result<Vec<CategoryInfo>> {
        let request = self
            .client
            .get(self.table("categories"))
            .query(&[("select", "slug,name"), ("order", "slug")]);
        let response = self.authorized(request, &self.anon_key).send().await?;
        let rows: Vec<CategoryRow> = Self::check(response).await?.json().await?;
        if rows.is_empty() {
            return Ok(canonical_categories());
        }
        Ok(rows
            .into_iter()
            .map(|r| CategoryInfo { name: r.name, slug: r.slug })
            .collect())
    }
}
