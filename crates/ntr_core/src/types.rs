use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::categories::category_slug;
use crate::{Error, Result};

/// Byline used for everything the generation pipeline writes.
pub const AUTHOR_NAME: &str = "ntr";

pub const DEFAULT_IMAGE_ALT: &str = "Article image";
pub const DEFAULT_READ_TIME: &str = "5";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub category: String,
    pub category_slug: String,
    pub author: String,
    pub published_at: DateTime<Utc>,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    /// Minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl Article {
    pub fn is_featured(&self) -> bool {
        self.featured.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub name: String,
    pub slug: String,
}

/// Payload for creating or updating an article. Missing fields deserialize
/// as blank so [`ArticleInput::validate`] can report them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArticleInput {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub category: String,
    #[serde(default)]
    pub category_slug: String,
    pub author: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    pub image: String,
    #[serde(default)]
    pub image_alt: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub read_time: Option<u32>,
    #[serde(default)]
    pub body: Option<String>,
}

impl ArticleInput {
    /// Trimmed copy ready to be written. Blank optional text becomes `None`
    /// and a missing category slug is derived from the category.
    pub fn normalized(&self) -> ArticleInput {
        let category = self.category.trim().to_string();
        let category_slug = match self.category_slug.trim() {
            "" => category_slug(&category),
            slug => slug.to_lowercase(),
        };
        ArticleInput {
            slug: self.slug.trim().to_string(),
            title: self.title.trim().to_string(),
            excerpt: self.excerpt.trim().to_string(),
            category,
            category_slug,
            author: self.author.trim().to_string(),
            published_at: self.published_at,
            image: self.image.trim().to_string(),
            image_alt: non_blank(self.image_alt.as_deref()),
            featured: self.featured,
            read_time: self.read_time,
            body: non_blank(self.body.as_deref()),
        }
    }

    /// Checks the fields an editor must fill in before saving.
    pub fn validate(&self) -> Result<()> {
        let required = [
            &self.slug,
            &self.title,
            &self.excerpt,
            &self.category,
            &self.author,
            &self.image,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(Error::Validation(
                "Missing required fields: slug, title, excerpt, category, author, image.".to_string(),
            ));
        }
        if non_blank(self.body.as_deref()).is_none() {
            return Err(Error::Validation("Article body is required.".to_string()));
        }
        Ok(())
    }

    /// Materializes a stored record from this input.
    pub fn into_article(self, id: String, now: DateTime<Utc>) -> Article {
        let input = self.normalized();
        Article {
            id,
            slug: input.slug,
            title: input.title,
            excerpt: input.excerpt,
            category: input.category,
            category_slug: input.category_slug,
            author: input.author,
            published_at: input.published_at.unwrap_or(now),
            image: input.image,
            image_alt: input.image_alt,
            featured: Some(input.featured),
            read_time: input.read_time,
            body: input.body,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Article produced by the generation pipeline, not yet persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedArticleData {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub body: String,
    pub category: String,
    pub category_slug: String,
    pub author: String,
    pub image: String,
    pub image_alt: String,
    pub read_time: String,
    /// Raw keywords the model suggested, kept for the image lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_keywords: Option<String>,
}

impl GeneratedArticleData {
    pub fn to_article_input(&self, slug: &str) -> ArticleInput {
        ArticleInput {
            slug: slug.to_string(),
            title: self.title.clone(),
            excerpt: self.excerpt.clone(),
            category: self.category.clone(),
            category_slug: self.category_slug.clone(),
            author: self.author.clone(),
            published_at: None,
            image: self.image.clone(),
            image_alt: Some(self.image_alt.clone()),
            featured: false,
            read_time: parse_read_time(&self.read_time),
            body: Some(self.body.clone()),
        }
    }
}

/// Leading integer of a read-time string, e.g. `"7 min"` is 7.
pub fn parse_read_time(value: &str) -> Option<u32> {
    let digits: String = value
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
