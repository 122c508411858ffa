use chrono::{DateTime, Utc};
use ntr_core::{Article, ArticleStorage, Category, Error, Result};
use ntr_inference::prompts::category_article_prompt;
use ntr_inference::ArticleGenerator;
use serde::Serialize;
use std::sync::Arc;

use crate::logging::Logger;

pub const TOPICS_UNAVAILABLE_MESSAGE: &str =
    "Failed to fetch trending topics from AI. Check OPENROUTER_API_KEY and OPENROUTER_MODELS.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryOutcome {
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub ok: bool,
    pub created: usize,
    pub articles: Vec<CategoryOutcome>,
    pub message: String,
}

impl BatchReport {
    fn from_outcomes(articles: Vec<CategoryOutcome>) -> Self {
        let created = articles.iter().filter(|a| a.error.is_none()).count();
        let failed = articles.len() - created;
        let message = if failed == 0 {
            format!("Created {} articles.", created)
        } else {
            format!("Created {} articles; {} failed.", created, failed)
        };
        Self {
            ok: failed == 0,
            created,
            articles,
            message,
        }
    }
}

/// Lower-case base 36, as used for slug suffixes.
pub fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// `slug` with a timestamp suffix that makes a second insert unlikely to clash.
pub fn unique_slug(slug: &str, now: DateTime<Utc>) -> String {
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
    format!("{}-{}", slug, to_base36(millis))
}

/// Writes one fresh article per category from the current trending topics.
pub struct BatchPublisher {
    generator: Arc<ArticleGenerator>,
    storage: Arc<dyn ArticleStorage>,
    logger: Logger,
}

impl BatchPublisher {
    pub fn new(generator: Arc<ArticleGenerator>, storage: Arc<dyn ArticleStorage>) -> Self {
        Self {
            generator,
            storage,
            logger: Logger::new().with_prefix("[trending]".to_string()),
        }
    }

    /// Fails only when topics are unavailable. Per-category failures are
    /// reported in the returned [`BatchReport`].
    pub async fn run(&self) -> Result<BatchReport> {
        let topics = self
            .generator
            .fetch_trending_topics()
            .await
            .ok_or_else(|| Error::Inference(TOPICS_UNAVAILABLE_MESSAGE.to_string()))?;

        let mut outcomes = Vec::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            let logger = self.logger.clone().with_prefix(format!("[{}]", category));
            let Some(topic) = topics.get(category) else {
                outcomes.push(CategoryOutcome {
                    category: category.to_string(),
                    slug: None,
                    error: Some("Missing topic".to_string()),
                });
                continue;
            };

            logger.info(&format!("Generating article about {:?}", topic));
            let outcome = match self.publish_category(category, topic, &logger).await {
                Ok(article) => {
                    logger.info(&format!("Saved {}", article.slug));
                    CategoryOutcome {
                        category: category.to_string(),
                        slug: Some(article.slug),
                        error: None,
                    }
                }
                Err(e) => {
                    logger.error(&format!("Failed: {}", e));
                    CategoryOutcome {
                        category: category.to_string(),
                        slug: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            outcomes.push(outcome);
        }

        let report = BatchReport::from_outcomes(outcomes);
        self.logger.info(&report.message);
        Ok(report)
    }

    async fn publish_category(&self, category: Category, topic: &str, logger: &Logger) -> Result<Article> {
        let prompt = category_article_prompt(category, topic);
        let data = self.generator.generate_internal(&prompt).await?;

        match self.storage.create_article(&data.to_article_input(&data.slug)).await {
            Err(e) if e.is_duplicate_slug() => {
                let slug = unique_slug(&data.slug, Utc::now());
                logger.warn(&format!("Slug {} is taken, retrying as {}", data.slug, slug));
                self.storage.create_article(&data.to_article_input(&slug)).await
            }
            result => result,
        }
    }
}
