//! Reader-side views over the article list: search, pagination, the home
//! feed and the sitemap.

use serde::{Deserialize, Serialize};

use crate::categories::Category;
use crate::types::Article;

pub const ARTICLES_PER_PAGE: usize = 12;
pub const RECOMMENDATION_LIMIT: usize = 3;
const FEATURED_LIMIT: usize = 5;
const LATEST_LIMIT: usize = 6;
const PER_CATEGORY_LIMIT: usize = 3;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
}

impl ArticleQuery {
    /// Requested page; anything unparsable or below one is page one.
    pub fn requested_page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<usize>().ok())
            .unwrap_or(1)
            .max(1)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePage {
    pub articles: Vec<Article>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

pub fn filter_by_category(articles: Vec<Article>, category_slug: &str) -> Vec<Article> {
    let slug = category_slug.trim().to_lowercase();
    if slug.is_empty() {
        return articles;
    }
    articles
        .into_iter()
        .filter(|a| a.category_slug.to_lowercase() == slug)
        .collect()
}

/// Case-insensitive substring match on title, excerpt, author and category.
pub fn filter_by_search(articles: Vec<Article>, query: &str) -> Vec<Article> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return articles;
    }
    articles
        .into_iter()
        .filter(|a| {
            [&a.title, &a.excerpt, &a.author, &a.category]
                .iter()
                .any(|field| field.to_lowercase().contains(&q))
        })
        .collect()
}

/// Applies category, search and page, in that order. The page is clamped to
/// the available range and there is always at least one page.
pub fn paginate(articles: Vec<Article>, query: &ArticleQuery) -> ArticlePage {
    let category = query.category.as_deref().unwrap_or_default();
    let filtered = filter_by_search(
        filter_by_category(articles, category),
        query.q.as_deref().unwrap_or_default(),
    );

    let total = filtered.len();
    let total_pages = total.div_ceil(ARTICLES_PER_PAGE).max(1);
    let page = query.requested_page().min(total_pages);
    let start = (page - 1) * ARTICLES_PER_PAGE;

    ArticlePage {
        articles: filtered.into_iter().skip(start).take(ARTICLES_PER_PAGE).collect(),
        page,
        total_pages,
        total,
        category: Category::ALL
            .into_iter()
            .find(|c| c.slug() == category.trim().to_lowercase())
            .map(|c| c.name().to_string()),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySection {
    pub name: String,
    pub slug: String,
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeFeed {
    pub featured: Vec<Article>,
    pub latest: Vec<Article>,
    pub sections: Vec<CategorySection>,
}

/// Expects `articles` newest first.
pub fn home_feed(articles: &[Article]) -> HomeFeed {
    let mut featured: Vec<Article> = articles
        .iter()
        .filter(|a| a.is_featured())
        .take(FEATURED_LIMIT)
        .cloned()
        .collect();
    if featured.is_empty() {
        featured = articles.iter().take(FEATURED_LIMIT).cloned().collect();
    }

    let sections = Category::ALL
        .into_iter()
        .map(|category| {
            let slug = category.slug();
            CategorySection {
                name: category.name().to_string(),
                articles: articles
                    .iter()
                    .filter(|a| a.category_slug.eq_ignore_ascii_case(&slug))
                    .take(PER_CATEGORY_LIMIT)
                    .cloned()
                    .collect(),
                slug,
            }
        })
        .collect();

    HomeFeed {
        featured,
        latest: articles.iter().take(LATEST_LIMIT).cloned().collect(),
        sections,
    }
}

/// Sitemap with the site root, every category listing and every article.
pub fn sitemap_xml(site_url: &str, articles: &[Article]) -> String {
    let base = site_url.trim_end_matches('/');
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    let mut push = |loc: String, freq: &str, priority: &str| {
        xml.push_str(&format!(
            "  <url><loc>{}</loc><changefreq>{}</changefreq><priority>{}</priority></url>\n",
            escape_xml(&loc),
            freq,
            priority
        ));
    };

    push(base.to_string(), "daily", "1.0");
    for category in Category::ALL {
        push(format!("{}/articles?category={}", base, category.slug()), "daily", "0.9");
    }
    for article in articles {
        push(format!("{}/article/{}", base, article.slug), "weekly", "0.8");
    }

    xml.push_str("</urlset>\n");
    xml
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
