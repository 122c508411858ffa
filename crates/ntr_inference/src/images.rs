use async_trait::async_trait;
use ntr_core::config::GenerationConfig;
use ntr_core::ImageSearch;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, warn};
use url::Url;

const MAX_QUERY_CHARS: usize = 100;
const RESULTS_PER_PAGE: &str = "3";

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Deserialize)]
struct Hit {
    #[serde(rename = "largeImageURL")]
    large_image_url: Option<String>,
    #[serde(rename = "webformatURL")]
    webformat_url: Option<String>,
}

/// Single-line search query from comma separated keywords.
pub fn build_query(keywords: &str) -> String {
    let query = keywords
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    query.chars().take(MAX_QUERY_CHARS).collect::<String>().trim_end().to_string()
}

/// Photo lookup against the Pixabay search API.
pub struct PixabaySearch {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl PixabaySearch {
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    /// `None` when no search key is configured.
    pub fn from_config(config: &GenerationConfig) -> Option<Self> {
        config
            .image_search_key
            .as_ref()
            .map(|key| Self::new(key.clone(), config.image_search_endpoint.clone()))
    }
}

impl fmt::Debug for PixabaySearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixabaySearch")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[async_trait]
impl ImageSearch for PixabaySearch {
    async fn find_image(&self, keywords: &str) -> Option<String> {
        let query = build_query(keywords);
        if query.is_empty() {
            return None;
        }

        let url = match Url::parse_with_params(
            &self.endpoint,
            &[
                ("key", self.api_key.as_str()),
                ("q", query.as_str()),
                ("per_page", RESULTS_PER_PAGE),
            ],
        ) {
            Ok(url) => url,
            Err(e) => {
                warn!("Pixabay endpoint is invalid: {}", e);
                return None;
            }
        };

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Pixabay request failed for {:?}: {}", query, e);
                return None;
            }
        };
        if !response.status().is_success() {
            warn!("Pixabay returned {} for {:?}", response.status(), query);
            return None;
        }

        let data: SearchResponse = match response.json().await {
            Ok(data) => data,
            Err(e) => {
                warn!("Pixabay returned an unreadable body: {}", e);
                return None;
            }
        };
        let hit = data.hits.into_iter().next()?;
        let image = hit
            .large_image_url
            .filter(|u| !u.is_empty())
            .or(hit.webformat_url.filter(|u| !u.is_empty()));
        debug!("Pixabay image for {:?}: {:?}", query, image);
        image
    }
}
