use ntr_core::config::GenerationConfig;
use ntr_core::{ChatModel, Error, GeneratedArticleData, ImageSearch, Result};
use std::sync::Arc;
use tracing::{info, warn};

use crate::images::PixabaySearch;
use crate::models::create_model;
use crate::parser::parse_and_validate;

pub const NO_MODELS_MESSAGE: &str = "No OpenRouter models configured. Set OPENROUTER_MODELS in your environment (e.g. openai/gpt-4o-mini,anthropic/claude-3-haiku).";
pub const NO_API_KEY_MESSAGE: &str = "OpenRouter API key is not set (OPENROUTER_API_KEY).";
pub const ALL_MODELS_FAILED_MESSAGE: &str =
    "All models failed. Try again or check your API key and OPENROUTER_MODELS.";
const INVALID_OUTPUT_MESSAGE: &str = "Model returned invalid or incomplete JSON.";

/// Tries each configured model in order until one yields a usable article.
pub struct ArticleGenerator {
    models: Vec<String>,
    has_api_key: bool,
    chat: Arc<dyn ChatModel>,
    images: Option<Arc<dyn ImageSearch>>,
}

impl ArticleGenerator {
    pub fn new(
        config: &GenerationConfig,
        chat: Arc<dyn ChatModel>,
        images: Option<Arc<dyn ImageSearch>>,
    ) -> Self {
        Self {
            models: config.models.clone(),
            has_api_key: config.api_key.as_deref().is_some_and(|k| !k.trim().is_empty()),
            chat,
            images,
        }
    }

    /// OpenRouter for text, Pixabay for photos when a search key is set.
    pub fn from_config(config: &GenerationConfig) -> Self {
        let images = PixabaySearch::from_config(config).map(|s| Arc::new(s) as Arc<dyn ImageSearch>);
        Self::new(config, create_model(config), images)
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub(crate) fn chat(&self) -> &dyn ChatModel {
        self.chat.as_ref()
    }

    /// Whether a model list and API key are both present.
    pub fn is_configured(&self) -> bool {
        self.check_config().is_ok()
    }

    fn check_config(&self) -> Result<()> {
        if self.models.is_empty() {
            return Err(Error::Config(NO_MODELS_MESSAGE.to_string()));
        }
        if !self.has_api_key {
            return Err(Error::Config(NO_API_KEY_MESSAGE.to_string()));
        }
        Ok(())
    }

    /// Entry point for signed-in editors.
    pub async fn generate(&self, authenticated: bool, prompt: &str) -> Result<GeneratedArticleData> {
        if !authenticated {
            return Err(Error::Unauthorized(
                "You must be logged in to use this feature.".to_string(),
            ));
        }
        self.generate_internal(prompt).await
    }

    /// Entry point for trusted server-side jobs. Skips the login check.
    pub async fn generate_internal(&self, prompt: &str) -> Result<GeneratedArticleData> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(Error::Validation(
                "Please enter a prompt describing the article.".to_string(),
            ));
        }
        self.check_config()?;

        let mut last_error: Option<String> = None;
        for model in &self.models {
            let Some(content) = self.chat.complete(model, prompt, None).await else {
                warn!("Model {} failed or returned no content", model);
                last_error = Some(format!("Model {} failed or returned no content.", model));
                continue;
            };

            match parse_and_validate(&content) {
                Some(mut data) => {
                    self.resolve_image(&mut data).await;
                    info!("Generated article {:?} with {}", data.slug, model);
                    return Ok(data);
                }
                None => {
                    warn!("Model {} returned invalid or incomplete JSON", model);
                    last_error = Some(INVALID_OUTPUT_MESSAGE.to_string());
                }
            }
        }

        Err(Error::Inference(
            last_error.unwrap_or_else(|| ALL_MODELS_FAILED_MESSAGE.to_string()),
        ))
    }

    async fn resolve_image(&self, data: &mut GeneratedArticleData) {
        let (Some(images), Some(keywords)) = (&self.images, data.image_keywords.as_deref()) else {
            return;
        };
        if let Some(url) = images.find_image(keywords).await {
            data.image = url;
        }
    }
}
