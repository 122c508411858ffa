use async_trait::async_trait;

/// A hosted chat-completion service that can run many models.
#[async_trait]
pub trait ChatModel: Send + Sync {
    fn name(&self) -> &str;

    /// Run one completion against `model`. Every failure (missing key,
    /// transport error, bad status, unexpected body) comes back as `None`.
    async fn complete(&self, model: &str, prompt: &str, system_prompt: Option<&str>) -> Option<String>;
}

/// Keyword image lookup.
#[async_trait]
pub trait ImageSearch: Send + Sync {
    /// URL of the best match, or `None` when nothing usable was found.
    async fn find_image(&self, keywords: &str) -> Option<String>;
}
