use ntr_core::Category;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::generation::ArticleGenerator;
use crate::parser::parse_json_object;
use crate::prompts::{trending_prompt, TRENDING_SYSTEM_PROMPT};

/// One topic for every canonical category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendingTopics(BTreeMap<Category, String>);

impl TrendingTopics {
    pub fn get(&self, category: Category) -> Option<&str> {
        self.0.get(&category).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &str)> {
        self.0.iter().map(|(c, t)| (*c, t.as_str()))
    }
}

/// Accepts only a mapping with a non-empty topic for all five categories.
pub fn parse_topics(content: &str) -> Option<TrendingTopics> {
    let obj = parse_json_object(content)?;
    let mut topics = BTreeMap::new();
    for category in Category::ALL {
        let topic = obj.get(category.name())?.as_str()?.trim();
        if topic.is_empty() {
            return None;
        }
        topics.insert(category, topic.to_string());
    }
    Some(TrendingTopics(topics))
}

impl ArticleGenerator {
    /// Asks each model in turn for the current topics. `None` means topics
    /// are unavailable, including when no models or key are configured.
    pub async fn fetch_trending_topics(&self) -> Option<TrendingTopics> {
        if !self.is_configured() {
            warn!("Trending topics skipped: OpenRouter is not configured");
            return None;
        }

        let prompt = trending_prompt();
        for model in self.models() {
            let Some(content) = self
                .chat()
                .complete(model, &prompt, Some(TRENDING_SYSTEM_PROMPT))
                .await
            else {
                continue;
            };
            match parse_topics(&content) {
                Some(topics) => {
                    info!("Trending topics from {}: {:?}", model, topics);
                    return Some(topics);
                }
                None => warn!("Model {} returned incomplete trending topics", model),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::tests::{config, ScriptedModel};
    use ntr_core::GenerationConfig;
    use std::sync::Arc;

    const COMPLETE: &str = r#"{"Movies":"A space epic","TV":"The finale","Gaming":"A handheld","Tech":"New chips","Culture":"Festival season"}"#;
    const PARTIAL: &str = r#"{"Movies":"A space epic","TV":"The finale","Gaming":"","Tech":"New chips","Culture":"Festival season"}"#;

    #[test]
    fn test_parse_topics() {
        let topics = parse_topics(&format!("```json\n{}\n```", COMPLETE)).unwrap();
        assert_eq!(topics.get(Category::Tv), Some("The finale"));
        assert_eq!(topics.iter().count(), 5);

        assert!(parse_topics(PARTIAL).is_none());
        assert!(parse_topics(r#"{"Movies":"x"}"#).is_none());
        assert!(parse_topics("no").is_none());
    }

    #[tokio::test]
    async fn test_partial_response_tries_next_model() {
        let chat = Arc::new(ScriptedModel::new(vec![Some(PARTIAL), None, Some(COMPLETE)]));
        let generator = ArticleGenerator::new(&config(&["a", "b", "c"]), chat.clone(), None);

        let topics = generator.fetch_trending_topics().await.unwrap();
        assert_eq!(topics.get(Category::Culture), Some("Festival season"));
        assert_eq!(chat.called_models(), vec!["a", "b", "c"]);

        let calls = chat.calls.lock().unwrap();
        assert!(calls.iter().all(|(_, system)| system.as_deref() == Some(TRENDING_SYSTEM_PROMPT)));
    }

    #[tokio::test]
    async fn test_no_complete_mapping_is_none() {
        let chat = Arc::new(ScriptedModel::new(vec![Some(PARTIAL)]));
        let generator = ArticleGenerator::new(&config(&["a"]), chat, None);
        assert!(generator.fetch_trending_topics().await.is_none());
    }

    #[tokio::test]
    async fn test_unconfigured_makes_no_calls() {
        let chat = Arc::new(ScriptedModel::new(vec![Some(COMPLETE)]));
        let generator = ArticleGenerator::new(&GenerationConfig::new(vec!["a".to_string()], None), chat.clone(), None);
        assert!(generator.fetch_trending_topics().await.is_none());
        assert!(chat.called_models().is_empty());
    }
}
