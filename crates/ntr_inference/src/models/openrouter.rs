use async_trait::async_trait;
use ntr_core::config::GenerationConfig;
use ntr_core::ChatModel;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::prompts::SYSTEM_PROMPT;

const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 5120;

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<Message>,
}

#[derive(Deserialize)]
struct Message {
    content: Option<Value>,
}

/// Chat completions through the OpenRouter API.
pub struct OpenRouterModel {
    client: Arc<Client>,
    api_key: Option<String>,
    endpoint: String,
}

impl OpenRouterModel {
    pub fn new(api_key: Option<String>, endpoint: impl Into<String>) -> Self {
        Self {
            client: Arc::new(Client::new()),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(config.api_key.clone(), config.chat_endpoint.clone())
    }
}

impl fmt::Debug for OpenRouterModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenRouterModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[async_trait]
impl ChatModel for OpenRouterModel {
    fn name(&self) -> &str {
        "OpenRouter"
    }

    async fn complete(&self, model: &str, prompt: &str, system_prompt: Option<&str>) -> Option<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("OpenRouter [{}] skipped: OPENROUTER_API_KEY is not set", model);
            return None;
        };

        let request = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt.unwrap_or(SYSTEM_PROMPT),
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        debug!("OpenRouter [{}] request to {}", model, self.endpoint);
        let response = match self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("OpenRouter [{}] request failed: {}", model, e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("OpenRouter [{}] error: {} {}", model, status, body);
            return None;
        }

        let data: ChatResponse = match response.json().await {
            Ok(data) => data,
            Err(e) => {
                error!("OpenRouter [{}] returned an unreadable body ({}): {}", model, status, e);
                return None;
            }
        };

        let content = data
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content);
        match content {
            Some(Value::String(text)) => Some(text),
            _ => {
                error!("OpenRouter [{}] returned no text content ({})", model, status);
                None
            }
        }
    }
}
