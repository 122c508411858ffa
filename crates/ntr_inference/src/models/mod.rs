use ntr_core::config::GenerationConfig;
use ntr_core::ChatModel;
use std::sync::Arc;

pub mod openrouter;

pub use openrouter::OpenRouterModel;

pub fn create_model(config: &GenerationConfig) -> Arc<dyn ChatModel> {
    Arc::new(OpenRouterModel::from_config(config))
}
