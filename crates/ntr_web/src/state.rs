use ntr_core::{AppConfig, ArticleStorage};
use ntr_inference::ArticleGenerator;
use ntr_publisher::BatchPublisher;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn ArticleStorage>,
    pub generator: Arc<ArticleGenerator>,
    pub publisher: Arc<BatchPublisher>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wires the generator and batch publisher from `config`.
    pub fn new(config: AppConfig, storage: Arc<dyn ArticleStorage>) -> Self {
        let generator = Arc::new(ArticleGenerator::from_config(&config.generation));
        Self::with_generator(config, storage, generator)
    }

    pub fn with_generator(
        config: AppConfig,
        storage: Arc<dyn ArticleStorage>,
        generator: Arc<ArticleGenerator>,
    ) -> Self {
        let publisher = Arc::new(BatchPublisher::new(generator.clone(), storage.clone()));
        Self {
            storage,
            generator,
            publisher,
            config: Arc::new(config),
        }
    }
}
