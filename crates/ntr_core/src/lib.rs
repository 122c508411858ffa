pub mod categories;
pub mod config;
pub mod error;
pub mod listing;
pub mod models;
pub mod storage;
pub mod types;

pub use categories::{normalize_category, Category};
pub use config::{AdminConfig, AppConfig, BackendSettings, GenerationConfig};
pub use error::{Error, Result};
pub use models::{ChatModel, ImageSearch};
pub use storage::{ArticleStorage, CategoryQuery};
pub use types::{Article, ArticleInput, CategoryInfo, GeneratedArticleData, AUTHOR_NAME};
