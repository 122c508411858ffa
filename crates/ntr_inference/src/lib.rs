pub mod generation;
pub mod images;
pub mod models;
pub mod parser;
pub mod prompts;
pub mod trending;

pub use generation::ArticleGenerator;
pub use images::PixabaySearch;
pub use models::{create_model, OpenRouterModel};
pub use trending::TrendingTopics;

pub mod prelude {
    pub use super::generation::ArticleGenerator;
    pub use super::models::create_model;
    pub use super::trending::TrendingTopics;
    pub use ntr_core::{Error, GeneratedArticleData, Result};
}
