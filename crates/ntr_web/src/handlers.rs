use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use ntr_core::listing::{self, ArticlePage, ArticleQuery, HomeFeed, RECOMMENDATION_LIMIT};
use ntr_core::{Article, CategoryInfo, CategoryQuery, Error};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ArticleDetail {
    pub article: Article,
    pub recommendations: Vec<Article>,
}

pub async fn home(State(state): State<AppState>) -> ApiResult<Json<HomeFeed>> {
    let articles = state.storage.get_all_articles().await?;
    Ok(Json(listing::home_feed(&articles)))
}

pub async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<ArticleQuery>,
) -> ApiResult<Json<ArticlePage>> {
    let articles = state.storage.get_all_articles().await?;
    Ok(Json(listing::paginate(articles, &query)))
}

pub async fn get_article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<ArticleDetail>> {
    let article = state
        .storage
        .get_article_by_slug(&slug)
        .await?
        .ok_or_else(|| Error::NotFound("Article not found.".to_string()))?;
    let recommendations = state
        .storage
        .get_articles_by_category(
            &article.category_slug,
            &CategoryQuery::excluding(article.id.clone(), RECOMMENDATION_LIMIT),
        )
        .await?;
    Ok(Json(ArticleDetail {
        article,
        recommendations,
    }))
}

pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<CategoryInfo>>> {
    Ok(Json(state.storage.get_categories().await?))
}

pub async fn sitemap(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let articles = state.storage.get_all_articles().await?;
    Ok((
        [(header::CONTENT_TYPE, "application/xml")],
        listing::sitemap_xml(&state.config.site_url, &articles),
    ))
}

/// Runs one trending batch. Responds 502 when no topics could be fetched.
pub async fn generate_trending_articles(State(state): State<AppState>) -> Response {
    match state.publisher.run().await {
        Ok(report) => Json(report).into_response(),
        Err(e) => {
            error!("Trending batch aborted: {}", e);
            (StatusCode::BAD_GATEWAY, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}
