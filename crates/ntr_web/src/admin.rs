use axum::extract::{Path, State};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use ntr_core::{Article, ArticleInput, Error};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::{self, NOT_CONFIGURED_MESSAGE};
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
}

fn require_admin(state: &AppState, jar: &CookieJar, message: &str) -> ApiResult<()> {
    if auth::is_admin(jar, state.config.admin.as_ref()) {
        Ok(())
    } else {
        Err(Error::Unauthorized(message.to_string()).into())
    }
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<Value>)> {
    let admin = state
        .config
        .admin
        .as_ref()
        .ok_or_else(|| Error::Config(NOT_CONFIGURED_MESSAGE.to_string()))?;

    if !auth::credentials_match(admin, &request.email, &request.password) {
        return Err(Error::Unauthorized("Invalid email or password.".to_string()).into());
    }

    let token = auth::create_session_token(&admin.email, &admin.password, Utc::now())?;
    info!("Admin {} signed in", admin.email);
    let cookie = auth::session_cookie(token, state.config.secure_cookies)?;
    Ok((jar.add(cookie), Json(json!({ "ok": true }))))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Value>) {
    (auth::clear_session(jar), Json(json!({ "ok": true })))
}

pub async fn list_articles(State(state): State<AppState>, jar: CookieJar) -> ApiResult<Json<Vec<Article>>> {
    require_admin(&state, &jar, "You must be logged in to view articles.")?;
    Ok(Json(state.storage.get_all_articles().await?))
}

pub async fn create_article(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<ArticleInput>,
) -> ApiResult<Json<Value>> {
    require_admin(&state, &jar, "You must be logged in to create articles.")?;
    let input = input.normalized();
    input.validate()?;

    let article = state.storage.create_article(&input).await?;
    info!("Admin created article {}", article.slug);
    Ok(Json(json!({
        "ok": true,
        "message": format!("Article \"{}\" created. View: /article/{}", article.title, article.slug),
        "article": article,
    })))
}

pub async fn update_article(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
    Json(input): Json<ArticleInput>,
) -> ApiResult<Json<Value>> {
    require_admin(&state, &jar, "You must be logged in to update articles.")?;
    if state.storage.get_article_by_id(&id).await?.is_none() {
        return Err(Error::NotFound("Article not found.".to_string()).into());
    }
    let input = input.normalized();
    input.validate()?;

    let article = state.storage.update_article(&id, &input).await?;
    info!("Admin updated article {}", article.slug);
    Ok(Json(json!({
        "ok": true,
        "message": format!("Article \"{}\" updated.", article.title),
        "article": article,
    })))
}

pub async fn generate_article(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<GenerateRequest>,
) -> ApiResult<Json<Value>> {
    let authenticated = auth::is_admin(&jar, state.config.admin.as_ref());
    let data = state.generator.generate(authenticated, &request.prompt).await?;
    Ok(Json(json!({ "ok": true, "data": data })))
}
