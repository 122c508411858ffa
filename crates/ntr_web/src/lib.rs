use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod admin;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/home", get(handlers::home))
        .route("/api/articles", get(handlers::list_articles))
        .route("/api/articles/:slug", get(handlers::get_article))
        .route("/api/categories", get(handlers::list_categories))
        .route(
            "/api/generate-trending-articles",
            get(handlers::generate_trending_articles).post(handlers::generate_trending_articles),
        )
        .route("/api/admin/login", post(admin::login))
        .route("/api/admin/logout", post(admin::logout))
        .route(
            "/api/admin/articles",
            get(admin::list_articles).post(admin::create_article),
        )
        .route("/api/admin/articles/:id", put(admin::update_article))
        .route("/api/admin/generate", post(admin::generate_article))
        .route("/sitemap.xml", get(handlers::sitemap))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub mod prelude {
    pub use crate::{create_app, AppState};
    pub use ntr_core::{Article, Error, Result};
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::Response;
    use ntr_core::{AdminConfig, AppConfig, ArticleStorage, ChatModel, GenerationConfig};
    use ntr_inference::ArticleGenerator;
    use ntr_storage::MemoryStorage;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    const TOPICS: &str = r#"{"Movies":"A space epic","TV":"The finale","Gaming":"A handheld","Tech":"New chips","Culture":"Festival season"}"#;
    const ARTICLE: &str = r#"{"slug":"fresh-take","title":"A Fresh Take","excerpt":"Short.","body":"One.\n\nTwo.","category":"Tech","readTime":"3"}"#;

    /// Topics for the trending prompt. Batch prompts get an article filed
    /// under the requested category, anything else gets [`ARTICLE`].
    struct CannedModel {
        topics: Option<&'static str>,
    }

    #[async_trait]
    impl ChatModel for CannedModel {
        fn name(&self) -> &str {
            "canned"
        }

        async fn complete(&self, _model: &str, prompt: &str, system_prompt: Option<&str>) -> Option<String> {
            if system_prompt.is_some() {
                return self.topics.map(str::to_string);
            }
            let batch_category = ntr_core::Category::ALL
                .into_iter()
                .find(|c| prompt.contains(&format!("Category is {}.", c.name())));
            Some(match batch_category {
                Some(category) => ARTICLE
                    .replace("fresh-take", &format!("{}-take", category.slug()))
                    .replace("\"Tech\"", &format!("\"{}\"", category.name())),
                None => ARTICLE.to_string(),
            })
        }
    }

    fn config() -> AppConfig {
        AppConfig {
            generation: GenerationConfig::new(vec!["m".to_string()], Some("key".to_string())),
            admin: Some(AdminConfig {
                email: "admin@example.com".to_string(),
                password: "hunter2".to_string(),
            }),
            site_url: "https://ntr.test".to_string(),
            ..AppConfig::default()
        }
    }

    fn app_with(storage: Arc<dyn ArticleStorage>, config: AppConfig, topics: Option<&'static str>) -> Router {
        let generator = Arc::new(ArticleGenerator::new(
            &config.generation,
            Arc::new(CannedModel { topics }),
            None,
        ));
        create_app(AppState::with_generator(config, storage, generator))
    }

    fn app() -> Router {
        app_with(Arc::new(MemoryStorage::with_fixtures()), config(), Some(TOPICS))
    }

    fn request(method: Method, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn login(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/admin/login",
                None,
                Some(json!({"email": " admin@example.com ", "password": "hunter2"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
        assert!(set_cookie.contains("HttpOnly"));
        assert!(!set_cookie.contains("Secure"));
        set_cookie.split(';').next().unwrap().to_string()
    }

    fn new_article(slug: &str) -> Value {
        json!({
            "slug": slug,
            "title": "Handmade",
            "excerpt": "Written by hand.",
            "category": "Culture",
            "author": "Riley Park",
            "image": "https://picsum.photos/800/450",
            "body": "Words.\n\nMore words."
        })
    }

    #[tokio::test]
    async fn test_home_feed() {
        let response = app().oneshot(request(Method::GET, "/api/home", None, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["featured"].as_array().unwrap().len(), 4);
        assert_eq!(body["latest"].as_array().unwrap().len(), 6);
        assert_eq!(body["sections"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_list_articles_filters_and_paginates() {
        let response = app()
            .oneshot(request(Method::GET, "/api/articles?category=gaming&page=9", None, None))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["total"], 4);
        assert_eq!(body["page"], 1);
        assert_eq!(body["totalPages"], 1);
        assert_eq!(body["category"], "Gaming");

        let response = app()
            .oneshot(request(Method::GET, "/api/articles?q=NINTENDO", None, None))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["articles"][0]["slug"], "nintendo-next-console-leaks");
    }

    #[tokio::test]
    async fn test_article_detail_with_recommendations() {
        let response = app()
            .oneshot(request(Method::GET, "/api/articles/marvel-phase-six-rumors", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["article"]["category"], "Movies");
        let recommendations = body["recommendations"].as_array().unwrap();
        assert_eq!(recommendations.len(), 3);
        assert!(recommendations.iter().all(|a| a["slug"] != "marvel-phase-six-rumors"));

        let response = app()
            .oneshot(request(Method::GET, "/api/articles/nope", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "Article not found.");
    }

    #[tokio::test]
    async fn test_sitemap() {
        let response = app().oneshot(request(Method::GET, "/sitemap.xml", None, None)).await.unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/xml");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let xml = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(xml.contains("<loc>https://ntr.test/article/festival-season-preview</loc>"));
        assert!(xml.contains("<loc>https://ntr.test/articles?category=tv</loc>"));
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let response = app()
            .oneshot(request(
                Method::POST,
                "/api/admin/login",
                None,
                Some(json!({"email": "admin@example.com", "password": "wrong"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body, json!({"ok": false, "error": "Invalid email or password."}));
    }

    #[tokio::test]
    async fn test_login_sets_secure_cookie_when_configured() {
        let config = AppConfig {
            secure_cookies: true,
            ..config()
        };
        let app = app_with(Arc::new(MemoryStorage::new()), config, None);
        let response = app
            .oneshot(request(
                Method::POST,
                "/api/admin/login",
                None,
                Some(json!({"email": "admin@example.com", "password": "hunter2"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.contains("Secure"));
    }

    #[tokio::test]
    async fn test_login_without_admin_config() {
        let config = AppConfig {
            admin: None,
            ..config()
        };
        let app = app_with(Arc::new(MemoryStorage::new()), config, None);
        let response = app
            .oneshot(request(
                Method::POST,
                "/api/admin/login",
                None,
                Some(json!({"email": "a", "password": "b"})),
            ))
            .await
            .unwrap();
        assert_eq!(
            json_body(response).await["error"],
            "Admin login is not configured (missing ADMIN_EMAIL/ADMIN_PASSWORD)."
        );
    }

    #[tokio::test]
    async fn test_admin_create_and_update() {
        let app = app();
        let response = app
            .clone()
            .oneshot(request(Method::POST, "/api/admin/articles", None, Some(new_article("handmade"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            json_body(response).await["error"],
            "You must be logged in to create articles."
        );

        let cookie = login(&app).await;
        let response = app
            .clone()
            .oneshot(request(Method::POST, "/api/admin/articles", Some(&cookie), Some(new_article("handmade"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["article"]["categorySlug"], "culture");
        let id = body["article"]["id"].as_str().unwrap().to_string();

        let mut changed = new_article("handmade-2");
        changed["title"] = json!("Handmade, Revised");
        let response = app
            .clone()
            .oneshot(request(Method::PUT, &format!("/api/admin/articles/{}", id), Some(&cookie), Some(changed)))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["message"], "Article \"Handmade, Revised\" updated.");

        let response = app
            .clone()
            .oneshot(request(Method::PUT, "/api/admin/articles/missing", Some(&cookie), Some(new_article("x"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "Article not found.");
    }

    #[tokio::test]
    async fn test_admin_create_validates_and_reports_duplicates() {
        let app = app();
        let cookie = login(&app).await;

        let mut missing_body = new_article("no-body");
        missing_body["body"] = json!("  ");
        let response = app
            .clone()
            .oneshot(request(Method::POST, "/api/admin/articles", Some(&cookie), Some(missing_body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Article body is required.");

        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/admin/articles",
                Some(&cookie),
                Some(json!({"slug": "only-a-slug"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"],
            "Missing required fields: slug, title, excerpt, category, author, image."
        );

        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/admin/articles",
                Some(&cookie),
                Some(new_article("retro-gaming-comeback")),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_admin_generate() {
        let app = app();
        let response = app
            .clone()
            .oneshot(request(Method::POST, "/api/admin/generate", None, Some(json!({"prompt": "x"}))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let cookie = login(&app).await;
        let response = app
            .clone()
            .oneshot(request(Method::POST, "/api/admin/generate", Some(&cookie), Some(json!({"prompt": ""}))))
            .await
            .unwrap();
        assert_eq!(
            json_body(response).await["error"],
            "Please enter a prompt describing the article."
        );

        let response = app
            .oneshot(request(Method::POST, "/api/admin/generate", Some(&cookie), Some(json!({"prompt": "tech"}))))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["data"]["categorySlug"], "tech");
        assert_eq!(body["data"]["author"], "ntr");
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let response = app()
            .oneshot(request(Method::POST, "/api/admin/logout", Some("admin_session=x"), None))
            .await
            .unwrap();
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.starts_with("admin_session="));
        assert!(set_cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_generate_trending_articles() {
        let storage = Arc::new(MemoryStorage::new());
        let app = app_with(storage.clone(), config(), Some(TOPICS));
        let response = app
            .oneshot(request(Method::POST, "/api/generate-trending-articles", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["created"], 5);
        assert_eq!(body["message"], "Created 5 articles.");
        assert_eq!(body["articles"][0]["slug"], "movies-take");
        let saved = storage.get_article_by_slug("tv-take").await.unwrap().unwrap();
        assert_eq!(saved.category, "TV");
        assert_eq!(saved.read_time, Some(3));
    }

    #[tokio::test]
    async fn test_generate_trending_articles_without_topics() {
        let app = app_with(Arc::new(MemoryStorage::new()), config(), None);
        let response = app
            .oneshot(request(Method::GET, "/api/generate-trending-articles", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            json_body(response).await,
            json!({"error": "Failed to fetch trending topics from AI. Check OPENROUTER_API_KEY and OPENROUTER_MODELS."})
        );
    }
}
