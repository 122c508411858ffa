use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ntr_core::storage::canonical_categories;
use ntr_core::{Article, ArticleInput, ArticleStorage, CategoryInfo, CategoryQuery, Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::Row;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id TEXT PRIMARY KEY,
        slug TEXT NOT NULL UNIQUE COLLATE NOCASE,
        title TEXT NOT NULL,
        excerpt TEXT NOT NULL,
        category TEXT NOT NULL,
        category_slug TEXT NOT NULL,
        author TEXT NOT NULL,
        published_at TEXT NOT NULL,
        image TEXT NOT NULL,
        image_alt TEXT,
        featured INTEGER NOT NULL DEFAULT 0,
        read_time INTEGER,
        body TEXT,
        updated_at TEXT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS articles_category_slug_idx ON articles (category_slug)",
];

pub struct SQLiteStorage {
    pool: SqlitePool,
    db_path: PathBuf,
}

impl SQLiteStorage {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))
            .map_err(|e| Error::Database(format!("Invalid database path: {}", e)))?
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| Error::Database(format!("Failed to connect to database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Database(format!("Failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self {
            pool,
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    async fn fetch(&self, sql: &str, binds: &[String]) -> Result<Vec<Article>> {
        let mut query = sqlx::query(sql);
        for bind in binds {
            query = query.bind(bind);
        }
        let rows = query.fetch_all(&self.pool).await.map_err(map_error)?;
        rows.iter().map(row_to_article).collect()
    }
}

fn map_error(err: sqlx::Error) -> Error {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            Error::from_backend_message(db.message().to_string())
        }
        _ => Error::Database(err.to_string()),
    }
}

fn row_to_article(row: &SqliteRow) -> Result<Article> {
    let published_at: String = row.get("published_at");
    let published_at = DateTime::parse_from_rfc3339(&published_at)
        .map_err(|e| Error::Database(format!("Failed to parse date: {}", e)))?
        .with_timezone(&Utc);
    let featured: i64 = row.get("featured");
    let read_time: Option<i64> = row.get("read_time");

    Ok(Article {
        id: row.get("id"),
        slug: row.get("slug"),
        title: row.get("title"),
        excerpt: row.get("excerpt"),
        category: row.get("category"),
        category_slug: row.get("category_slug"),
        author: row.get("author"),
        published_at,
        image: row.get("image"),
        image_alt: row.get("image_alt"),
        featured: Some(featured != 0),
        read_time: read_time.and_then(|t| u32::try_from(t).ok()),
        body: row.get("body"),
    })
}

#[async_trait]
impl ArticleStorage for SQLiteStorage {
    async fn create_article(&self, input: &ArticleInput) -> Result<Article> {
        let article = input
            .clone()
            .into_article(uuid::Uuid::new_v4().to_string(), Utc::now());

        sqlx::query(
            r#"
            INSERT INTO articles
            (id, slug, title, excerpt, category, category_slug, author, published_at, image, image_alt, featured, read_time, body)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&article.id)
        .bind(&article.slug)
        .bind(&article.title)
        .bind(&article.excerpt)
        .bind(&article.category)
        .bind(&article.category_slug)
        .bind(&article.author)
        .bind(article.published_at.to_rfc3339())
        .bind(&article.image)
        .bind(article.image_alt.as_deref())
        .bind(article.is_featured())
        .bind(article.read_time.map(i64::from))
        .bind(article.body.as_deref())
        .execute(&self.pool)
        .await
        .map_err(map_error)?;

        Ok(article)
    }

    async fn update_article(&self, id: &str, input: &ArticleInput) -> Result<Article> {
        let input = input.normalized();
        let result = sqlx::query(
            r#"
            UPDATE articles SET
                slug = ?, title = ?, excerpt = ?, category = ?, category_slug = ?, author = ?,
                image = ?, image_alt = ?, featured = ?, read_time = ?, body = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.slug)
        .bind(&input.title)
        .bind(&input.excerpt)
        .bind(&input.category)
        .bind(&input.category_slug)
        .bind(&input.author)
        .bind(&input.image)
        .bind(input.image_alt.as_deref())
        .bind(input.featured)
        .bind(input.read_time.map(i64::from))
        .bind(input.body.as_deref())
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_error)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("No row was updated. The article may not exist.".to_string()));
        }
        self.get_article_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound("No row was updated. The article may not exist.".to_string()))
    }

    async fn get_article_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        let rows = self
            .fetch("SELECT * FROM articles WHERE slug = ? COLLATE NOCASE LIMIT 1", &[slug.trim().to_string()])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn get_article_by_id(&self, id: &str) -> Result<Option<Article>> {
        let rows = self
            .fetch("SELECT * FROM articles WHERE id = ? LIMIT 1", &[id.to_string()])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn get_all_articles(&self) -> Result<Vec<Article>> {
        self.fetch("SELECT * FROM articles ORDER BY published_at DESC", &[]).await
    }

    async fn get_articles_by_category(
        &self,
        category_slug: &str,
        query: &CategoryQuery,
    ) -> Result<Vec<Article>> {
        let rows = self
            .fetch(
                r#"
                SELECT * FROM articles
                WHERE category_slug = ? COLLATE NOCASE AND id != ?
                ORDER BY published_at DESC
                LIMIT ?
                "#,
                &[
                    category_slug.trim().to_lowercase(),
                    query.exclude_id.clone().unwrap_or_default(),
                    query.limit().to_string(),
                ],
            )
            .await?;
        Ok(rows)
    }

    async fn get_categories(&self) -> Result<Vec<CategoryInfo>> {
        Ok(canonical_categories())
    }
}
