use ntr_core::{ArticleStorage, BackendSettings, Error, Result};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

pub mod backends;
pub mod fallback;

pub use backends::*;
pub use fallback::FallbackStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Memory,
    Supabase,
    #[cfg(feature = "sqlite")]
    Sqlite,
}

impl StorageKind {
    pub fn get_error_message(self) -> &'static str {
        match self {
            StorageKind::Memory => "Memory storage should be available",
            StorageKind::Supabase => "Supabase should be reachable at NEXT_PUBLIC_SUPABASE_URL",
            #[cfg(feature = "sqlite")]
            StorageKind::Sqlite => "SQLite database should be available at ./articles.db",
        }
    }
}

impl FromStr for StorageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(StorageKind::Memory),
            "supabase" => Ok(StorageKind::Supabase),
            #[cfg(feature = "sqlite")]
            "sqlite" => Ok(StorageKind::Sqlite),
            other => Err(Error::Config(format!("Unknown storage backend: {}", other))),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageKind::Memory => "memory",
            StorageKind::Supabase => "supabase",
            #[cfg(feature = "sqlite")]
            StorageKind::Sqlite => "sqlite",
        };
        f.write_str(name)
    }
}

/// Build the article store. `backend_url` overrides the configured database
/// URL (or, for SQLite, the database file).
pub async fn create_storage(
    kind: StorageKind,
    settings: &BackendSettings,
    backend_url: Option<&str>,
) -> Result<Arc<dyn ArticleStorage>> {
    match kind {
        StorageKind::Memory => {
            info!("💾 Using in-memory storage with sample articles");
            Ok(Arc::new(MemoryStorage::with_fixtures()))
        }
        StorageKind::Supabase => {
            let mut settings = settings.clone();
            if let Some(url) = backend_url {
                settings.url = Some(url.to_string());
            }
            if !settings.is_configured() {
                warn!("Supabase is not configured, serving sample articles from memory");
                return Ok(Arc::new(MemoryStorage::with_fixtures()));
            }
            let primary = SupabaseStorage::new(&settings)?;
            info!("💾 Using Supabase storage");
            Ok(Arc::new(FallbackStorage::new(Arc::new(primary))))
        }
        #[cfg(feature = "sqlite")]
        StorageKind::Sqlite => {
            let path = std::path::PathBuf::from(backend_url.unwrap_or("articles.db"));
            let storage = SQLiteStorage::new_with_path(&path).await?;
            info!("💾 Using SQLite storage at {}", path.display());
            Ok(Arc::new(storage))
        }
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, FallbackStorage, StorageKind};
}
