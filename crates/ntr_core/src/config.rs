use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::{Error, Result};

pub const DEFAULT_CHAT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_IMAGE_SEARCH_ENDPOINT: &str = "https://pixabay.com/api/";
pub const DEFAULT_SITE_URL: &str = "https://ntr.example.com";

/// Settings for the article generation pipeline.
#[derive(Clone, Default)]
pub struct GenerationConfig {
    /// Tried in this order.
    pub models: Vec<String>,
    pub api_key: Option<String>,
    pub image_search_key: Option<String>,
    pub chat_endpoint: String,
    pub image_search_endpoint: String,
}

impl GenerationConfig {
    pub fn new(models: Vec<String>, api_key: Option<String>) -> Self {
        Self {
            models,
            api_key,
            image_search_key: None,
            chat_endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
            image_search_endpoint: DEFAULT_IMAGE_SEARCH_ENDPOINT.to_string(),
        }
    }

    pub fn with_image_search_key(mut self, key: Option<String>) -> Self {
        self.image_search_key = key;
        self
    }
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("models", &self.models)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("image_search_key", &self.image_search_key.as_deref().map(|_| "<redacted>"))
            .field("chat_endpoint", &self.chat_endpoint)
            .field("image_search_endpoint", &self.image_search_endpoint)
            .finish()
    }
}

/// Comma separated model ids, trimmed, blanks dropped.
pub fn parse_models(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}

/// `1`, `true`, `yes` or `on`, any case.
pub fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[derive(Clone)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminConfig")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Connection details for the hosted database.
#[derive(Clone, Default)]
pub struct BackendSettings {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub service_role_key: Option<String>,
}

impl BackendSettings {
    pub fn is_configured(&self) -> bool {
        self.url.is_some() && self.anon_key.is_some()
    }
}

impl fmt::Debug for BackendSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendSettings")
            .field("url", &self.url)
            .field("anon_key", &self.anon_key.as_deref().map(|_| "<redacted>"))
            .field("service_role_key", &self.service_role_key.as_deref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub generation: GenerationConfig,
    pub admin: Option<AdminConfig>,
    pub backend: BackendSettings,
    pub site_url: String,
    /// Mark the session cookie `Secure`. Enable when served over HTTPS.
    pub secure_cookies: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::new(Vec::new(), None),
            admin: None,
            backend: BackendSettings::default(),
            site_url: DEFAULT_SITE_URL.to_string(),
            secure_cookies: false,
        }
    }
}

impl AppConfig {
    /// Read the process environment once.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load `.env` from the working directory or its parents into the
    /// process environment, then read it. A missing file is not an error.
    pub fn load() -> Self {
        match dotenv::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("Ignoring unreadable .env file: {}", e),
        }
        Self::from_env()
    }

    /// Read a dotenv file without touching the process environment.
    /// Variables already set in the process win over the file.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = read_env_file(path.as_ref())?;
        Ok(Self::layered(&file, |key| std::env::var(key).ok()))
    }

    fn layered<F>(file: &HashMap<String, String>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup(|key| env(key).or_else(|| file.get(key).cloned()))
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| lookup(*key).filter(|v| !v.trim().is_empty()))
        };

        let generation = GenerationConfig {
            models: get(&["OPENROUTER_MODELS"]).map(|raw| parse_models(&raw)).unwrap_or_default(),
            api_key: get(&["OPENROUTER_API_KEY"]),
            image_search_key: get(&["PIXABAY_API_KEY"]),
            chat_endpoint: get(&["OPENROUTER_ENDPOINT"]).unwrap_or_else(|| DEFAULT_CHAT_ENDPOINT.to_string()),
            image_search_endpoint: get(&["PIXABAY_ENDPOINT"])
                .unwrap_or_else(|| DEFAULT_IMAGE_SEARCH_ENDPOINT.to_string()),
        };

        let admin = match (get(&["ADMIN_EMAIL"]), get(&["ADMIN_PASSWORD"])) {
            (Some(email), Some(password)) => Some(AdminConfig {
                email: email.trim().to_string(),
                password,
            }),
            _ => None,
        };

        let backend = BackendSettings {
            url: get(&["NEXT_PUBLIC_SUPABASE_URL", "SUPABASE_URL"]),
            anon_key: get(&["NEXT_PUBLIC_SUPABASE_ANON_KEY", "SUPABASE_ANON_KEY"]),
            service_role_key: get(&["SUPABASE_SERVICE_ROLE_KEY"]),
        };

        Self {
            generation,
            admin,
            backend,
            site_url: get(&["NEXT_PUBLIC_SITE_URL", "SITE_URL"])
                .unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),
            secure_cookies: get(&["SESSION_COOKIE_SECURE"]).is_some_and(|v| parse_flag(&v)),
        }
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let iter = dotenv::from_path_iter(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    iter.map(|item| item.map_err(|e| Error::Config(format!("Invalid line in {}: {}", path.display(), e))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_parse_models() {
        assert_eq!(
            parse_models(" openai/gpt-4o-mini , ,anthropic/claude-3-haiku,"),
            vec!["openai/gpt-4o-mini".to_string(), "anthropic/claude-3-haiku".to_string()]
        );
        assert!(parse_models("  ").is_empty());
    }

    #[test]
    fn test_from_lookup() {
        let config = AppConfig::from_lookup(lookup(&[
            ("OPENROUTER_MODELS", "a/one,b/two"),
            ("OPENROUTER_API_KEY", "sk-test"),
            ("PIXABAY_API_KEY", ""),
            ("ADMIN_EMAIL", " admin@example.com "),
            ("ADMIN_PASSWORD", "hunter2"),
            ("SUPABASE_URL", "https://db.example.com"),
        ]));

        assert_eq!(config.generation.models, vec!["a/one", "b/two"]);
        assert_eq!(config.generation.api_key.as_deref(), Some("sk-test"));
        assert!(config.generation.image_search_key.is_none());
        assert_eq!(config.generation.chat_endpoint, DEFAULT_CHAT_ENDPOINT);
        assert_eq!(config.admin.as_ref().map(|a| a.email.as_str()), Some("admin@example.com"));
        assert!(!config.backend.is_configured());
        assert_eq!(config.site_url, DEFAULT_SITE_URL);
        assert!(!config.secure_cookies);
    }

    #[test]
    fn test_secure_cookie_flag() {
        let config = AppConfig::from_lookup(lookup(&[("SESSION_COOKIE_SECURE", " TRUE ")]));
        assert!(config.secure_cookies);
        let config = AppConfig::from_lookup(lookup(&[("SESSION_COOKIE_SECURE", "0")]));
        assert!(!config.secure_cookies);
    }

    #[test]
    fn test_env_file_values_under_process_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            b"# local secrets\nOPENROUTER_MODELS=a/one,b/two\nOPENROUTER_API_KEY=sk-file\nADMIN_EMAIL=admin@example.com\nADMIN_PASSWORD=\"from file\"\n",
        )
        .unwrap();

        let values = read_env_file(file.path()).unwrap();
        assert_eq!(values.get("ADMIN_PASSWORD").map(String::as_str), Some("from file"));

        let config = AppConfig::layered(&values, lookup(&[("OPENROUTER_API_KEY", "sk-process")]));
        assert_eq!(config.generation.models, vec!["a/one", "b/two"]);
        assert_eq!(config.generation.api_key.as_deref(), Some("sk-process"));
        assert_eq!(config.admin.as_ref().map(|a| a.password.as_str()), Some("from file"));
    }

    #[test]
    fn test_missing_env_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::from_env_file(dir.path().join("absent.env")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_admin_requires_both_values() {
        let config = AppConfig::from_lookup(lookup(&[("ADMIN_EMAIL", "admin@example.com")]));
        assert!(config.admin.is_none());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = GenerationConfig::new(vec!["m".to_string()], Some("sk-secret".to_string()));
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
