use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(String),

    /// A write collided with a uniqueness constraint on `field`.
    #[error("{message}")]
    DuplicateKey { field: String, message: String },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Inference(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    pub fn duplicate_slug(message: impl Into<String>) -> Self {
        Self::DuplicateKey {
            field: "slug".to_string(),
            message: message.into(),
        }
    }

    pub fn is_duplicate_slug(&self) -> bool {
        matches!(self, Self::DuplicateKey { field, .. } if field == "slug")
    }

    /// Classifies an untyped backend error message. Backends that report a
    /// structured error code should map it themselves; this is the last resort
    /// for plain text that mentions a unique slug constraint.
    pub fn from_backend_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        if lower.contains("unique") && lower.contains("slug") {
            Self::duplicate_slug(message)
        } else {
            Self::Database(message)
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
