use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Empty response: {0}")]
    EmptyResponse(String),
}

pub type Result<T> = std::result::Result<T, LLMError>;

/// A backend that completes a prompt and returns the full reply text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Model identifier sent with every request.
    fn model(&self) -> &str;

    /// Complete the prompt. No retries are attempted.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Generation backend as seen by callers: either ready to use or disabled
/// because no credential was configured.
#[derive(Clone)]
pub enum BackendHandle {
    Configured(Arc<dyn TextGenerator>),
    Unconfigured,
}

impl BackendHandle {
    pub fn configured(generator: impl TextGenerator + 'static) -> Self {
        Self::Configured(Arc::new(generator))
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, Self::Configured(_))
    }

    pub fn generator(&self) -> Option<&Arc<dyn TextGenerator>> {
        match self {
            Self::Configured(generator) => Some(generator),
            Self::Unconfigured => None,
        }
    }
}

impl std::fmt::Debug for BackendHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configured(generator) => f
                .debug_tuple("Configured")
                .field(&generator.model())
                .finish(),
            Self::Unconfigured => f.write_str("Unconfigured"),
        }
    }
}
