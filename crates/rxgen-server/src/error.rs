use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use rxgen_core::StorageError;
use rxgen_llm::LLMError;
use serde::Serialize;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// Request-level failures. Server-side variants render a fixed message;
/// their source is only written to the log.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Configuration(String),

    #[error("Failed to generate regex")]
    Generation(#[source] LLMError),

    #[error("{context}")]
    Persistence {
        context: &'static str,
        #[source]
        source: StorageError,
    },
}

impl AppError {
    /// Adapter for `map_err` on store calls.
    pub fn persistence(context: &'static str) -> impl FnOnce(StorageError) -> AppError {
        move |source| AppError::Persistence { context, source }
    }
}

impl From<LLMError> for AppError {
    fn from(error: LLMError) -> Self {
        AppError::Generation(error)
    }
}

#[derive(Serialize)]
struct JsonError {
    ok: bool,
    error: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Generation(source) => {
                tracing::error!("{}: {}", self, source);
            }
            AppError::Persistence { context, source } => {
                tracing::error!("{}: {}", context, source);
            }
            AppError::Configuration(message) => {
                tracing::error!("Configuration error: {}", message);
            }
            _ => {}
        }

        HttpResponse::build(self.status_code()).json(JsonError {
            ok: false,
            error: self.to_string(),
        })
    }
}
