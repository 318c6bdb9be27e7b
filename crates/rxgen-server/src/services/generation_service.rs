//! Generation pipeline: validate, prompt, generate, extract, log.
//!
//! Logging the result is best-effort. Once the backend has answered, a
//! failure to resolve the profile or to write the query log is reported to
//! the operator and never to the caller.

use std::sync::Arc;

use rxgen_core::{
    build_prompt, extract_response, resolve_language, ExtractedResult, NewQueryLog, QueryStore,
};
use rxgen_llm::BackendHandle;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub instruction: Option<String>,
    pub examples: Vec<String>,
    pub language: Option<String>,
    pub profile_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub text: String,
    pub extracted: ExtractedResult,
    /// Id of the stored query log, `None` when logging failed.
    pub log_id: Option<String>,
}

pub struct GenerationService {
    backend: BackendHandle,
    store: Arc<dyn QueryStore>,
}

impl GenerationService {
    pub fn new(backend: BackendHandle, store: Arc<dyn QueryStore>) -> Self {
        Self { backend, store }
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_configured()
    }

    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationOutcome> {
        let instruction = match request.instruction {
            Some(instruction) if !instruction.is_empty() => instruction,
            _ => return Err(AppError::Validation("instruction is required".to_string())),
        };

        let generator = self.backend.generator().ok_or_else(|| {
            AppError::Configuration("GEMINI_API_KEY not configured".to_string())
        })?;

        let language = resolve_language(request.language.as_deref()).to_string();
        let prompt = build_prompt(&instruction, &request.examples, Some(&language));

        let text = generator.generate(&prompt).await?;
        let extracted = extract_response(&text);

        tracing::info!(
            model = generator.model(),
            extracted = extracted.regex.is_some(),
            "Generation completed"
        );

        let profile_id = match request.profile_name.as_deref() {
            Some(name) => self.resolve_profile_id(name).await,
            None => None,
        };

        let log = NewQueryLog {
            instruction,
            examples: request.examples,
            language,
            model: generator.model().to_string(),
            raw_response: text.clone(),
            extracted: extracted.clone(),
            profile_id,
        };

        let log_id = match self.store.insert_log(log).await {
            Ok(stored) => Some(stored.id),
            Err(e) => {
                tracing::warn!("Failed to write query log: {}", e);
                None
            }
        };

        Ok(GenerationOutcome {
            text,
            extracted,
            log_id,
        })
    }

    async fn resolve_profile_id(&self, name: &str) -> Option<String> {
        match self.store.find_profile(name).await {
            Ok(Some(profile)) => Some(profile.id),
            Ok(None) => {
                tracing::debug!("Profile '{}' not found, storing log without profile", name);
                None
            }
            Err(e) => {
                tracing::warn!("Failed to resolve profile '{}': {}", name, e);
                None
            }
        }
    }
}
