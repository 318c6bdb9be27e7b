pub mod protocol;
pub mod provider;
pub mod providers;

pub use provider::{BackendHandle, LLMError, Result, TextGenerator};
pub use providers::gemini::{GeminiProvider, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
