//! Core of the regex generator: data model, prompt construction, reply
//! extraction and the query-history store.

pub mod extract;
pub mod prompt;
pub mod storage;
pub mod types;

pub use extract::{extract_response, find_json_block};
pub use prompt::{build_prompt, SYSTEM_PROMPT};
pub use storage::{QueryStore, SqliteStore, StorageError, StorageResult};
pub use types::{
    resolve_language, ExtractedResult, NewQueryLog, Profile, QueryLog, DEFAULT_LANGUAGE,
};
