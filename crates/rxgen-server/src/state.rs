use std::sync::Arc;

use rxgen_core::QueryStore;
use rxgen_llm::BackendHandle;

use crate::config::AppConfig;
use crate::services::{GenerationService, ProfileService};

pub struct AppState {
    pub generation_service: GenerationService,
    pub profile_service: ProfileService,
}

impl AppState {
    pub fn new(config: &AppConfig, backend: BackendHandle, store: Arc<dyn QueryStore>) -> Self {
        Self {
            generation_service: GenerationService::new(backend, store.clone()),
            profile_service: ProfileService::new(store, config.master_pass.clone()),
        }
    }
}
