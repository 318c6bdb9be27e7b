use std::sync::Arc;

use rxgen_core::{Profile, QueryLog, QueryStore, StorageError};

use crate::error::{AppError, Result};

/// Profile creation and per-profile log administration.
pub struct ProfileService {
    store: Arc<dyn QueryStore>,
    master_pass: Option<String>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn QueryStore>, master_pass: Option<String>) -> Self {
        Self { store, master_pass }
    }

    /// Create a profile after checking the shared secret.
    ///
    /// The name is trimmed. Checks run in order: name present, secret
    /// configured, secret matches, name free.
    pub async fn create_profile(&self, name: Option<&str>, master: Option<&str>) -> Result<Profile> {
        let name = name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| AppError::Validation("name is required".to_string()))?;

        let expected = self
            .master_pass
            .as_deref()
            .ok_or_else(|| AppError::Configuration("MASTER_PASS not configured".to_string()))?;

        if master != Some(expected) {
            tracing::warn!("Rejected profile creation for '{}': bad master password", name);
            return Err(AppError::Auth("Invalid master password".to_string()));
        }

        let existing = self
            .store
            .find_profile(name)
            .await
            .map_err(AppError::persistence("Failed to create profile"))?;
        if existing.is_some() {
            return Err(profile_exists());
        }

        match self.store.create_profile(name).await {
            Ok(profile) => {
                tracing::info!("Created profile '{}'", profile.name);
                Ok(profile)
            }
            Err(StorageError::Duplicate(_)) => Err(profile_exists()),
            Err(e) => Err(AppError::persistence("Failed to create profile")(e)),
        }
    }

    pub async fn list_profiles(&self) -> Result<Vec<Profile>> {
        self.store
            .list_profiles()
            .await
            .map_err(AppError::persistence("Failed to list profiles"))
    }

    pub async fn list_logs(&self, name: &str) -> Result<Vec<QueryLog>> {
        let profile = self.require_profile(name, "Failed to fetch logs").await?;
        self.store
            .list_logs(&profile.id)
            .await
            .map_err(AppError::persistence("Failed to fetch logs"))
    }

    /// Delete one log owned by the named profile.
    pub async fn delete_log(&self, name: &str, log_id: &str) -> Result<()> {
        let profile = self.require_profile(name, "Failed to delete log").await?;
        let deleted = self
            .store
            .delete_log(&profile.id, log_id)
            .await
            .map_err(AppError::persistence("Failed to delete log"))?;

        if !deleted {
            return Err(AppError::NotFound("Log not found".to_string()));
        }
        tracing::info!("Deleted log {} of profile '{}'", log_id, name);
        Ok(())
    }

    /// Delete every log of the named profile, returning how many went.
    pub async fn delete_logs(&self, name: &str) -> Result<u64> {
        let profile = self.require_profile(name, "Failed to delete logs").await?;
        let deleted = self
            .store
            .delete_logs_for_profile(&profile.id)
            .await
            .map_err(AppError::persistence("Failed to delete logs"))?;

        tracing::info!("Deleted {} logs of profile '{}'", deleted, name);
        Ok(deleted)
    }

    async fn require_profile(&self, name: &str, context: &'static str) -> Result<Profile> {
        self.store
            .find_profile(name)
            .await
            .map_err(AppError::persistence(context))?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
    }
}

fn profile_exists() -> AppError {
    AppError::Conflict("Profile already exists".to_string())
}
