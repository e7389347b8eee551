//! services/api/src/web/state.rs
//!
//! Defines the application's shared state: the single in-memory project,
//! the durable store mirroring it, and the assistant adapters.

use std::sync::Arc;

use skripsi_core::domain::Project;
use skripsi_core::ports::{
    AssistantError, BabGenerationService, ChatAssistantService, OutlineGenerationService,
    ProjectStore,
};
use tokio::sync::RwLock;

use crate::config::Config;

/// The three assistant-gateway adapters, grouped so their presence stands
/// or falls with the configured credential.
pub struct AiAdapters {
    pub outline: Arc<dyn OutlineGenerationService>,
    pub bab: Arc<dyn BabGenerationService>,
    pub chat: Arc<dyn ChatAssistantService>,
}

/// The shared application state, created once at startup and passed to all
/// handlers.
///
/// The project is the single document of this session: mutations happen
/// sequentially under the write lock and every one schedules a debounced
/// save, so the durable slot trails the in-memory state by at most one
/// delay window.
pub struct AppState {
    pub project: RwLock<Project>,
    pub store: Arc<dyn ProjectStore>,
    /// `None` when no credential is configured; every gateway call then
    /// reports the missing-credential error without an upstream request.
    pub ai: Option<AiAdapters>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Returns the adapters or the missing-credential error, checked before
    /// any upstream call is attempted.
    pub fn ai(&self) -> Result<&AiAdapters, AssistantError> {
        self.ai.as_ref().ok_or(AssistantError::MissingCredential)
    }

    /// Applies one mutation to the project under the write lock and
    /// schedules the debounced auto-save with the new snapshot.
    pub async fn mutate<R>(&self, mutation: impl FnOnce(&mut Project) -> R) -> R {
        let mut project = self.project.write().await;
        let result = mutation(&mut project);
        self.store.schedule_save(project.clone());
        result
    }

    /// Like [`Self::mutate`] for fallible mutations: a rejected mutation
    /// leaves the project untouched, so no save is scheduled for it.
    pub async fn try_mutate<R, E>(
        &self,
        mutation: impl FnOnce(&mut Project) -> Result<R, E>,
    ) -> Result<R, E> {
        let mut project = self.project.write().await;
        let result = mutation(&mut project)?;
        self.store.schedule_save(project.clone());
        Ok(result)
    }
}
