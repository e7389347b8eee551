//! services/api/src/adapters/storage.rs
//!
//! This module contains the file-backed project store, the concrete
//! implementation of the `ProjectStore` port from the `core` crate. One
//! project lives in one JSON slot on disk; writes triggered by rapid
//! successive edits are debounced so only the last value within the delay
//! window is committed.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use skripsi_core::domain::Project;
use skripsi_core::ports::{ProjectStore, StoreError, StoreResult};
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Name of the single durable slot holding the serialized project.
const SLOT_FILE_NAME: &str = "asisten-skripsi-data.json";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A project store that mirrors the aggregate into one JSON file.
///
/// The debounce timer is owned by the instance, not process-global: each
/// store cancels only its own pending write, and a pending write is aborted
/// when the store is dropped.
pub struct FileProjectStore {
    slot_path: PathBuf,
    debounce_delay: Duration,
    pending_save: Mutex<Option<JoinHandle<()>>>,
}

impl FileProjectStore {
    /// Creates a store with its slot under `data_dir`.
    pub fn new(data_dir: &Path, debounce_delay: Duration) -> Self {
        Self {
            slot_path: data_dir.join(SLOT_FILE_NAME),
            debounce_delay,
            pending_save: Mutex::new(None),
        }
    }

    /// Writes `project` to the slot immediately. The bytes go to a sibling
    /// temp file first and are renamed over the slot, so an interrupted
    /// write never clobbers the last committed copy.
    async fn write_slot(slot_path: &Path, project: &Project) -> StoreResult<()> {
        let serialized =
            serde_json::to_string(project).map_err(|e| StoreError::Serde(e.to_string()))?;
        if let Some(parent) = slot_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Io(e.to_string()))?;
        }
        let tmp_path = slot_path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, serialized)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        tokio::fs::rename(&tmp_path, slot_path)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))
    }

    /// Cancels any pending debounced write without executing it.
    fn cancel_pending(&self) {
        if let Some(handle) = self.pending_save.lock().expect("debounce lock").take() {
            handle.abort();
        }
    }
}

impl Drop for FileProjectStore {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

//=========================================================================================
// `ProjectStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl ProjectStore for FileProjectStore {
    async fn save(&self, project: &Project) -> StoreResult<()> {
        Self::write_slot(&self.slot_path, project).await
    }

    /// Loads the last committed project. An absent slot and a corrupt slot
    /// both yield `None`; the decode failure is logged, never surfaced —
    /// the in-memory project stays the source of truth.
    async fn load(&self) -> StoreResult<Option<Project>> {
        let contents = match tokio::fs::read_to_string(&self.slot_path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e.to_string())),
        };

        match serde_json::from_str::<Project>(&contents) {
            Ok(project) => Ok(Some(project)),
            Err(e) => {
                error!("Failed to deserialize project slot, ignoring it: {e}");
                Ok(None)
            }
        }
    }

    async fn clear(&self) -> StoreResult<()> {
        self.cancel_pending();
        match tokio::fs::remove_file(&self.slot_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e.to_string())),
        }
    }

    async fn size(&self) -> StoreResult<u64> {
        match tokio::fs::metadata(&self.slot_path).await {
            Ok(metadata) => Ok(metadata.len()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(StoreError::Io(e.to_string())),
        }
    }

    /// Coalesces rapid saves: a new schedule cancels the previous pending
    /// write, so only the last value within the window is committed. Write
    /// failures are logged and absorbed; the durable copy is simply stale
    /// until the next successful save.
    fn schedule_save(&self, project: Project) {
        let slot_path = self.slot_path.clone();
        let delay = self.debounce_delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match Self::write_slot(&slot_path, &project).await {
                Ok(()) => debug!("Auto-saved project to {}", slot_path.display()),
                Err(e) => error!("Auto-save failed: {e}"),
            }
        });

        let mut pending = self.pending_save.lock().expect("debounce lock");
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    }
}
