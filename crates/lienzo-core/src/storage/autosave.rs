//! Debounced auto-save.
//!
//! Every observed change restarts a quiet period. When it elapses without
//! further changes, the latest project record is written. Saves are
//! fire-and-forget from the editor's point of view: failures are logged
//! and reported through [`SaveStatus`], never raised into editing.

use crate::config::DEFAULT_AUTOSAVE_DEBOUNCE_MS;
use crate::editor::Editor;
use crate::storage::{ProjectRecord, ProjectStore, StorageResult};
use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Persistence state, for a "last saved" indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// Nothing changed since load.
    Idle,
    /// A change is waiting for the quiet period to end.
    Pending,
    /// The latest scheduled snapshot was written.
    Saved,
    /// The latest write failed.
    Failed,
}

struct PendingSave {
    record: ProjectRecord,
    revision: u64,
    deadline: Instant,
}

/// Writes a project to storage once edits have settled.
pub struct AutoSaver<S: ProjectStore> {
    storage: Arc<S>,
    project_id: String,
    debounce: Duration,
    pending: Option<PendingSave>,
    observed_revision: u64,
    synced_revision: u64,
    last_saved: Option<Instant>,
    status: SaveStatus,
}

impl<S: ProjectStore> AutoSaver<S> {
    pub fn new(storage: Arc<S>, project_id: impl Into<String>) -> Self {
        Self {
            storage,
            project_id: project_id.into(),
            debounce: Duration::from_millis(DEFAULT_AUTOSAVE_DEBOUNCE_MS),
            pending: None,
            observed_revision: 0,
            synced_revision: 0,
            last_saved: None,
            status: SaveStatus::Idle,
        }
    }

    /// Builder-style debounce setter.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.debounce = debounce;
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    /// Record that `revision` matches what storage holds, e.g. right after a load.
    pub fn mark_synced(&mut self, revision: u64) {
        self.observed_revision = revision;
        self.synced_revision = revision;
        self.pending = None;
        self.status = SaveStatus::Idle;
    }

    /// Schedule a save if the editor changed since the last observation.
    ///
    /// Returns whether a save was (re)scheduled.
    pub fn observe(&mut self, editor: &Editor, now: Instant) -> bool {
        if editor.revision() == self.observed_revision {
            return false;
        }
        self.schedule(editor.to_record(), editor.revision(), now);
        true
    }

    /// Replace any pending snapshot and restart the quiet period.
    pub fn schedule(&mut self, record: ProjectRecord, revision: u64, now: Instant) {
        log::debug!(
            "Scheduling save of {} (revision {}) in {:?}",
            self.project_id,
            revision,
            self.debounce
        );
        self.observed_revision = revision;
        self.pending = Some(PendingSave {
            record,
            revision,
            deadline: now + self.debounce,
        });
        self.status = SaveStatus::Pending;
    }

    /// When the pending save becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Check if the quiet period has elapsed.
    pub fn is_due(&self, now: Instant) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| now >= pending.deadline)
    }

    /// Write the pending snapshot if it is due. Returns whether a write happened.
    pub async fn maybe_save(&mut self, now: Instant) -> StorageResult<bool> {
        if !self.is_due(now) {
            return Ok(false);
        }
        self.flush(now).await
    }

    /// Write the pending snapshot now, regardless of the quiet period.
    ///
    /// On failure the snapshot is dropped; the next change schedules a new one.
    pub async fn flush(&mut self, now: Instant) -> StorageResult<bool> {
        let Some(pending) = self.pending.take() else {
            return Ok(false);
        };

        match self.storage.save(&self.project_id, &pending.record).await {
            Ok(()) => {
                log::info!("Project saved: {} (revision {})", self.project_id, pending.revision);
                self.synced_revision = pending.revision;
                self.last_saved = Some(now);
                self.status = SaveStatus::Saved;
                Ok(true)
            }
            Err(e) => {
                log::error!("Failed to save project {}: {}", self.project_id, e);
                self.status = SaveStatus::Failed;
                Err(e)
            }
        }
    }

    /// Load this project's record.
    pub async fn load(&mut self) -> StorageResult<ProjectRecord> {
        self.storage.load(&self.project_id).await
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    /// When the last successful write completed.
    pub fn last_saved(&self) -> Option<Instant> {
        self.last_saved
    }

    pub fn synced_revision(&self) -> u64 {
        self.synced_revision
    }

    /// Whether storage holds the latest observed revision.
    pub fn is_synced(&self) -> bool {
        self.pending.is_none() && self.synced_revision == self.observed_revision
    }
}
