//! An open project: an editor wired to debounced persistence.

use crate::config::EditorConfig;
use crate::editor::Editor;
use crate::storage::{AutoSaver, ProjectRecord, ProjectStore, SaveStatus, StorageError, StorageResult};
use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Name shown when a project could not be loaded.
pub const MISSING_PROJECT_NAME: &str = "Project Not Found";

/// Editor plus auto-saver for one project id.
pub struct EditorSession<S: ProjectStore> {
    editor: Editor,
    saver: AutoSaver<S>,
}

impl<S: ProjectStore> EditorSession<S> {
    /// Open a project.
    ///
    /// If the record is missing or unreadable the session starts with an
    /// empty scene under a placeholder name; edits will create the record.
    pub async fn open(storage: Arc<S>, project_id: impl Into<String>, config: &EditorConfig) -> Self {
        let mut saver = AutoSaver::new(storage, project_id).with_debounce(config.autosave_debounce());
        let mut editor = Editor::new(config);

        let record = match saver.load().await {
            Ok(record) => {
                log::info!("Project loaded: {} ({})", saver.project_id(), record.name);
                record
            }
            Err(StorageError::NotFound(id)) => {
                log::warn!("Project not found: {}", id);
                ProjectRecord::empty(MISSING_PROJECT_NAME)
            }
            Err(e) => {
                log::warn!("Failed to load project {}: {}", saver.project_id(), e);
                ProjectRecord::empty(MISSING_PROJECT_NAME)
            }
        };
        editor.load_record(record);
        saver.mark_synced(editor.revision());

        Self { editor, saver }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn saver(&self) -> &AutoSaver<S> {
        &self.saver
    }

    /// Pick up editor changes and write them once the quiet period ends.
    ///
    /// Call this from the host's frame or timer loop.
    pub async fn tick(&mut self, now: Instant) -> SaveStatus {
        self.saver.observe(&self.editor, now);
        // Failures are logged by the saver and surface through the status.
        let _ = self.saver.maybe_save(now).await;
        self.saver.status()
    }

    /// Write any pending change immediately and hand back the editor.
    pub async fn close(mut self, now: Instant) -> StorageResult<Editor> {
        self.saver.observe(&self.editor, now);
        self.saver.flush(now).await?;
        Ok(self.editor)
    }
}
