//! Project persistence: the stored record, backends and debounced auto-save.

mod autosave;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use autosave::{AutoSaver, SaveStatus};
pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use crate::history::HistoryState;
use crate::publication::PublicationFrame;
use crate::scene::Scene;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Project not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// A project as persisted: name, full history and publication frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub name: String,
    #[serde(default)]
    pub history_past: Vec<Scene>,
    #[serde(default)]
    pub history_present: Scene,
    #[serde(default)]
    pub history_future: Vec<Scene>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_details: Option<PublicationFrame>,
}

impl ProjectRecord {
    /// A record with an empty scene and no history.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn from_history(
        name: impl Into<String>,
        history: &HistoryState<Scene>,
        publication_details: Option<PublicationFrame>,
    ) -> Self {
        Self {
            name: name.into(),
            history_past: history.past.iter().cloned().collect(),
            history_present: history.present.clone(),
            history_future: history.future.iter().cloned().collect(),
            publication_details,
        }
    }

    pub fn history(&self) -> HistoryState<Scene> {
        HistoryState {
            past: self.history_past.iter().cloned().collect(),
            present: self.history_present.clone(),
            future: self.history_future.iter().cloned().collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Trait for project storage backends.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait ProjectStore: Send + Sync {
    /// Save a project, replacing any previous record.
    fn save(&self, id: &str, record: &ProjectRecord) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a project.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<ProjectRecord>>;

    /// Delete a project.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all project IDs.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a project exists.
    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Trait for project storage backends (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait ProjectStore {
    /// Save a project, replacing any previous record.
    fn save(&self, id: &str, record: &ProjectRecord) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a project.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<ProjectRecord>>;

    /// Delete a project.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all project IDs.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a project exists.
    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Simple blocking executor for tests.
#[cfg(test)]
pub(crate) fn block_on<F: Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => return result,
            Poll::Pending => {}
        }
    }
}
