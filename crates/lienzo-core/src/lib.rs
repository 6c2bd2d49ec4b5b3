//! Lienzo Core Library
//!
//! Platform-agnostic interaction engine for the Lienzo canvas editor:
//! the scene of text and shape items, alignment guides and snapping,
//! undo/redo history, drag-and-drop sessions and debounced persistence.

pub mod camera;
pub mod config;
pub mod drag;
pub mod editor;
pub mod error;
pub mod history;
pub mod item;
pub mod publication;
pub mod scene;
pub mod session;
pub mod shortcuts;
pub mod snap;
pub mod storage;

pub use camera::Camera;
pub use config::EditorConfig;
pub use drag::{DragController, DragSession, DragSubject, DropAction, DropTarget};
pub use editor::{ChangeCause, DragOutcome, Editor, SceneChange};
pub use error::{ConfigError, EditorError, EditorResult};
pub use history::{History, HistoryState, Undoable};
pub use item::{Geometry, Item, ItemId, ItemKind, Payload, ShapeKind, Style, Template};
pub use publication::PublicationFrame;
pub use scene::Scene;
pub use session::EditorSession;
pub use shortcuts::{Command, Shortcut, ShortcutRegistry};
pub use snap::{Guide, GuideSource, Orientation, SnapEngine, SnapMode, SnapPolicy, SnapResult};
pub use storage::{AutoSaver, MemoryStorage, ProjectRecord, ProjectStore, SaveStatus, StorageError};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
