//! Error types for editor operations and configuration.

use crate::item::ItemId;
use thiserror::Error;

/// Errors returned by [`crate::editor::Editor`] operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("Item not found: {0}")]
    UnknownItem(ItemId),
    #[error("Item is not a text item: {0}")]
    NotText(ItemId),
    #[error("A drag session is already in progress")]
    DragInProgress,
    #[error("No drag session is in progress")]
    NoActiveDrag,
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors raised while loading an [`crate::config::EditorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
