use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by editing operations and the file collaborators.
///
/// None of these are fatal: the app logs them and shows a notification.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode image {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Nothing to undo")]
    EmptyHistory,

    #[error("No image loaded")]
    NoActiveBuffer,

    #[error("No cropped region to preview")]
    NoSelection,

    #[error("Crop region has zero area")]
    EmptyRegion,
}

/// Result type for editor operations
pub type EditorResult<T> = Result<T, EditorError>;
