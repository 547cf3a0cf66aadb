#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod buffer;
pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod file_handler;
pub mod filters;
pub mod panels;
pub mod state;
pub mod texture_manager;

pub use app::ImageEditorApp;
pub use buffer::Image;
pub use command::{Command, History, HistoryEntry};
pub use config::{EditorConfig, UndoPolicy};
pub use display::{CanvasMapping, CropDrag, PixelRegion};
pub use error::{EditorError, EditorResult};
pub use filters::Filter;
pub use state::{ActiveTarget, EditorState, Phase};
