mod history;

pub use history::{History, HistoryEntry};

use crate::buffer::Image;
use crate::display::PixelRegion;
use crate::error::EditorResult;
use crate::filters::Filter;
use std::path::PathBuf;

/// Result type for command operations
pub type CommandResult = EditorResult<()>;

/// User actions, emitted by the panels and executed against `EditorState`
#[derive(Debug, Clone)]
pub enum Command {
    /// Replace the source image, dropping the selection and history
    Load(Image),
    /// Cut a region out of the source image
    Crop(PixelRegion),
    /// Filter the active buffer
    ApplyFilter(Filter),
    Undo,
    /// Write the active buffer to a file
    Save(PathBuf),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Load(_) => "Load",
            Command::Crop(_) => "Crop",
            Command::ApplyFilter(filter) => filter.label(),
            Command::Undo => "Undo",
            Command::Save(_) => "Save",
        }
    }
}
