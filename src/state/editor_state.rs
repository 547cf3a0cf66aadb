//! The editing state machine: which buffers exist and which one each
//! operation changes.
//!
//! ```text
//!   ┌─────────┐  load   ┌──────────┐  crop   ┌────────────┐
//!   │  Empty  ├────────►│  Loaded  ├────────►│  Selected  │
//!   └─────────┘         └────▲─────┘         └─────┬──────┘
//!                            │      load / undo    │
//!                            └─────────────────────┘
//! ```
//!
//! Filters change the selection when there is one and the source otherwise.
//! Every change pushes the buffer it replaces onto the history first, so one
//! undo reverses exactly one operation.

use crate::buffer::Image;
use crate::command::{Command, CommandResult, History, HistoryEntry};
use crate::config::{EditorConfig, UndoPolicy};
use crate::display::PixelRegion;
use crate::error::{EditorError, EditorResult};
use crate::file_handler;
use crate::filters::{self, Filter};
use image::imageops;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Lower bound of the resize preview, in percent
pub const MIN_RESIZE_PERCENT: u32 = 10;
/// Upper bound of the resize preview, in percent
pub const MAX_RESIZE_PERCENT: u32 = 100;

/// The buffer a mutating operation acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveTarget {
    None,
    Source,
    Selection,
}

/// Coarse state of the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No image loaded
    Empty,
    /// An image is loaded and nothing is cropped
    Loaded,
    /// An image is loaded and a crop of it is selected
    Selected,
}

#[derive(Debug, Default)]
pub struct EditorState {
    source: Option<Image>,
    selection: Option<Image>,
    history: History,
    config: EditorConfig,
}

impl EditorState {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            source: None,
            selection: None,
            history: History::new(),
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut EditorConfig {
        &mut self.config
    }

    pub fn source(&self) -> Option<&Image> {
        self.source.as_ref()
    }

    pub fn selection(&self) -> Option<&Image> {
        self.selection.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn phase(&self) -> Phase {
        match (&self.source, &self.selection) {
            (None, None) => Phase::Empty,
            (_, Some(_)) => Phase::Selected,
            (Some(_), None) => Phase::Loaded,
        }
    }

    pub fn active_target(&self) -> ActiveTarget {
        if self.selection.is_some() {
            ActiveTarget::Selection
        } else if self.source.is_some() {
            ActiveTarget::Source
        } else {
            ActiveTarget::None
        }
    }

    /// The buffer filters and saves act on
    pub fn active_image(&self) -> Option<&Image> {
        match self.active_target() {
            ActiveTarget::Selection => self.selection.as_ref(),
            ActiveTarget::Source => self.source.as_ref(),
            ActiveTarget::None => None,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Replace the source image. Drops the selection and the undo history.
    pub fn load(&mut self, image: Image) -> &Image {
        log::debug!(
            "Loading {}x{} image, discarding {} history entries",
            image.width(),
            image.height(),
            self.history.len()
        );
        self.selection = None;
        self.history.clear();
        self.source.insert(image)
    }

    /// Decode `path` and load it
    pub fn open(&mut self, path: &Path) -> EditorResult<&Image> {
        let image = file_handler::load_image(path)?;
        Ok(self.load(image))
    }

    /// Cut `region` out of the source and make it the selection.
    ///
    /// The region may be given in any corner order and is clamped to the
    /// source. A region with no pixels left is rejected without touching
    /// any state.
    pub fn crop(&mut self, region: PixelRegion) -> EditorResult<&Image> {
        let Some(source) = self.source.as_ref() else {
            return Err(EditorError::NoActiveBuffer);
        };

        if region.is_empty_within(source.dimensions()) {
            return Err(EditorError::EmptyRegion);
        }

        let (x, y, width, height) = region.normalized(source.dimensions());

        let cropped = imageops::crop_imm(source.pixels(), x, y, width, height).to_image();
        log::debug!("Cropped {}x{} at ({}, {})", width, height, x, y);

        self.history.push(HistoryEntry::Crop {
            source: source.clone(),
            replaced_selection: self.selection.take(),
        });
        Ok(&*self.selection.insert(Image::new(cropped)))
    }

    /// Replace the active buffer with its filtered version
    pub fn apply_filter(&mut self, filter: Filter) -> EditorResult<&Image> {
        let target = self.active_target();
        let slot = match target {
            ActiveTarget::Selection => &mut self.selection,
            ActiveTarget::Source => &mut self.source,
            ActiveTarget::None => return Err(EditorError::NoActiveBuffer),
        };
        let Some(current) = slot.take() else {
            return Err(EditorError::NoActiveBuffer);
        };

        let filtered = filter.apply(&current, &self.config);
        log::debug!("Applied {:?} to {:?}", filter, target);

        self.history.push(HistoryEntry::Filter {
            target,
            snapshot: current,
        });
        Ok(&*slot.insert(filtered))
    }

    /// The selection scaled by `percent`, for display only.
    ///
    /// `percent` is clamped to 10..=100. Neither the selection nor the
    /// history change.
    pub fn resize_preview(&self, percent: u32) -> EditorResult<Image> {
        let selection = self.selection.as_ref().ok_or(EditorError::NoSelection)?;

        let percent = percent.clamp(MIN_RESIZE_PERCENT, MAX_RESIZE_PERCENT);
        if percent == MAX_RESIZE_PERCENT {
            return Ok(selection.clone());
        }

        let scale = percent as f32 / 100.0;
        let width = (selection.width() as f32 * scale) as u32;
        let height = (selection.height() as f32 * scale) as u32;
        Ok(filters::resize_linear(selection, width, height))
    }

    /// Restore the most recent snapshot according to the undo policy and
    /// return the buffer that is active afterwards.
    pub fn undo(&mut self) -> EditorResult<&Image> {
        let entry = self.history.pop().ok_or(EditorError::EmptyHistory)?;
        log::debug!("Undoing {} ({:?})", entry.label(), self.config.undo_policy);

        match self.config.undo_policy {
            UndoPolicy::RestoreSource => {
                self.source = Some(entry.into_snapshot());
                self.selection = None;
            }
            UndoPolicy::RestoreTarget => match entry {
                HistoryEntry::Crop {
                    source,
                    replaced_selection,
                } => {
                    self.source = Some(source);
                    self.selection = replaced_selection;
                }
                HistoryEntry::Filter {
                    target: ActiveTarget::Selection,
                    snapshot,
                } => {
                    self.selection = Some(snapshot);
                }
                HistoryEntry::Filter { snapshot, .. } => {
                    self.source = Some(snapshot);
                }
            },
        }

        self.active_image().ok_or(EditorError::NoActiveBuffer)
    }

    /// Encode the active buffer to `path`
    pub fn save(&self, path: &Path) -> EditorResult<()> {
        let image = self.active_image().ok_or(EditorError::NoActiveBuffer)?;
        file_handler::save_image(image, path)
    }

    pub fn execute(&mut self, command: Command) -> CommandResult {
        log::debug!("Executing {}", command.name());
        match command {
            Command::Load(image) => {
                self.load(image);
                Ok(())
            }
            Command::Crop(region) => self.crop(region).map(|_| ()),
            Command::ApplyFilter(filter) => self.apply_filter(filter).map(|_| ()),
            Command::Undo => self.undo().map(|_| ()),
            Command::Save(path) => self.save(&path),
        }
    }
}
