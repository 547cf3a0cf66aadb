use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Environment variable naming an optional JSON settings file
pub const CONFIG_ENV_VAR: &str = "IMAGE_EDITOR_CONFIG";

/// Errors that can occur while reading a settings file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Invalid config data: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// What `undo` writes the popped snapshot into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UndoPolicy {
    /// Restore onto the buffer the undone operation changed
    #[default]
    RestoreTarget,
    /// Always restore into the source image and drop the selection
    RestoreSource,
}

/// Tunable settings for the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct EditorConfig {
    /// Size of each of the two canvases, in points
    pub canvas_size: [f32; 2],
    /// Side length of the square Gaussian kernel
    pub blur_kernel_size: u32,
    pub canny_low_threshold: f32,
    pub canny_high_threshold: f32,
    /// Initial value of the resize slider
    pub resize_percent: u32,
    pub undo_policy: UndoPolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_size: [500.0, 400.0],
            blur_kernel_size: 15,
            canny_low_threshold: 100.0,
            canny_high_threshold: 200.0,
            resize_percent: 100,
            undo_policy: UndoPolicy::default(),
        }
    }
}

impl EditorConfig {
    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        Ok(config.sanitized())
    }

    /// Replace values the editor cannot work with: Canny thresholds are put
    /// in ascending order, and non-finite or non-positive sizes fall back to
    /// their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !self.canny_low_threshold.is_finite() {
            self.canny_low_threshold = defaults.canny_low_threshold;
        }
        if !self.canny_high_threshold.is_finite() {
            self.canny_high_threshold = defaults.canny_high_threshold;
        }
        if self.canny_low_threshold > self.canny_high_threshold {
            log::warn!(
                "Swapping Canny thresholds {} > {}",
                self.canny_low_threshold,
                self.canny_high_threshold
            );
            std::mem::swap(&mut self.canny_low_threshold, &mut self.canny_high_threshold);
        }

        if !self.canvas_size.iter().all(|side| side.is_finite() && *side > 0.0) {
            self.canvas_size = defaults.canvas_size;
        }
        self.blur_kernel_size = self.blur_kernel_size.max(1);
        self.resize_percent = self.resize_percent.clamp(10, 100);
        self
    }

    /// Settings named by `IMAGE_EDITOR_CONFIG`, if it is set and readable
    pub fn from_env() -> Option<Self> {
        let path = std::env::var(CONFIG_ENV_VAR).ok()?;

        match Self::load_from(Path::new(&path)) {
            Ok(config) => {
                log::info!("Loaded settings from {}", path);
                Some(config)
            }
            Err(err) => {
                log::warn!("Ignoring settings file {}: {}", path, err);
                None
            }
        }
    }
}
