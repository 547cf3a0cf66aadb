use eframe::egui;
use image::ImageFormat;
use std::path::{Path, PathBuf};

use crate::buffer::Image;
use crate::error::{EditorError, EditorResult};

/// Extensions offered by the open dialog
pub const OPEN_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif"];

/// Decode an image file into an 8-bit RGB buffer
pub fn load_image(path: &Path) -> EditorResult<Image> {
    let bytes = std::fs::read(path)?;
    let image = load_image_from_bytes(&bytes).map_err(|source| EditorError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Loaded {} ({}x{})", path.display(), image.width(), image.height());
    Ok(image)
}

/// Decode an in-memory image, guessing the format from its contents
pub fn load_image_from_bytes(bytes: &[u8]) -> Result<Image, image::ImageError> {
    let decoded = image::load_from_memory(bytes)?;
    Ok(Image::new(decoded.to_rgb8()))
}

/// Format implied by the file extension; PNG when there is none or it is unknown
pub fn format_for_path(path: &Path) -> ImageFormat {
    ImageFormat::from_path(path).unwrap_or(ImageFormat::Png)
}

/// Encode `image` to `path`
pub fn save_image(image: &Image, path: &Path) -> EditorResult<()> {
    let format = format_for_path(path);
    image
        .pixels()
        .save_with_format(path, format)
        .map_err(|err| match err {
            image::ImageError::IoError(io) => EditorError::Io(io),
            source => EditorError::Encode {
                path: path.to_path_buf(),
                source,
            },
        })?;
    log::info!("Saved {} as {:?}", path.display(), format);
    Ok(())
}

/// Ask the user for an image to open
pub fn pick_open_path() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Image Files", OPEN_EXTENSIONS)
        .pick_file()
}

/// Ask the user where to save, appending `.png` when no extension is given
pub fn pick_save_path() -> Option<PathBuf> {
    let path = rfd::FileDialog::new()
        .add_filter("PNG files", &["png"])
        .add_filter("JPEG files", &["jpg", "jpeg"])
        .add_filter("All files", &["*"])
        .set_file_name("untitled.png")
        .save_file()?;
    Some(with_default_extension(path))
}

pub fn with_default_extension(mut path: PathBuf) -> PathBuf {
    if path.extension().is_none() {
        path.set_extension("png");
    }
    path
}

/// Picks up image files dropped onto the window
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self {
            dropped_files: Vec::new(),
        }
    }

    /// Collect newly dropped files from the UI context.
    /// Returns true if any new files arrived.
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        let mut new_dropped_files = false;

        ctx.input(|i| {
            if !i.raw.dropped_files.is_empty() {
                self.dropped_files = i.raw.dropped_files.clone();
                new_dropped_files = true;
            }
        });

        new_dropped_files
    }

    /// Decode the first dropped image file. Other files are skipped.
    pub fn take_dropped_image(&mut self) -> Option<EditorResult<Image>> {
        let files = std::mem::take(&mut self.dropped_files);

        for file in &files {
            if !Self::is_image_file(file) {
                log::warn!("Dropped file is not a supported type: {}", file.name);
                continue;
            }

            if let Some(bytes) = &file.bytes {
                log::info!("Processing image from memory: {} ({} bytes)", file.name, bytes.len());
                return Some(load_image_from_bytes(bytes).map_err(|source| EditorError::Decode {
                    path: PathBuf::from(&file.name),
                    source,
                }));
            }
            if let Some(path) = &file.path {
                return Some(load_image(path));
            }
            log::warn!("Dropped file has no accessible data: {}", file.name);
        }

        None
    }

    /// Check if a file is an image based on MIME type or extension
    fn is_image_file(file: &egui::DroppedFile) -> bool {
        if !file.mime.is_empty() {
            file.mime.starts_with("image/")
        } else if let Some(path) = &file.path {
            path.extension()
                .map(|ext| ext.to_string_lossy().to_lowercase())
                .is_some_and(|ext| OPEN_EXTENSIONS.contains(&ext.as_str()))
        } else {
            false
        }
    }

    /// Overlay shown while files are dragged over the window
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, Id, LayerId, Order, TextStyle};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let text = ctx.input(|i| {
            let mut text = "Dropping files:\n".to_owned();
            for file in &i.raw.hovered_files {
                if let Some(path) = &file.path {
                    text += &format!("\n{}", path.display());
                } else {
                    text += "\n(Path not available)";
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }
}

impl Default for FileHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_format_for_path() {
        assert_eq!(format_for_path(Path::new("a.jpg")), ImageFormat::Jpeg);
        assert_eq!(format_for_path(Path::new("a.PNG")), ImageFormat::Png);
        assert_eq!(format_for_path(Path::new("a.bmp")), ImageFormat::Bmp);
        assert_eq!(format_for_path(Path::new("noext")), ImageFormat::Png);
    }

    #[test]
    fn test_default_extension() {
        assert_eq!(with_default_extension(PathBuf::from("out")), PathBuf::from("out.png"));
        assert_eq!(with_default_extension(PathBuf::from("out.jpg")), PathBuf::from("out.jpg"));
    }

    #[test]
    fn test_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixels.png");
        let image = Image::new(RgbImage::from_fn(5, 4, |x, y| Rgb([x as u8 * 40, y as u8 * 60, 7])));

        save_image(&image, &path).unwrap();
        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded, image);
    }

    #[test]
    fn test_load_garbage_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        assert!(matches!(load_image(&path), Err(EditorError::Decode { .. })));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_image(&dir.path().join("missing.png"));
        assert!(matches!(result, Err(EditorError::Io(_))));
    }

    #[test]
    fn test_dropped_bytes_are_decoded() {
        let image = RgbImage::from_pixel(3, 3, Rgb([1, 2, 3]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Png).unwrap();

        let mut handler = FileHandler::new();
        handler.dropped_files = vec![egui::DroppedFile {
            name: "dropped.png".to_owned(),
            mime: "image/png".to_owned(),
            bytes: Some(bytes.into_inner().into()),
            ..Default::default()
        }];

        let loaded = handler.take_dropped_image().unwrap().unwrap();
        assert_eq!(loaded.dimensions(), (3, 3));
        assert!(handler.take_dropped_image().is_none());
    }

    #[test]
    fn test_dropped_non_images_are_skipped() {
        let mut handler = FileHandler::new();
        handler.dropped_files = vec![egui::DroppedFile {
            name: "notes.txt".to_owned(),
            mime: "text/plain".to_owned(),
            ..Default::default()
        }];
        assert!(handler.take_dropped_image().is_none());
    }
}
