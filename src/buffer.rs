use image::RgbImage;
use std::sync::atomic::{AtomicUsize, Ordering};

// Static counter for generating unique IDs
static NEXT_IMAGE_ID: AtomicUsize = AtomicUsize::new(1);

/// An 8-bit, three channel pixel buffer.
///
/// Every buffer produced by a decode, crop, filter or resize gets a fresh id,
/// which the texture cache uses as its key. Clones keep the id since they
/// hold the same pixels. Equality ignores the id.
#[derive(Clone)]
pub struct Image {
    id: usize,
    pixels: RgbImage,
}

impl Image {
    pub fn new(pixels: RgbImage) -> Self {
        let id = NEXT_IMAGE_ID.fetch_add(1, Ordering::SeqCst);
        Self { id, pixels }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// Builds an egui image for uploading as a texture
    pub fn to_color_image(&self) -> egui::ColorImage {
        let size = [self.width() as usize, self.height() as usize];
        egui::ColorImage::from_rgb(size, self.pixels.as_raw())
    }
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.pixels.dimensions() == other.pixels.dimensions()
            && self.pixels.as_raw() == other.pixels.as_raw()
    }
}

impl Eq for Image {}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("id", &self.id)
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}
