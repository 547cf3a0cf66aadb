use crate::buffer::Image;
use crate::config::EditorConfig;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, RgbImage};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use serde::{Deserialize, Serialize};

/// The filters a user can apply to the active buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    Grayscale,
    Blur,
    EdgeDetect,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::Grayscale, Filter::Blur, Filter::EdgeDetect];

    /// Label used on the filter's button
    pub fn label(&self) -> &'static str {
        match self {
            Filter::Grayscale => "Grayscale",
            Filter::Blur => "Blur",
            Filter::EdgeDetect => "Edge Detection",
        }
    }

    pub fn apply(&self, image: &Image, config: &EditorConfig) -> Image {
        match self {
            Filter::Grayscale => grayscale(image),
            Filter::Blur => gaussian_blur(image, config.blur_kernel_size),
            Filter::EdgeDetect => canny_edges(
                image,
                config.canny_low_threshold,
                config.canny_high_threshold,
            ),
        }
    }
}

fn expand_gray(gray: GrayImage) -> RgbImage {
    DynamicImage::ImageLuma8(gray).to_rgb8()
}

/// Luma conversion, re-expanded to three channels
pub fn grayscale(image: &Image) -> Image {
    let gray = imageops::grayscale(image.pixels());
    Image::new(expand_gray(gray))
}

/// Standard deviation a square kernel of `kernel_size` implies when no
/// explicit sigma is given.
pub fn sigma_for_kernel(kernel_size: u32) -> f32 {
    let kernel_size = kernel_size.max(1) as f32;
    0.3 * ((kernel_size - 1.0) * 0.5 - 1.0) + 0.8
}

pub fn gaussian_blur(image: &Image, kernel_size: u32) -> Image {
    let sigma = sigma_for_kernel(kernel_size);
    Image::new(gaussian_blur_f32(image.pixels(), sigma))
}

/// Canny edge map of the grayscale image, re-expanded to three channels.
///
/// The thresholds may be given in either order. Non-finite ones count as zero.
pub fn canny_edges(image: &Image, low_threshold: f32, high_threshold: f32) -> Image {
    let finite = |t: f32| if t.is_finite() { t } else { 0.0 };
    let (a, b) = (finite(low_threshold), finite(high_threshold));
    let gray = imageops::grayscale(image.pixels());
    let edges = canny(&gray, a.min(b), a.max(b));
    Image::new(expand_gray(edges))
}

/// Linear resize to exact dimensions
pub fn resize_linear(image: &Image, width: u32, height: u32) -> Image {
    let resized = imageops::resize(image.pixels(), width.max(1), height.max(1), FilterType::Triangle);
    Image::new(resized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient(width: u32, height: u32) -> Image {
        Image::new(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) * 3 % 256) as u8])
        }))
    }

    #[test]
    fn test_grayscale_channels_equal() {
        let gray = grayscale(&gradient(16, 9));
        assert_eq!(gray.dimensions(), (16, 9));
        assert!(gray.pixels().pixels().all(|p| p[0] == p[1] && p[1] == p[2]));
    }

    #[test]
    fn test_grayscale_is_idempotent() {
        let once = grayscale(&gradient(20, 20));
        let twice = grayscale(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_default_kernel_sigma() {
        assert!((sigma_for_kernel(15) - 2.6).abs() < 1e-5);
        assert!(sigma_for_kernel(0) > 0.0);
    }

    #[test]
    fn test_blur_keeps_flat_image_flat() {
        let flat = Image::new(RgbImage::from_pixel(12, 8, Rgb([90, 90, 90])));
        let blurred = gaussian_blur(&flat, 15);
        assert_eq!(blurred.dimensions(), (12, 8));
        assert!(blurred.pixels().pixels().all(|p| p.0.iter().all(|c| c.abs_diff(90) <= 1)));
    }

    #[test]
    fn test_edges_on_flat_image_are_empty() {
        let flat = Image::new(RgbImage::from_pixel(10, 10, Rgb([200, 10, 10])));
        let edges = canny_edges(&flat, 100.0, 200.0);
        assert_eq!(edges.dimensions(), (10, 10));
        assert!(edges.pixels().pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_edges_find_a_step() {
        let step = Image::new(RgbImage::from_fn(32, 32, |x, _| {
            if x < 16 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
        }));
        let edges = canny_edges(&step, 100.0, 200.0);
        assert!(edges.pixels().pixels().any(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn test_edges_accept_swapped_thresholds() {
        let step = Image::new(RgbImage::from_fn(32, 32, |x, _| {
            if x < 16 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
        }));
        let ordered = canny_edges(&step, 100.0, 200.0);
        let swapped = canny_edges(&step, 200.0, 100.0);
        assert_eq!(ordered, swapped);

        let nan = canny_edges(&step, f32::NAN, 200.0);
        assert_eq!(nan.dimensions(), (32, 32));
    }

    #[test]
    fn test_resize_dimensions() {
        let resized = resize_linear(&gradient(40, 20), 10, 5);
        assert_eq!(resized.dimensions(), (10, 5));

        let tiny = resize_linear(&gradient(4, 4), 0, 0);
        assert_eq!(tiny.dimensions(), (1, 1));
    }
}
