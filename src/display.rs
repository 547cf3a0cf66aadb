use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A rectangle in source pixel coordinates, given by two opposite corners in
/// any order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRegion {
    pub start: [u32; 2],
    pub end: [u32; 2],
}

impl PixelRegion {
    pub fn new(start: [u32; 2], end: [u32; 2]) -> Self {
        Self { start, end }
    }

    /// Returns `(x, y, width, height)` with min/max sorted per axis and the
    /// far corner clamped to `bounds`. The end corner is exclusive.
    pub fn normalized(&self, bounds: (u32, u32)) -> (u32, u32, u32, u32) {
        let (x0, x1) = sorted(self.start[0], self.end[0]);
        let (y0, y1) = sorted(self.start[1], self.end[1]);
        let (x0, x1) = (x0.min(bounds.0), x1.min(bounds.0));
        let (y0, y1) = (y0.min(bounds.1), y1.min(bounds.1));
        (x0, y0, x1 - x0, y1 - y0)
    }

    pub fn is_empty_within(&self, bounds: (u32, u32)) -> bool {
        let (_, _, width, height) = self.normalized(bounds);
        width == 0 || height == 0
    }
}

fn sorted(a: u32, b: u32) -> (u32, u32) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Maps points on a fixed-size canvas onto the pixels of the image stretched
/// across it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasMapping {
    /// Size of the canvas in points
    pub canvas_size: Vec2,
    /// Width and height of the displayed image in pixels
    pub source_size: (u32, u32),
}

impl CanvasMapping {
    pub fn new(canvas_size: Vec2, source_size: (u32, u32)) -> Self {
        Self { canvas_size, source_size }
    }

    /// Source pixels per canvas point, per axis
    pub fn scale(&self) -> Vec2 {
        Vec2::new(
            self.source_size.0 as f32 / self.canvas_size.x,
            self.source_size.1 as f32 / self.canvas_size.y,
        )
    }

    /// Converts a point relative to the canvas origin, truncating toward zero.
    /// Points left of or above the canvas map to zero.
    pub fn to_source(&self, canvas_pos: Pos2) -> [u32; 2] {
        let scale = self.scale();
        [
            (canvas_pos.x.max(0.0) * scale.x) as u32,
            (canvas_pos.y.max(0.0) * scale.y) as u32,
        ]
    }

    pub fn region(&self, from: Pos2, to: Pos2) -> PixelRegion {
        PixelRegion::new(self.to_source(from), self.to_source(to))
    }
}

/// A crop rectangle being dragged out on the canvas, in canvas-relative
/// points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropDrag {
    pub start: Pos2,
    pub current: Pos2,
}

impl CropDrag {
    pub fn begin(pos: Pos2) -> Self {
        Self { start: pos, current: pos }
    }

    pub fn update(&mut self, pos: Pos2) {
        self.current = pos;
    }

    /// The dragged rectangle, offset onto the canvas at `origin`
    pub fn screen_rect(&self, origin: Pos2) -> Rect {
        Rect::from_two_pos(origin + self.start.to_vec2(), origin + self.current.to_vec2())
    }

    pub fn finish(self, mapping: &CanvasMapping) -> PixelRegion {
        mapping.region(self.start, self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_any_drag_direction() {
        let forward = PixelRegion::new([2, 3], [12, 15]);
        let backward = PixelRegion::new([12, 15], [2, 3]);
        let mixed = PixelRegion::new([12, 3], [2, 15]);

        assert_eq!(forward.normalized((100, 100)), (2, 3, 10, 12));
        assert_eq!(backward.normalized((100, 100)), (2, 3, 10, 12));
        assert_eq!(mixed.normalized((100, 100)), (2, 3, 10, 12));
    }

    #[test]
    fn test_normalize_clamps_to_bounds() {
        let region = PixelRegion::new([90, 90], [150, 120]);
        assert_eq!(region.normalized((100, 100)), (90, 90, 10, 10));

        let outside = PixelRegion::new([120, 120], [150, 150]);
        assert!(outside.is_empty_within((100, 100)));
    }

    #[test]
    fn test_zero_area_region() {
        assert!(PixelRegion::new([5, 5], [5, 20]).is_empty_within((50, 50)));
        assert!(!PixelRegion::new([5, 5], [6, 6]).is_empty_within((50, 50)));
    }

    #[test]
    fn test_mapping_scale_and_truncation() {
        let mapping = CanvasMapping::new(Vec2::new(500.0, 400.0), (100, 100));
        assert_eq!(mapping.scale(), Vec2::new(0.2, 0.25));

        let region = mapping.region(Pos2::new(10.0, 10.0), Pos2::new(60.0, 60.0));
        assert_eq!(region, PixelRegion::new([2, 2], [12, 15]));
    }

    #[test]
    fn test_mapping_clamps_negative_points() {
        let mapping = CanvasMapping::new(Vec2::new(500.0, 400.0), (1000, 800));
        assert_eq!(mapping.to_source(Pos2::new(-20.0, -1.0)), [0, 0]);
        assert_eq!(mapping.to_source(Pos2::new(250.0, 200.0)), [500, 400]);
    }

    #[test]
    fn test_crop_drag() {
        let mapping = CanvasMapping::new(Vec2::new(500.0, 400.0), (500, 400));
        let mut drag = CropDrag::begin(Pos2::new(100.0, 50.0));
        drag.update(Pos2::new(20.0, 80.0));

        let rect = drag.screen_rect(Pos2::new(10.0, 10.0));
        assert_eq!(rect.min, Pos2::new(30.0, 60.0));
        assert_eq!(rect.max, Pos2::new(110.0, 90.0));

        let region = drag.finish(&mapping);
        assert_eq!(region.normalized((500, 400)), (20, 50, 80, 30));
    }
}
