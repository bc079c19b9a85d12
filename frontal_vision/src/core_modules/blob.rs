// THEORY:
// The `Blob` is the unit of exchange between the color segmentation stage and
// the selection stage. A blob is one connected region of pixels that matched a
// color threshold in a single frame.
//
// Key architectural principles:
// 1.  **Dumb Data Container**: A `Blob` only records geometry and two shape
//     statistics (pixel count and roundness). It knows nothing about balls or
//     goals; the selectors decide what a blob means.
// 2.  **Backend Independence**: Any segmentation backend (the built-in
//     `ColorSegmenter`, a camera SDK, or a scripted fake in tests) only has to
//     produce a `Vec<Blob>`. Selectors work over plain slices.
// 3.  **Frame Scoped**: Blobs describe a single frame and are discarded once
//     the frame's line has been sent.

use serde::{Deserialize, Serialize};

/// A 2D pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

/// An axis-aligned rectangle in pixel coordinates, anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// The smallest box covering both corners (inclusive).
    pub fn from_corners(top_left: Point, bottom_right: Point) -> Self {
        Self {
            x: top_left.x,
            y: top_left.y,
            width: bottom_right.x - top_left.x + 1,
            height: bottom_right.y - top_left.y + 1,
        }
    }

    /// Rectangle area in pixels (`width * height`).
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// True when the two rectangles share at least one pixel.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.x < other.right() && other.x < self.right() && self.y < other.bottom() && other.y < self.bottom()
    }

    /// The smallest rectangle covering both.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        BoundingBox { x, y, width: right - x, height: bottom - y }
    }

    /// True when the (sub-pixel) point lies inside the rectangle, edges included.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x as f64 && px <= self.right() as f64 && py >= self.y as f64 && py <= self.bottom() as f64
    }
}

/// One color-classified connected region in a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blob {
    /// The rectangle enclosing every pixel of the region.
    pub bounding_box: BoundingBox,
    /// Mean pixel position of the region, `(cx, cy)`.
    pub centroid: (f64, f64),
    /// Number of pixels in the region. Never larger than the bounding box area.
    pub area: u32,
    /// `4π·area / perimeter²`, clamped to `[0, 1]`. 1 is a perfect circle.
    pub roundness: f64,
}

impl Blob {
    pub fn new(bounding_box: BoundingBox, centroid: (f64, f64), area: u32, roundness: f64) -> Self {
        Self {
            bounding_box,
            centroid,
            area,
            roundness,
        }
    }

    pub fn cx(&self) -> f64 {
        self.centroid.0
    }

    pub fn cy(&self) -> f64 {
        self.centroid.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_are_inclusive() {
        let bbox = BoundingBox::from_corners(Point { x: 2, y: 3 }, Point { x: 4, y: 3 });
        assert_eq!(bbox, BoundingBox::new(2, 3, 3, 1));
        assert_eq!(bbox.area(), 3);
    }

    #[test]
    fn touching_boxes_do_not_overlap() {
        let a = BoundingBox::new(0, 0, 5, 5);
        let b = BoundingBox::new(5, 0, 5, 5);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&BoundingBox::new(4, 4, 2, 2)));
    }

    #[test]
    fn union_covers_both() {
        let a = BoundingBox::new(10, 10, 5, 5);
        let b = BoundingBox::new(2, 12, 4, 10);
        let u = a.union(&b);
        assert_eq!(u, BoundingBox::new(2, 10, 13, 12));
    }

    #[test]
    fn centroid_inside_box() {
        let blob = Blob::new(BoundingBox::new(150, 110, 20, 20), (160.0, 120.0), 300, 0.8);
        assert!(blob.bounding_box.contains(blob.cx(), blob.cy()));
        assert!(!blob.bounding_box.contains(149.5, 120.0));
    }
}
