// THEORY:
// The `ColorSegmenter` is the built-in segmentation collaborator. It turns one
// RGB frame into the list of color blobs the selectors consume, answering one
// `BlobQuery` per target.
//
// Algorithm steps:
// 1.  **Color Classification**: The frame is converted to L*a*b* once, when the
//     segmenter is built. Each query then marks the pixels whose L*, a* and b*
//     all lie inside its threshold box.
// 2.  **Region Growing**: Marked pixels are grouped into 8-connected regions by
//     a stack-based flood fill. A `visited` mask guarantees each pixel is
//     claimed by exactly one region.
// 3.  **Data Aggregation**: While a region grows it accumulates its bounding
//     box, pixel count, coordinate sums (for the centroid) and a perimeter
//     estimate. The perimeter counts pixel edges facing outside the region,
//     with every convex corner cut by a diagonal, which keeps the roundness of
//     digital disks close to 1.
// 4.  **Size Gates**: A region survives when it has at least `pixels_threshold`
//     pixels and its bounding box covers at least `area_threshold` pixels.
// 5.  **Merging**: With `merge` enabled, surviving regions whose bounding boxes
//     overlap are fused, repeatedly, until no two boxes overlap.
// 6.  **Stateless Utility**: Nothing survives the frame. A new segmenter is
//     built for every captured image.

use crate::config::BlobQuery;
use crate::core_modules::blob::{Blob, BoundingBox, Point};
use crate::core_modules::lab_pixel::lab_pixel::LabPixel;
use crate::error::{Result, VisionError};
use crate::pipeline::Segmenter;
use image::RgbImage;
use std::f64::consts::{PI, SQRT_2};

const EIGHT_NEIGHBORS: [(i64, i64); 8] = [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)];
const FOUR_NEIGHBORS: [(i64, i64); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];
const DIAGONALS: [(i64, i64); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// Running totals for one connected region.
#[derive(Debug, Clone)]
struct Region {
    top_left: Point,
    bottom_right: Point,
    pixels: u64,
    sum_x: u64,
    sum_y: u64,
    perimeter: f64,
}

impl Region {
    fn seed(x: u32, y: u32) -> Self {
        Self {
            top_left: Point { x, y },
            bottom_right: Point { x, y },
            pixels: 0,
            sum_x: 0,
            sum_y: 0,
            perimeter: 0.0,
        }
    }

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_corners(self.top_left, self.bottom_right)
    }

    fn absorb(&mut self, other: &Region) {
        self.top_left.x = self.top_left.x.min(other.top_left.x);
        self.top_left.y = self.top_left.y.min(other.top_left.y);
        self.bottom_right.x = self.bottom_right.x.max(other.bottom_right.x);
        self.bottom_right.y = self.bottom_right.y.max(other.bottom_right.y);
        self.pixels += other.pixels;
        self.sum_x += other.sum_x;
        self.sum_y += other.sum_y;
        self.perimeter += other.perimeter;
    }

    fn into_blob(self) -> Blob {
        let count = self.pixels.max(1) as f64;
        let roundness = if self.perimeter > 0.0 {
            (4.0 * PI * self.pixels as f64 / (self.perimeter * self.perimeter)).min(1.0)
        } else {
            0.0
        };
        Blob {
            bounding_box: self.bounding_box(),
            centroid: (self.sum_x as f64 / count, self.sum_y as f64 / count),
            area: self.pixels as u32,
            roundness,
        }
    }
}

/// Segments one frame by L*a*b* color thresholds.
pub struct ColorSegmenter {
    width: u32,
    height: u32,
    lab: Vec<LabPixel>,
}

impl ColorSegmenter {
    /// Converts the frame to L*a*b* once; every query reuses the conversion.
    pub fn new(image: &RgbImage) -> Self {
        let lab = image.pixels().map(LabPixel::from).collect();
        Self {
            width: image.width(),
            height: image.height(),
            lab,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + x as usize
    }

    fn neighbor(&self, x: u32, y: u32, (dx, dy): (i64, i64)) -> Option<(u32, u32)> {
        let nx = x as i64 + dx;
        let ny = y as i64 + dy;
        if nx >= 0 && nx < self.width as i64 && ny >= 0 && ny < self.height as i64 {
            Some((nx as u32, ny as u32))
        } else {
            None
        }
    }

    fn is_member(&self, mask: &[bool], x: u32, y: u32, offset: (i64, i64)) -> bool {
        self.neighbor(x, y, offset)
            .is_some_and(|(nx, ny)| mask[self.index(nx, ny)])
    }

    /// Edge-based perimeter contribution of a single member pixel.
    fn pixel_perimeter(&self, mask: &[bool], x: u32, y: u32) -> f64 {
        let open_edges = FOUR_NEIGHBORS
            .iter()
            .filter(|&&offset| !self.is_member(mask, x, y, offset))
            .count();
        let convex_corners = DIAGONALS
            .iter()
            .filter(|&&(dx, dy)| !self.is_member(mask, x, y, (dx, 0)) && !self.is_member(mask, x, y, (0, dy)))
            .count();
        open_edges as f64 - convex_corners as f64 * (2.0 - SQRT_2)
    }

    /// Flood fill from `seed`, marking every reached pixel in `visited`.
    fn grow_region(&self, seed: (u32, u32), mask: &[bool], visited: &mut [bool]) -> Region {
        let mut region = Region::seed(seed.0, seed.1);
        let mut stack = vec![seed];
        visited[self.index(seed.0, seed.1)] = true;

        while let Some((x, y)) = stack.pop() {
            region.top_left.x = region.top_left.x.min(x);
            region.top_left.y = region.top_left.y.min(y);
            region.bottom_right.x = region.bottom_right.x.max(x);
            region.bottom_right.y = region.bottom_right.y.max(y);
            region.pixels += 1;
            region.sum_x += x as u64;
            region.sum_y += y as u64;
            region.perimeter += self.pixel_perimeter(mask, x, y);

            for offset in EIGHT_NEIGHBORS {
                if let Some((nx, ny)) = self.neighbor(x, y, offset) {
                    let index = self.index(nx, ny);
                    if mask[index] && !visited[index] {
                        visited[index] = true;
                        stack.push((nx, ny));
                    }
                }
            }
        }

        region
    }

    fn merge_overlapping(mut regions: Vec<Region>) -> Vec<Region> {
        loop {
            let mut merged_any = false;
            let mut merged: Vec<Region> = Vec::with_capacity(regions.len());
            for region in regions {
                let bbox = region.bounding_box();
                match merged.iter_mut().find(|existing| existing.bounding_box().overlaps(&bbox)) {
                    Some(existing) => {
                        existing.absorb(&region);
                        merged_any = true;
                    }
                    None => merged.push(region),
                }
            }
            regions = merged;
            if !merged_any {
                return regions;
            }
        }
    }
}

impl Segmenter for ColorSegmenter {
    fn find_blobs(&self, query: &BlobQuery) -> Result<Vec<Blob>> {
        let expected = self.width as usize * self.height as usize;
        if self.lab.len() != expected {
            return Err(VisionError::Segmentation(format!(
                "frame holds {} pixels, expected {expected}",
                self.lab.len()
            )));
        }

        // --- 1. Color Classification ---
        let mask: Vec<bool> = self
            .lab
            .iter()
            .map(|pixel| query.threshold.matches(pixel.l, pixel.a, pixel.b))
            .collect();

        // --- 2. Region Growing & Size Gates ---
        let mut visited = vec![false; mask.len()];
        let mut regions = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let index = self.index(x, y);
                if !mask[index] || visited[index] {
                    continue;
                }
                let region = self.grow_region((x, y), &mask, &mut visited);
                if region.pixels >= query.pixels_threshold as u64
                    && region.bounding_box().area() >= query.area_threshold as u64
                {
                    regions.push(region);
                }
            }
        }

        // --- 3. Merging ---
        if query.merge {
            regions = Self::merge_overlapping(regions);
        }

        Ok(regions.into_iter().map(Region::into_blob).collect())
    }
}
