#![allow(dead_code)]

use frontal_vision::{Blob, BlobQuery, BoundingBox, PipelineConfig, Result, Segmenter, VisionError};
use image::{Rgb, RgbImage};

pub const FIELD: Rgb<u8> = Rgb([40, 120, 40]);
pub const BALL: Rgb<u8> = Rgb([255, 120, 0]);
pub const YELLOW: Rgb<u8> = Rgb([170, 160, 120]);
pub const BLUE: Rgb<u8> = Rgb([0, 180, 220]);

/// Hands out fixed blob lists per target, the way a camera SDK would.
#[derive(Clone, Default)]
pub struct ScriptedSegmenter {
    pub config: PipelineConfig,
    pub ball: Vec<Blob>,
    pub yellow_goal: Vec<Blob>,
    pub blue_goal: Vec<Blob>,
}

impl Segmenter for ScriptedSegmenter {
    fn find_blobs(&self, query: &BlobQuery) -> Result<Vec<Blob>> {
        if query == &self.config.ball {
            Ok(self.ball.clone())
        } else if query == &self.config.yellow_goal {
            Ok(self.yellow_goal.clone())
        } else if query == &self.config.blue_goal {
            Ok(self.blue_goal.clone())
        } else {
            Err(VisionError::Segmentation(format!("unexpected query {query:?}")))
        }
    }
}

/// A blob with a square box centered on its centroid.
pub fn blob(area: u32, roundness: f64, cx: f64, cy: f64) -> Blob {
    let side = (area as f64).sqrt().ceil() as u32;
    let x = (cx - side as f64 / 2.0).max(0.0) as u32;
    let y = (cy - side as f64 / 2.0).max(0.0) as u32;
    Blob::new(BoundingBox::new(x, y, side, side), (cx, cy), area, roundness)
}

pub fn field(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, FIELD)
}

pub fn paint_rect(image: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgb<u8>) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            image.put_pixel(x, y, color);
        }
    }
}

pub fn paint_disk(image: &mut RgbImage, cx: i64, cy: i64, radius: i64, color: Rgb<u8>) {
    for y in (cy - radius)..=(cy + radius) {
        for x in (cx - radius)..=(cx + radius) {
            let inside = (x - cx).pow(2) + (y - cy).pow(2) <= radius * radius;
            if inside && x >= 0 && y >= 0 && (x as u32) < image.width() && (y as u32) < image.height() {
                image.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}
