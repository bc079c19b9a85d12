//! Frame acquisition for the runner: still images standing in for the camera.

use anyhow::{Context, Result, bail};
use image::RgbImage;
use image::imageops;
use std::path::{Path, PathBuf};

/// Sensor orientation applied to every captured frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Orientation {
    /// Flip left/right.
    pub mirror: bool,
    /// Swap x and y.
    pub transpose: bool,
}

impl Orientation {
    pub fn apply(&self, image: RgbImage) -> RgbImage {
        let image = if self.mirror { imageops::flip_horizontal(&image) } else { image };
        if self.transpose {
            // A transpose is a 90° clockwise rotation followed by a horizontal flip.
            imageops::flip_horizontal(&imageops::rotate90(&image))
        } else {
            image
        }
    }
}

/// Cycles through one image file or every image in a directory, sorted by name.
pub struct ImageSequence {
    paths: Vec<PathBuf>,
    next: usize,
    orientation: Orientation,
}

const EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "ppm"];

impl ImageSequence {
    pub fn open(input: &Path, orientation: Orientation) -> Result<Self> {
        let paths = if input.is_dir() {
            let mut paths: Vec<PathBuf> = std::fs::read_dir(input)
                .with_context(|| format!("reading frame directory {}", input.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| {
                    path.extension()
                        .and_then(|ext| ext.to_str())
                        .is_some_and(|ext| EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                })
                .collect();
            paths.sort();
            paths
        } else {
            vec![input.to_path_buf()]
        };

        if paths.is_empty() {
            bail!("no frames found in {}", input.display());
        }

        Ok(Self {
            paths,
            next: 0,
            orientation,
        })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Loads the next frame, wrapping around at the end.
    pub fn capture(&mut self) -> Result<RgbImage> {
        let path = &self.paths[self.next];
        self.next = (self.next + 1) % self.paths.len();
        let image = image::open(path)
            .with_context(|| format!("decoding frame {}", path.display()))?
            .to_rgb8();
        Ok(self.orientation.apply(image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn marked() -> RgbImage {
        let mut image = RgbImage::from_pixel(4, 2, Rgb([0, 0, 0]));
        image.put_pixel(3, 0, Rgb([255, 0, 0]));
        image
    }

    #[test]
    fn mirror_flips_columns() {
        let out = Orientation { mirror: true, transpose: false }.apply(marked());
        assert_eq!(out.get_pixel(0, 0), &Rgb([255, 0, 0]));
    }

    #[test]
    fn transpose_swaps_axes() {
        let out = Orientation { mirror: false, transpose: true }.apply(marked());
        assert_eq!(out.dimensions(), (2, 4));
        assert_eq!(out.get_pixel(0, 3), &Rgb([255, 0, 0]));
    }

    #[test]
    fn cycles_through_directory() {
        let dir = std::env::temp_dir().join(format!("frontal_runner_frames_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        RgbImage::from_pixel(2, 2, Rgb([10, 10, 10])).save(dir.join("b.png")).unwrap();
        RgbImage::from_pixel(2, 2, Rgb([20, 20, 20])).save(dir.join("a.png")).unwrap();
        std::fs::write(dir.join("notes.txt"), "not a frame").unwrap();

        let mut frames = ImageSequence::open(&dir, Orientation::default()).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames.capture().unwrap().get_pixel(0, 0), &Rgb([20, 20, 20]));
        assert_eq!(frames.capture().unwrap().get_pixel(0, 0), &Rgb([10, 10, 10]));
        assert_eq!(frames.capture().unwrap().get_pixel(0, 0), &Rgb([20, 20, 20]));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
