//! Start-time configuration for the vision front-end.
//!
//! Every threshold the pipeline uses lives here. Values are fixed once the
//! pipeline is built; there is no runtime reconfiguration.

use crate::core_modules::geometry::ReferencePoint;
use crate::error::{Result, VisionError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Inclusive L*a*b* bounds, in the order `(l_min, l_max, a_min, a_max, b_min, b_max)`.
///
/// L is in 0..=100, a and b in -128..=127.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabThreshold {
    pub l_min: i8,
    pub l_max: i8,
    pub a_min: i8,
    pub a_max: i8,
    pub b_min: i8,
    pub b_max: i8,
}

impl LabThreshold {
    pub const fn new(l_min: i8, l_max: i8, a_min: i8, a_max: i8, b_min: i8, b_max: i8) -> Self {
        Self {
            l_min,
            l_max,
            a_min,
            a_max,
            b_min,
            b_max,
        }
    }

    /// True when every channel lies within its bounds.
    pub fn matches(&self, l: i8, a: i8, b: i8) -> bool {
        (self.l_min..=self.l_max).contains(&l)
            && (self.a_min..=self.a_max).contains(&a)
            && (self.b_min..=self.b_max).contains(&b)
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.l_min < 0 || self.l_max > 100 {
            return Err(VisionError::Config(format!("{name}: L bounds must lie in 0..=100")));
        }
        if self.l_min > self.l_max || self.a_min > self.a_max || self.b_min > self.b_max {
            return Err(VisionError::Config(format!("{name}: threshold minimum exceeds maximum")));
        }
        Ok(())
    }
}

/// One call to the segmentation collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlobQuery {
    pub threshold: LabThreshold,
    /// Minimum number of matching pixels in a region.
    pub pixels_threshold: u32,
    /// Minimum bounding-box area (`w * h`) of a region.
    pub area_threshold: u32,
    /// Merge regions whose bounding boxes overlap.
    pub merge: bool,
}

/// Size and shape gates for accepting a ball candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallPolicy {
    /// At or above this area a blob must also be round to count as a ball.
    pub close_area: u32,
    /// Smallest area accepted as a distant ball.
    pub far_area: u32,
    /// Roundness must be strictly greater than this for a close ball.
    pub min_roundness: f64,
}

impl Default for BallPolicy {
    fn default() -> Self {
        Self {
            close_area: 100,
            far_area: 4,
            min_roundness: 0.7,
        }
    }
}

/// Configuration for the FramePipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub image_width: u32,
    pub image_height: u32,
    pub ball_policy: BallPolicy,
    pub ball: BlobQuery,
    pub yellow_goal: BlobQuery,
    pub blue_goal: BlobQuery,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            image_width: 320,
            image_height: 240,
            ball_policy: BallPolicy::default(),
            ball: BlobQuery {
                threshold: LabThreshold::new(40, 100, 30, 127, 20, 127),
                pixels_threshold: 3,
                area_threshold: 4,
                merge: true,
            },
            yellow_goal: BlobQuery {
                threshold: LabThreshold::new(50, 73, -55, 48, 8, 28),
                pixels_threshold: 200,
                area_threshold: 800,
                merge: true,
            },
            blue_goal: BlobQuery {
                threshold: LabThreshold::new(35, 100, -128, -10, -128, -10),
                pixels_threshold: 200,
                area_threshold: 800,
                merge: true,
            },
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<()> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(VisionError::Config("resolution must be non-zero".to_string()));
        }
        if self.ball_policy.far_area > self.ball_policy.close_area {
            return Err(VisionError::Config(
                "ball_policy.far_area must not exceed ball_policy.close_area".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.ball_policy.min_roundness) {
            return Err(VisionError::Config(
                "ball_policy.min_roundness must lie in [0, 1]".to_string(),
            ));
        }
        self.ball.threshold.validate("ball")?;
        self.yellow_goal.threshold.validate("yellow_goal")?;
        self.blue_goal.threshold.validate("blue_goal")?;
        Ok(())
    }

    /// The optical center every detection is measured from.
    pub fn reference_point(&self) -> ReferencePoint {
        ReferencePoint::from_resolution(self.image_width, self.image_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = PipelineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.reference_point(), ReferencePoint { x: 160.0, y: 120.0 });
        assert_eq!(config.yellow_goal.pixels_threshold, 200);
        assert_eq!(config.blue_goal.area_threshold, 800);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config = PipelineConfig::from_toml_str(
            r#"
            image_width = 640
            image_height = 480

            [ball_policy]
            min_roundness = 0.8
            "#,
        )
        .unwrap();
        assert_eq!(config.image_width, 640);
        assert_eq!(config.ball_policy.min_roundness, 0.8);
        assert_eq!(config.ball_policy.close_area, 100);
        assert_eq!(config.ball, PipelineConfig::default().ball);
    }

    #[test]
    fn threshold_table_round_trips_through_toml() {
        let config = PipelineConfig::from_toml_str(
            r#"
            [yellow_goal]
            threshold = { l_min = 45, l_max = 80, a_min = -50, a_max = 40, b_min = 10, b_max = 40 }
            pixels_threshold = 150
            area_threshold = 600
            merge = false
            "#,
        )
        .unwrap();
        assert_eq!(config.yellow_goal.threshold, LabThreshold::new(45, 80, -50, 40, 10, 40));
        assert!(!config.yellow_goal.merge);
    }

    #[test]
    fn rejects_zero_resolution() {
        let err = PipelineConfig::from_toml_str("image_width = 0").unwrap_err();
        assert!(matches!(err, VisionError::Config(_)));
    }

    #[test]
    fn rejects_inverted_ball_areas() {
        let mut config = PipelineConfig::default();
        config.ball_policy.far_area = 200;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_threshold() {
        let mut config = PipelineConfig::default();
        config.blue_goal.threshold = LabThreshold::new(35, 100, -10, -128, -128, -10);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("blue_goal"));
    }

    #[test]
    fn threshold_bounds_are_inclusive() {
        let threshold = LabThreshold::new(40, 100, 30, 127, 20, 127);
        assert!(threshold.matches(40, 30, 20));
        assert!(threshold.matches(100, 127, 127));
        assert!(!threshold.matches(39, 60, 60));
        assert!(!threshold.matches(60, 29, 60));
    }
}
