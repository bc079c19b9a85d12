// THEORY:
// The `geometry` module turns a pixel position into the polar coordinates the
// downstream controller steers by. Everything is measured from a single fixed
// reference point: the optical center of the frame.
//
// Angle convention:
// 1.  The raw bearing is `atan2(dy, dx)` in degrees, with image coordinates
//     (x grows right, y grows down), wrapped into [0, 360).
// 2.  The robot-facing angle reported on the wire is `-(bearing - 180)`.
//     This flips the 0°/180° crossover and inverts the sense of rotation.
// 3.  The reported angle is not wrapped again. A bearing of 10° reports 170°,
//     a bearing of 350° reports -160°.

use serde::{Deserialize, Serialize};

/// The fixed point every distance and angle is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub x: f64,
    pub y: f64,
}

impl ReferencePoint {
    /// The frame center, using integer division of the resolution.
    pub fn from_resolution(width: u32, height: u32) -> Self {
        Self {
            x: (width / 2) as f64,
            y: (height / 2) as f64,
        }
    }

    /// Euclidean distance from the reference point to `(px, py)`. Always >= 0.
    pub fn distance(&self, px: f64, py: f64) -> f64 {
        let dx = px - self.x;
        let dy = py - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Raw bearing of `(px, py)` in degrees, in [0, 360).
    pub fn bearing(&self, px: f64, py: f64) -> f64 {
        let degrees = (py - self.y).atan2(px - self.x).to_degrees();
        if degrees < 0.0 { degrees + 360.0 } else { degrees }
    }

    /// The bearing rotated into the robot's forward-facing convention.
    pub fn reported_angle(&self, px: f64, py: f64) -> f64 {
        -(self.bearing(px, py) - 180.0)
    }

    /// Distance and reported angle of a point, as sent on the wire.
    pub fn polar(&self, px: f64, py: f64) -> Polar {
        Polar {
            distance: self.distance(px, py),
            angle: self.reported_angle(px, py),
        }
    }
}

/// A detected object's position relative to the reference point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Polar {
    /// Pixels.
    pub distance: f64,
    /// Degrees, robot-facing convention.
    pub angle: f64,
}

impl Polar {
    /// The wire value for "nothing detected".
    pub const SENTINEL: Polar = Polar {
        distance: 0.0,
        angle: 0.0,
    };
}
