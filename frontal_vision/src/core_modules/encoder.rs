// THEORY:
// The `encoder` module owns the wire format spoken to the downstream
// controller. One frame becomes one ASCII line:
//
//     dist_ball ang_ball dist_yellow ang_yellow dist_blue ang_blue\n
//
// Key points:
// 1.  **Fixed Order**: ball, yellow goal, blue goal. Always six fields.
// 2.  **Sentinel**: A target that was not seen is written as `0 0`. The wire
//     cannot tell this apart from an object exactly at the reference point with
//     a zero angle; the presence flag only exists inside the process.
// 3.  **Plain Decimals**: Numbers use Rust's shortest round-trip formatting, so
//     a whitespace-split float parser on the receiver reads back the exact
//     value. Negative zero is written as `0`.

use crate::core_modules::geometry::Polar;

pub mod encoder {
    use super::*;
    use std::fmt::Write;

    pub const FIELDS_PER_LINE: usize = 6;

    fn write_number(line: &mut String, value: f64) {
        // -0.0 == 0.0, so this also folds the negative zero.
        let value = if value == 0.0 { 0.0 } else { value };
        // Writing into a String cannot fail.
        let _ = write!(line, "{value}");
    }

    /// Serializes one frame's detections into a wire line.
    pub fn encode(ball: Option<Polar>, yellow_goal: Option<Polar>, blue_goal: Option<Polar>) -> Vec<u8> {
        let mut line = String::with_capacity(64);
        for (index, detection) in [ball, yellow_goal, blue_goal].into_iter().enumerate() {
            let polar = detection.unwrap_or(Polar::SENTINEL);
            if index > 0 {
                line.push(' ');
            }
            write_number(&mut line, polar.distance);
            line.push(' ');
            write_number(&mut line, polar.angle);
        }
        line.push('\n');
        line.into_bytes()
    }

    /// Parses a wire line back into its six fields, the way the controller does.
    pub fn decode(line: &str) -> Option<[f64; FIELDS_PER_LINE]> {
        let mut fields = [0.0; FIELDS_PER_LINE];
        let mut parts = line.split_whitespace();
        for field in fields.iter_mut() {
            *field = parts.next()?.parse().ok()?;
        }
        if parts.next().is_some() {
            return None;
        }
        Some(fields)
    }
}
