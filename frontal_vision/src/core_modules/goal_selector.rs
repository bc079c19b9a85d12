// THEORY:
// A goal is the largest patch of its color on the field. The segmentation
// stage already discards anything below the goal's pixel and area minimums,
// so the selector only has to pick the biggest survivor. It is applied once
// for the yellow goal and once for the blue goal.

use crate::core_modules::blob::Blob;

pub mod goal_selector {
    use super::*;

    /// Returns the candidate with the largest area.
    /// On a tie the earliest candidate in input order wins.
    pub fn select_largest(candidates: &[Blob]) -> Option<&Blob> {
        candidates.iter().fold(None, |best: Option<&Blob>, blob| match best {
            Some(current) if current.area >= blob.area => Some(current),
            _ => Some(blob),
        })
    }
}
