// THEORY:
// The `BallSelector` decides which, if any, of the ball-colored blobs in a
// frame is the ball. Color alone is not enough: cables, shirts and field
// markings can share the ball's hue. The selector therefore applies a
// greedy best-first search with a two-tier quality gate.
//
// Algorithm:
// 1.  **Ranking**: Candidates are sorted by area, largest first. Among equal
//     areas the one closer to the frame center comes first.
// 2.  **Near Gate**: A blob of at least `close_area` pixels is only a ball if it
//     is also round (`roundness > min_roundness`). Large blobs have enough
//     pixels for the shape statistic to be trusted.
// 3.  **Far Gate**: A blob between `far_area` and `close_area` is accepted on
//     size alone. A distant ball is only a few pixels and its shape is noise.
// 4.  **Short-Circuit**: The first ranked candidate that passes either gate
//     wins. Later candidates are never examined, even if they would also pass.

use crate::config::BallPolicy;
use crate::core_modules::blob::Blob;
use crate::core_modules::geometry::ReferencePoint;
use std::cmp::Ordering;

/// Which gate accepted the ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallRange {
    Near,
    Far,
}

/// The accepted ball for a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct BallSelection {
    pub blob: Blob,
    pub range: BallRange,
}

pub mod ball_selector {
    use super::*;

    /// Classifies a single candidate against the two gates.
    pub fn classify(blob: &Blob, policy: &BallPolicy) -> Option<BallRange> {
        if blob.area >= policy.close_area && blob.roundness > policy.min_roundness {
            Some(BallRange::Near)
        } else if policy.far_area <= blob.area && blob.area < policy.close_area {
            Some(BallRange::Far)
        } else {
            None
        }
    }

    /// Picks at most one ball from the frame's ball-colored blobs.
    pub fn select(candidates: &[Blob], policy: &BallPolicy, reference: &ReferencePoint) -> Option<BallSelection> {
        if candidates.is_empty() {
            return None;
        }

        // --- 1. Ranking ---
        let mut ranked: Vec<(&Blob, f64)> = candidates
            .iter()
            .map(|blob| (blob, reference.distance(blob.cx(), blob.cy())))
            .collect();
        ranked.sort_by(|(a, a_dist), (b, b_dist)| match b.area.cmp(&a.area) {
            Ordering::Equal => a_dist.total_cmp(b_dist),
            unequal => unequal,
        });

        // --- 2. Gating & Short-Circuit ---
        ranked.into_iter().find_map(|(blob, _)| {
            classify(blob, policy).map(|range| BallSelection {
                blob: blob.clone(),
                range,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ball_selector::*;
    use super::*;
    use crate::core_modules::blob::BoundingBox;

    fn candidate(area: u32, roundness: f64, cx: f64, cy: f64) -> Blob {
        let side = (area as f64).sqrt().ceil() as u32;
        let x = (cx - side as f64 / 2.0).max(0.0) as u32;
        let y = (cy - side as f64 / 2.0).max(0.0) as u32;
        Blob::new(BoundingBox::new(x, y, side, side), (cx, cy), area, roundness)
    }

    fn select_default(candidates: &[Blob]) -> Option<BallSelection> {
        select(candidates, &BallPolicy::default(), &ReferencePoint::from_resolution(320, 240))
    }

    #[test]
    fn empty_list_selects_nothing() {
        assert!(select_default(&[]).is_none());
    }

    #[test]
    fn larger_round_blob_beats_smaller_far_blob() {
        let near = candidate(150, 0.9, 40.0, 40.0);
        let far = candidate(50, 0.1, 160.0, 120.0);
        let selection = select_default(&[far, near.clone()]).unwrap();
        assert_eq!(selection.blob, near);
        assert_eq!(selection.range, BallRange::Near);
    }

    #[test]
    fn large_irregular_blob_is_rejected() {
        assert!(select_default(&[candidate(150, 0.5, 160.0, 120.0)]).is_none());
    }

    #[test]
    fn large_irregular_blob_falls_through_to_far_candidate() {
        let cable = candidate(400, 0.2, 100.0, 100.0);
        let ball = candidate(20, 0.3, 250.0, 200.0);
        let selection = select_default(&[cable, ball.clone()]).unwrap();
        assert_eq!(selection.blob, ball);
        assert_eq!(selection.range, BallRange::Far);
    }

    #[test]
    fn tiny_blob_is_always_rejected() {
        assert!(select_default(&[candidate(3, 1.0, 160.0, 120.0)]).is_none());
    }

    #[test]
    fn roundness_gate_is_strict() {
        assert!(select_default(&[candidate(100, 0.7, 160.0, 120.0)]).is_none());
        let selection = select_default(&[candidate(100, 0.71, 160.0, 120.0)]).unwrap();
        assert_eq!(selection.range, BallRange::Near);
    }

    #[test]
    fn far_gate_bounds() {
        let policy = BallPolicy::default();
        assert_eq!(classify(&candidate(4, 0.0, 0.0, 0.0), &policy), Some(BallRange::Far));
        assert_eq!(classify(&candidate(99, 0.0, 0.0, 0.0), &policy), Some(BallRange::Far));
        assert_eq!(classify(&candidate(100, 0.0, 0.0, 0.0), &policy), None);
    }

    #[test]
    fn larger_qualifying_candidate_wins_over_smaller_one() {
        let small = candidate(10, 0.0, 160.0, 120.0);
        let large = candidate(80, 0.0, 10.0, 10.0);
        let selection = select_default(&[small, large.clone()]).unwrap();
        assert_eq!(selection.blob, large);
    }

    #[test]
    fn equal_areas_prefer_candidate_nearer_center() {
        let outer = candidate(30, 0.5, 300.0, 220.0);
        let inner = candidate(30, 0.5, 170.0, 125.0);
        let selection = select_default(&[outer, inner.clone()]).unwrap();
        assert_eq!(selection.blob, inner);
    }
}
