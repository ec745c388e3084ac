//! # Kinematics Accumulator
//!
//! Per-identity distance and displacement-delta accumulation, one tracker
//! frame at a time.
//!
//! ## Algorithm
//! For every `(box, track_id)` in a frame:
//! 1. center = integer midpoint of the box
//! 2. if a previous center exists: `step = |center - last| * pixel_to_meter`,
//!    added to the cumulative distance
//! 3. if two previous centers exist: `prev_step = |last - prev| * pixel_to_meter`,
//!    and `step - prev_step` is pushed as an acceleration sample
//! 4. center is appended to the history
//!
//! The acceleration sample is a per-frame displacement difference; it is not
//! divided by the frame duration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use super::position_log::PositionLog;
use crate::types::{Center, TrackId, TrackedBox};

/// Distance and delta state for one identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionState {
    /// Cumulative distance in meters
    pub total_distance_m: f64,
    /// `step - previous_step` per transition, meters per frame
    pub displacement_deltas: Vec<f64>,
}

/// Run-wide per-identity accumulator.
///
/// State is created on first sight of an identity and kept for the whole
/// run. Feed each frame exactly once: a repeated frame is counted twice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KinematicsAccumulator {
    positions: BTreeMap<TrackId, PositionLog>,
    motion: BTreeMap<TrackId, MotionState>,
    malformed_boxes: u64,
}

impl KinematicsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one frame of tracker output into the accumulated state.
    pub fn update(&mut self, frame_tracks: &[TrackedBox], pixel_to_meter: f64) {
        for track in frame_tracks {
            if track.bbox.is_malformed() {
                self.malformed_boxes += 1;
                warn!(
                    track_id = track.track_id,
                    x1 = track.bbox.x1,
                    y1 = track.bbox.y1,
                    x2 = track.bbox.x2,
                    y2 = track.bbox.y2,
                    "malformed box, center will be skewed"
                );
            }

            let center = track.bbox.center();
            self.observe(track.track_id, center, pixel_to_meter);
        }
    }

    fn observe(&mut self, track_id: TrackId, center: Center, pixel_to_meter: f64) {
        let history = self.positions.entry(track_id).or_default();
        let motion = self.motion.entry(track_id).or_default();

        if let Some(last) = history.last() {
            let step = last.distance_to(&center) * pixel_to_meter;
            motion.total_distance_m += step;

            if let Some((prev, last)) = history.last_two() {
                let prev_step = prev.distance_to(last) * pixel_to_meter;
                motion.displacement_deltas.push(step - prev_step);
            }

            trace!(track_id, step, total = motion.total_distance_m, "step");
        }

        history.push(center);
    }

    /// Center history; empty for an identity never seen.
    pub fn position_history(&self, track_id: TrackId) -> &[Center] {
        self.positions
            .get(&track_id)
            .map(PositionLog::as_slice)
            .unwrap_or(&[])
    }

    /// Cumulative distance in meters; 0.0 for an identity never seen.
    pub fn total_distance(&self, track_id: TrackId) -> f64 {
        self.motion
            .get(&track_id)
            .map(|m| m.total_distance_m)
            .unwrap_or(0.0)
    }

    /// Acceleration samples; empty for an identity never seen.
    pub fn displacement_deltas(&self, track_id: TrackId) -> &[f64] {
        self.motion
            .get(&track_id)
            .map(|m| m.displacement_deltas.as_slice())
            .unwrap_or(&[])
    }

    pub fn frames_tracked(&self, track_id: TrackId) -> usize {
        self.position_history(track_id).len()
    }

    /// Every identity seen so far, ascending.
    pub fn identities(&self) -> impl Iterator<Item = TrackId> + '_ {
        self.positions.keys().copied()
    }

    /// Number of identities seen.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Inverted or non-finite boxes seen so far.
    pub fn malformed_boxes(&self) -> u64 {
        self.malformed_boxes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Box whose integer center is exactly `(cx, cy)`.
    fn box_at(cx: i64, cy: i64, track_id: TrackId) -> TrackedBox {
        TrackedBox::new(
            (cx - 5) as f64,
            (cy - 10) as f64,
            (cx + 5) as f64,
            (cy + 10) as f64,
            track_id,
        )
    }

    #[test]
    fn test_three_frame_scenario() {
        let mut acc = KinematicsAccumulator::new();
        acc.update(&[box_at(0, 0, 7)], 0.1);
        acc.update(&[box_at(10, 0, 7)], 0.1);
        acc.update(&[box_at(10, 10, 7)], 0.1);

        assert!((acc.total_distance(7) - 2.0).abs() < 1e-12);
        assert_eq!(acc.frames_tracked(7), 3);
        assert_eq!(acc.displacement_deltas(7).len(), 1);
        assert!(acc.displacement_deltas(7)[0].abs() < 1e-12);
    }

    #[test]
    fn test_single_observation_has_no_distance() {
        let mut acc = KinematicsAccumulator::new();
        acc.update(&[box_at(50, 50, 1)], 0.05);

        assert_eq!(acc.total_distance(1), 0.0);
        assert_eq!(acc.frames_tracked(1), 1);
        assert!(acc.displacement_deltas(1).is_empty());
    }

    #[test]
    fn test_unseen_identity_defaults() {
        let acc = KinematicsAccumulator::new();
        assert!(acc.position_history(99).is_empty());
        assert_eq!(acc.total_distance(99), 0.0);
        assert!(acc.displacement_deltas(99).is_empty());
        assert_eq!(acc.frames_tracked(99), 0);
        assert!(acc.is_empty());
    }

    #[test]
    fn test_empty_frames_change_nothing() {
        let mut acc = KinematicsAccumulator::new();
        acc.update(&[box_at(0, 0, 3), box_at(20, 0, 4)], 0.1);
        acc.update(&[box_at(5, 0, 3)], 0.1);
        let before_history = acc.position_history(3).to_vec();
        let before_distance = acc.total_distance(3);

        for _ in 0..5 {
            acc.update(&[], 0.1);
        }

        assert_eq!(acc.len(), 2);
        assert_eq!(acc.position_history(3), before_history.as_slice());
        assert_eq!(acc.total_distance(3), before_distance);
        assert_eq!(acc.identities().collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn test_identities_independent() {
        let mut acc = KinematicsAccumulator::new();
        acc.update(&[box_at(0, 0, 2), box_at(100, 100, 1)], 1.0);
        acc.update(&[box_at(3, 4, 2), box_at(100, 100, 1)], 1.0);

        assert!((acc.total_distance(2) - 5.0).abs() < 1e-12);
        assert_eq!(acc.total_distance(1), 0.0);
        assert_eq!(acc.identities().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_delta_sign() {
        let mut acc = KinematicsAccumulator::new();
        // steps: 10px then 30px then 5px
        acc.update(&[box_at(0, 0, 1)], 1.0);
        acc.update(&[box_at(10, 0, 1)], 1.0);
        acc.update(&[box_at(40, 0, 1)], 1.0);
        acc.update(&[box_at(45, 0, 1)], 1.0);

        assert_eq!(acc.displacement_deltas(1), &[20.0, -25.0]);
    }

    #[test]
    fn test_repeated_frame_double_counts() {
        let mut acc = KinematicsAccumulator::new();
        let frame = [box_at(0, 0, 1)];
        acc.update(&frame, 1.0);
        acc.update(&frame, 1.0);
        assert_eq!(acc.frames_tracked(1), 2);
    }

    #[test]
    fn test_malformed_box_is_counted_not_fatal() {
        let mut acc = KinematicsAccumulator::new();
        acc.update(&[TrackedBox::new(20.0, 20.0, 10.0, 10.0, 5)], 1.0);
        acc.update(&[box_at(15, 15, 5)], 1.0);

        assert_eq!(acc.malformed_boxes(), 1);
        assert_eq!(acc.frames_tracked(5), 2);
        assert_eq!(acc.position_history(5)[0], Center::new(15, 15));
    }

    proptest! {
        #[test]
        fn prop_distance_matches_path_length(
            centers in prop::collection::vec((-2000i64..2000, -2000i64..2000), 1..40),
            pixel_to_meter in 0.001f64..1.0,
        ) {
            let mut acc = KinematicsAccumulator::new();
            for &(x, y) in &centers {
                acc.update(&[box_at(x, y, 11)], pixel_to_meter);
            }

            let expected: f64 = centers
                .windows(2)
                .map(|w| Center::new(w[0].0, w[0].1).distance_to(&Center::new(w[1].0, w[1].1)))
                .sum::<f64>()
                * pixel_to_meter;

            prop_assert!((acc.total_distance(11) - expected).abs() <= 1e-9 * expected.max(1.0));
            prop_assert_eq!(acc.frames_tracked(11), centers.len());
            prop_assert_eq!(
                acc.displacement_deltas(11).len(),
                centers.len().saturating_sub(2)
            );
        }

        #[test]
        fn prop_distance_non_decreasing(
            centers in prop::collection::vec((0i64..640, 0i64..480), 1..30),
        ) {
            let mut acc = KinematicsAccumulator::new();
            let mut last = 0.0;
            for &(x, y) in &centers {
                acc.update(&[box_at(x, y, 0)], 0.05);
                let now = acc.total_distance(0);
                prop_assert!(now >= last);
                last = now;
            }
        }
    }
}
