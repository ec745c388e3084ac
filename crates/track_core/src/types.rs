//! Tracker boundary types.
//!
//! Everything the external tracker hands us per frame, plus the derived
//! integer box center used by the accumulator and the heatmap samples.

use serde::{Deserialize, Serialize};

/// Persistent identity assigned by the external tracker.
pub type TrackId = u32;

/// Axis-aligned box in source pixel coordinates.
///
/// `x1 <= x2` and `y1 <= y2` are expected but not enforced; see
/// [`BoundingBox::is_malformed`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Box from MOTChallenge `left, top, width, height`.
    pub fn from_ltwh(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    /// Integer center of the box.
    ///
    /// Coordinates are cast to integers first (truncation toward zero, the
    /// same cast the tracker rows get), then halved with floor division.
    pub fn center(&self) -> Center {
        let x1 = self.x1 as i64;
        let y1 = self.y1 as i64;
        let x2 = self.x2 as i64;
        let y2 = self.y2 as i64;
        Center {
            x: (x1 + x2).div_euclid(2),
            y: (y1 + y2).div_euclid(2),
        }
    }

    /// Inverted or non-finite box.
    pub fn is_malformed(&self) -> bool {
        let finite = self.x1.is_finite()
            && self.y1.is_finite()
            && self.x2.is_finite()
            && self.y2.is_finite();
        !finite || self.x2 < self.x1 || self.y2 < self.y1
    }
}

/// Integer pixel-space point derived from a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Center {
    pub x: i64,
    pub y: i64,
}

impl Center {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in pixels.
    pub fn distance_to(&self, other: &Center) -> f64 {
        let dx = (other.x - self.x) as f64;
        let dy = (other.y - self.y) as f64;
        dx.hypot(dy)
    }
}

/// One row of tracker output: a box and the identity it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackedBox {
    pub bbox: BoundingBox,
    pub track_id: TrackId,
}

impl TrackedBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64, track_id: TrackId) -> Self {
        Self {
            bbox: BoundingBox::new(x1, y1, x2, y2),
            track_id,
        }
    }
}

/// Tracker output for a single frame, in tracker order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameTracks {
    /// 0-based frame index
    pub frame_index: u64,
    pub tracks: Vec<TrackedBox>,
}

impl FrameTracks {
    pub fn new(frame_index: u64, tracks: Vec<TrackedBox>) -> Self {
        Self {
            frame_index,
            tracks,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// One (identity, frame) occurrence used for heatmaps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpatialSample {
    #[serde(rename = "player_id")]
    pub track_id: TrackId,
    pub x: f64,
    pub y: f64,
    pub frame: u64,
}
