//! # Density Grid
//!
//! Bins heatmap samples onto the pitch.
//!
//! ## Algorithm
//! 1. Optionally keep one identity
//! 2. Scale `x / max(x) * length`, `y / max(y) * width` (maxima of the kept set)
//! 3. 2D histogram, `resolution × resolution` bins over `[0, length] × [0, width]`;
//!    bins are half-open except the last, points outside are dropped
//! 4. Gaussian blur (see `smoothing`)

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::smoothing::gaussian_filter;
use crate::error::{Axis, DegenerateReason, SpatialError};
use crate::field::PitchDimensions;
use crate::types::{SpatialSample, TrackId};

pub const DEFAULT_GRID_RESOLUTION: usize = 50;
pub const DEFAULT_SMOOTHING_SIGMA: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityConfig {
    pub grid_resolution: usize,
    pub smoothing_sigma: f64,
    pub pitch_length: f64,
    pub pitch_width: f64,
}

impl Default for DensityConfig {
    fn default() -> Self {
        let pitch = PitchDimensions::default();
        Self {
            grid_resolution: DEFAULT_GRID_RESOLUTION,
            smoothing_sigma: DEFAULT_SMOOTHING_SIGMA,
            pitch_length: pitch.length_m,
            pitch_width: pitch.width_m,
        }
    }
}

impl DensityConfig {
    pub fn pitch(&self) -> PitchDimensions {
        PitchDimensions::new(self.pitch_length, self.pitch_width)
    }

    fn validate(&self) -> Result<(), SpatialError> {
        if self.grid_resolution == 0 {
            return Err(SpatialError::InvalidParameter(
                "grid_resolution must be at least 1".into(),
            ));
        }
        if !(self.smoothing_sigma >= 0.0 && self.smoothing_sigma.is_finite()) {
            return Err(SpatialError::InvalidParameter(format!(
                "smoothing_sigma must be finite and >= 0, got {}",
                self.smoothing_sigma
            )));
        }
        if !(self.pitch_length > 0.0 && self.pitch_width > 0.0) {
            return Err(SpatialError::InvalidParameter(format!(
                "pitch must have positive size, got {} x {}",
                self.pitch_length, self.pitch_width
            )));
        }
        Ok(())
    }
}

/// Histogram and smoothed grid over the pitch.
///
/// Rows index x bins (along the pitch length), columns index y bins.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityGrid {
    pub counts: DMatrix<f64>,
    pub smoothed: DMatrix<f64>,
    /// `resolution + 1` edges over `[0, length]`
    pub x_edges: Vec<f64>,
    /// `resolution + 1` edges over `[0, width]`
    pub y_edges: Vec<f64>,
    /// Samples that passed the identity filter
    pub sample_count: usize,
    pub track_id: Option<TrackId>,
}

impl DensityGrid {
    pub fn x_bins(&self) -> usize {
        self.counts.nrows()
    }

    pub fn y_bins(&self) -> usize {
        self.counts.ncols()
    }

    /// Samples that landed inside the pitch.
    pub fn binned_mass(&self) -> f64 {
        self.counts.sum()
    }

    pub fn smoothed_mass(&self) -> f64 {
        self.smoothed.sum()
    }

    /// `(min, max)` of the smoothed grid.
    pub fn intensity_range(&self) -> (f64, f64) {
        self.smoothed
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Smoothed grid min-max scaled to `[0, 1]`; all zeros when flat.
    pub fn normalized(&self) -> DMatrix<f64> {
        let (lo, hi) = self.intensity_range();
        let span = hi - lo;
        if !(span > 0.0) {
            return DMatrix::zeros(self.smoothed.nrows(), self.smoothed.ncols());
        }
        self.smoothed.map(|v| (v - lo) / span)
    }
}

/// Build the density grid for all samples, or one identity's samples.
pub fn build_density(
    samples: &[SpatialSample],
    config: &DensityConfig,
    identity_filter: Option<TrackId>,
) -> Result<DensityGrid, SpatialError> {
    config.validate()?;

    let selected: Vec<&SpatialSample> = samples
        .iter()
        .filter(|s| identity_filter.map_or(true, |id| s.track_id == id))
        .collect();

    if selected.is_empty() {
        return Err(SpatialError::DegenerateInput {
            reason: DegenerateReason::NoSamples {
                track_id: identity_filter,
            },
        });
    }

    let max_x = selected.iter().map(|s| s.x).fold(f64::NEG_INFINITY, f64::max);
    let max_y = selected.iter().map(|s| s.y).fold(f64::NEG_INFINITY, f64::max);

    // Guard the divisor before scaling
    if !(max_x > 0.0) {
        return Err(SpatialError::DegenerateInput {
            reason: DegenerateReason::ZeroExtent { axis: Axis::X },
        });
    }
    if !(max_y > 0.0) {
        return Err(SpatialError::DegenerateInput {
            reason: DegenerateReason::ZeroExtent { axis: Axis::Y },
        });
    }

    let bins = config.grid_resolution;
    let (length, width) = (config.pitch_length, config.pitch_width);
    let mut counts = DMatrix::<f64>::zeros(bins, bins);
    let mut dropped = 0usize;

    for sample in &selected {
        let x = sample.x / max_x * length;
        let y = sample.y / max_y * width;

        match (bin_index(x, length, bins), bin_index(y, width, bins)) {
            (Some(i), Some(j)) => counts[(i, j)] += 1.0,
            _ => dropped += 1,
        }
    }

    debug!(
        track_id = ?identity_filter,
        samples = selected.len(),
        dropped,
        max_x,
        max_y,
        "density histogram built"
    );

    let smoothed = gaussian_filter(&counts, config.smoothing_sigma);

    Ok(DensityGrid {
        counts,
        smoothed,
        x_edges: linspace(0.0, length, bins + 1),
        y_edges: linspace(0.0, width, bins + 1),
        sample_count: selected.len(),
        track_id: identity_filter,
    })
}

/// Bin of `value` in `bins` equal bins over `[0, hi]`; the top edge belongs
/// to the last bin.
fn bin_index(value: f64, hi: f64, bins: usize) -> Option<usize> {
    if !(value >= 0.0 && value <= hi) {
        return None;
    }
    if value == hi {
        return Some(bins - 1);
    }
    let idx = (value / hi * bins as f64).floor() as usize;
    Some(idx.min(bins - 1))
}

fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    let steps = (count - 1).max(1) as f64;
    (0..count)
        .map(|i| start + (end - start) * i as f64 / steps)
        .collect()
}
