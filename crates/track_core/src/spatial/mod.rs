//! # Spatial Module
//!
//! Heatmap samples and the smoothed density grid built from them.
//!
//! - `samples` - run-wide (identity, x, y, frame) collection + CSV persistence
//! - `density` - pitch normalization and 2D histogram
//! - `smoothing` - reflect-mode Gaussian blur

pub mod density;
pub mod samples;
pub mod smoothing;

pub use density::{build_density, DensityConfig, DensityGrid};
pub use samples::SampleLog;
pub use smoothing::gaussian_filter;
