//! # track_core - Player Kinematics & Pitch Heatmaps
//!
//! Turns per-frame multi-object tracker output (identity-tagged boxes) into
//! per-player movement metrics and pitch occupancy heatmaps.
//!
//! ## Features
//! - Incremental per-player distance / speed / acceleration accumulation
//! - Sorted, byte-stable CSV metrics export
//! - 2D density grid with reflect-mode Gaussian smoothing
//! - PNG heatmaps drawn over standard pitch markings (team + per player)
//!
//! The detector and the tracker are external: this crate only consumes the
//! tracker's `(x1, y1, x2, y2, track_id)` rows.

// Renderers take a handful of layout parameters
#![allow(clippy::too_many_arguments)]

pub mod config;
pub mod error;
pub mod field;
pub mod input;
pub mod kinematics;
pub mod render;
pub mod report;
pub mod session;
pub mod spatial;
pub mod types;

pub use config::{AnalysisConfig, HeatmapConfig, KinematicsConfig, OutputConfig};
pub use error::{
    ConfigError, CoreError, DegenerateReason, InputError, OutputError, Result, SpatialError,
};
pub use input::{read_tracker_csv, TrackFileFormat};
pub use kinematics::{KinematicsAccumulator, PositionLog};
pub use render::{FieldRenderer, HeatmapBatch, HeatmapRenderer, HeatmapTitle};
pub use report::{MetricsExporter, MetricsReport, PlayerMetrics, ReportLayout};
pub use session::{SessionArtifacts, TrackingSession};
pub use spatial::{build_density, DensityConfig, DensityGrid, SampleLog};
pub use types::{BoundingBox, Center, FrameTracks, SpatialSample, TrackId, TrackedBox};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
