//! # Render Module
//!
//! PNG heatmaps over a drawn pitch.
//!
//! - `field` - canvas layout and pitch markings
//! - `colormap` - five-stop intensity ramp
//! - `text` - optional TrueType title/labels
//! - `heatmap` - overlay, colorbar, file output, batch rendering

pub mod colormap;
pub mod field;
pub mod heatmap;
pub mod text;

pub use field::{CanvasLayout, FieldRenderer};
pub use heatmap::{HeatmapBatch, HeatmapRenderer, HeatmapTitle, SkippedHeatmap};
