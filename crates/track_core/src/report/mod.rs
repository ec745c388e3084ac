//! # Report Module
//!
//! End-of-run metrics export (CSV / JSON).

pub mod export;

pub use export::{
    format_positional_points, MetricsExporter, MetricsReport, PlayerMetrics, ReportLayout,
};
