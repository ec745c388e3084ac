//! Track Report Library
//!
//! Recorded tracker CSV → metrics CSV + heatmap samples + PNG heatmaps,
//! with a JSON summary of the run.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use track_core::input::{read_tracker_csv, TrackFileFormat};
use track_core::render::HeatmapBatch;
use track_core::session::render_heatmaps;
use track_core::{AnalysisConfig, SampleLog, TrackId, TrackingSession};

pub const SUMMARY_FILE: &str = "run_summary.json";

/// A heatmap that was not drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedArtifact {
    pub title: String,
    pub path: PathBuf,
    pub reason: String,
}

/// Heatmap outcome of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeatmapSummary {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<SkippedArtifact>,
    pub failed: Vec<String>,
}

impl From<&HeatmapBatch> for HeatmapSummary {
    fn from(batch: &HeatmapBatch) -> Self {
        Self {
            written: batch.written.clone(),
            skipped: batch
                .skipped
                .iter()
                .map(|s| SkippedArtifact {
                    title: s.title.to_string(),
                    path: s.path.clone(),
                    reason: s.reason.to_string(),
                })
                .collect(),
            failed: batch.failed.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Contents of `run_summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// RFC3339
    pub created_at: String,
    pub tracks_file: PathBuf,
    pub frames_processed: u64,
    pub identities: Vec<TrackId>,
    pub samples: usize,
    pub malformed_boxes: u64,
    pub metrics_csv: PathBuf,
    pub samples_csv: PathBuf,
    pub heatmaps: HeatmapSummary,
}

/// Full run: read the tracker file, accumulate, write every artifact and
/// `run_summary.json` into `out_dir`.
pub fn run_analysis(
    config: &AnalysisConfig,
    tracks_file: &Path,
    format: TrackFileFormat,
    out_dir: &Path,
) -> Result<RunSummary> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let frames = read_tracker_csv(tracks_file, format)
        .with_context(|| format!("Failed to read tracker file: {}", tracks_file.display()))?;

    let mut session = TrackingSession::new(config.clone()).context("Invalid configuration")?;
    session.ingest(&frames);

    let artifacts = session
        .finish(out_dir)
        .context("Failed to write run artifacts")?;

    let summary = RunSummary {
        created_at: chrono::Utc::now().to_rfc3339(),
        tracks_file: tracks_file.to_path_buf(),
        frames_processed: session.frames_processed(),
        identities: session.accumulator().identities().collect(),
        samples: session.samples().len(),
        malformed_boxes: session.accumulator().malformed_boxes(),
        metrics_csv: artifacts.metrics_csv.clone(),
        samples_csv: artifacts.samples_csv.clone(),
        heatmaps: HeatmapSummary::from(&artifacts.heatmaps),
    };

    save_summary(&out_dir.join(SUMMARY_FILE), &summary)?;
    Ok(summary)
}

/// Redraw heatmaps from a previously written samples CSV.
pub fn render_from_samples(
    config: &AnalysisConfig,
    samples_csv: &Path,
    out_dir: &Path,
) -> Result<HeatmapSummary> {
    config.validate().context("Invalid configuration")?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let samples = SampleLog::read_csv(samples_csv)
        .with_context(|| format!("Failed to read samples: {}", samples_csv.display()))?;
    info!(path = %samples_csv.display(), samples = samples.len(), "samples loaded");

    let batch = render_heatmaps(config, &samples, out_dir);
    Ok(HeatmapSummary::from(&batch))
}

pub fn save_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("Failed to serialize run summary")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write run summary: {}", path.display()))?;
    Ok(())
}
