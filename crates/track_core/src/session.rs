//! # Tracking Session
//!
//! Feeds each frame to both consumers of tracker output: the
//! [`KinematicsAccumulator`] and the run-wide [`SampleLog`]. At the end of the
//! run (or after an early stop) the session writes every artifact.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::{AnalysisConfig, HeatmapConfig};
use crate::error::{ConfigError, CoreError, OutputError};
use crate::kinematics::KinematicsAccumulator;
use crate::render::{HeatmapBatch, HeatmapRenderer};
use crate::report::{MetricsExporter, MetricsReport};
use crate::spatial::SampleLog;
use crate::types::{FrameTracks, TrackId};

/// Paths of everything [`TrackingSession::finish`] produced.
#[derive(Debug, Default)]
pub struct SessionArtifacts {
    pub metrics_csv: PathBuf,
    pub samples_csv: PathBuf,
    pub heatmaps: HeatmapBatch,
}

#[derive(Debug)]
pub struct TrackingSession {
    config: AnalysisConfig,
    accumulator: KinematicsAccumulator,
    samples: SampleLog,
    frames: u64,
}

impl TrackingSession {
    pub fn new(config: AnalysisConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            accumulator: KinematicsAccumulator::new(),
            samples: SampleLog::new(),
            frames: 0,
        })
    }

    /// Process one frame. Empty frames only advance the frame count.
    pub fn ingest_frame(&mut self, frame: &FrameTracks) {
        self.accumulator
            .update(&frame.tracks, self.config.kinematics.pixel_to_meter);
        self.samples.record_frame(frame.frame_index, &frame.tracks);
        self.frames += 1;

        debug!(
            frame = frame.frame_index,
            tracks = frame.tracks.len(),
            "frame ingested"
        );
    }

    pub fn ingest<'a, I>(&mut self, frames: I)
    where
        I: IntoIterator<Item = &'a FrameTracks>,
    {
        for frame in frames {
            self.ingest_frame(frame);
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn accumulator(&self) -> &KinematicsAccumulator {
        &self.accumulator
    }

    pub fn samples(&self) -> &SampleLog {
        &self.samples
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames
    }

    pub fn report(&self) -> MetricsReport {
        MetricsExporter::new(self.config.kinematics.fps).export(&self.accumulator)
    }

    pub fn write_metrics(&self, path: &Path) -> Result<(), OutputError> {
        self.report().write_csv(path, self.config.output.layout)
    }

    pub fn write_samples(&self, path: &Path) -> Result<(), OutputError> {
        self.samples.write_csv(path)
    }

    pub fn heatmap_targets(&self) -> (bool, Vec<TrackId>) {
        heatmap_targets(&self.config.heatmap, &self.samples)
    }

    /// Team and per-player heatmaps into `out_dir`.
    pub fn render_heatmaps(&self, out_dir: &Path) -> HeatmapBatch {
        render_heatmaps(&self.config, &self.samples, out_dir)
    }

    /// Write the metrics CSV, the samples CSV and the heatmaps into
    /// `out_dir`. CSV failures abort; heatmap problems are collected.
    pub fn finish(&self, out_dir: &Path) -> Result<SessionArtifacts, CoreError> {
        let output = &self.config.output;

        let metrics_csv = out_dir.join(&output.metrics_csv);
        self.write_metrics(&metrics_csv)?;

        let samples_csv = out_dir.join(&output.samples_csv);
        self.write_samples(&samples_csv)?;

        let heatmaps = self.render_heatmaps(out_dir);

        info!(
            frames = self.frames,
            identities = self.accumulator.len(),
            heatmaps = heatmaps.written.len(),
            skipped = heatmaps.skipped.len(),
            "session finished"
        );

        Ok(SessionArtifacts {
            metrics_csv,
            samples_csv,
            heatmaps,
        })
    }
}

/// Whether the team heatmap is drawn, and the identities that get their own
/// heatmap. An identity filter narrows the run to that single player.
pub fn heatmap_targets(config: &HeatmapConfig, samples: &SampleLog) -> (bool, Vec<TrackId>) {
    match config.identity_filter {
        Some(id) => (false, vec![id]),
        None if config.per_player => (true, samples.identities()),
        None => (true, Vec::new()),
    }
}

/// Render the configured heatmaps for `samples` into `out_dir`.
pub fn render_heatmaps(config: &AnalysisConfig, samples: &SampleLog, out_dir: &Path) -> HeatmapBatch {
    let output = &config.output;
    let renderer = HeatmapRenderer::from_config(&config.heatmap);
    let (team, players) = heatmap_targets(&config.heatmap, samples);
    let team_path = team.then(|| out_dir.join(&output.team_heatmap));

    renderer.render_batch(
        samples.as_slice(),
        team_path.as_deref(),
        &players,
        |id| out_dir.join(output.player_heatmap_name(id)),
    )
}
