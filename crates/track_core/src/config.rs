//! # Analysis Configuration
//!
//! Everything a run needs besides the tracker output itself. Loaded from
//! YAML or JSON; every field has a default.
//!
//! ```rust
//! use track_core::config::AnalysisConfig;
//!
//! let config = AnalysisConfig::default();
//! assert_eq!(config.heatmap.grid_resolution, 50);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::field;
use crate::render::heatmap::DEFAULT_OPACITY;
use crate::report::ReportLayout;
use crate::spatial::density::{DensityConfig, DEFAULT_GRID_RESOLUTION, DEFAULT_SMOOTHING_SIGMA};
use crate::types::TrackId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KinematicsConfig {
    /// Meters per pixel (default: 0.05)
    pub pixel_to_meter: f64,
    /// Source video frame rate (default: 30)
    pub fps: f64,
}

impl Default for KinematicsConfig {
    fn default() -> Self {
        Self {
            pixel_to_meter: 0.05,
            fps: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    /// Bins per axis (default: 50)
    pub grid_resolution: usize,
    /// Gaussian sigma in bins (default: 1.0)
    pub smoothing_sigma: f64,
    /// Pitch length in meters (default: 105)
    pub pitch_length: f64,
    /// Pitch width in meters (default: 68)
    pub pitch_width: f64,
    /// Overlay opacity (default: 0.7)
    pub opacity: f64,
    /// Canvas scale (default: 10)
    pub pixels_per_meter: u32,
    /// One image per identity besides the team image
    pub per_player: bool,
    /// Only render this identity's heatmap
    pub identity_filter: Option<TrackId>,
    /// TrueType font for titles; system fonts, then the bundled font, are tried when unset
    pub font_path: Option<PathBuf>,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            grid_resolution: DEFAULT_GRID_RESOLUTION,
            smoothing_sigma: DEFAULT_SMOOTHING_SIGMA,
            pitch_length: field::LENGTH_M,
            pitch_width: field::WIDTH_M,
            opacity: DEFAULT_OPACITY,
            pixels_per_meter: 10,
            per_player: true,
            identity_filter: None,
            font_path: None,
        }
    }
}

impl HeatmapConfig {
    pub fn density(&self) -> DensityConfig {
        DensityConfig {
            grid_resolution: self.grid_resolution,
            smoothing_sigma: self.smoothing_sigma,
            pitch_length: self.pitch_length,
            pitch_width: self.pitch_width,
        }
    }
}

/// Artifact file names, relative to the run's output directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub metrics_csv: PathBuf,
    pub samples_csv: PathBuf,
    pub team_heatmap: PathBuf,
    /// Per-player images are `{prefix}{id}_heatmap.png`
    pub player_heatmap_prefix: String,
    pub layout: ReportLayout,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            metrics_csv: PathBuf::from("player_tracking_data.csv"),
            samples_csv: PathBuf::from("heatmap_tracking_data.csv"),
            team_heatmap: PathBuf::from("team_heatmap.png"),
            player_heatmap_prefix: "player_".to_string(),
            layout: ReportLayout::Full,
        }
    }
}

impl OutputConfig {
    pub fn player_heatmap_name(&self, track_id: TrackId) -> String {
        format!("{}{}_heatmap.png", self.player_heatmap_prefix, track_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub kinematics: KinematicsConfig,
    pub heatmap: HeatmapConfig,
    pub output: OutputConfig,
}

impl AnalysisConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load by extension: `.json` is JSON, anything else YAML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_str(&text),
            _ => Self::from_yaml_str(&text),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let k = &self.kinematics;
        if !(k.pixel_to_meter > 0.0 && k.pixel_to_meter.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "kinematics.pixel_to_meter must be positive, got {}",
                k.pixel_to_meter
            )));
        }
        if !(k.fps > 0.0 && k.fps.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "kinematics.fps must be positive, got {}",
                k.fps
            )));
        }

        let h = &self.heatmap;
        if h.grid_resolution == 0 {
            return Err(ConfigError::Invalid(
                "heatmap.grid_resolution must be at least 1".into(),
            ));
        }
        if !(h.smoothing_sigma >= 0.0 && h.smoothing_sigma.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "heatmap.smoothing_sigma must be >= 0, got {}",
                h.smoothing_sigma
            )));
        }
        if !(h.pitch_length > 0.0 && h.pitch_width > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "heatmap pitch must have positive size, got {} x {}",
                h.pitch_length, h.pitch_width
            )));
        }
        if !(0.0..=1.0).contains(&h.opacity) {
            return Err(ConfigError::Invalid(format!(
                "heatmap.opacity must be within [0, 1], got {}",
                h.opacity
            )));
        }
        if h.pixels_per_meter == 0 {
            return Err(ConfigError::Invalid(
                "heatmap.pixels_per_meter must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
