use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::types::TrackId;

/// Pitch axis, used when reporting a degenerate extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Why a sample set cannot be normalized onto the pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateReason {
    /// Nothing left after the identity filter
    NoSamples { track_id: Option<TrackId> },
    /// Maximum coordinate on this axis is zero (or negative)
    ZeroExtent { axis: Axis },
}

impl fmt::Display for DegenerateReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DegenerateReason::NoSamples { track_id: None } => write!(f, "no samples"),
            DegenerateReason::NoSamples {
                track_id: Some(id),
            } => write!(f, "no samples for player {}", id),
            DegenerateReason::ZeroExtent { axis } => {
                write!(f, "maximum {} coordinate is not positive", axis)
            }
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpatialError {
    #[error("Degenerate spatial input: {reason}")]
    DegenerateInput { reason: DegenerateReason },

    #[error("Invalid density parameter: {0}")]
    InvalidParameter(String),
}

/// Failure writing a report or image. Always carries the target path.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error writing {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Image error writing {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl OutputError {
    pub fn path(&self) -> &PathBuf {
        match self {
            OutputError::Io { path, .. } => path,
            OutputError::Csv { path, .. } => path,
            OutputError::Image { path, .. } => path,
        }
    }
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML config error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON config error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
