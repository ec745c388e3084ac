//! Metrics export.
//!
//! Reduces the accumulator into one row per identity (ascending id) and
//! writes the CSV report:
//!
//! ```text
//! Player ID,Total Distance (m),Average Speed (m/s),Average Acceleration (m/s²),Positional Points
//! 7,2.0,20.0,0.0,"(0, 0); (10, 0); (10, 10)"
//! ```

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::OutputError;
use crate::kinematics::KinematicsAccumulator;
use crate::types::{Center, TrackId};

pub const HEADER_PLAYER_ID: &str = "Player ID";
pub const HEADER_TOTAL_DISTANCE: &str = "Total Distance (m)";
pub const HEADER_AVG_SPEED: &str = "Average Speed (m/s)";
pub const HEADER_AVG_ACCELERATION: &str = "Average Acceleration (m/s²)";
pub const HEADER_POSITIONAL_POINTS: &str = "Positional Points";

/// Which columns the CSV report carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportLayout {
    /// All five columns
    #[default]
    Full,
    /// Id, distance and speed only
    Basic,
}

impl ReportLayout {
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            ReportLayout::Full => &[
                HEADER_PLAYER_ID,
                HEADER_TOTAL_DISTANCE,
                HEADER_AVG_SPEED,
                HEADER_AVG_ACCELERATION,
                HEADER_POSITIONAL_POINTS,
            ],
            ReportLayout::Basic => &[HEADER_PLAYER_ID, HEADER_TOTAL_DISTANCE, HEADER_AVG_SPEED],
        }
    }
}

/// Finalized metrics for one identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMetrics {
    pub track_id: TrackId,
    /// Meters
    pub total_distance: f64,
    pub frames_tracked: usize,
    /// Meters per second
    pub avg_speed: f64,
    /// Mean displacement delta (meters per frame, per frame)
    pub avg_acceleration: f64,
    pub positions: Vec<Center>,
}

impl PlayerMetrics {
    fn record(&self, layout: ReportLayout) -> Vec<String> {
        let mut record = vec![
            self.track_id.to_string(),
            format_float(self.total_distance),
            format_float(self.avg_speed),
        ];
        if layout == ReportLayout::Full {
            record.push(format_float(self.avg_acceleration));
            record.push(format_positional_points(&self.positions));
        }
        record
    }
}

/// Snapshot of all identities, sorted ascending by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub fps: f64,
    pub rows: Vec<PlayerMetrics>,
}

impl MetricsReport {
    pub fn get(&self, track_id: TrackId) -> Option<&PlayerMetrics> {
        self.rows
            .binary_search_by_key(&track_id, |row| row.track_id)
            .ok()
            .map(|idx| &self.rows[idx])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write header and rows to any sink.
    pub fn write_csv_to<W: io::Write>(&self, sink: W, layout: ReportLayout) -> csv::Result<()> {
        let mut writer = csv::Writer::from_writer(sink);
        writer.write_record(layout.header())?;
        for row in &self.rows {
            writer.write_record(row.record(layout))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Render the CSV in memory.
    pub fn to_csv_string(&self, layout: ReportLayout) -> csv::Result<String> {
        let mut buffer = Vec::new();
        self.write_csv_to(&mut buffer, layout)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Write the CSV report to `path`, replacing any existing file.
    pub fn write_csv(&self, path: &Path, layout: ReportLayout) -> Result<(), OutputError> {
        let file = std::fs::File::create(path).map_err(|source| OutputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.write_csv_to(io::BufWriter::new(file), layout)
            .map_err(|source| OutputError::Csv {
                path: path.to_path_buf(),
                source,
            })?;

        info!(path = %path.display(), players = self.rows.len(), "metrics report written");
        Ok(())
    }
}

/// Reduces accumulated kinematics into a [`MetricsReport`].
#[derive(Debug, Clone, Copy)]
pub struct MetricsExporter {
    pub fps: f64,
}

impl MetricsExporter {
    pub fn new(fps: f64) -> Self {
        Self { fps }
    }

    /// Build one row per identity seen, ascending by id.
    ///
    /// Reads only; calling it again without further updates gives an equal
    /// report.
    pub fn export(&self, accumulator: &KinematicsAccumulator) -> MetricsReport {
        let rows = accumulator
            .identities()
            .map(|track_id| self.player_metrics(accumulator, track_id))
            .collect();

        MetricsReport {
            fps: self.fps,
            rows,
        }
    }

    /// Metrics for a single identity; zeroed when it was never observed.
    pub fn player_metrics(
        &self,
        accumulator: &KinematicsAccumulator,
        track_id: TrackId,
    ) -> PlayerMetrics {
        let total_distance = accumulator.total_distance(track_id);
        let positions = accumulator.position_history(track_id);
        let frames_tracked = positions.len();

        let avg_speed = if frames_tracked > 0 {
            (total_distance / frames_tracked as f64) * self.fps
        } else {
            0.0
        };

        let deltas = accumulator.displacement_deltas(track_id);
        let avg_acceleration = if deltas.is_empty() {
            0.0
        } else {
            deltas.iter().sum::<f64>() / deltas.len() as f64
        };

        PlayerMetrics {
            track_id,
            total_distance,
            frames_tracked,
            avg_speed,
            avg_acceleration,
            positions: positions.to_vec(),
        }
    }
}

/// `"(x1, y1); (x2, y2); ..."`, empty for no positions.
pub fn format_positional_points(positions: &[Center]) -> String {
    positions
        .iter()
        .map(|c| format!("({}, {})", c.x, c.y))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Shortest round-trip form, always with a fractional part for whole values.
fn format_float(value: f64) -> String {
    format!("{:?}", value)
}
