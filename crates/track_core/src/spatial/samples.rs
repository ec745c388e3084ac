//! Run-wide heatmap sample collection.
//!
//! One [`SpatialSample`] per (identity, frame) occurrence, persisted as
//! `player_id,x,y,frame` so heatmaps can be rebuilt without re-tracking.
//! Coordinates are written as floats (`15.0`, not `15`) and `frame` is the
//! source frame index, not the running sample count. Integer coordinates are
//! still accepted on read.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::info;

use crate::error::{InputError, OutputError};
use crate::types::{SpatialSample, TrackId, TrackedBox};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleLog {
    samples: Vec<SpatialSample>,
}

impl SampleLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the box centers of one frame.
    pub fn record_frame(&mut self, frame_index: u64, tracks: &[TrackedBox]) {
        self.samples.extend(tracks.iter().map(|track| {
            let center = track.bbox.center();
            SpatialSample {
                track_id: track.track_id,
                x: center.x as f64,
                y: center.y as f64,
                frame: frame_index,
            }
        }));
    }

    pub fn as_slice(&self) -> &[SpatialSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Distinct identities, ascending.
    pub fn identities(&self) -> Vec<TrackId> {
        self.samples
            .iter()
            .map(|s| s.track_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn write_csv(&self, path: &Path) -> Result<(), OutputError> {
        let to_csv_err = |source| OutputError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = csv::Writer::from_path(path).map_err(to_csv_err)?;
        for sample in &self.samples {
            writer.serialize(sample).map_err(to_csv_err)?;
        }
        writer.flush().map_err(|source| OutputError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), samples = self.samples.len(), "heatmap samples written");
        Ok(())
    }

    pub fn read_csv(path: &Path) -> Result<Self, InputError> {
        let to_csv_err = |source| InputError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::Reader::from_path(path).map_err(to_csv_err)?;
        let samples = reader
            .deserialize()
            .collect::<Result<Vec<SpatialSample>, _>>()
            .map_err(to_csv_err)?;

        Ok(Self { samples })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_frame_uses_centers() {
        let mut log = SampleLog::new();
        log.record_frame(
            4,
            &[
                TrackedBox::new(10.0, 10.0, 20.0, 30.0, 2),
                TrackedBox::new(0.0, 0.0, 5.0, 5.0, 1),
            ],
        );

        assert_eq!(log.len(), 2);
        assert_eq!(
            log.as_slice()[0],
            SpatialSample {
                track_id: 2,
                x: 15.0,
                y: 20.0,
                frame: 4
            }
        );
        assert_eq!(log.as_slice()[1].x, 2.0);
        assert_eq!(log.identities(), vec![1, 2]);
    }

    #[test]
    fn test_csv_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heatmap_tracking_data.csv");

        let mut log = SampleLog::new();
        log.record_frame(0, &[TrackedBox::new(0.0, 0.0, 10.0, 10.0, 3)]);
        log.record_frame(1, &[TrackedBox::new(2.0, 2.0, 12.0, 12.0, 3)]);
        log.write_csv(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "player_id,x,y,frame\n3,5.0,5.0,0\n3,7.0,7.0,1\n"
        );

        let loaded = SampleLog::read_csv(&path).unwrap();
        assert_eq!(loaded, log);
    }

    #[test]
    fn test_read_integer_coordinates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.csv");
        std::fs::write(&path, "player_id,x,y,frame\n5,320,240,0\n5,322,241,1\n").unwrap();

        let log = SampleLog::read_csv(&path).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.as_slice()[1].y, 241.0);
    }

    #[test]
    fn test_read_missing_file() {
        let err = SampleLog::read_csv(Path::new("/nonexistent/samples.csv")).unwrap_err();
        assert!(matches!(err, InputError::Csv { .. }));
    }
}
