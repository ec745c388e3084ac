//! Recorded tracker output.
//!
//! Two CSV layouts are accepted:
//!
//! - [`TrackFileFormat::Xyxy`]: `frame,x1,y1,x2,y2,track_id`, frames as written
//! - [`TrackFileFormat::Mot`]: `frame,id,bb_left,bb_top,bb_width,bb_height,...`,
//!   1-based frames as in MOTChallenge files
//!
//! Rows are grouped by frame. Missing frame numbers become empty frames so the
//! frame index stays aligned with the video; a run of more than
//! [`MAX_FRAME_GAP`] missing frames is a parse error. A leading header line is
//! skipped.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::InputError;
use crate::types::{BoundingBox, FrameTracks, TrackId, TrackedBox};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackFileFormat {
    #[default]
    Xyxy,
    Mot,
}

const MIN_FIELDS: usize = 6;

/// Longest run of missing frames filled with empty frames.
pub const MAX_FRAME_GAP: u64 = 100_000;

/// Rows of one frame and the line the frame first appeared on.
#[derive(Debug)]
struct FrameRows {
    line: u64,
    tracks: Vec<TrackedBox>,
}

impl TrackFileFormat {
    /// Zero-based frame index for a frame number as written in the file.
    fn frame_index(&self, frame: u64) -> Option<u64> {
        match self {
            TrackFileFormat::Xyxy => Some(frame),
            TrackFileFormat::Mot => frame.checked_sub(1),
        }
    }
}

impl FromStr for TrackFileFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xyxy" => Ok(TrackFileFormat::Xyxy),
            "mot" | "motchallenge" => Ok(TrackFileFormat::Mot),
            other => Err(format!("unknown track file format '{}'", other)),
        }
    }
}

/// Read a tracker CSV into frame-ordered [`FrameTracks`], starting at frame 0.
pub fn read_tracker_csv(path: &Path, format: TrackFileFormat) -> Result<Vec<FrameTracks>, InputError> {
    let file = File::open(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(file);

    let mut by_frame: BTreeMap<u64, FrameRows> = BTreeMap::new();
    let mut rows = 0usize;

    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|source| InputError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(i as u64 + 1);

        if i == 0 && is_header(&record) {
            debug!(path = %path.display(), "skipping header line");
            continue;
        }
        if record.iter().all(str::is_empty) {
            continue;
        }

        let (frame, track) = parse_row(&record, format).map_err(|message| InputError::Parse {
            path: path.to_path_buf(),
            line,
            message,
        })?;
        by_frame
            .entry(frame)
            .or_insert_with(|| FrameRows {
                line,
                tracks: Vec::new(),
            })
            .tracks
            .push(track);
        rows += 1;
    }

    let frames = fill_gaps(by_frame).map_err(|(line, message)| InputError::Parse {
        path: path.to_path_buf(),
        line,
        message,
    })?;
    debug!(path = %path.display(), rows, frames = frames.len(), "tracker file read");
    Ok(frames)
}

fn is_header(record: &csv::StringRecord) -> bool {
    record
        .get(0)
        .map(|first| !first.is_empty() && first.parse::<f64>().is_err())
        .unwrap_or(false)
}

fn parse_row(record: &csv::StringRecord, format: TrackFileFormat) -> Result<(u64, TrackedBox), String> {
    if record.len() < MIN_FIELDS {
        return Err(format!(
            "expected at least {} fields, found {}",
            MIN_FIELDS,
            record.len()
        ));
    }

    let field = |idx: usize, name: &str| -> Result<f64, String> {
        let raw = record.get(idx).unwrap_or_default();
        raw.parse::<f64>()
            .map_err(|_| format!("invalid {} '{}'", name, raw))
    };

    let frame = parse_integer(record.get(0).unwrap_or_default(), "frame")?;
    let frame = format
        .frame_index(frame)
        .ok_or_else(|| "MOT frame numbers start at 1".to_string())?;

    let track = match format {
        TrackFileFormat::Xyxy => {
            let bbox = BoundingBox::new(
                field(1, "x1")?,
                field(2, "y1")?,
                field(3, "x2")?,
                field(4, "y2")?,
            );
            let id = parse_integer(record.get(5).unwrap_or_default(), "track_id")?;
            TrackedBox {
                bbox,
                track_id: to_track_id(id)?,
            }
        }
        TrackFileFormat::Mot => {
            let id = parse_integer(record.get(1).unwrap_or_default(), "id")?;
            let bbox = BoundingBox::from_ltwh(
                field(2, "bb_left")?,
                field(3, "bb_top")?,
                field(4, "bb_width")?,
                field(5, "bb_height")?,
            );
            TrackedBox {
                bbox,
                track_id: to_track_id(id)?,
            }
        }
    };

    Ok((frame, track))
}

/// Integers may be written as `12` or `12.0`.
fn parse_integer(raw: &str, name: &str) -> Result<u64, String> {
    if let Ok(v) = raw.parse::<u64>() {
        return Ok(v);
    }
    match raw.parse::<f64>() {
        Ok(v) if v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 => Ok(v as u64),
        _ => Err(format!("invalid {} '{}'", name, raw)),
    }
}

fn to_track_id(id: u64) -> Result<TrackId, String> {
    TrackId::try_from(id).map_err(|_| format!("track id {} out of range", id))
}

/// Dense frames from 0 through the last frame present. Fails with the line
/// of the first frame after a gap longer than [`MAX_FRAME_GAP`].
fn fill_gaps(by_frame: BTreeMap<u64, FrameRows>) -> Result<Vec<FrameTracks>, (u64, String)> {
    let mut frames = Vec::new();
    let mut next = 0u64;

    for (frame, rows) in by_frame {
        let gap = frame - next;
        if gap > MAX_FRAME_GAP {
            return Err((
                rows.line,
                format!(
                    "frame {} is {} frames past frame {}; at most {} missing frames are filled",
                    frame,
                    gap,
                    next.saturating_sub(1),
                    MAX_FRAME_GAP
                ),
            ));
        }
        frames.extend((next..frame).map(|empty| FrameTracks::new(empty, Vec::new())));
        frames.push(FrameTracks::new(frame, rows.tracks));
        next = frame + 1;
    }

    Ok(frames)
}
