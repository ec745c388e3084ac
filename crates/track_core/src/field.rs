//! Pitch markings (meters).
//!
//! Markings are fixed; the pitch length/width come from config so the
//! heatmap can be drawn on non-standard fields.

/// FIFA standard pitch length (x-axis)
pub const LENGTH_M: f64 = 105.0;
/// FIFA standard pitch width (y-axis)
pub const WIDTH_M: f64 = 68.0;

/// Center circle radius
pub const CENTER_CIRCLE_RADIUS_M: f64 = 9.15;

/// Penalty area depth from the goal line
pub const PENALTY_AREA_LENGTH_M: f64 = 16.5;
/// Penalty area width
pub const PENALTY_AREA_WIDTH_M: f64 = 40.3;

/// Goal area depth from the goal line
pub const GOAL_AREA_LENGTH_M: f64 = 5.5;
/// Goal area width
pub const GOAL_AREA_WIDTH_M: f64 = 18.32;

/// Pitch extent used for normalization and drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchDimensions {
    pub length_m: f64,
    pub width_m: f64,
}

impl Default for PitchDimensions {
    fn default() -> Self {
        Self {
            length_m: LENGTH_M,
            width_m: WIDTH_M,
        }
    }
}

/// Rectangle in pitch meters, origin bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchRect {
    pub x: f64,
    pub y: f64,
    pub length: f64,
    pub width: f64,
}

impl PitchDimensions {
    pub fn new(length_m: f64, width_m: f64) -> Self {
        Self { length_m, width_m }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.length_m * 0.5, self.width_m * 0.5)
    }

    /// Left and right penalty areas, vertically centered.
    pub fn penalty_areas(&self) -> [PitchRect; 2] {
        self.goal_line_boxes(PENALTY_AREA_LENGTH_M, PENALTY_AREA_WIDTH_M)
    }

    /// Left and right goal areas, vertically centered.
    pub fn goal_areas(&self) -> [PitchRect; 2] {
        self.goal_line_boxes(GOAL_AREA_LENGTH_M, GOAL_AREA_WIDTH_M)
    }

    fn goal_line_boxes(&self, depth: f64, width: f64) -> [PitchRect; 2] {
        let y = (self.width_m - width) / 2.0;
        [
            PitchRect {
                x: 0.0,
                y,
                length: depth,
                width,
            },
            PitchRect {
                x: self.length_m - depth,
                y,
                length: depth,
                width,
            },
        ]
    }
}
