//! Pitch drawing.
//!
//! Canvas layout (pixels):
//!
//! ```text
//! +-----------------------------------------------+
//! |                 title band                    |
//! |  +-----------------------------+   +--+       |
//! |  |          pitch              |   |cb| label |
//! |  +-----------------------------+   +--+       |
//! +-----------------------------------------------+
//! ```
//!
//! Pitch coordinates have their origin bottom-left; the canvas y axis points
//! down, so y is flipped in [`CanvasLayout::to_canvas`].

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use crate::field::{PitchDimensions, PitchRect, CENTER_CIRCLE_RADIUS_M};

pub const BACKGROUND: Rgb<u8> = Rgb([0x1a, 0x1a, 0x1a]);
pub const LINE_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

const MARGIN_PX: u32 = 40;
const TITLE_BAND_PX: u32 = 60;
const COLORBAR_GAP_PX: u32 = 30;
const COLORBAR_WIDTH_PX: u32 = 24;
const COLORBAR_LABEL_PX: u32 = 110;

/// Pixel placement of the pitch, title and colorbar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasLayout {
    pub pitch: PitchDimensions,
    pub pixels_per_meter: u32,
}

impl CanvasLayout {
    pub fn new(pitch: PitchDimensions, pixels_per_meter: u32) -> Self {
        Self {
            pitch,
            pixels_per_meter: pixels_per_meter.max(1),
        }
    }

    fn ppm(&self) -> f64 {
        self.pixels_per_meter as f64
    }

    pub fn pitch_left(&self) -> u32 {
        MARGIN_PX
    }

    pub fn pitch_top(&self) -> u32 {
        MARGIN_PX + TITLE_BAND_PX
    }

    pub fn pitch_width_px(&self) -> u32 {
        ((self.pitch.length_m * self.ppm()).round() as u32).max(1)
    }

    pub fn pitch_height_px(&self) -> u32 {
        ((self.pitch.width_m * self.ppm()).round() as u32).max(1)
    }

    pub fn colorbar_left(&self) -> u32 {
        self.pitch_left() + self.pitch_width_px() + COLORBAR_GAP_PX
    }

    pub fn colorbar_width(&self) -> u32 {
        COLORBAR_WIDTH_PX
    }

    pub fn label_left(&self) -> u32 {
        self.colorbar_left() + COLORBAR_WIDTH_PX + 8
    }

    pub fn title_band(&self) -> (u32, u32) {
        (MARGIN_PX, TITLE_BAND_PX)
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        let width = self.colorbar_left() + COLORBAR_WIDTH_PX + COLORBAR_LABEL_PX + MARGIN_PX;
        let height = self.pitch_top() + self.pitch_height_px() + MARGIN_PX;
        (width, height)
    }

    /// Pitch meters to canvas pixels (y flipped).
    pub fn to_canvas(&self, x_m: f64, y_m: f64) -> (f32, f32) {
        let px = self.pitch_left() as f64 + x_m * self.ppm();
        let py = self.pitch_top() as f64 + (self.pitch.width_m - y_m) * self.ppm();
        (px as f32, py as f32)
    }

    /// Center of a canvas pixel in pitch meters.
    pub fn to_pitch(&self, px: u32, py: u32) -> (f64, f64) {
        let x_m = (px as f64 - self.pitch_left() as f64 + 0.5) / self.ppm();
        let y_m = self.pitch.width_m - (py as f64 - self.pitch_top() as f64 + 0.5) / self.ppm();
        (x_m, y_m)
    }

    fn pixel_rect(&self, rect: &PitchRect) -> Rect {
        let (left, top) = self.to_canvas(rect.x, rect.y + rect.width);
        let w = ((rect.length * self.ppm()).round() as u32).max(1);
        let h = ((rect.width * self.ppm()).round() as u32).max(1);
        Rect::at(left.round() as i32, top.round() as i32).of_size(w, h)
    }
}

/// Draws the fixed pitch markings.
#[derive(Debug, Clone, Copy)]
pub struct FieldRenderer {
    layout: CanvasLayout,
}

impl FieldRenderer {
    pub fn new(layout: CanvasLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &CanvasLayout {
        &self.layout
    }

    /// Empty dark canvas sized for the layout.
    pub fn blank_canvas(&self) -> RgbImage {
        let (width, height) = self.layout.canvas_size();
        RgbImage::from_pixel(width, height, BACKGROUND)
    }

    /// Outline, halfway line, center circle, penalty and goal areas.
    pub fn draw(&self, canvas: &mut RgbImage) {
        let layout = &self.layout;
        let pitch = layout.pitch;

        let outline = PitchRect {
            x: 0.0,
            y: 0.0,
            length: pitch.length_m,
            width: pitch.width_m,
        };
        draw_hollow_rect_mut(canvas, layout.pixel_rect(&outline), LINE_COLOR);

        let (cx, cy) = pitch.center();
        draw_line_segment_mut(
            canvas,
            layout.to_canvas(cx, 0.0),
            layout.to_canvas(cx, pitch.width_m),
            LINE_COLOR,
        );

        let (px, py) = layout.to_canvas(cx, cy);
        let radius = (CENTER_CIRCLE_RADIUS_M * layout.ppm()).round() as i32;
        draw_hollow_circle_mut(
            canvas,
            (px.round() as i32, py.round() as i32),
            radius,
            LINE_COLOR,
        );

        for area in pitch.penalty_areas().iter().chain(pitch.goal_areas().iter()) {
            draw_hollow_rect_mut(canvas, layout.pixel_rect(area), LINE_COLOR);
        }
    }

    /// Blank canvas with the pitch already drawn.
    pub fn render(&self) -> RgbImage {
        let mut canvas = self.blank_canvas();
        self.draw(&mut canvas);
        canvas
    }
}
