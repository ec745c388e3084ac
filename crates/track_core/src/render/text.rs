//! Title and label text.
//!
//! A configured TrueType file is tried first, then a few common system
//! locations, then the DejaVu Sans copy compiled into the crate
//! (`assets/fonts`, Bitstream Vera license).

use std::path::{Path, PathBuf};

use ab_glyph::{FontArc, FontVec, PxScale};
use image::{imageops, Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use tracing::{debug, warn};

const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

fn load_font_file(path: &Path) -> Option<FontArc> {
    let bytes = std::fs::read(path).ok()?;
    match FontVec::try_from_vec(bytes) {
        Ok(font) => Some(FontArc::new(font)),
        Err(err) => {
            warn!(path = %path.display(), %err, "not a usable font file");
            None
        }
    }
}

/// The font compiled into the crate.
pub fn bundled_font() -> Option<FontArc> {
    match FontArc::try_from_slice(BUNDLED_FONT) {
        Ok(font) => Some(font),
        Err(err) => {
            warn!(%err, "bundled font is unreadable");
            None
        }
    }
}

/// Configured font, else the first system font that loads, else the
/// bundled font.
pub fn load_font(configured: Option<&Path>) -> Option<FontArc> {
    if let Some(path) = configured {
        if let Some(font) = load_font_file(path) {
            return Some(font);
        }
        warn!(path = %path.display(), "configured font could not be loaded, trying system fonts");
    }

    SYSTEM_FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .filter(|p| p.exists())
        .find_map(|p| {
            let font = load_font_file(&p)?;
            debug!(path = %p.display(), "using system font");
            Some(font)
        })
        .or_else(|| {
            debug!("no system font found, using bundled font");
            bundled_font()
        })
}

/// Text drawing on a loaded font.
pub struct TextPainter {
    font: FontArc,
}

impl TextPainter {
    pub fn new(font: FontArc) -> Self {
        Self { font }
    }

    pub fn size(&self, px: f32, text: &str) -> (u32, u32) {
        text_size(PxScale::from(px), &self.font, text)
    }

    /// Draw `text` horizontally centered on `center_x`.
    pub fn draw_centered(
        &self,
        canvas: &mut RgbImage,
        text: &str,
        center_x: u32,
        top: u32,
        px: f32,
        color: Rgb<u8>,
    ) {
        let (w, _) = self.size(px, text);
        let x = center_x as i32 - (w / 2) as i32;
        draw_text_mut(
            canvas,
            color,
            x,
            top as i32,
            PxScale::from(px),
            &self.font,
            text,
        );
    }

    pub fn draw(&self, canvas: &mut RgbImage, text: &str, x: u32, y: u32, px: f32, color: Rgb<u8>) {
        draw_text_mut(
            canvas,
            color,
            x as i32,
            y as i32,
            PxScale::from(px),
            &self.font,
            text,
        );
    }

    /// Draw `text` reading bottom-to-top, vertically centered on `center_y`.
    pub fn draw_vertical(
        &self,
        canvas: &mut RgbImage,
        text: &str,
        left: u32,
        center_y: u32,
        px: f32,
        color: Rgb<u8>,
        background: Rgb<u8>,
    ) {
        let (w, h) = self.size(px, text);
        if w == 0 || h == 0 {
            return;
        }

        let mut strip = RgbImage::from_pixel(w, h + 2, background);
        draw_text_mut(&mut strip, color, 0, 0, PxScale::from(px), &self.font, text);
        let rotated = imageops::rotate270(&strip);

        let top = center_y as i64 - (rotated.height() / 2) as i64;
        imageops::replace(canvas, &rotated, left as i64, top);
    }
}
