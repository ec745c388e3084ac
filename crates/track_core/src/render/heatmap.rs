//! # Heatmap Renderer
//!
//! Density grid over pitch markings, with title and colorbar, saved as PNG.
//!
//! The grid is drawn nearest-neighbor with the intensity ramp at a fixed
//! opacity on top of the drawn pitch, origin bottom-left.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use tracing::{info, warn};

use super::colormap::{blend, intensity_color};
use super::field::{CanvasLayout, FieldRenderer, BACKGROUND, LINE_COLOR};
use super::text::{bundled_font, load_font, TextPainter};
use crate::config::HeatmapConfig;
use crate::error::{OutputError, SpatialError};
use crate::spatial::{build_density, DensityConfig, DensityGrid};
use crate::types::{SpatialSample, TrackId};

pub const DEFAULT_OPACITY: f64 = 0.7;
pub const COLORBAR_LABEL: &str = "Movement Intensity";

const TITLE_PX: f32 = 28.0;
const LABEL_PX: f32 = 18.0;
const TICK_PX: f32 = 14.0;

/// Which population a heatmap shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatmapTitle {
    Team,
    Player(TrackId),
}

impl fmt::Display for HeatmapTitle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HeatmapTitle::Team => write!(f, "Team Movement Heatmap"),
            HeatmapTitle::Player(id) => write!(f, "Player {} Movement Heatmap", id),
        }
    }
}

impl HeatmapTitle {
    pub fn track_id(&self) -> Option<TrackId> {
        match self {
            HeatmapTitle::Team => None,
            HeatmapTitle::Player(id) => Some(*id),
        }
    }
}

/// An artifact that was not produced, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedHeatmap {
    pub title: HeatmapTitle,
    pub path: PathBuf,
    pub reason: SpatialError,
}

/// Outcome of rendering a team heatmap plus per-player heatmaps.
#[derive(Debug, Default)]
pub struct HeatmapBatch {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<SkippedHeatmap>,
    pub failed: Vec<OutputError>,
}

impl HeatmapBatch {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }
}

pub struct HeatmapRenderer {
    field: FieldRenderer,
    density: DensityConfig,
    opacity: f64,
    text: Option<TextPainter>,
}

impl HeatmapRenderer {
    /// Renderer drawing text with the bundled font.
    pub fn new(density: DensityConfig, pixels_per_meter: u32, opacity: f64) -> Self {
        let layout = CanvasLayout::new(density.pitch(), pixels_per_meter);
        Self {
            field: FieldRenderer::new(layout),
            density,
            opacity: opacity.clamp(0.0, 1.0),
            text: bundled_font().map(TextPainter::new),
        }
    }

    /// Renderer with font lookup as configured.
    pub fn from_config(config: &HeatmapConfig) -> Self {
        let renderer = Self::new(config.density(), config.pixels_per_meter, config.opacity);
        match load_font(config.font_path.as_deref()) {
            Some(font) => renderer.with_text(TextPainter::new(font)),
            None => renderer,
        }
    }

    pub fn with_text(mut self, text: TextPainter) -> Self {
        self.text = Some(text);
        self
    }

    pub fn density_config(&self) -> &DensityConfig {
        &self.density
    }

    pub fn layout(&self) -> &CanvasLayout {
        self.field.layout()
    }

    /// Compose pitch, density overlay, colorbar and title.
    pub fn render(&self, grid: &DensityGrid, title: HeatmapTitle) -> RgbImage {
        let mut canvas = self.field.render();
        let normalized = grid.normalized();
        let layout = *self.layout();
        let (nx, ny) = (normalized.nrows(), normalized.ncols());

        for py in layout.pitch_top()..layout.pitch_top() + layout.pitch_height_px() {
            for px in layout.pitch_left()..layout.pitch_left() + layout.pitch_width_px() {
                let (x_m, y_m) = layout.to_pitch(px, py);
                let i = cell_index(x_m, layout.pitch.length_m, nx);
                let j = cell_index(y_m, layout.pitch.width_m, ny);
                let color = intensity_color(normalized[(i, j)]);
                let base = *canvas.get_pixel(px, py);
                canvas.put_pixel(px, py, blend(base, color, self.opacity));
            }
        }

        self.draw_colorbar(&mut canvas, grid);

        if let Some(text) = &self.text {
            let (band_top, band_height) = layout.title_band();
            let (canvas_w, _) = layout.canvas_size();
            let top = band_top + (band_height.saturating_sub(TITLE_PX as u32)) / 2;
            text.draw_centered(
                &mut canvas,
                &title.to_string(),
                canvas_w / 2,
                top,
                TITLE_PX,
                LINE_COLOR,
            );
        }

        canvas
    }

    fn draw_colorbar(&self, canvas: &mut RgbImage, grid: &DensityGrid) {
        let layout = self.layout();
        let left = layout.colorbar_left();
        let top = layout.pitch_top();
        let width = layout.colorbar_width();
        let height = layout.pitch_height_px();

        for dy in 0..height {
            let t = if height > 1 {
                1.0 - dy as f64 / (height - 1) as f64
            } else {
                1.0
            };
            let color = blend(BACKGROUND, intensity_color(t), self.opacity);
            for dx in 0..width {
                canvas.put_pixel(left + dx, top + dy, color);
            }
        }
        draw_hollow_rect_mut(
            canvas,
            Rect::at(left as i32, top as i32).of_size(width, height),
            LINE_COLOR,
        );

        let Some(text) = &self.text else {
            return;
        };

        let (lo, hi) = grid.intensity_range();
        let ticks_left = layout.label_left();
        text.draw(canvas, &format_tick(hi), ticks_left, top, TICK_PX, LINE_COLOR);
        text.draw(
            canvas,
            &format_tick(lo),
            ticks_left,
            (top + height).saturating_sub(TICK_PX as u32),
            TICK_PX,
            LINE_COLOR,
        );
        text.draw_vertical(
            canvas,
            COLORBAR_LABEL,
            ticks_left + 50,
            top + height / 2,
            LABEL_PX,
            LINE_COLOR,
            BACKGROUND,
        );
    }

    /// Render and write a PNG to `path`.
    pub fn render_to_file(
        &self,
        grid: &DensityGrid,
        title: HeatmapTitle,
        path: &Path,
    ) -> Result<(), OutputError> {
        let canvas = self.render(grid, title);
        write_png(&canvas, path)?;
        info!(path = %path.display(), %title, samples = grid.sample_count, "heatmap written");
        Ok(())
    }

    /// Team heatmap (when `team_path` is given) plus one heatmap per
    /// identity in `players`. Degenerate populations are skipped; write
    /// failures are collected; neither stops the remaining artifacts.
    pub fn render_batch<F>(
        &self,
        samples: &[SpatialSample],
        team_path: Option<&Path>,
        players: &[TrackId],
        player_path: F,
    ) -> HeatmapBatch
    where
        F: Fn(TrackId) -> PathBuf,
    {
        let mut batch = HeatmapBatch::default();

        let jobs = team_path
            .map(|p| (HeatmapTitle::Team, p.to_path_buf()))
            .into_iter()
            .chain(
                players
                    .iter()
                    .map(|&id| (HeatmapTitle::Player(id), player_path(id))),
            );

        for (title, path) in jobs {
            let grid = match build_density(samples, &self.density, title.track_id()) {
                Ok(grid) => grid,
                Err(reason) => {
                    warn!(%title, path = %path.display(), %reason, "heatmap skipped");
                    batch.skipped.push(SkippedHeatmap {
                        title,
                        path,
                        reason,
                    });
                    continue;
                }
            };

            match self.render_to_file(&grid, title, &path) {
                Ok(()) => batch.written.push(path),
                Err(err) => {
                    warn!(%title, %err, "heatmap write failed");
                    batch.failed.push(err);
                }
            }
        }

        batch
    }
}

fn cell_index(value_m: f64, extent_m: f64, cells: usize) -> usize {
    let idx = (value_m / extent_m * cells as f64).floor();
    if idx <= 0.0 {
        0
    } else {
        (idx as usize).min(cells - 1)
    }
}

fn format_tick(value: f64) -> String {
    if value.abs() >= 100.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Open, encode, flush; the file handle is dropped on every path.
pub fn write_png(canvas: &RgbImage, path: &Path) -> Result<(), OutputError> {
    let io_err = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    canvas
        .write_to(&mut writer, ImageFormat::Png)
        .map_err(|source| OutputError::Image {
            path: path.to_path_buf(),
            source,
        })?;
    writer.flush().map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DegenerateReason;

    fn sample(track_id: TrackId, x: f64, y: f64, frame: u64) -> SpatialSample {
        SpatialSample {
            track_id,
            x,
            y,
            frame,
        }
    }

    fn renderer() -> HeatmapRenderer {
        HeatmapRenderer::new(DensityConfig::default(), 2, DEFAULT_OPACITY)
    }

    fn samples() -> Vec<SpatialSample> {
        vec![
            sample(1, 100.0, 50.0, 0),
            sample(1, 110.0, 55.0, 1),
            sample(2, 300.0, 200.0, 0),
            sample(2, 250.0, 180.0, 1),
            sample(3, 0.0, 0.0, 0),
        ]
    }

    #[test]
    fn test_titles() {
        assert_eq!(HeatmapTitle::Team.to_string(), "Team Movement Heatmap");
        assert_eq!(
            HeatmapTitle::Player(12).to_string(),
            "Player 12 Movement Heatmap"
        );
    }

    #[test]
    fn test_render_dimensions_and_hotspot() {
        let renderer = renderer();
        let data: Vec<_> = (0..10).map(|f| sample(1, 300.0, 200.0, f)).collect();
        let grid = build_density(&data, renderer.density_config(), None).unwrap();
        let canvas = renderer.render(&grid, HeatmapTitle::Team);

        let layout = renderer.layout();
        assert_eq!(canvas.dimensions(), layout.canvas_size());

        // hotspot at the top-right corner of the pitch is red-dominant
        let px = layout.pitch_left() + layout.pitch_width_px() - 3;
        let py = layout.pitch_top() + 3;
        let hot = canvas.get_pixel(px, py);
        assert!(hot[0] > hot[2], "hotspot should be warm: {:?}", hot);

        // far corner stays dark
        let cold = canvas.get_pixel(layout.pitch_left() + 20, layout.pitch_top() + layout.pitch_height_px() - 20);
        assert!(cold[0] < 64 && cold[1] < 64, "cold area should be dark: {:?}", cold);
    }

    #[test]
    fn test_write_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("team_heatmap.png");

        let renderer = renderer();
        let grid = build_density(&samples(), renderer.density_config(), None).unwrap();
        renderer.render_to_file(&grid, HeatmapTitle::Team, &path).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!(
            (img.width(), img.height()),
            self::renderer().layout().canvas_size()
        );
    }

    #[test]
    fn test_batch_skips_degenerate_player() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = renderer();
        let samples = samples();

        let batch = renderer.render_batch(
            &samples,
            Some(&dir.path().join("team_heatmap.png")),
            &[1, 2, 3],
            |id| dir.path().join(format!("player_{}_heatmap.png", id)),
        );

        assert_eq!(batch.written.len(), 3);
        assert!(batch.failed.is_empty());
        assert_eq!(batch.skipped.len(), 1);
        assert_eq!(batch.skipped[0].title, HeatmapTitle::Player(3));
        assert!(matches!(
            batch.skipped[0].reason,
            SpatialError::DegenerateInput {
                reason: DegenerateReason::ZeroExtent { .. }
            }
        ));
        assert!(dir.path().join("player_2_heatmap.png").exists());
        assert!(!dir.path().join("player_3_heatmap.png").exists());
    }

    #[test]
    fn test_batch_collects_write_failures() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let batch = renderer().render_batch(
            &samples(),
            Some(&missing.join("team.png")),
            &[1],
            |id| dir.path().join(format!("player_{}_heatmap.png", id)),
        );

        assert_eq!(batch.failed.len(), 1);
        assert_eq!(batch.failed[0].path(), &missing.join("team.png"));
        assert_eq!(batch.written.len(), 1);
    }

    fn count_drawn(canvas: &RgbImage, xs: std::ops::Range<u32>, ys: std::ops::Range<u32>) -> usize {
        ys.flat_map(|y| xs.clone().map(move |x| (x, y)))
            .filter(|&(x, y)| *canvas.get_pixel(x, y) != BACKGROUND)
            .count()
    }

    #[test]
    fn test_title_distinguishes_team_and_player() {
        let renderer = renderer();
        let grid = build_density(&samples(), renderer.density_config(), None).unwrap();
        let team = renderer.render(&grid, HeatmapTitle::Team);
        let player = renderer.render(&grid, HeatmapTitle::Player(1));

        let layout = renderer.layout();
        let (band_top, band_height) = layout.title_band();
        let title_rows = band_top..band_top + band_height;
        assert!(count_drawn(&team, layout.pitch_left()..layout.colorbar_left(), title_rows) > 0);
        assert_ne!(team, player);
    }

    #[test]
    fn test_title_and_label_drawn_without_configured_font() {
        let config = HeatmapConfig {
            pixels_per_meter: 2,
            font_path: None,
            ..HeatmapConfig::default()
        };
        let renderer = HeatmapRenderer::from_config(&config);
        let grid = build_density(&samples(), renderer.density_config(), None).unwrap();
        let canvas = renderer.render(&grid, HeatmapTitle::Team);

        let layout = renderer.layout();
        let (band_top, band_height) = layout.title_band();
        let (canvas_w, _) = layout.canvas_size();
        let pitch_rows = layout.pitch_top()..layout.pitch_top() + layout.pitch_height_px();

        let title = count_drawn(
            &canvas,
            layout.pitch_left()..layout.colorbar_left(),
            band_top..band_top + band_height,
        );
        assert!(title > 0, "title band is empty");

        let label = count_drawn(&canvas, layout.label_left() + 50..canvas_w, pitch_rows);
        assert!(label > 0, "colorbar label column is empty");
    }

    #[test]
    fn test_cell_index_clamps() {
        assert_eq!(cell_index(-0.5, 105.0, 50), 0);
        assert_eq!(cell_index(105.0, 105.0, 50), 49);
        assert_eq!(cell_index(52.5, 105.0, 50), 25);
    }
}
