//! CRT overlays applied to the finished frame buffer.
//!
//! The overlay is drawn last and only rewrites cell colors: grain jitters the
//! background of random cells, scanlines dim every other row and the vignette
//! darkens cells by their distance from the center. Text is never changed.

use bootseq_core::config::EffectsConfig;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier};
use ratatui::widgets::Widget;

/// Brightness kept on scanline rows.
const SCANLINE_FACTOR: f32 = 0.72;
/// Brightness lost in the far corners.
const VIGNETTE_STRENGTH: f32 = 0.55;
/// Range of green lift added by grain to a cell background.
const GRAIN_LIFT: std::ops::RangeInclusive<u8> = 4..=18;

/// Widget that post-processes whatever is already in the buffer.
#[derive(Debug, Clone)]
pub struct CrtOverlay<'a> {
    effects: &'a EffectsConfig,
    seed: u64,
}

impl<'a> CrtOverlay<'a> {
    /// `seed` drives the grain pattern; pass a new value each frame to animate it.
    pub fn new(effects: &'a EffectsConfig, seed: u64) -> Self {
        Self { effects, seed }
    }
}

impl Widget for CrtOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        if area.is_empty() {
            return;
        }
        if self.effects.grain {
            apply_grain(area, buf, self.effects.grain_density(), self.seed);
        }
        if self.effects.scanlines {
            apply_scanlines(area, buf);
        }
        if self.effects.vignette {
            apply_vignette(area, buf);
        }
    }
}

fn apply_grain(area: Rect, buf: &mut Buffer, density: f32, seed: u64) {
    let cells = f32::from(area.width) * f32::from(area.height);
    let count = (cells * density).round() as usize;
    if count == 0 {
        return;
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    for _ in 0..count {
        let x = rng.gen_range(area.left()..area.right());
        let y = rng.gen_range(area.top()..area.bottom());
        let lift = rng.gen_range(GRAIN_LIFT);
        if let Some(cell) = buf.cell_mut((x, y)) {
            cell.bg = lift_green(cell.bg, lift);
        }
    }
}

fn apply_scanlines(area: Rect, buf: &mut Buffer) {
    for y in (area.top()..area.bottom()).filter(|y| (y - area.top()) % 2 == 1) {
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                dim_cell(cell, SCANLINE_FACTOR);
            }
        }
    }
}

fn apply_vignette(area: Rect, buf: &mut Buffer) {
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            let factor = vignette_factor(area, x, y);
            if let Some(cell) = buf.cell_mut((x, y)) {
                dim_cell(cell, factor);
            }
        }
    }
}

/// 1.0 at the center, falling off quadratically to `1 - VIGNETTE_STRENGTH`
/// in the corners.
fn vignette_factor(area: Rect, x: u16, y: u16) -> f32 {
    let half_w = (f32::from(area.width) / 2.0).max(1.0);
    let half_h = (f32::from(area.height) / 2.0).max(1.0);
    let nx = (f32::from(x - area.left()) + 0.5 - half_w) / half_w;
    let ny = (f32::from(y - area.top()) + 0.5 - half_h) / half_h;
    let d2 = ((nx * nx + ny * ny) / 2.0).min(1.0);
    1.0 - VIGNETTE_STRENGTH * d2
}

fn dim_cell(cell: &mut ratatui::buffer::Cell, factor: f32) {
    // Palette colors can't be scaled; fall back to the DIM attribute.
    if !matches!(cell.fg, Color::Rgb(..)) && factor <= SCANLINE_FACTOR {
        cell.modifier.insert(Modifier::DIM);
    }
    cell.fg = scale(cell.fg, factor);
    cell.bg = scale(cell.bg, factor);
}

/// Multiplies each RGB channel by `factor`. Non-RGB colors pass through.
pub fn scale(color: Color, factor: f32) -> Color {
    match color {
        Color::Rgb(r, g, b) => Color::Rgb(
            scale_channel(r, factor),
            scale_channel(g, factor),
            scale_channel(b, factor),
        ),
        other => other,
    }
}

fn scale_channel(value: u8, factor: f32) -> u8 {
    (f32::from(value) * factor.max(0.0)).round().min(255.0) as u8
}

fn lift_green(color: Color, lift: u8) -> Color {
    match color {
        Color::Rgb(r, g, b) => Color::Rgb(
            r.saturating_add(lift / 3),
            g.saturating_add(lift),
            b.saturating_add(lift / 3),
        ),
        Color::Reset | Color::Black => Color::Rgb(lift / 3, lift, lift / 3),
        other => other,
    }
}
