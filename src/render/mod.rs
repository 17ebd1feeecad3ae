//! Turning a glyph run and a frame style into lines of colored cells.

pub(crate) mod terminal;

pub use terminal::{paint, query_surface, TerminalGuard};

use crate::animation::FrameStyle;
use crate::color::Color;
use crate::metrics::{CellSize, GlyphRun};
use itertools::Itertools;
use std::borrow::Cow;

/// The character drawn for a lit cell.
pub const LIT_CELL: char = '█';

// How bright the glow gets right next to a lit cell, relative to the text itself.
const GLOW_STRENGTH: f32 = 0.35;

/// The size of the surface the sign is drawn on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSize {
    pub columns: u16,
    pub rows: u16,
    pub cell: CellSize,
}

impl SurfaceSize {
    pub fn width_px(&self) -> f32 {
        self.columns as f32 * self.cell.width_px
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellStyle {
    pub foreground: Color,
    pub background: Color,
    pub bold: bool,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self { foreground: Color::BLACK, background: Color::BLACK, bold: false }
    }
}

/// A run of consecutive cells sharing a style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: CellStyle,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameLine {
    pub spans: Vec<Span>,
}

impl FrameLine {
    /// The line's characters, without styling.
    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

/// A full screen worth of styled lines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    pub lines: Vec<FrameLine>,
}

/// Draws a glyph run onto a surface.
pub struct SignRenderer {
    color: Color,
    surface: SurfaceSize,
}

impl SignRenderer {
    pub fn new(color: Color, surface: SurfaceSize) -> Self {
        Self { color, surface }
    }

    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }

    /// Compose the frame showing `run` drawn with `style`.
    pub fn compose(&self, run: &GlyphRun, style: &FrameStyle) -> Frame {
        let cell = self.surface.cell;
        let scaled: Cow<GlyphRun> =
            if (style.scale - 1.0).abs() > f32::EPSILON { Cow::Owned(run.scaled(style.scale)) } else { Cow::Borrowed(run) };

        // scaling happens around the run's center
        let left_px = style.offset_px + (run.width_px(cell) - scaled.width_px(cell)) / 2.0;
        let left = (left_px / cell.width_px).floor() as i64;
        let top = (self.surface.rows as i64 - scaled.rows() as i64) / 2;

        let opacity = style.opacity.clamp(0.0, 1.0);
        // text flares towards white while it's scaled up
        let flare = ((style.scale - 1.0) * 2.0).clamp(0.0, 1.0) * opacity;
        let foreground = self.color.scale_brightness(opacity).lerp(Color::WHITE, flare);
        let lit = CellStyle { foreground, background: Color::BLACK, bold: true };
        let glow = Glow::new(style.glow_radius_px, cell);

        let lines = (0..self.surface.rows as i64)
            .map(|row| {
                let cells = (0..self.surface.columns as i64).map(|column| {
                    let (glyph_row, glyph_column) = (row - top, column - left);
                    if is_lit(&scaled, glyph_row, glyph_column) {
                        return (LIT_CELL, lit);
                    }
                    let background = glow
                        .as_ref()
                        .map(|glow| glow.intensity(&scaled, glyph_row, glyph_column))
                        .filter(|intensity| *intensity > 0.0)
                        .map(|intensity| self.color.scale_brightness(intensity * opacity * GLOW_STRENGTH))
                        .unwrap_or(Color::BLACK);
                    (' ', CellStyle { background, ..Default::default() })
                });
                merge_cells(cells)
            })
            .collect();
        Frame { lines }
    }
}

fn is_lit(run: &GlyphRun, row: i64, column: i64) -> bool {
    row >= 0 && column >= 0 && run.is_lit(row as usize, column as usize)
}

fn merge_cells(cells: impl Iterator<Item = (char, CellStyle)>) -> FrameLine {
    let spans = cells
        .chunk_by(|(_, style)| *style)
        .into_iter()
        .map(|(style, chunk)| Span { text: chunk.map(|(c, _)| c).collect(), style })
        .collect();
    FrameLine { spans }
}

/// The halo around lit cells.
struct Glow {
    radius_columns: i64,
    radius_rows: i64,
}

impl Glow {
    fn new(radius_px: f32, cell: CellSize) -> Option<Self> {
        let radius_columns = (radius_px / cell.width_px).round() as i64;
        let radius_rows = (radius_px / cell.height_px).round() as i64;
        if radius_columns <= 0 && radius_rows <= 0 {
            return None;
        }
        Some(Self { radius_columns, radius_rows })
    }

    // 1 right next to a lit cell, fading towards 0 at the edge of the radius.
    fn intensity(&self, run: &GlyphRun, row: i64, column: i64) -> f32 {
        let (rows, columns) = (run.rows() as i64, run.columns() as i64);
        if row < -self.radius_rows
            || row >= rows + self.radius_rows
            || column < -self.radius_columns
            || column >= columns + self.radius_columns
        {
            return 0.0;
        }
        let mut closest = f32::MAX;
        for dy in -self.radius_rows..=self.radius_rows {
            for dx in -self.radius_columns..=self.radius_columns {
                if is_lit(run, row + dy, column + dx) {
                    let distance = (dx.abs() as f32 / (self.radius_columns + 1) as f32)
                        .max(dy.abs() as f32 / (self.radius_rows + 1) as f32);
                    closest = closest.min(distance);
                }
            }
        }
        (1.0 - closest).max(0.0)
    }
}
