//! Measuring how wide a piece of text is once it's drawn on the sign.

mod figlet;
mod glyph;

pub use figlet::{available_fonts, init_figlet_fonts_and_warn, FigletMetrics, GlyphRasterizer};
pub use glyph::GlyphRun;

use serde::Serialize;

/// The size of a single terminal cell, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CellSize {
    pub width_px: f32,
    pub height_px: f32,
}

impl CellSize {
    pub const FALLBACK: CellSize = CellSize { width_px: 10.0, height_px: 20.0 };
}

impl Default for CellSize {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Measures the rendered width of a single, non wrapping, line of text.
pub trait TextMetrics {
    /// Get the width in pixels `text` takes when drawn at `font_size_pt`.
    ///
    /// Implementations memoize on `(text, font_size_pt)` for at most one render pass.
    fn measure(&self, text: &str, font_size_pt: f32) -> Result<f32, MetricsError>;
}

/// Errors that can occur when measuring or rasterizing text
#[derive(thiserror::Error, Debug)]
pub enum MetricsError {
    #[error("failed to load font '{0}': {1}")]
    FontLoadFailed(String, String),

    #[error("requested figlet font '{0}' is not available or not validated")]
    FontUnavailable(String),
}
