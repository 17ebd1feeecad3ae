use super::{CellSize, GlyphRun, MetricsError, TextMetrics};
use figlet_rs::FIGfont;
use once_cell::sync::OnceCell;
use std::cell::RefCell;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, trace, warn};

const EMBEDDED_FONT: &str = "standard";

// Drawn in place of characters the font has no glyph for.
const MISSING_GLYPH: char = '?';

/// One-time cache of validated, safe-to-use FIGlet fonts found on the system.
/// Maps lowercased font name (without .flf) to full file path.
static VALID_FONT_PATHS: OnceCell<HashMap<String, String>> = OnceCell::new();

// Fonts known to convert cleanly with figlet-rs and to read well as a block of lit cells.
const SAFE_FONTS: &[&str] = &[
    "banner3", "banner4", "basic", "block", "broadway", "chunky", "colossal", "doh", "doom", "epic",
    "lean", "mini", "roman", "shadow", "slant", "small", "speed", "standard", "starwars", "thick",
    "univers",
];

fn scan_figlet_font_dirs() -> Vec<&'static str> {
    ["/opt/homebrew/share/figlet/fonts", "/usr/local/share/figlet", "/usr/share/figlet", "/usr/share/figlet/fonts"]
        .into_iter()
        .filter(|dir| std::path::Path::new(dir).is_dir())
        .collect()
}

fn validate_font_file(path: &str) -> bool {
    // figlet-rs panics on some font files, so both loading and converting are guarded
    let loaded = catch_unwind(AssertUnwindSafe(|| FIGfont::from_file(path)));
    let Ok(Ok(font)) = loaded else {
        return false;
    };
    let res = catch_unwind(AssertUnwindSafe(|| font.convert("TEST")));
    matches!(res, Ok(Some(_)))
}

fn build_valid_font_map() -> HashMap<String, String> {
    let mut map = HashMap::new();
    for dir in scan_figlet_font_dirs() {
        let Ok(entries) = std::fs::read_dir(dir) else {
            continue;
        };
        for path in entries.flatten().map(|entry| entry.path()) {
            if path.extension().is_none_or(|ext| ext != "flf") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()).map(str::to_lowercase) else {
                continue;
            };
            if !SAFE_FONTS.contains(&stem.as_str()) {
                continue;
            }
            let path = path.to_string_lossy().to_string();
            if validate_font_file(&path) {
                map.entry(stem).or_insert(path);
            }
        }
    }
    map
}

/// Scan the system for FIGlet fonts and print a summary once at launch.
pub fn init_figlet_fonts_and_warn() {
    if VALID_FONT_PATHS.get().is_some() {
        return;
    }
    let map = build_valid_font_map();
    let count = map.len();
    let _ = VALID_FONT_PATHS.set(map);
    if count == 0 {
        eprintln!("[bling] note: no valid FIGlet fonts found on system; using embedded 'standard' font only");
    } else {
        debug!("detected {count} valid FIGlet font(s)");
    }
}

/// The names of every font that can be used, the embedded one included.
pub fn available_fonts() -> Vec<String> {
    let mut fonts: Vec<String> = VALID_FONT_PATHS.get_or_init(build_valid_font_map).keys().cloned().collect();
    if !fonts.iter().any(|font| font == EMBEDDED_FONT) {
        fonts.push(EMBEDDED_FONT.to_string());
    }
    fonts.sort();
    fonts
}

fn get_valid_font_path(name: &str) -> Option<String> {
    let lower = name.to_lowercase();
    let map = VALID_FONT_PATHS.get_or_init(build_valid_font_map);
    map.get(&lower).cloned()
}

/// Turns text into lit cells using a FIGlet font.
pub struct GlyphRasterizer {
    font: FIGfont,
    font_name: String,
}

impl GlyphRasterizer {
    /// Create a rasterizer using the given font.
    pub fn new(font_name: &str) -> Result<Self, MetricsError> {
        let font = Self::load_font(font_name)?;
        Ok(Self { font, font_name: font_name.to_lowercase() })
    }

    /// Create a rasterizer using the given font, falling back to the embedded one if it can't be
    /// used.
    pub fn with_fallback(font_name: &str) -> Result<Self, MetricsError> {
        match Self::new(font_name) {
            Ok(rasterizer) => Ok(rasterizer),
            Err(e) if font_name.to_lowercase() != EMBEDDED_FONT => {
                warn!("font '{font_name}' unusable, falling back to '{EMBEDDED_FONT}': {e}");
                eprintln!("[bling] note: {e}; using embedded '{EMBEDDED_FONT}' font");
                Self::new(EMBEDDED_FONT)
            }
            Err(e) => Err(e),
        }
    }

    pub fn font_name(&self) -> &str {
        &self.font_name
    }

    /// Rasterize `text` at its natural size, one FIGlet sub-character per cell.
    ///
    /// Characters the font doesn't have are drawn as `?`. Text that still can't be converted
    /// yields an empty run.
    pub fn rasterize_natural(&self, text: &str) -> GlyphRun {
        if text.is_empty() {
            return GlyphRun::default();
        }
        let text = self.substitute_missing(text);
        let res = catch_unwind(AssertUnwindSafe(|| self.font.convert(&text).map(|figure| figure.to_string())));
        match res {
            Ok(Some(art)) => GlyphRun::from_art(&art),
            Ok(None) | Err(_) => {
                warn!("font '{}' can't convert '{text}', drawing nothing", self.font_name);
                GlyphRun::default()
            }
        }
    }

    /// Rasterize `text` so that its height matches `font_size_pt` on cells of the given size.
    pub fn rasterize(&self, text: &str, font_size_pt: f32, cell: CellSize) -> GlyphRun {
        let natural = self.rasterize_natural(text);
        if natural.rows() == 0 {
            return natural;
        }
        let scale = font_size_pt / (natural.rows() as f32 * cell.height_px);
        natural.scaled(scale)
    }

    fn has_glyph(&self, c: char) -> bool {
        self.font.fonts.contains_key(&(c as u32))
    }

    fn substitute_missing(&self, text: &str) -> String {
        let fallback = self.has_glyph(MISSING_GLYPH).then_some(MISSING_GLYPH);
        text.chars()
            .filter_map(|c| if self.has_glyph(c) { Some(c) } else { fallback })
            .collect()
    }

    fn load_font(font_name: &str) -> Result<FIGfont, MetricsError> {
        let result = if font_name.eq_ignore_ascii_case(EMBEDDED_FONT) {
            catch_unwind(AssertUnwindSafe(FIGfont::standard))
        } else {
            let Some(path) = get_valid_font_path(font_name) else {
                return Err(MetricsError::FontUnavailable(font_name.to_string()));
            };
            catch_unwind(AssertUnwindSafe(|| FIGfont::from_file(&path)))
        };
        match result {
            Ok(Ok(font)) => Ok(font),
            Ok(Err(e)) => Err(MetricsError::FontLoadFailed(font_name.to_string(), e)),
            Err(_) => Err(MetricsError::FontLoadFailed(font_name.to_string(), "panic during font loading".to_string())),
        }
    }
}

/// Text metrics backed by a [GlyphRasterizer].
///
/// Painting goes through [FigletMetrics::glyph_run] as well, so what gets measured is exactly what
/// gets drawn. Runs are memoized on `(text, font size)` until the cell size changes, which starts
/// a new render pass.
pub struct FigletMetrics {
    rasterizer: GlyphRasterizer,
    cell: CellSize,
    runs: RefCell<HashMap<(String, u32), GlyphRun>>,
}

impl FigletMetrics {
    pub fn new(rasterizer: GlyphRasterizer, cell: CellSize) -> Self {
        Self { rasterizer, cell, runs: Default::default() }
    }

    pub fn cell(&self) -> CellSize {
        self.cell
    }

    /// Start a new render pass on cells of the given size.
    pub fn set_cell(&mut self, cell: CellSize) {
        self.cell = cell;
        self.runs.get_mut().clear();
    }

    pub fn rasterizer(&self) -> &GlyphRasterizer {
        &self.rasterizer
    }

    pub fn glyph_run(&self, text: &str, font_size_pt: f32) -> GlyphRun {
        let key = (text.to_string(), font_size_pt.to_bits());
        if let Some(run) = self.runs.borrow().get(&key) {
            trace!("glyph run cache hit for '{text}'");
            return run.clone();
        }
        let run = self.rasterizer.rasterize(text, font_size_pt, self.cell);
        self.runs.borrow_mut().insert(key, run.clone());
        run
    }

    #[cfg(test)]
    fn cached_runs(&self) -> usize {
        self.runs.borrow().len()
    }
}

impl TextMetrics for FigletMetrics {
    fn measure(&self, text: &str, font_size_pt: f32) -> Result<f32, MetricsError> {
        Ok(self.glyph_run(text, font_size_pt).width_px(self.cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_metrics() -> FigletMetrics {
        let rasterizer = GlyphRasterizer::new("standard").expect("failed to create rasterizer");
        FigletMetrics::new(rasterizer, CellSize { width_px: 10.0, height_px: 20.0 })
    }

    #[test]
    fn standard_font() {
        let rasterizer = GlyphRasterizer::new("standard").expect("failed to create rasterizer");
        let run = rasterizer.rasterize_natural("Hello");
        assert!(run.rows() > 1);
        assert!(run.columns() > 5);
    }

    #[test]
    fn fallback_to_standard() {
        let rasterizer = GlyphRasterizer::with_fallback("nonexistent_font_12345").expect("failed to create rasterizer");
        assert_eq!(rasterizer.font_name(), "standard");
    }

    #[test]
    fn unknown_font_without_fallback() {
        let result = GlyphRasterizer::new("nonexistent_font_12345");
        assert!(matches!(result, Err(MetricsError::FontUnavailable(_))));
    }

    #[test]
    fn empty_text_has_no_width() {
        let metrics = standard_metrics();
        assert_eq!(metrics.measure("", 100.0).expect("measure"), 0.0);
    }

    #[test]
    fn height_follows_font_size() {
        let metrics = standard_metrics();
        let natural = metrics.rasterizer().rasterize_natural("BLING");
        // exactly one cell of height per natural row
        let size = natural.rows() as f32 * 20.0;
        let run = metrics.glyph_run("BLING", size);
        assert_eq!(run, natural);

        let doubled = metrics.glyph_run("BLING", size * 2.0);
        assert_eq!(doubled.rows(), natural.rows() * 2);
        assert_eq!(doubled.columns(), natural.columns() * 2);
    }

    #[test]
    fn measure_matches_painted_run() {
        let metrics = standard_metrics();
        let run = metrics.glyph_run("BLING", 150.0);
        let width = metrics.measure("BLING", 150.0).expect("measure");
        assert_eq!(width, run.columns() as f32 * 10.0);
    }

    #[test]
    fn longer_text_is_wider() {
        let metrics = standard_metrics();
        let short = metrics.measure("HI", 100.0).expect("measure");
        let long = metrics.measure("HI THERE", 100.0).expect("measure");
        assert!(long > short);
    }

    #[test]
    fn characters_missing_from_font_become_placeholders() {
        let rasterizer = GlyphRasterizer::new("standard").expect("failed to create rasterizer");
        assert_eq!(rasterizer.rasterize_natural("I ♥ U"), rasterizer.rasterize_natural("I ? U"));
    }

    #[test]
    fn text_outside_font_still_has_width() {
        let metrics = standard_metrics();
        let width = metrics.measure("사랑해", 100.0).expect("measure");
        assert!(width > 0.0);
        assert_eq!(width, metrics.measure("???", 100.0).expect("measure"));
    }

    #[test]
    fn measuring_and_painting_rasterize_once() {
        let mut metrics = standard_metrics();
        let width = metrics.measure("BLING", 100.0).expect("measure");
        let run = metrics.glyph_run("BLING", 100.0);
        assert_eq!(width, run.width_px(metrics.cell()));
        assert_eq!(metrics.cached_runs(), 1);

        metrics.glyph_run("BLING", 120.0);
        assert_eq!(metrics.cached_runs(), 2);

        metrics.set_cell(CellSize { width_px: 8.0, height_px: 16.0 });
        assert_eq!(metrics.cached_runs(), 0);
    }
}
