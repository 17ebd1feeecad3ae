use crate::animation::{get_animation, splash_animation, Animation, FrameStyle, SPLASH_TEXT};
use crate::color::Color;
use crate::config::{DisplayConfig, PlayerOptions};
use crate::metrics::{FigletMetrics, GlyphRun, TextMetrics};
use crate::render::{paint, query_surface, Frame, SignRenderer, SurfaceSize, TerminalGuard};
use crossterm::event::{self, Event, KeyEventKind, MouseEventKind};
use std::io::{self, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const SPLASH_FONT_SIZE_PT: f32 = 64.0;

/// Errors that can occur while the sign is on screen
#[derive(thiserror::Error, Debug)]
pub enum PlayerError {
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

/// Everything needed to draw one text run on one surface.
///
/// A scene is rebuilt whenever the surface changes, so measurements always come from the actual
/// surface the text is drawn on.
pub struct Scene {
    run: GlyphRun,
    renderer: SignRenderer,
    animation: Option<Box<dyn Animation>>,
}

impl Scene {
    /// Build the scene showing the configured sign.
    ///
    /// Measuring never fails the scene: text that can't be measured scrolls as if it had no width.
    pub fn sign(config: &DisplayConfig, metrics: &mut FigletMetrics, surface: SurfaceSize) -> Self {
        metrics.set_cell(surface.cell);
        let run = metrics.glyph_run(config.text(), config.font_size_pt());
        let text_width_px = metrics.measure(config.text(), config.font_size_pt()).unwrap_or_else(|e| {
            warn!("measuring '{}' failed: {e}", config.text());
            0.0
        });
        let animation = get_animation(
            config.mode(),
            config.text(),
            config.font_size_pt(),
            config.speed(),
            surface.width_px(),
            text_width_px,
        );
        Self { run, renderer: SignRenderer::new(config.color(), surface), animation }
    }

    /// Build the power-on splash scene.
    pub fn splash(metrics: &mut FigletMetrics, surface: SurfaceSize) -> Self {
        metrics.set_cell(surface.cell);
        let run = metrics.glyph_run(SPLASH_TEXT, SPLASH_FONT_SIZE_PT);
        let animation = splash_animation(surface.width_px(), run.width_px(surface.cell));
        Self { run, renderer: SignRenderer::new(Color::default(), surface), animation: Some(animation) }
    }

    /// The frame to show `elapsed_ms` after the scene started.
    ///
    /// A scene whose animation is deferred shows a dark surface.
    pub fn frame_at(&self, elapsed_ms: u64) -> Frame {
        let style = match &self.animation {
            Some(animation) => animation.sample(elapsed_ms),
            None => FrameStyle { opacity: 0.0, ..Default::default() },
        };
        self.renderer.compose(&self.run, &style)
    }

    pub fn is_finished(&self, elapsed_ms: u64) -> bool {
        self.animation.as_ref().is_some_and(|animation| animation.is_finished(elapsed_ms))
    }
}

/// The state of a scene's clock after polling it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Running { elapsed_ms: u64 },
    Done,
}

/// Tracks how long a scene has been playing.
#[derive(Debug, Default)]
pub struct Playback {
    start_time: Option<Instant>,
}

impl Playback {
    pub fn poll(&mut self, scene: &Scene) -> PlaybackState {
        let Some(start_time) = self.start_time else {
            self.start_time = Some(Instant::now());
            return PlaybackState::Running { elapsed_ms: 0 };
        };
        let elapsed_ms = start_time.elapsed().as_millis() as u64;
        if scene.is_finished(elapsed_ms) {
            PlaybackState::Done
        } else {
            PlaybackState::Running { elapsed_ms }
        }
    }

    pub fn restart(&mut self) {
        self.start_time = None;
    }
}

enum Input {
    None,
    Quit,
    Resized(SurfaceSize),
}

/// Shows the sign full screen until the user presses a key or clicks.
pub struct Player {
    config: DisplayConfig,
    metrics: FigletMetrics,
    splash: bool,
    frame_interval: Duration,
}

impl Player {
    pub fn new(config: DisplayConfig, metrics: FigletMetrics, options: &PlayerOptions) -> Self {
        let frame_interval = Duration::from_secs_f64(1.0 / options.fps.max(1) as f64);
        Self { config, metrics, splash: options.splash, frame_interval }
    }

    pub fn run<W: Write>(mut self, writer: W) -> Result<(), PlayerError> {
        info!("starting sign: {:?}", self.config);
        let mut guard = TerminalGuard::acquire(writer)?;
        let mut surface = query_surface()?;
        debug!("surface is {surface:?}");

        if self.splash {
            let quit = self.play(guard.writer(), &mut surface, |metrics, surface| Scene::splash(metrics, *surface))?;
            if quit {
                info!("sign dismissed during splash");
                return Ok(());
            }
        }
        let config = self.config.clone();
        self.play(guard.writer(), &mut surface, |metrics, surface| Scene::sign(&config, metrics, *surface))?;
        info!("sign dismissed");
        Ok(())
    }

    // Plays scenes built by `build` until the user quits (returns true) or the scene finishes
    // (returns false).
    fn play<W, F>(&mut self, writer: &mut W, surface: &mut SurfaceSize, build: F) -> Result<bool, PlayerError>
    where
        W: Write,
        F: Fn(&mut FigletMetrics, &SurfaceSize) -> Scene,
    {
        let mut scene = build(&mut self.metrics, surface);
        let mut playback = Playback::default();
        loop {
            let frame_start = Instant::now();
            let elapsed_ms = match playback.poll(&scene) {
                PlaybackState::Running { elapsed_ms } => elapsed_ms,
                PlaybackState::Done => return Ok(false),
            };
            paint(writer, &scene.frame_at(elapsed_ms))?;

            let timeout = self.frame_interval.saturating_sub(frame_start.elapsed());
            match poll_input(timeout)? {
                Input::None => (),
                Input::Quit => return Ok(true),
                Input::Resized(resized) => {
                    debug!("surface resized to {resized:?}");
                    *surface = resized;
                    scene = build(&mut self.metrics, surface);
                    playback.restart();
                }
            }
        }
    }
}

fn poll_input(timeout: Duration) -> io::Result<Input> {
    if !event::poll(timeout)? {
        return Ok(Input::None);
    }
    let input = match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Input::Quit,
        Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => Input::Quit,
        Event::Resize(..) => Input::Resized(query_surface()?),
        _ => Input::None,
    };
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DisplayMode, SettingsUpdate};
    use crate::metrics::{CellSize, GlyphRasterizer};
    use crate::render::LIT_CELL;

    const CELL: CellSize = CellSize { width_px: 10.0, height_px: 20.0 };

    fn metrics() -> FigletMetrics {
        FigletMetrics::new(GlyphRasterizer::new("standard").expect("standard font"), CELL)
    }

    fn surface(columns: u16) -> SurfaceSize {
        SurfaceSize { columns, rows: 12, cell: CELL }
    }

    fn lit_cells(frame: &Frame) -> usize {
        frame.lines.iter().map(|line| line.text().chars().filter(|c| *c == LIT_CELL).count()).sum()
    }

    #[test]
    fn scroll_starts_off_screen() {
        let config = DisplayConfig::default().apply(SettingsUpdate::Text("BLING".into())).expect("valid");
        let scene = Scene::sign(&config, &mut metrics(), surface(80));
        assert_eq!(lit_cells(&scene.frame_at(0)), 0);

        let period = scene.animation.as_ref().and_then(|a| a.period_ms()).expect("period");
        // a third of the way in the text is somewhere on screen
        assert!(lit_cells(&scene.frame_at(period / 3)) > 0);
        assert!(!scene.is_finished(period * 10));
    }

    #[test]
    fn scroll_duration_uses_surface_width() {
        let config = DisplayConfig::default();
        let mut metrics = metrics();
        let text_width = metrics.glyph_run(config.text(), config.font_size_pt()).width_px(CELL);

        let narrow = Scene::sign(&config, &mut metrics, surface(40));
        let wide = Scene::sign(&config, &mut metrics, surface(200));
        let period = |scene: &Scene| scene.animation.as_ref().and_then(|a| a.period_ms()).expect("period");

        let expected = |columns: f32| ((text_width + 2.0 * columns * 10.0) / 0.25).round() as u64;
        assert_eq!(period(&narrow), expected(40.0).max(1000));
        assert_eq!(period(&wide), expected(200.0).max(1000));
    }

    #[test]
    fn blink_is_visible_at_start() {
        let config = DisplayConfig::default().apply(SettingsUpdate::Mode(DisplayMode::Blink)).expect("valid");
        let scene = Scene::sign(&config, &mut metrics(), surface(120));
        assert!(lit_cells(&scene.frame_at(0)) > 0);
    }

    #[test]
    fn zero_width_surface_is_dark() {
        let scene = Scene::sign(&DisplayConfig::default(), &mut metrics(), surface(0));
        assert!(scene.animation.is_none());
        let frame = scene.frame_at(100);
        assert_eq!(lit_cells(&frame), 0);
    }

    #[test]
    fn splash_finishes() {
        let scene = Scene::splash(&mut metrics(), surface(80));
        // fully dark at first
        let first = scene.frame_at(0);
        assert!(first.lines.iter().flat_map(|line| &line.spans).all(|span| span.style.foreground == Color::BLACK));
        assert!(lit_cells(&scene.frame_at(1500)) > 0);
        assert!(!scene.is_finished(2000));
        assert!(scene.is_finished(2500));
    }

    #[test]
    fn splash_is_drawn_at_64pt() {
        let scene = Scene::splash(&mut metrics(), surface(80));
        // 64pt over 20px cells
        assert_eq!(scene.run.rows(), 3);
    }

    #[test]
    fn playback_starts_at_zero() {
        let scene = Scene::splash(&mut metrics(), surface(80));
        let mut playback = Playback::default();
        assert_eq!(playback.poll(&scene), PlaybackState::Running { elapsed_ms: 0 });
        assert!(matches!(playback.poll(&scene), PlaybackState::Running { .. }));
        playback.restart();
        assert_eq!(playback.poll(&scene), PlaybackState::Running { elapsed_ms: 0 });
    }

    #[test]
    fn text_outside_font_still_scrolls() {
        let config = DisplayConfig::default().apply(SettingsUpdate::Text("사랑해".into())).expect("valid");
        let scene = Scene::sign(&config, &mut metrics(), surface(80));
        let period = scene.animation.as_ref().and_then(|a| a.period_ms()).expect("period");
        assert!(lit_cells(&scene.frame_at(period / 3)) > 0);
    }
}
