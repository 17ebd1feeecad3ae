mod blink;
mod keyframes;
mod marquee;
mod splash;

pub use blink::{compute_blink_plan, BlinkFrame, BlinkPlan, GLOW_RADIUS_PER_OPACITY, MIN_BLINK_DURATION_MS};
pub use keyframes::{Easing, Keyframe, KeyframeCurve};
pub use marquee::{compute_marquee_plan, MarqueePlan, MIN_MARQUEE_DURATION_MS, SPEED_CALIBRATION};
pub use splash::SPLASH_TEXT;

use crate::config::DisplayMode;

/// Animators clamp the speed to this so they never divide by zero.
pub const MIN_SPEED: f32 = 0.01;

/// How to draw the text run on a given frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStyle {
    /// Horizontal offset of the text's left edge from the container's left edge.
    pub offset_px: f32,

    /// 0 is invisible, 1 is fully lit.
    pub opacity: f32,

    /// Scale applied around the text's center.
    pub scale: f32,

    pub glow_radius_px: f32,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self { offset_px: 0.0, opacity: 1.0, scale: 1.0, glow_radius_px: 0.0 }
    }
}

/// An animation: a pure function of the time elapsed since it started.
pub trait Animation {
    /// The style to draw the text with `elapsed_ms` after the animation started.
    fn sample(&self, elapsed_ms: u64) -> FrameStyle;

    /// The length of one cycle, for looping animations.
    fn period_ms(&self) -> Option<u64> {
        None
    }

    /// Whether a one-shot animation is over.
    fn is_finished(&self, _elapsed_ms: u64) -> bool {
        false
    }
}

/// Get the animation for a display mode.
///
/// Returns `None` while the container hasn't been laid out yet.
pub fn get_animation(
    mode: DisplayMode,
    text: &str,
    font_size_pt: f32,
    speed: f32,
    container_width_px: f32,
    text_width_px: f32,
) -> Option<Box<dyn Animation>> {
    match mode {
        DisplayMode::Scroll => {
            let plan = compute_marquee_plan(text, font_size_pt, speed, container_width_px, text_width_px)?;
            Some(Box::new(marquee::Marquee::new(plan)))
        }
        DisplayMode::Blink => {
            if !container_width_px.is_finite() || container_width_px <= 0.0 {
                return None;
            }
            Some(Box::new(blink::Blink::new(compute_blink_plan(speed), container_width_px, text_width_px)))
        }
    }
}

/// Get the power-on splash animation for a text run of the given width.
pub fn splash_animation(container_width_px: f32, text_width_px: f32) -> Box<dyn Animation> {
    Box::new(splash::Splash::new(container_width_px, text_width_px))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_mode() {
        let animation = get_animation(DisplayMode::Scroll, "BLING", 100.0, 0.5, 1000.0, 400.0).expect("no animation");
        assert_eq!(animation.period_ms(), Some(9600));
        assert_eq!(animation.sample(0).offset_px, 1000.0);
        assert!(!animation.is_finished(1_000_000));
    }

    #[test]
    fn blink_mode() {
        let animation = get_animation(DisplayMode::Blink, "BLING", 100.0, 2.0, 1000.0, 400.0).expect("no animation");
        assert_eq!(animation.period_ms(), Some(500));
        assert_eq!(animation.sample(0).offset_px, 300.0);
    }

    #[test]
    fn deferred_until_laid_out() {
        assert!(get_animation(DisplayMode::Scroll, "BLING", 100.0, 0.5, 0.0, 400.0).is_none());
        assert!(get_animation(DisplayMode::Blink, "BLING", 100.0, 0.5, 0.0, 400.0).is_none());
    }

    #[test]
    fn splash_finishes() {
        let splash = splash_animation(100.0, 10.0);
        assert!(!splash.is_finished(0));
        assert!(splash.is_finished(10_000));
    }
}
