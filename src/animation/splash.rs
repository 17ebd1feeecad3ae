use super::blink::GLOW_RADIUS_PER_OPACITY;
use super::keyframes::{Easing, KeyframeCurve};
use super::{Animation, FrameStyle};

/// The text shown while the sign powers on.
pub const SPLASH_TEXT: &str = "BLING";

const SWITCH_ON_MS: u64 = 2000;
const HOLD_MS: u64 = 500;

/// A neon tube sputtering to life: a couple of weak flickers before it lights up for good, then a
/// short pause fully lit.
pub(crate) struct Splash {
    alpha: KeyframeCurve,
    offset_px: f32,
}

impl Splash {
    pub(crate) fn new(container_width_px: f32, text_width_px: f32) -> Self {
        let at = |ms: u64| ms as f32 / SWITCH_ON_MS as f32;
        let alpha = KeyframeCurve::linear(&[
            (at(0), 0.0),
            (at(400), 0.2),
            (at(600), 0.0),
            (at(800), 0.5),
            (at(1000), 0.0),
            (at(1200), 1.0),
        ])
        .with_easing(5, Easing::FastOutSlowIn);
        Self { alpha, offset_px: (container_width_px - text_width_px) / 2.0 }
    }

    pub(crate) fn total_ms() -> u64 {
        SWITCH_ON_MS + HOLD_MS
    }
}

impl Animation for Splash {
    fn sample(&self, elapsed_ms: u64) -> FrameStyle {
        let fraction = elapsed_ms.min(SWITCH_ON_MS) as f32 / SWITCH_ON_MS as f32;
        let alpha = self.alpha.value_at(fraction);
        FrameStyle { offset_px: self.offset_px, opacity: alpha, scale: 1.0, glow_radius_px: GLOW_RADIUS_PER_OPACITY * alpha }
    }

    fn is_finished(&self, elapsed_ms: u64) -> bool {
        elapsed_ms >= Self::total_ms()
    }
}
