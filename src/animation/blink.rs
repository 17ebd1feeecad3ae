use super::keyframes::KeyframeCurve;
use super::{Animation, FrameStyle, MIN_SPEED};
use serde::Serialize;
use tracing::debug;

/// A blink period never lasts less than this.
pub const MIN_BLINK_DURATION_MS: u64 = 200;

/// The glow radius at full opacity.
pub const GLOW_RADIUS_PER_OPACITY: f32 = 30.0;

const OPACITY_KEYFRAMES: [(f32, f32); 6] = [(0.0, 1.0), (0.1, 0.1), (0.2, 1.0), (0.5, 0.3), (0.8, 1.0), (0.9, 0.0)];
const SCALE_KEYFRAMES: [(f32, f32); 4] = [(0.0, 1.0), (0.4, 1.0), (0.5, 1.1), (0.6, 1.0)];

/// One period of the flickering neon effect.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BlinkPlan {
    pub duration_ms: u64,
    pub opacity_keyframes: KeyframeCurve,
    pub scale_keyframes: KeyframeCurve,
}

/// What a blinking sign looks like at a point in time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BlinkFrame {
    pub opacity: f32,
    pub scale: f32,
    pub glow_radius_px: f32,
}

/// Compute the blink plan for the given speed.
pub fn compute_blink_plan(speed: f32) -> BlinkPlan {
    let speed = speed.max(MIN_SPEED);
    let duration_ms = ((1000.0 / speed as f64).round() as u64).max(MIN_BLINK_DURATION_MS);
    debug!("blink plan at speed {speed}: period {duration_ms}ms");
    BlinkPlan {
        duration_ms,
        opacity_keyframes: KeyframeCurve::linear(&OPACITY_KEYFRAMES),
        scale_keyframes: KeyframeCurve::linear(&SCALE_KEYFRAMES),
    }
}

impl BlinkPlan {
    /// Sample both curves `elapsed_ms` after the animation started. Periods restart rather than
    /// reverse.
    pub fn sample(&self, elapsed_ms: u64) -> BlinkFrame {
        let duration = self.duration_ms.max(1);
        let fraction = ((elapsed_ms % duration) as f64 / duration as f64) as f32;
        let opacity = self.opacity_keyframes.value_at(fraction);
        BlinkFrame {
            opacity,
            scale: self.scale_keyframes.value_at(fraction),
            glow_radius_px: GLOW_RADIUS_PER_OPACITY * opacity,
        }
    }
}

/// Flickers centered text like a neon tube.
pub(crate) struct Blink {
    plan: BlinkPlan,
    offset_px: f32,
}

impl Blink {
    /// Create a blinking animation for text of `text_width_px` centered in `container_width_px`.
    pub(crate) fn new(plan: BlinkPlan, container_width_px: f32, text_width_px: f32) -> Self {
        Self { plan, offset_px: (container_width_px - text_width_px) / 2.0 }
    }
}

impl Animation for Blink {
    fn sample(&self, elapsed_ms: u64) -> FrameStyle {
        let frame = self.plan.sample(elapsed_ms);
        FrameStyle {
            offset_px: self.offset_px,
            opacity: frame.opacity,
            scale: frame.scale,
            glow_radius_px: frame.glow_radius_px,
        }
    }

    fn period_ms(&self) -> Option<u64> {
        Some(self.plan.duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn assert_close(actual: f32, expected: f32) {
        assert!((actual - expected).abs() < 1e-4, "{actual} != {expected}");
    }

    #[rstest]
    #[case::fastest(2.0, 500)]
    #[case::slowest(0.1, 10000)]
    #[case::default(0.5, 2000)]
    #[case::third(0.3, 3333)]
    fn duration(#[case] speed: f32, #[case] expected: u64) {
        assert_eq!(compute_blink_plan(speed).duration_ms, expected);
    }

    #[test]
    fn duration_across_speeds() {
        for step in 1..=200 {
            let speed = step as f32 / 100.0;
            let expected = ((1000.0 / speed as f64).round() as u64).max(200);
            assert_eq!(compute_blink_plan(speed).duration_ms, expected, "speed {speed}");
        }
    }

    #[test]
    fn duration_floor() {
        assert_eq!(compute_blink_plan(10.0).duration_ms, MIN_BLINK_DURATION_MS);
    }

    #[test]
    fn non_positive_speed_is_clamped() {
        assert_eq!(compute_blink_plan(0.0).duration_ms, compute_blink_plan(MIN_SPEED).duration_ms);
        assert_eq!(compute_blink_plan(f32::NAN).duration_ms, compute_blink_plan(MIN_SPEED).duration_ms);
    }

    #[rstest]
    #[case(0, 1.0, 1.0)]
    #[case(50, 0.1, 1.0)]
    #[case(100, 1.0, 1.0)]
    #[case(200, 0.53333, 1.0)]
    #[case(250, 0.3, 1.1)]
    #[case(275, 0.41667, 1.05)]
    #[case(400, 1.0, 1.0)]
    #[case(450, 0.0, 1.0)]
    #[case(480, 0.0, 1.0)]
    #[case(500, 1.0, 1.0)]
    fn keyframes_at_fastest_speed(#[case] elapsed: u64, #[case] opacity: f32, #[case] scale: f32) {
        let plan = compute_blink_plan(2.0);
        let frame = plan.sample(elapsed);
        assert_close(frame.opacity, opacity);
        assert_close(frame.scale, scale);
    }

    #[test]
    fn interpolates_between_keyframes() {
        let plan = compute_blink_plan(1.0);
        // halfway between (0.0, 1.0) and (0.1, 0.1)
        assert_close(plan.sample(50).opacity, 0.55);
        // halfway between (0.4, 1.0) and (0.5, 1.1)
        assert_close(plan.sample(450).scale, 1.05);
    }

    #[test]
    fn glow_follows_opacity() {
        let plan = compute_blink_plan(0.7);
        for elapsed in (0..plan.duration_ms * 2).step_by(7) {
            let frame = plan.sample(elapsed);
            assert_eq!(frame.glow_radius_px, 30.0 * frame.opacity);
        }
    }

    #[test]
    fn periodic() {
        let plan = compute_blink_plan(1.3);
        for elapsed in [0, 13, 250, 700] {
            assert_eq!(plan.sample(elapsed), plan.sample(elapsed + plan.duration_ms * 5));
        }
    }

    #[test]
    fn animation_is_centered() {
        let blink = Blink::new(compute_blink_plan(2.0), 1000.0, 400.0);
        let frame = blink.sample(0);
        assert_eq!(frame.offset_px, 300.0);
        assert_eq!(frame.opacity, 1.0);
        assert_eq!(frame.glow_radius_px, 30.0);
        assert_eq!(blink.sample(125).offset_px, 300.0);
    }
}
