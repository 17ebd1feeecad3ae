use super::{Animation, FrameStyle, MIN_SPEED};
use serde::Serialize;
use tracing::debug;

/// A cycle never lasts less than this, however short the text or fast the speed.
pub const MIN_MARQUEE_DURATION_MS: u64 = 1000;

/// Turns the user facing speed factor into pixels per millisecond.
pub const SPEED_CALIBRATION: f64 = 0.5;

/// The timing and travel of one scroll cycle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MarqueePlan {
    /// Offset of the text's left edge when the cycle starts: just past the right edge.
    pub start_offset_px: f32,

    /// Offset of the text's left edge when the cycle ends: fully past the left edge.
    pub end_offset_px: f32,

    pub duration_ms: u64,
}

/// Compute the scroll plan for a text run inside a container.
///
/// Returns `None` while the container has no usable width, which means it hasn't been laid out
/// yet.
pub fn compute_marquee_plan(
    text: &str,
    font_size_pt: f32,
    speed: f32,
    container_width_px: f32,
    measured_text_width_px: f32,
) -> Option<MarqueePlan> {
    if !container_width_px.is_finite() || container_width_px <= 0.0 {
        debug!("container width is {container_width_px}, deferring marquee plan for '{text}'");
        return None;
    }
    let text_width_px =
        if measured_text_width_px.is_finite() { measured_text_width_px.max(0.0) } else { 0.0 };
    let speed = speed.max(MIN_SPEED);

    let start_offset_px = container_width_px;
    let end_offset_px = -(text_width_px + container_width_px);
    let distance_px = start_offset_px as f64 - end_offset_px as f64;
    let duration_ms = ((distance_px / (speed as f64 * SPEED_CALIBRATION)).round() as u64).max(MIN_MARQUEE_DURATION_MS);

    let plan = MarqueePlan { start_offset_px, end_offset_px, duration_ms };
    debug!("marquee plan for '{text}' at {font_size_pt}pt, text width {text_width_px}px: {plan:?}");
    Some(plan)
}

impl MarqueePlan {
    /// The total distance the text travels in one cycle.
    pub fn distance_px(&self) -> f32 {
        self.start_offset_px - self.end_offset_px
    }

    /// The offset at a given progress through a cycle, 0..=1.
    pub fn offset_at_progress(&self, progress: f64) -> f32 {
        let progress = progress.clamp(0.0, 1.0);
        let start = self.start_offset_px as f64;
        let end = self.end_offset_px as f64;
        (start + (end - start) * progress) as f32
    }

    /// The offset `elapsed_ms` after the animation started.
    ///
    /// Cycles restart: once a cycle is over the text jumps back to the start offset.
    pub fn position(&self, elapsed_ms: u64) -> f32 {
        let duration = self.duration_ms.max(1);
        let cycle_ms = elapsed_ms % duration;
        self.offset_at_progress(cycle_ms as f64 / duration as f64)
    }
}

/// Scrolls the text across the container.
pub(crate) struct Marquee {
    plan: MarqueePlan,
}

impl Marquee {
    pub(crate) fn new(plan: MarqueePlan) -> Self {
        Self { plan }
    }
}

impl Animation for Marquee {
    fn sample(&self, elapsed_ms: u64) -> FrameStyle {
        FrameStyle { offset_px: self.plan.position(elapsed_ms), ..Default::default() }
    }

    fn period_ms(&self) -> Option<u64> {
        Some(self.plan.duration_ms)
    }
}
