use serde::Serialize;

/// How progress between two keyframes is mapped onto the value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,

    /// Quick start, gentle landing: `cubic-bezier(0.4, 0, 0.2, 1)`.
    FastOutSlowIn,
}

impl Easing {
    /// Map a 0..1 progress onto an eased 0..1 progress.
    pub fn transform(&self, fraction: f32) -> f32 {
        let fraction = fraction.clamp(0.0, 1.0);
        match self {
            Self::Linear => fraction,
            Self::FastOutSlowIn => cubic_bezier(0.4, 0.0, 0.2, 1.0, fraction),
        }
    }
}

// Solves x(t) = x for t by bisection, then evaluates y(t). Both control point x coordinates are
// within 0..1 so x(t) is monotonic.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, x: f32) -> f32 {
    let curve = |a: f32, b: f32, t: f32| {
        let inverse = 1.0 - t;
        3.0 * inverse * inverse * t * a + 3.0 * inverse * t * t * b + t * t * t
    };
    if x <= 0.0 || x >= 1.0 {
        return x;
    }
    let (mut low, mut high) = (0.0_f32, 1.0_f32);
    let mut t = x;
    for _ in 0..32 {
        let estimate = curve(x1, x2, t);
        if (estimate - x).abs() < 1e-6 {
            break;
        }
        if estimate < x {
            low = t;
        } else {
            high = t;
        }
        t = (low + high) / 2.0;
    }
    curve(y1, y2, t)
}

/// A control point of a [KeyframeCurve].
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Keyframe {
    /// Where in the period this keyframe sits, 0..1.
    pub fraction: f32,

    pub value: f32,

    /// The easing used for the segment that starts at this keyframe.
    pub easing: Easing,
}

/// A piecewise function through a set of keyframes.
///
/// Before the first keyframe the curve holds the first value, and after the last one it holds the
/// last value.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct KeyframeCurve {
    keyframes: Vec<Keyframe>,
}

impl KeyframeCurve {
    /// Build a linear curve through `(fraction, value)` points.
    pub fn linear(points: &[(f32, f32)]) -> Self {
        let mut keyframes: Vec<Keyframe> = points
            .iter()
            .map(|(fraction, value)| Keyframe { fraction: *fraction, value: *value, easing: Easing::Linear })
            .collect();
        keyframes.sort_by(|a, b| a.fraction.total_cmp(&b.fraction));
        Self { keyframes }
    }

    /// Use `easing` for the segment starting at the keyframe at `index`.
    pub fn with_easing(mut self, index: usize, easing: Easing) -> Self {
        if let Some(keyframe) = self.keyframes.get_mut(index) {
            keyframe.easing = easing;
        }
        self
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Get the value of this curve at the given fraction of its period.
    pub fn value_at(&self, fraction: f32) -> f32 {
        let Some(first) = self.keyframes.first() else {
            return 0.0;
        };
        if fraction.is_nan() || fraction <= first.fraction {
            return first.value;
        }
        // index of the last keyframe at or before `fraction`
        let index = self.keyframes.partition_point(|keyframe| keyframe.fraction <= fraction) - 1;
        let from = &self.keyframes[index];
        let Some(to) = self.keyframes.get(index + 1) else {
            return from.value;
        };
        let span = to.fraction - from.fraction;
        if span <= 0.0 {
            return to.value;
        }
        let progress = from.easing.transform((fraction - from.fraction) / span);
        from.value + (to.value - from.value) * progress
    }
}
