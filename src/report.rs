use crate::animation::{compute_blink_plan, compute_marquee_plan, BlinkPlan, MarqueePlan};
use crate::config::{DisplayConfig, DisplayMode};
use crate::metrics::{MetricsError, TextMetrics};
use crate::render::SurfaceSize;
use serde::Serialize;

/// The animation plan the player would use for a config, in a printable form.
#[derive(Debug, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum PlanReport {
    Scroll {
        text_width_px: f32,
        container_width_px: f32,
        /// Missing while the container has no width.
        plan: Option<MarqueePlan>,
    },
    Blink {
        plan: BlinkPlan,
    },
}

impl PlanReport {
    pub fn build(config: &DisplayConfig, metrics: &dyn TextMetrics, surface: SurfaceSize) -> Result<Self, MetricsError> {
        let report = match config.mode() {
            DisplayMode::Scroll => {
                let text_width_px = metrics.measure(config.text(), config.font_size_pt())?;
                let container_width_px = surface.width_px();
                let plan = compute_marquee_plan(
                    config.text(),
                    config.font_size_pt(),
                    config.speed(),
                    container_width_px,
                    text_width_px,
                );
                Self::Scroll { text_width_px, container_width_px, plan }
            }
            DisplayMode::Blink => Self::Blink { plan: compute_blink_plan(config.speed()) },
        };
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettingsUpdate;
    use crate::metrics::CellSize;

    struct FixedWidth(f32);

    impl TextMetrics for FixedWidth {
        fn measure(&self, _text: &str, _font_size_pt: f32) -> Result<f32, MetricsError> {
            Ok(self.0)
        }
    }

    const SURFACE: SurfaceSize = SurfaceSize { columns: 100, rows: 30, cell: CellSize { width_px: 10.0, height_px: 20.0 } };

    #[test]
    fn scroll_report() {
        let report = PlanReport::build(&DisplayConfig::default(), &FixedWidth(400.0), SURFACE).expect("report");
        let expected = PlanReport::Scroll {
            text_width_px: 400.0,
            container_width_px: 1000.0,
            plan: Some(MarqueePlan { start_offset_px: 1000.0, end_offset_px: -1400.0, duration_ms: 9600 }),
        };
        assert_eq!(report, expected);
    }

    #[test]
    fn blink_report_json() {
        let config = DisplayConfig::default()
            .apply_all([SettingsUpdate::Mode(DisplayMode::Blink), SettingsUpdate::Speed(2.0)])
            .expect("valid");
        let report = PlanReport::build(&config, &FixedWidth(0.0), SURFACE).expect("report");
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["mode"], "blink");
        assert_eq!(json["plan"]["duration_ms"], 500);
        assert_eq!(json["plan"]["opacity_keyframes"].as_array().map(Vec::len), Some(6));
        assert_eq!(json["plan"]["scale_keyframes"].as_array().map(Vec::len), Some(4));
    }

    #[test]
    fn deferred_scroll_report() {
        let surface = SurfaceSize { columns: 0, ..SURFACE };
        let report = PlanReport::build(&DisplayConfig::default(), &FixedWidth(400.0), surface).expect("report");
        let json = serde_json::to_value(&report).expect("serialize");
        assert!(json["plan"].is_null());
    }
}
