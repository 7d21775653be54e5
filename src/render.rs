//! Terminal rendering of projected results.

use std::time::Duration;

use crate::project::DetectionResult;
use crate::theme::{Theme, Tone};

/// Render the summary stats and the per-object list.
pub fn render_result(
    result: &DetectionResult,
    elapsed: Option<Duration>,
    theme: &Theme,
) -> String {
    let mut out = String::new();
    out.push_str(&theme.paint(Tone::Heading, "Detection Results"));
    out.push('\n');

    out.push_str("  ");
    out.push_str(&theme.paint(Tone::Count, &result.objects_detected.to_string()));
    out.push_str(" objects   ");
    out.push_str(&theme.paint(
        Tone::Confidence,
        &format!("{:.1}%", result.mean_confidence_percent),
    ));
    out.push_str(" mean confidence");
    if let Some(elapsed) = elapsed {
        out.push_str("   ");
        out.push_str(&theme.paint(Tone::Elapsed, &format_duration(elapsed)));
    }
    out.push('\n');

    if result.detections.is_empty() {
        out.push_str(&theme.paint(Tone::Dim, "  no objects detected"));
        out.push('\n');
    }
    for detection in &result.detections {
        out.push_str(&format!(
            "  - {}: {} at ({:.0}, {:.0})\n",
            theme.paint(Tone::Label, &detection.label),
            theme.paint(
                Tone::Confidence,
                &format!("{:.1}%", detection.confidence_percent)
            ),
            detection.origin.x,
            detection.origin.y,
        ));
    }
    if result.annotated_image.is_some() {
        out.push_str(&theme.paint(Tone::Dim, "  annotated image available"));
        out.push('\n');
    }
    out
}

pub fn format_duration(duration: Duration) -> String {
    if duration.as_secs() >= 1 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        format!("{}ms", duration.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{BoxOrigin, DetectedObject};
    use crate::theme::ThemeMode;

    fn plain_theme() -> Theme {
        Theme::new(ThemeMode::Light, false)
    }

    #[test]
    fn renders_stats_and_object_rows() {
        let result = DetectionResult {
            objects_detected: 1,
            mean_confidence_percent: 90.0,
            detections: vec![DetectedObject {
                label: "Person".to_string(),
                confidence_percent: 90.0,
                origin: BoxOrigin { x: 10.0, y: 20.0 },
            }],
            annotated_image: None,
        };
        let text = render_result(&result, Some(Duration::from_millis(1240)), &plain_theme());

        assert!(text.contains("Detection Results"));
        assert!(text.contains("1 objects   90.0% mean confidence   1.24s"));
        assert!(text.contains("- Person: 90.0% at (10, 20)"));
    }

    #[test]
    fn renders_empty_result() {
        let result = DetectionResult::default();
        let text = render_result(&result, None, &plain_theme());
        assert!(text.contains("0 objects   0.0% mean confidence"));
        assert!(text.contains("no objects detected"));
    }

    #[test]
    fn formats_durations_like_the_progress_ui() {
        assert_eq!(format_duration(Duration::from_millis(5)), "5ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
    }
}
