//! Projection of the raw detection payload into display state.
//!
//! Pure and synchronous: no I/O, no failure mode beyond what the transport
//! layer already guarantees about the payload shape.

use serde::Serialize;

use crate::client::{PredictResponse, WireDetection};

/// Display-ready result of one analysis call.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DetectionResult {
    pub objects_detected: usize,
    pub mean_confidence_percent: f64,
    /// Order preserved from the response.
    pub detections: Vec<DetectedObject>,
    /// Server-rendered visualization as a data URI, when the service sent
    /// one.
    pub annotated_image: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct DetectedObject {
    pub label: String,
    pub confidence_percent: f64,
    pub origin: BoxOrigin,
}

/// Top-left corner of the reported box. The remaining two bbox elements
/// are intentionally not modeled.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct BoxOrigin {
    pub x: f64,
    pub y: f64,
}

/// Map the raw payload into display state. An empty detection list yields
/// a zero mean rather than dividing by zero.
pub fn project(response: &PredictResponse) -> DetectionResult {
    let count = response.detections.len();
    let mean_confidence_percent = if count == 0 {
        0.0
    } else {
        let sum: f64 = response
            .detections
            .iter()
            .map(|detection| detection.confidence)
            .sum();
        round1(sum / count as f64 * 100.0)
    };
    DetectionResult {
        objects_detected: count,
        mean_confidence_percent,
        detections: response.detections.iter().map(project_object).collect(),
        annotated_image: response.annotated_image.clone(),
    }
}

fn project_object(detection: &WireDetection) -> DetectedObject {
    DetectedObject {
        label: detection.class_name.clone(),
        confidence_percent: round1(detection.confidence * 100.0),
        origin: BoxOrigin {
            x: detection.bbox[0],
            y: detection.bbox[1],
        },
    }
}

/// Round to one decimal place.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
