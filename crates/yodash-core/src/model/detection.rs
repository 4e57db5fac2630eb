//! DetectionBox domain model.

use serde::{Deserialize, Serialize};

/// Rectangle in the source image's natural pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Processing state of a single box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionStatus {
    Pending,
    #[default]
    Complete,
}

impl DetectionStatus {
    /// Short label used in box listings.
    pub fn display_label(&self) -> &'static str {
        match self {
            DetectionStatus::Pending => "Pending",
            DetectionStatus::Complete => "Ready",
        }
    }
}

/// One detected object instance within one uploaded image.
///
/// Boxes arrive in bulk with each inference response and are replaced
/// wholesale on the next run, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionBox {
    /// Identifier of the source image on the backend
    pub file_id: String,
    /// Unique within one response, used as a stable render key
    pub bbox_id: u32,
    /// Human-readable origin label, usually the file stem
    #[serde(default)]
    pub source: String,
    /// Model variant that produced this box
    #[serde(default)]
    pub model: String,
    /// Class name
    pub label: String,
    /// Model-reported probability in [0, 1]
    pub confidence: f64,
    pub bbox: BoundingBox,
    /// Display style token chosen by the backend
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub status: DetectionStatus,
}
