//! Client-side filtering of detection results.

use crate::error::{DashError, Result};
use crate::model::DetectionBox;

/// Default minimum confidence shown on a fresh dashboard.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.85;

/// Confidence threshold plus label substring query.
///
/// A box passes when `confidence >= min_confidence` and, for a non-empty
/// query, its label contains the query case-insensitively.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultFilter {
    min_confidence: f64,
    label_query: String,
}

impl Default for ResultFilter {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            label_query: String::new(),
        }
    }
}

impl ResultFilter {
    pub fn new(min_confidence: f64, label_query: impl Into<String>) -> Result<Self> {
        let mut filter = Self::default();
        filter.set_min_confidence(min_confidence)?;
        filter.set_label_query(label_query);
        Ok(filter)
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    pub fn label_query(&self) -> &str {
        &self.label_query
    }

    /// Sets the threshold, clamped to [0, 1].
    pub fn set_min_confidence(&mut self, value: f64) -> Result<()> {
        if value.is_nan() {
            return Err(DashError::invalid_input("Confidence threshold must be a number"));
        }
        self.min_confidence = value.clamp(0.0, 1.0);
        Ok(())
    }

    pub fn set_label_query(&mut self, query: impl Into<String>) {
        self.label_query = query.into();
    }

    pub fn matches(&self, detection: &DetectionBox) -> bool {
        detection.confidence >= self.min_confidence && self.matches_label(&detection.label)
    }

    fn matches_label(&self, label: &str) -> bool {
        self.label_query.is_empty()
            || label
                .to_lowercase()
                .contains(&self.label_query.to_lowercase())
    }

    /// Returns the passing boxes in their original order.
    pub fn apply(&self, detections: &[DetectionBox]) -> Vec<DetectionBox> {
        detections
            .iter()
            .filter(|d| self.matches(d))
            .cloned()
            .collect()
    }
}

/// Free-function form of [`ResultFilter::apply`].
pub fn filter_detections(
    detections: &[DetectionBox],
    min_confidence: f64,
    label_query: &str,
) -> Vec<DetectionBox> {
    ResultFilter {
        min_confidence,
        label_query: label_query.to_string(),
    }
    .apply(detections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, DetectionStatus};

    fn det(bbox_id: u32, label: &str, confidence: f64) -> DetectionBox {
        DetectionBox {
            file_id: "file-1".to_string(),
            bbox_id,
            source: "photo".to_string(),
            model: "yolov12-small".to_string(),
            label: label.to_string(),
            confidence,
            bbox: BoundingBox::default(),
            color: "border-green-500".to_string(),
            status: DetectionStatus::Complete,
        }
    }

    fn sample() -> Vec<DetectionBox> {
        vec![
            det(1, "person", 0.92),
            det(2, "Person", 0.85),
            det(3, "car", 0.97),
            det(4, "traffic light", 0.40),
            det(5, "sports ball", 0.86),
        ]
    }

    fn ids(boxes: &[DetectionBox]) -> Vec<u32> {
        boxes.iter().map(|d| d.bbox_id).collect()
    }

    #[test]
    fn test_default_threshold_is_inclusive() {
        let filtered = ResultFilter::default().apply(&sample());
        assert_eq!(ids(&filtered), vec![1, 2, 3, 5]);
    }

    #[test]
    fn test_label_query_is_case_insensitive_substring() {
        let filtered = filter_detections(&sample(), 0.0, "ERSO");
        assert_eq!(ids(&filtered), vec![1, 2]);

        // substring anywhere, not a prefix match
        let filtered = filter_detections(&sample(), 0.0, "light");
        assert_eq!(ids(&filtered), vec![4]);

        let filtered = filter_detections(&sample(), 0.0, "bicycle");
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_empty_query_matches_everything_above_threshold() {
        let filtered = filter_detections(&sample(), 0.0, "");
        assert_eq!(filtered.len(), 5);
    }

    #[test]
    fn test_result_is_exactly_the_matching_subset() {
        let all = sample();
        let filter = ResultFilter::new(0.86, "s").unwrap();
        let filtered = filter.apply(&all);

        for d in &all {
            let expected = d.confidence >= 0.86 && d.label.to_lowercase().contains('s');
            assert_eq!(filtered.contains(d), expected, "box {}", d.bbox_id);
        }
    }

    #[test]
    fn test_filter_is_idempotent() {
        let filter = ResultFilter::new(0.5, "p").unwrap();
        let once = filter.apply(&sample());
        let twice = filter.apply(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_threshold_is_clamped_and_nan_rejected() {
        let mut filter = ResultFilter::default();
        filter.set_min_confidence(1.7).unwrap();
        assert_eq!(filter.min_confidence(), 1.0);
        filter.set_min_confidence(-0.2).unwrap();
        assert_eq!(filter.min_confidence(), 0.0);
        assert!(filter.set_min_confidence(f64::NAN).is_err());
        assert_eq!(filter.min_confidence(), 0.0);
    }
}
