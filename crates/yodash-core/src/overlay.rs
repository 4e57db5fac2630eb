//! Overlay geometry for drawing detections over a resized preview.
//!
//! Detection boxes are reported in the natural pixel space of the uploaded
//! image. The preview is usually shown smaller, so every rectangle is
//! scaled per axis by `displayed / natural` before drawing.

use crate::model::DetectionBox;

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either side is zero or not a finite positive number.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Screen-space rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// One rectangle ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayBox {
    pub bbox_id: u32,
    pub rect: Rect,
    pub caption: String,
    pub color: String,
}

/// Confidence as a percentage with one decimal, ties rounded away from zero
/// (`0.5625` reads `56.3`).
pub fn format_percent(confidence: f64) -> String {
    let percent = confidence * 100.0;
    format!("{:.1}", (percent * 10.0).round() / 10.0)
}

/// Caption shown above a box, e.g. `person · 91.3%`.
pub fn caption(detection: &DetectionBox) -> String {
    format!("{} · {}%", detection.label, format_percent(detection.confidence))
}

/// Maps boxes from natural image coordinates to displayed coordinates.
///
/// Produces nothing while the natural size is unknown (image not loaded).
pub fn render_overlay(
    displayed: Size,
    natural: Option<Size>,
    detections: &[DetectionBox],
) -> Vec<OverlayBox> {
    let Some(natural) = natural.filter(|n| !n.is_empty()) else {
        return Vec::new();
    };

    let scale_x = displayed.width / natural.width;
    let scale_y = displayed.height / natural.height;

    detections
        .iter()
        .map(|d| OverlayBox {
            bbox_id: d.bbox_id,
            rect: Rect {
                x: d.bbox.x * scale_x,
                y: d.bbox.y * scale_y,
                width: d.bbox.width * scale_x,
                height: d.bbox.height * scale_y,
            },
            caption: caption(d),
            color: d.color.clone(),
        })
        .collect()
}

/// Displayed size of an image laid out with "contain" semantics inside
/// `viewport`. Images smaller than the viewport keep their natural size.
pub fn fit_within(natural: Size, viewport: Size) -> Size {
    if natural.is_empty() || viewport.is_empty() {
        return Size::default();
    }
    let scale = (viewport.width / natural.width)
        .min(viewport.height / natural.height)
        .min(1.0);
    Size::new(natural.width * scale, natural.height * scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, DetectionStatus};

    fn det(bbox_id: u32, label: &str, confidence: f64, bbox: BoundingBox) -> DetectionBox {
        DetectionBox {
            file_id: "f".to_string(),
            bbox_id,
            source: "photo".to_string(),
            model: "yolov12-small".to_string(),
            label: label.to_string(),
            confidence,
            bbox,
            color: "border-green-500".to_string(),
            status: DetectionStatus::Complete,
        }
    }

    #[test]
    fn test_half_size_preview_halves_every_rect() {
        let boxes = vec![det(
            7,
            "person",
            0.9,
            BoundingBox {
                x: 100.0,
                y: 100.0,
                width: 200.0,
                height: 200.0,
            },
        )];

        let overlay = render_overlay(
            Size::new(500.0, 400.0),
            Some(Size::new(1000.0, 800.0)),
            &boxes,
        );

        assert_eq!(overlay.len(), 1);
        assert_eq!(
            overlay[0].rect,
            Rect {
                x: 50.0,
                y: 50.0,
                width: 100.0,
                height: 100.0
            }
        );
        assert_eq!(overlay[0].bbox_id, 7);
        assert_eq!(overlay[0].color, "border-green-500");
    }

    #[test]
    fn test_axes_scale_independently() {
        let boxes = vec![det(
            1,
            "car",
            0.5,
            BoundingBox {
                x: 10.0,
                y: 10.0,
                width: 10.0,
                height: 10.0,
            },
        )];
        let overlay = render_overlay(Size::new(200.0, 50.0), Some(Size::new(100.0, 100.0)), &boxes);
        assert_eq!(overlay[0].rect.x, 20.0);
        assert_eq!(overlay[0].rect.y, 5.0);
        assert_eq!(overlay[0].rect.width, 20.0);
        assert_eq!(overlay[0].rect.height, 5.0);
    }

    #[test]
    fn test_unloaded_image_renders_nothing() {
        let boxes = vec![det(1, "car", 0.5, BoundingBox::default())];
        assert!(render_overlay(Size::new(500.0, 400.0), None, &boxes).is_empty());
        assert!(
            render_overlay(Size::new(500.0, 400.0), Some(Size::new(0.0, 800.0)), &boxes)
                .is_empty()
        );
    }

    #[test]
    fn test_caption_rounds_to_one_decimal() {
        let d = det(1, "person", 0.9134, BoundingBox::default());
        assert_eq!(caption(&d), "person · 91.3%");
        let d = det(2, "dog", 0.5, BoundingBox::default());
        assert_eq!(caption(&d), "dog · 50.0%");
    }

    #[test]
    fn test_percent_ties_round_up() {
        assert_eq!(format_percent(0.5625), "56.3");
        assert_eq!(format_percent(0.0625), "6.3");
        assert_eq!(format_percent(1.0), "100.0");
        let d = det(3, "cat", 0.5625, BoundingBox::default());
        assert_eq!(caption(&d), "cat · 56.3%");
    }

    #[test]
    fn test_fit_within_contains_and_never_upscales() {
        let fitted = fit_within(Size::new(1920.0, 1080.0), Size::new(960.0, 440.0));
        assert!((fitted.height - 440.0).abs() < 1e-9);
        assert!((fitted.width - 1920.0 * 440.0 / 1080.0).abs() < 1e-9);

        let small = fit_within(Size::new(320.0, 240.0), Size::new(960.0, 440.0));
        assert_eq!(small, Size::new(320.0, 240.0));

        assert_eq!(
            fit_within(Size::default(), Size::new(960.0, 440.0)),
            Size::default()
        );
    }
}
