//! Writes the preview image with detection boxes drawn on top.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Color;
use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use yodash_core::model::DetectionBox;

use crate::render::box_color;

fn rgb(color: Color) -> Rgb<u8> {
    match color {
        Color::Red => Rgb([239, 68, 68]),
        Color::Yellow => Rgb([245, 158, 11]),
        Color::Blue => Rgb([59, 130, 246]),
        Color::Magenta => Rgb([168, 85, 247]),
        Color::Cyan => Rgb([6, 182, 212]),
        _ => Rgb([34, 197, 94]),
    }
}

/// Draws `detections` (natural image coordinates) onto `image`, clipped to its bounds.
///
/// Returns the number of boxes drawn.
pub fn draw_boxes(image: &mut RgbImage, detections: &[DetectionBox]) -> usize {
    let (img_w, img_h) = (image.width() as f64, image.height() as f64);
    let mut drawn = 0;

    for detection in detections {
        let bbox = &detection.bbox;
        let x0 = bbox.x.clamp(0.0, img_w);
        let y0 = bbox.y.clamp(0.0, img_h);
        let x1 = (bbox.x + bbox.width).clamp(0.0, img_w);
        let y1 = (bbox.y + bbox.height).clamp(0.0, img_h);
        let width = (x1 - x0).round() as u32;
        let height = (y1 - y0).round() as u32;
        if width == 0 || height == 0 {
            continue;
        }

        let color = rgb(box_color(&detection.color));
        let rect = Rect::at(x0 as i32, y0 as i32).of_size(width, height);
        draw_hollow_rect_mut(image, rect, color);

        // second outline for visibility
        if width > 2 && height > 2 {
            let inner = Rect::at(x0 as i32 + 1, y0 as i32 + 1).of_size(width - 2, height - 2);
            draw_hollow_rect_mut(image, inner, color);
        }
        drawn += 1;
    }
    drawn
}

/// Decodes `bytes`, draws the boxes and saves a PNG at `path`.
pub fn export_png(bytes: &[u8], detections: &[DetectionBox], path: &Path) -> Result<usize> {
    let mut image = image::load_from_memory(bytes)
        .context("Selected file is not a decodable image")?
        .to_rgb8();
    let drawn = draw_boxes(&mut image, detections);
    image
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("[Export] Wrote {} boxes to {}", drawn, path.display());
    Ok(drawn)
}
