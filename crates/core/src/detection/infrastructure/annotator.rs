use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect as PixelRect;

use crate::shared::constants::{RGB_BLACK, RGB_CYAN, RGB_RED};
use crate::shared::geometry::Polygon;
use crate::shared::rect::Rect;

/// Colors used when overlaying detections on a frame.
///
/// `None` disables that layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnnotationStyle {
    pub rect: Option<[u8; 3]>,
    pub contour: Option<[u8; 3]>,
    pub convex_hull: Option<[u8; 3]>,
}

impl AnnotationStyle {
    /// Draws nothing.
    pub fn none() -> Self {
        Self {
            rect: None,
            contour: None,
            convex_hull: None,
        }
    }
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            rect: Some(RGB_RED),
            contour: Some(RGB_BLACK),
            convex_hull: Some(RGB_CYAN),
        }
    }
}

/// Draws the outline of `rect`, `thickness` pixels wide, growing inward.
///
/// The rectangle is clipped to the canvas first.
pub fn draw_rect(canvas: &mut RgbImage, rect: &Rect, color: [u8; 3], thickness: u32) {
    let Some((x, y, w, h)) = rect.pixel_bounds(canvas.width(), canvas.height()) else {
        return;
    };
    for inset in 0..thickness {
        if w <= 2 * inset || h <= 2 * inset {
            break;
        }
        let ring = PixelRect::at((x + inset) as i32, (y + inset) as i32)
            .of_size(w - 2 * inset, h - 2 * inset);
        draw_hollow_rect_mut(canvas, ring, Rgb(color));
    }
}

/// Draws a closed 1px outline through the polygon's vertices.
pub fn draw_polygon_outline(canvas: &mut RgbImage, polygon: &Polygon, color: [u8; 3]) {
    let points = polygon.points();
    match points.len() {
        0 => {}
        1 => {
            let p = points[0];
            if p.x >= 0 && p.y >= 0 && (p.x as u32) < canvas.width() && (p.y as u32) < canvas.height() {
                canvas.put_pixel(p.x as u32, p.y as u32, Rgb(color));
            }
        }
        n => {
            for i in 0..n {
                let a = points[i];
                let b = points[(i + 1) % n];
                draw_line_segment_mut(
                    canvas,
                    (a.x as f32, a.y as f32),
                    (b.x as f32, b.y as f32),
                    Rgb(color),
                );
            }
        }
    }
}
