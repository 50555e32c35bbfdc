use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::geometry;

use crate::shared::geometry::Polygon;

/// Traces the outer boundary of every connected foreground region.
///
/// Hole borders and regions nested inside holes are skipped; only borders
/// with no enclosing contour are returned.
pub fn external_contours(mask: &GrayImage) -> Vec<Polygon> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| c.parent.is_none() && matches!(c.border_type, BorderType::Outer))
        .map(|c| Polygon::new(c.points))
        .collect()
}

pub fn convex_hull(contour: &Polygon) -> Polygon {
    if contour.is_empty() {
        return Polygon::new(Vec::new());
    }
    Polygon::new(geometry::convex_hull(contour.points()))
}
