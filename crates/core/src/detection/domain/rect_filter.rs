use crate::shared::rect::Rect;

/// Caller-supplied rule applied to the whole list of detected rectangles.
///
/// Receives every rectangle that survived the minimum-area filter, so a rule
/// may look at the set as a whole (drop overlaps, keep the largest, ...).
pub type RectFilter = Box<dyn Fn(Vec<Rect>) -> Vec<Rect> + Send>;

/// Keeps rectangles at least `min_width` wide and `min_height` tall.
pub fn size_filter(min_width: f64, min_height: f64) -> RectFilter {
    Box::new(move |rects| {
        rects
            .into_iter()
            .filter(|r| r.width >= min_width && r.height >= min_height)
            .collect()
    })
}
