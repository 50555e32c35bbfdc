use std::fmt;
use std::str::FromStr;

use crate::shared::error::MotionError;

/// How contours are converted to rectangles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RectType {
    /// Minimal axis-aligned box around the contour.
    #[default]
    Bounding,
    /// Box centered on the contour's centroid, sized `2 * n_sigma * std`
    /// along each axis from its second-order central moments.
    Standardized,
}

impl fmt::Display for RectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RectType::Bounding => "bounding",
            RectType::Standardized => "standardized",
        })
    }
}

impl FromStr for RectType {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bounding" | "bounding_rects" => Ok(RectType::Bounding),
            "standardized" | "standardized_rects" => Ok(RectType::Standardized),
            _ => Err(MotionError::UnknownRectType(s.to_string())),
        }
    }
}
