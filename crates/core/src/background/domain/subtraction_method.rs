use std::fmt;
use std::str::FromStr;

use crate::shared::error::MotionError;

/// Background subtraction strategy selected by a motion detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubtractionMethod {
    /// Difference against a fixed reference frame.
    Static,
    /// Minimum of the first-to-middle and middle-to-last differences.
    FrameDifference,
    /// Difference against the exact per-pixel median of the buffer.
    Median,
    /// Difference against an incrementally nudged median estimate.
    ApproximateMedian,
}

impl SubtractionMethod {
    /// Frame differencing reports motion for the middle frame of the
    /// buffer; every other method reports it for the newest frame.
    pub fn uses_middle_key_frame(self) -> bool {
        matches!(self, SubtractionMethod::FrameDifference)
    }

    pub fn name(self) -> &'static str {
        match self {
            SubtractionMethod::Static => "static",
            SubtractionMethod::FrameDifference => "frame-difference",
            SubtractionMethod::Median => "median",
            SubtractionMethod::ApproximateMedian => "approximate-median",
        }
    }
}

impl fmt::Display for SubtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SubtractionMethod {
    type Err = MotionError;

    /// Accepts the kebab-case names and the legacy `BG_SUBTRACT_*` tags.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" | "bg_subtract_static" => Ok(SubtractionMethod::Static),
            "frame-difference" | "fd" | "bg_subtract_fd" => Ok(SubtractionMethod::FrameDifference),
            "median" | "mm" | "bg_subtract_mm" => Ok(SubtractionMethod::Median),
            "approximate-median" | "am" | "bg_subtract_am" => {
                Ok(SubtractionMethod::ApproximateMedian)
            }
            _ => Err(MotionError::UnknownMethod(s.to_string())),
        }
    }
}
