use image::GrayImage;
use imageproc::filter::box_filter;
use imageproc::morphology::{grayscale_dilate, grayscale_erode, Mask};

use crate::shared::constants::{MASK_BLUR_RADIUS, MASK_MORPH_RADIUS};

/// Cleans a raw foreground mask before contour tracing.
///
/// A 5x5 box blur merges nearby fragments, then a 3x3 grey-level
/// dilate/erode pair closes small gaps. Intensities are kept, so a soft mask
/// stays graded; the set of non-zero pixels is what contour tracing sees.
pub fn smooth_mask(mask: &GrayImage) -> GrayImage {
    if mask.width() == 0 || mask.height() == 0 {
        return mask.clone();
    }
    let kernel = Mask::square(MASK_MORPH_RADIUS);
    let blurred = box_filter(mask, MASK_BLUR_RADIUS, MASK_BLUR_RADIUS);
    let closed = grayscale_dilate(&blurred, &kernel);
    grayscale_erode(&closed, &kernel)
}
