pub const RGB_BLACK: [u8; 3] = [0, 0, 0];
pub const RGB_RED: [u8; 3] = [255, 0, 0];
pub const RGB_CYAN: [u8; 3] = [0, 255, 255];

pub const DEFAULT_THRESHOLD: f32 = 80.0;
pub const DEFAULT_MIN_AREA: f64 = 400.0;
pub const DEFAULT_BUFFER_SIZE: usize = 5;
pub const DEFAULT_RECT_SIGMA: f64 = 2.0;

/// Box blur radius applied to the raw mask (5x5 kernel).
pub const MASK_BLUR_RADIUS: u32 = 2;
/// Radius of the square dilate/erode kernel (3x3).
pub const MASK_MORPH_RADIUS: u8 = 1;

pub const RECT_THICKNESS: u32 = 2;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
