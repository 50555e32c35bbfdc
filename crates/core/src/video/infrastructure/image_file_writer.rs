use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, RgbImage};

use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

/// Saves frames with the `image` crate; the format follows the file extension.
///
/// Grayscale frames (masks) are written as single-channel images.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn to_dynamic(frame: &Frame) -> Result<DynamicImage, Box<dyn std::error::Error>> {
    let (w, h) = frame.size();
    let data = frame.data().to_vec();
    let image = match frame.channels() {
        1 => GrayImage::from_raw(w, h, data).map(DynamicImage::ImageLuma8),
        3 => RgbImage::from_raw(w, h, data).map(DynamicImage::ImageRgb8),
        n => return Err(format!("Unsupported channel count: {n}").into()),
    };
    image.ok_or_else(|| "Frame data does not match its dimensions".into())
}

impl ImageWriter for ImageFileWriter {
    fn write(
        &self,
        path: &Path,
        frame: &Frame,
        size: Option<(u32, u32)>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut image = to_dynamic(frame)?;
        if let Some((w, h)) = size {
            image = image.resize_exact(w, h, FilterType::Triangle);
        }
        image.save(path)?;
        log::trace!("Wrote frame {} to {}", frame.index(), path.display());
        Ok(())
    }
}
