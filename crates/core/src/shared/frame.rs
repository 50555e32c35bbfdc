use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, Rgb, RgbImage};
use ndarray::{Array2, ArrayView3, ShapeError};

use super::rect::Rect;

/// A single video/image frame: contiguous grayscale or RGB bytes in row-major order.
///
/// Background models only ever read frames; anything that draws on one
/// (annotation, compositing) works on a converted copy.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert!(channels == 1 || channels == 3, "frames are grayscale or RGB");
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn from_gray(image: GrayImage, index: usize) -> Self {
        let (width, height) = image.dimensions();
        Self::new(image.into_raw(), width, height, 1, index)
    }

    pub fn from_rgb(image: RgbImage, index: usize) -> Self {
        let (width, height) = image.dimensions();
        Self::new(image.into_raw(), width, height, 3, index)
    }

    /// Solid-color RGB frame.
    pub fn filled(width: u32, height: u32, color: [u8; 3], index: usize) -> Self {
        Self::from_rgb(RgbImage::from_pixel(width, height, Rgb(color)), index)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn to_grayscale(&self) -> GrayImage {
        match self.channels {
            1 => GrayImage::from_fn(self.width, self.height, |x, y| {
                Luma([self.data[self.offset(x, y)]])
            }),
            _ => imageops::grayscale(&self.to_rgb()),
        }
    }

    pub fn to_rgb(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let i = self.offset(x, y);
            match self.channels {
                1 => Rgb([self.data[i]; 3]),
                _ => Rgb([self.data[i], self.data[i + 1], self.data[i + 2]]),
            }
        })
    }

    /// Borrowed `(height, width, channels)` view of the raw bytes.
    pub fn as_ndarray(&self) -> Result<ArrayView3<'_, u8>, ShapeError> {
        ArrayView3::from_shape(
            (
                self.height as usize,
                self.width as usize,
                self.channels as usize,
            ),
            &self.data,
        )
    }

    /// Grayscale intensities as a `(height, width)` float plane.
    pub fn gray_plane(&self) -> Array2<f32> {
        let gray = self.to_grayscale();
        Array2::from_shape_fn((self.height as usize, self.width as usize), |(y, x)| {
            f32::from(gray.get_pixel(x as u32, y as u32)[0])
        })
    }

    pub fn resize(&self, width: u32, height: u32) -> Frame {
        match self.channels {
            1 => Frame::from_gray(
                imageops::resize(&self.to_grayscale(), width, height, FilterType::Triangle),
                self.index,
            ),
            _ => Frame::from_rgb(
                imageops::resize(&self.to_rgb(), width, height, FilterType::Triangle),
                self.index,
            ),
        }
    }

    /// Copies the part of the frame covered by `rect`, clamped to the frame.
    ///
    /// Returns `None` when the rectangle lies entirely outside.
    pub fn crop(&self, rect: &Rect) -> Option<Frame> {
        let (x, y, w, h) = rect.pixel_bounds(self.width, self.height)?;
        let channels = self.channels as usize;
        let row_len = w as usize * channels;
        let mut data = Vec::with_capacity(row_len * h as usize);
        for row in y..y + h {
            let start = self.offset(x, row);
            data.extend_from_slice(&self.data[start..start + row_len]);
        }
        Some(Frame::new(data, w, h, self.channels, self.index))
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels as usize
    }
}
