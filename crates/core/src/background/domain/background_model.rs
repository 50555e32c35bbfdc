use image::GrayImage;
use ndarray::Array2;

use crate::background::domain::threshold::Threshold;
use crate::buffer::frame_ring_buffer::FrameRingBuffer;
use crate::shared::error::MotionError;

/// Domain interface for background subtraction over a frame buffer.
///
/// Models keep their own reference statistic (a fixed frame, a running
/// median, ...) and are handed the buffer on every call, hence `&mut self`
/// for models that update that statistic as frames arrive.
pub trait BackgroundModel: Send {
    /// Signed per-pixel difference between the buffer and the background
    /// estimate, shaped `(height, width)`.
    fn compute_diff(&mut self, buffer: &FrameRingBuffer) -> Result<Array2<f32>, MotionError>;

    fn threshold(&self) -> Threshold;

    /// Thresholded difference image.
    ///
    /// Fails with `BufferNotFull` rather than computing on a partial buffer.
    fn foreground_mask(&mut self, buffer: &FrameRingBuffer) -> Result<GrayImage, MotionError> {
        ensure_full(buffer)?;
        let diff = self.compute_diff(buffer)?;
        Ok(self.threshold().apply(&diff))
    }
}

pub(crate) fn ensure_full(buffer: &FrameRingBuffer) -> Result<(), MotionError> {
    if buffer.is_full() {
        Ok(())
    } else {
        Err(MotionError::BufferNotFull {
            count: buffer.len(),
            capacity: buffer.capacity(),
        })
    }
}

pub(crate) fn ensure_same_shape(
    expected: &Array2<f32>,
    actual: &Array2<f32>,
) -> Result<(), MotionError> {
    if expected.dim() == actual.dim() {
        return Ok(());
    }
    let (eh, ew) = expected.dim();
    let (ah, aw) = actual.dim();
    Err(MotionError::FrameSizeMismatch {
        expected: (ew as u32, eh as u32),
        actual: (aw as u32, ah as u32),
    })
}
