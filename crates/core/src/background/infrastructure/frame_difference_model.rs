use ndarray::{Array2, Zip};

use crate::background::domain::background_model::{ensure_same_shape, BackgroundModel};
use crate::background::domain::threshold::Threshold;
use crate::buffer::frame_ring_buffer::FrameRingBuffer;
use crate::shared::error::MotionError;

/// N-frame differencing keyed on the middle frame of the buffer.
///
/// A pixel only counts as changed when it differs from both the first and
/// the last frame: the diff is `min(|middle - first|, |last - middle|)`.
/// This suppresses single-frame noise and the ghost a plain two-frame
/// difference leaves where an object used to be.
pub struct FrameDifferenceModel {
    threshold: Threshold,
}

impl FrameDifferenceModel {
    pub fn new(threshold: Threshold) -> Self {
        Self { threshold }
    }
}

impl BackgroundModel for FrameDifferenceModel {
    fn compute_diff(&mut self, buffer: &FrameRingBuffer) -> Result<Array2<f32>, MotionError> {
        let (Some(first), Some(middle), Some(last)) = (buffer.first(), buffer.middle(), buffer.last())
        else {
            return Err(MotionError::BufferEmpty);
        };
        let previous = first.gray_plane();
        let current = middle.gray_plane();
        let next = last.gray_plane();
        ensure_same_shape(&current, &previous)?;
        ensure_same_shape(&current, &next)?;

        Ok(Zip::from(&previous)
            .and(&current)
            .and(&next)
            .map_collect(|&p, &c, &n| (c - p).abs().min((n - c).abs())))
    }

    fn threshold(&self) -> Threshold {
        self.threshold
    }
}
