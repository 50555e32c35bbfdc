use ndarray::Array2;

use crate::background::domain::background_model::{ensure_same_shape, BackgroundModel};
use crate::background::domain::threshold::Threshold;
use crate::buffer::frame_ring_buffer::FrameRingBuffer;
use crate::shared::error::MotionError;
use crate::shared::frame::Frame;

/// Uses a single fixed frame as the background.
pub struct StaticModel {
    reference: Array2<f32>,
    threshold: Threshold,
}

impl StaticModel {
    /// Fails with `MissingReferenceFrame` when no reference is supplied.
    pub fn new(reference: Option<&Frame>, threshold: Threshold) -> Result<Self, MotionError> {
        let reference = reference.ok_or(MotionError::MissingReferenceFrame)?;
        Ok(Self {
            reference: reference.gray_plane(),
            threshold,
        })
    }
}

impl BackgroundModel for StaticModel {
    fn compute_diff(&mut self, buffer: &FrameRingBuffer) -> Result<Array2<f32>, MotionError> {
        let current = buffer.last().ok_or(MotionError::BufferEmpty)?.gray_plane();
        ensure_same_shape(&self.reference, &current)?;
        Ok((&current - &self.reference).mapv(f32::abs))
    }

    fn threshold(&self) -> Threshold {
        self.threshold
    }
}
