use ndarray::{Array2, Axis};

use crate::background::domain::background_model::BackgroundModel;
use crate::background::domain::threshold::Threshold;
use crate::buffer::frame_ring_buffer::{per_pixel_median, FrameRingBuffer};
use crate::shared::error::MotionError;

/// Exact per-pixel median of the whole buffer as the background.
///
/// The median is recomputed from scratch on every call, which costs a sort
/// per pixel; [`ApproximateMedianModel`](super::approximate_median_model::ApproximateMedianModel)
/// trades exactness for an O(1) update.
pub struct MedianModel {
    threshold: Threshold,
}

impl MedianModel {
    pub fn new(threshold: Threshold) -> Self {
        Self { threshold }
    }
}

impl BackgroundModel for MedianModel {
    fn compute_diff(&mut self, buffer: &FrameRingBuffer) -> Result<Array2<f32>, MotionError> {
        let stack = buffer.as_grayscale_stack(None)?;
        let medians = per_pixel_median(&stack);
        let newest = stack
            .index_axis(Axis(0), stack.len_of(Axis(0)) - 1)
            .mapv(f32::from);
        Ok(newest - medians)
    }

    fn threshold(&self) -> Threshold {
        self.threshold
    }
}
