use ndarray::{Array2, Zip};

use crate::background::domain::background_model::{ensure_full, BackgroundModel};
use crate::background::domain::threshold::Threshold;
use crate::buffer::frame_ring_buffer::{per_pixel_median, FrameRingBuffer};
use crate::shared::error::MotionError;

/// Incremental median approximation.
///
/// The estimate starts as the exact median of the initial buffer. After
/// that each call moves every pixel one intensity step toward the newest
/// frame (up where the frame is brighter, down where it is darker) before
/// differencing, so the estimate drifts toward the running median without
/// ever being recomputed.
pub struct ApproximateMedianModel {
    estimate: Array2<f32>,
    threshold: Threshold,
}

impl ApproximateMedianModel {
    /// Fails with `BufferNotFull` unless `buffer` is already full.
    pub fn new(buffer: &FrameRingBuffer, threshold: Threshold) -> Result<Self, MotionError> {
        ensure_full(buffer)?;
        let stack = buffer.as_grayscale_stack(None)?;
        Ok(Self {
            estimate: per_pixel_median(&stack),
            threshold,
        })
    }

    /// Current background estimate, shaped `(height, width)`.
    pub fn estimate(&self) -> &Array2<f32> {
        &self.estimate
    }

    fn step_toward(&mut self, newest: &Array2<f32>) {
        Zip::from(&mut self.estimate).and(newest).for_each(|m, &v| {
            if v > *m {
                *m += 1.0;
            } else if v < *m {
                *m -= 1.0;
            }
        });
    }
}

impl BackgroundModel for ApproximateMedianModel {
    fn compute_diff(&mut self, buffer: &FrameRingBuffer) -> Result<Array2<f32>, MotionError> {
        let last = buffer.last().ok_or(MotionError::BufferEmpty)?;
        let (height, width) = self.estimate.dim();
        let size = (width as u32, height as u32);
        let newest = if last.size() == size {
            last.gray_plane()
        } else {
            last.resize(size.0, size.1).gray_plane()
        };

        self.step_toward(&newest);
        Ok(newest - &self.estimate)
    }

    fn threshold(&self) -> Threshold {
        self.threshold
    }
}
