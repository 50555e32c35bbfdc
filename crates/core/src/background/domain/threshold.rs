use image::{GrayImage, Luma};
use ndarray::Array2;

use crate::shared::error::MotionError;

/// How a difference image is turned into a foreground mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThresholdMode {
    /// Binary mask: 255 where `|diff| > T`, else 0.
    Hard,
    /// Confidence mask: `255 * (1 - exp(-|diff| / T))`, truncated.
    Soft,
}

/// Noise threshold shared by every background model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Threshold {
    value: f32,
    mode: ThresholdMode,
}

impl Threshold {
    pub fn new(value: f32, mode: ThresholdMode) -> Result<Self, MotionError> {
        if !value.is_finite() || value < 0.0 {
            return Err(MotionError::InvalidThreshold {
                value,
                reason: "must be finite and non-negative",
            });
        }
        if mode == ThresholdMode::Soft && value == 0.0 {
            return Err(MotionError::InvalidThreshold {
                value,
                reason: "soft thresholding needs a positive scale",
            });
        }
        Ok(Self { value, mode })
    }

    pub fn hard(value: f32) -> Result<Self, MotionError> {
        Self::new(value, ThresholdMode::Hard)
    }

    pub fn soft(value: f32) -> Result<Self, MotionError> {
        Self::new(value, ThresholdMode::Soft)
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn mode(&self) -> ThresholdMode {
        self.mode
    }

    /// Mask intensity for one signed difference value.
    pub fn classify(&self, diff: f32) -> u8 {
        let magnitude = diff.abs();
        match self.mode {
            ThresholdMode::Hard => {
                if magnitude > self.value {
                    255
                } else {
                    0
                }
            }
            // Saturated values stop at 254 so the soft mask never reads as a hard hit.
            ThresholdMode::Soft => {
                let weight = -(-magnitude / self.value).exp_m1();
                (255.0 * weight).min(254.0) as u8
            }
        }
    }

    /// Maps a `(height, width)` difference plane to a mask of the same size.
    pub fn apply(&self, diff: &Array2<f32>) -> GrayImage {
        let (height, width) = diff.dim();
        GrayImage::from_fn(width as u32, height as u32, |x, y| {
            Luma([self.classify(diff[[y as usize, x as usize]])])
        })
    }
}
