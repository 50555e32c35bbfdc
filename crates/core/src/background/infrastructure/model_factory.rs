use crate::background::domain::background_model::BackgroundModel;
use crate::background::domain::subtraction_method::SubtractionMethod;
use crate::background::domain::threshold::Threshold;
use crate::buffer::frame_ring_buffer::FrameRingBuffer;
use crate::shared::error::MotionError;
use crate::shared::frame::Frame;

use super::approximate_median_model::ApproximateMedianModel;
use super::frame_difference_model::FrameDifferenceModel;
use super::median_model::MedianModel;
use super::static_model::StaticModel;

/// Builds the background model for `method`.
///
/// `reference` is only read by the static model, `buffer` only by the
/// approximate median model (which seeds its estimate from it and therefore
/// needs it full).
pub fn create_model(
    method: SubtractionMethod,
    reference: Option<&Frame>,
    threshold: Threshold,
    buffer: &FrameRingBuffer,
) -> Result<Box<dyn BackgroundModel>, MotionError> {
    log::info!(
        "Initializing {} background model (threshold={}, mode={:?}, buffer={})",
        method,
        threshold.value(),
        threshold.mode(),
        buffer.capacity()
    );
    let model: Box<dyn BackgroundModel> = match method {
        SubtractionMethod::Static => Box::new(StaticModel::new(reference, threshold)?),
        SubtractionMethod::FrameDifference => Box::new(FrameDifferenceModel::new(threshold)),
        SubtractionMethod::Median => Box::new(MedianModel::new(threshold)),
        SubtractionMethod::ApproximateMedian => {
            Box::new(ApproximateMedianModel::new(buffer, threshold)?)
        }
    };
    Ok(model)
}
