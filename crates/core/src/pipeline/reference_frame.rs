use crate::buffer::frame_ring_buffer::FrameRingBuffer;
use crate::shared::frame::Frame;

/// Builds a static background from the per-pixel median of the first
/// `count` frames of a stream.
///
/// Moving objects that pass through during those frames drop out of the
/// median as long as no pixel is covered for more than half of them.
pub fn median_reference<I>(frames: I, count: usize) -> Result<Frame, Box<dyn std::error::Error>>
where
    I: IntoIterator<Item = Result<Frame, Box<dyn std::error::Error>>>,
{
    let mut buffer = FrameRingBuffer::new(count)?;
    let mut leading = Vec::with_capacity(count);
    for frame in frames.into_iter().take(count) {
        leading.push(frame?);
    }
    buffer.fill(leading)?;
    let background = buffer.median_background(None)?;
    log::info!(
        "Built reference frame from {} leading frames ({}x{})",
        count,
        background.width(),
        background.height()
    );
    Ok(Frame::from_gray(background, 0))
}
