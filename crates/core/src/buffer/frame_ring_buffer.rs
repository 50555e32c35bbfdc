use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use image::{GrayImage, Luma};
use ndarray::{Array2, Array3, ArrayView1, Axis};

use crate::shared::error::MotionError;
use crate::shared::frame::Frame;

/// Fixed-capacity FIFO of the most recent frames of a stream.
///
/// Index 0 is the oldest frame and `len() - 1` the newest. Once `capacity`
/// frames have been added, every further `add` evicts exactly the oldest.
/// Frames are shared through `Arc` so a detector can hand out its key frame
/// without copying pixels.
pub struct FrameRingBuffer {
    frames: VecDeque<Arc<Frame>>,
    capacity: usize,
}

impl FrameRingBuffer {
    pub fn new(capacity: usize) -> Result<Self, MotionError> {
        if capacity == 0 {
            return Err(MotionError::InvalidCapacity);
        }
        Ok(Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    pub fn add(&mut self, frame: impl Into<Arc<Frame>>) {
        if self.is_full() {
            self.frames.pop_front();
        }
        self.frames.push_back(frame.into());
    }

    pub fn is_full(&self) -> bool {
        self.frames.len() == self.capacity
    }

    /// Number of frames currently held (never more than `capacity`).
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Frame>> {
        self.frames.get(index)
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Frame>> {
        self.frames.iter()
    }

    pub fn first(&self) -> Option<&Arc<Frame>> {
        self.frames.front()
    }

    /// Frame at index `len / 2`.
    pub fn middle(&self) -> Option<&Arc<Frame>> {
        self.frames.get(self.frames.len() / 2)
    }

    pub fn last(&self) -> Option<&Arc<Frame>> {
        self.frames.back()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Pulls frames from a stream until the buffer is full.
    ///
    /// Fails with `BufferFull` if there is nothing to fill, and with
    /// `SourceExhausted` if the stream ends first (frames already pulled stay
    /// buffered).
    pub fn fill<I, F>(&mut self, source: I) -> Result<(), MotionError>
    where
        I: IntoIterator<Item = F>,
        F: Into<Arc<Frame>>,
    {
        if self.is_full() {
            return Err(MotionError::BufferFull);
        }
        let mut added = 0;
        let mut source = source.into_iter();
        while !self.is_full() {
            let Some(frame) = source.next() else {
                return Err(MotionError::SourceExhausted {
                    added,
                    needed: self.capacity - self.frames.len(),
                });
            };
            self.add(frame);
            added += 1;
        }
        log::debug!("Filled frame buffer from stream ({added} frames)");
        Ok(())
    }

    /// Fills the buffer from a finite sequence, cycling through it again
    /// when it is shorter than the remaining capacity.
    pub fn fill_cyclic<F>(&mut self, frames: &[F]) -> Result<(), MotionError>
    where
        F: Clone + Into<Arc<Frame>>,
    {
        if self.is_full() {
            return Err(MotionError::BufferFull);
        }
        if frames.is_empty() {
            return Err(MotionError::EmptySource);
        }
        let needed = self.capacity - self.frames.len();
        self.fill(frames.iter().cycle().take(needed).cloned())
    }

    /// Stacks the grayscale version of every buffered frame into an array
    /// of shape `(len, height, width)`.
    ///
    /// `size` is `(width, height)` and defaults to the size of the oldest
    /// frame; frames of any other size are resized first.
    pub fn as_grayscale_stack(&self, size: Option<(u32, u32)>) -> Result<Array3<u8>, MotionError> {
        let first = self.first().ok_or(MotionError::BufferEmpty)?;
        let (width, height) = size.unwrap_or_else(|| first.size());

        let mut stack = Array3::<u8>::zeros((self.frames.len(), height as usize, width as usize));
        for (frame, mut plane) in self.frames.iter().zip(stack.axis_iter_mut(Axis(0))) {
            let gray = if frame.size() == (width, height) {
                frame.to_grayscale()
            } else {
                frame.resize(width, height).to_grayscale()
            };
            for (x, y, pixel) in gray.enumerate_pixels() {
                plane[[y as usize, x as usize]] = pixel[0];
            }
        }
        Ok(stack)
    }

    /// Per-pixel median of the buffered frames as a grayscale image.
    ///
    /// Useful for building the reference frame of a static background model
    /// from the opening frames of a stream.
    pub fn median_background(&self, size: Option<(u32, u32)>) -> Result<GrayImage, MotionError> {
        let medians = per_pixel_median(&self.as_grayscale_stack(size)?);
        let (height, width) = medians.dim();
        Ok(GrayImage::from_fn(width as u32, height as u32, |x, y| {
            Luma([medians[[y as usize, x as usize]].round() as u8])
        }))
    }
}

impl fmt::Debug for FrameRingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameRingBuffer")
            .field("len", &self.frames.len())
            .field("capacity", &self.capacity)
            .field(
                "indices",
                &self.frames.iter().map(|f| f.index()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Median along the first axis of a `(n, height, width)` stack.
///
/// Even-sized stacks average the two middle values.
pub fn per_pixel_median(stack: &Array3<u8>) -> Array2<f32> {
    stack.map_axis(Axis(0), lane_median)
}

fn lane_median(lane: ArrayView1<'_, u8>) -> f32 {
    let mut values = lane.to_vec();
    if values.is_empty() {
        return 0.0;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        f32::from(values[mid])
    } else {
        (f32::from(values[mid - 1]) + f32::from(values[mid])) / 2.0
    }
}
