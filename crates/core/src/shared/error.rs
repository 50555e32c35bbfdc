use thiserror::Error;

/// Errors raised by the buffering, background and detection layers.
///
/// Configuration problems surface when a detector or model is built;
/// precondition violations surface on the first call that would otherwise
/// compute on incomplete data.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MotionError {
    #[error("frame buffer capacity must be at least 1")]
    InvalidCapacity,
    #[error("frame buffer is already full")]
    BufferFull,
    #[error("frame buffer is empty")]
    BufferEmpty,
    #[error("frame source ended after {added} frames, {needed} more were needed")]
    SourceExhausted { added: usize, needed: usize },
    #[error("cannot fill a frame buffer from an empty sequence")]
    EmptySource,
    #[error("frame buffer holds {count} of {capacity} frames, background model needs a full buffer")]
    BufferNotFull { count: usize, capacity: usize },
    #[error("the static background model requires a reference frame")]
    MissingReferenceFrame,
    #[error("invalid threshold {value}: {reason}")]
    InvalidThreshold { value: f32, reason: &'static str },
    #[error("invalid minimum area {0}: must be a non-negative number")]
    InvalidMinArea(f64),
    #[error("invalid rectangle sigma {0}: must be a positive number")]
    InvalidRectSigma(f64),
    #[error("unknown background subtraction method: {0}")]
    UnknownMethod(String),
    #[error("unknown rectangle type: {0}")]
    UnknownRectType(String),
    #[error("frame size {actual:?} does not match expected {expected:?}")]
    FrameSizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("no detection results yet, the frame buffer is still filling")]
    NotReady,
}
