use std::path::PathBuf;

/// Describes a frame sequence before any frame is decoded.
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceMetadata {
    pub width: u32,
    pub height: u32,
    pub total_frames: usize,
    pub source_path: Option<PathBuf>,
}
