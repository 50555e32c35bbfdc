use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::sequence_metadata::SequenceMetadata;

/// Reads an ordered sequence of frames from some source.
///
/// The detector only sees `Frame`s; decoding, ordering and resizing on read
/// are the reader's business.
pub trait FrameReader: Send {
    /// Prepares the source at `path` and describes it.
    fn open(&mut self, path: &Path) -> Result<SequenceMetadata, Box<dyn std::error::Error>>;

    /// Frames in sequence order, indexed from 0.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;

    fn close(&mut self);
}
