/// Outcome of feeding one frame to a motion detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetectionState {
    /// The frame buffer is not full yet; nothing was computed.
    Filling { buffered: usize, capacity: usize },
    /// Detection ran; `contours` counts every external contour found,
    /// before any area filtering.
    Active { contours: usize },
}

impl DetectionState {
    /// Integer reported by [`raw`](Self::raw) while filling.
    pub const FILLING_SENTINEL: i64 = -1;

    pub fn is_active(&self) -> bool {
        matches!(self, DetectionState::Active { .. })
    }

    pub fn contour_count(&self) -> Option<usize> {
        match *self {
            DetectionState::Active { contours } => Some(contours),
            DetectionState::Filling { .. } => None,
        }
    }

    /// Contour count, or `-1` while the buffer is filling.
    pub fn raw(&self) -> i64 {
        self.contour_count()
            .map_or(Self::FILLING_SENTINEL, |n| n as i64)
    }
}
