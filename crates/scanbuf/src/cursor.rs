use crate::error::ErrorFlags;

/// Origin of a seek on the get or put cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekFrom {
    /// Absolute position from the start of the stream.
    Head(usize),
    /// Relative to the cursor being moved.
    Current(isize),
    /// Distance back from the high-water mark.
    Tail(usize),
}

/// Cursor bookkeeping of a buffer.
///
/// Positions are logical stream offsets. The storage index of a position is
/// `position - window_base`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CursorState {
    pub(crate) get: usize,
    pub(crate) put: usize,
    /// Largest put position ever reached; bounds every read.
    pub(crate) max_put: usize,
    /// Logical position of storage index zero.
    pub(crate) window_base: usize,
    pub(crate) tab_depth: usize,
    pub(crate) errors: ErrorFlags,
}

impl CursorState {
    /// Resolves a seek against `current`, or `None` if the target would be
    /// negative or unrepresentable.
    pub(crate) fn resolve(&self, from: SeekFrom, current: usize) -> Option<usize> {
        match from {
            SeekFrom::Head(offset) => Some(offset),
            SeekFrom::Current(delta) => current.checked_add_signed(delta),
            SeekFrom::Tail(offset) => self.max_put.checked_sub(offset),
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
