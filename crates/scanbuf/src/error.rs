use thiserror::Error;

/// The error a latched buffer reports through [`Buffer::status`].
///
/// [`Buffer::status`]: crate::Buffer::status
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    #[error("read past the end of the available data")]
    GetOverflow,
    #[error("write could not be accommodated by the buffer")]
    PutOverflow,
}

/// Sticky error bits.
///
/// Once a bit is set, operations of that class become no-ops until a seek
/// lands within valid bounds or the bits are cleared explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorFlags(u8);

impl ErrorFlags {
    pub const GET_OVERFLOW: Self = Self(0b01);
    pub const PUT_OVERFLOW: Self = Self(0b10);

    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Converts the latch into a `Result`, reporting a get overflow first.
    ///
    /// # Errors
    ///
    /// Returns the error matching the first bit that is set.
    pub fn check(self) -> Result<(), BufferError> {
        if self.contains(Self::GET_OVERFLOW) {
            Err(BufferError::GetOverflow)
        } else if self.contains(Self::PUT_OVERFLOW) {
            Err(BufferError::PutOverflow)
        } else {
            Ok(())
        }
    }
}
