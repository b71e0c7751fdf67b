#![allow(clippy::struct_excessive_bools)]

use crate::endian::Endian;

/// Configuration options for a [`Buffer`](crate::Buffer).
///
/// These options select between binary and text handling, the line ending
/// convention of text content, and how the buffer treats memory it does not
/// own.
///
/// # Examples
///
/// ```rust
/// use scanbuf::{Buffer, BufferOptions};
///
/// let options = BufferOptions {
///     text: true,
///     ..Default::default()
/// };
/// let mut buffer = Buffer::new(options);
/// buffer.put_string("hello world");
/// ```
///
/// # Default
///
/// All flags default to `false` and the byte order defaults to
/// [`Endian::NATIVE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BufferOptions {
    /// Whether the buffer holds human-readable text.
    ///
    /// Text buffers skip whitespace before strings and numbers, stop strings
    /// at whitespace, write numbers as decimal text and support delimited
    /// (escaped) strings. Binary buffers store strings as zero-terminated byte
    /// runs and numbers as fixed-width values.
    ///
    /// # Default
    ///
    /// `false`
    pub text: bool,

    /// Whether text content uses `\r\n` line endings rather than `\n`.
    ///
    /// This flag only records the convention; use
    /// [`Buffer::convert_crlf`](crate::Buffer::convert_crlf) to rewrite
    /// content between conventions.
    ///
    /// # Default
    ///
    /// `false`
    pub contains_crlf: bool,

    /// Whether writes are rejected.
    ///
    /// Every put on a read-only buffer fails and the high-water mark is fixed
    /// at construction.
    /// Buffers built with [`Buffer::read_only`](crate::Buffer::read_only)
    /// always have this set.
    ///
    /// # Default
    ///
    /// `false`
    pub read_only: bool,

    /// Whether automatic indentation after newlines is suppressed.
    ///
    /// When `false`, text written with `put_string` after a newline is
    /// prefixed with one tab per level pushed with
    /// [`Buffer::push_tab`](crate::Buffer::push_tab).
    ///
    /// # Default
    ///
    /// `false`
    pub auto_tabs_disabled: bool,

    /// Whether caller-supplied memory may be replaced by owned, growable
    /// memory when a write does not fit.
    ///
    /// When `false`, writes past the end of external memory fail and latch
    /// the put error.
    ///
    /// # Default
    ///
    /// `false`
    pub external_growable: bool,

    /// Byte order used for fixed-width values in binary mode.
    ///
    /// # Default
    ///
    /// [`Endian::NATIVE`]
    pub byte_order: Endian,
}

impl Default for BufferOptions {
    fn default() -> Self {
        Self {
            text: false,
            contains_crlf: false,
            read_only: false,
            auto_tabs_disabled: false,
            external_growable: false,
            byte_order: Endian::NATIVE,
        }
    }
}

impl BufferOptions {
    /// Options for an LF text buffer with every other flag at its default.
    #[must_use]
    pub fn text() -> Self {
        Self {
            text: true,
            ..Self::default()
        }
    }

    /// Options for a CRLF text buffer with every other flag at its default.
    #[must_use]
    pub fn text_crlf() -> Self {
        Self {
            text: true,
            contains_crlf: true,
            ..Self::default()
        }
    }
}
