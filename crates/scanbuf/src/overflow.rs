//! Overflow hooks.
//!
//! A [`Buffer`] calls its [`Overflow`] policy whenever an operation needs
//! bytes outside the storage window. The default policy, [`GrowOnPut`], grows
//! owned storage for writes and refuses reads: a plain buffer already holds
//! everything that was written to it. Streaming behaviour comes from policies
//! that refill the window from an outside source and move
//! [`BufferState::window_base`], as [`SliceStream`] does.

use alloc::boxed::Box;

use crate::{Buffer, BufferOptions, BufferState};

/// What a read needs from the get overflow hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetRequest {
    /// Make `[get_pos, get_pos + n)` resident.
    Bytes(usize),
    /// The get cursor was moved outside the window; relocate the window so
    /// that it covers the cursor. No bytes are required.
    Resync,
}

/// What a write needs from the put overflow hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutRequest {
    /// Make room for `[put_pos, put_pos + n)`.
    Reserve(usize),
    /// The put cursor is about to move to `next_put`; flush any buffered
    /// writer state. The return value is ignored.
    Flush { next_put: usize },
}

/// Pluggable behaviour for reads and writes that fall outside the window.
///
/// Both hooks report whether the request was satisfied. A hook that returns
/// `false` makes the requesting operation fail and latch its error.
pub trait Overflow {
    fn on_get_overflow(&mut self, state: &mut BufferState<'_>, request: GetRequest) -> bool {
        let _ = (state, request);
        false
    }

    fn on_put_overflow(&mut self, state: &mut BufferState<'_>, request: PutRequest) -> bool {
        match request {
            PutRequest::Reserve(n) => state.grow_for_put(n),
            PutRequest::Flush { .. } => true,
        }
    }
}

/// Grow on write, fail on read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrowOnPut;

impl Overflow for GrowOnPut {}

impl<T: Overflow + ?Sized> Overflow for Box<T> {
    fn on_get_overflow(&mut self, state: &mut BufferState<'_>, request: GetRequest) -> bool {
        (**self).on_get_overflow(state, request)
    }

    fn on_put_overflow(&mut self, state: &mut BufferState<'_>, request: PutRequest) -> bool {
        (**self).on_put_overflow(state, request)
    }
}

impl<T: Overflow + ?Sized> Overflow for &mut T {
    fn on_get_overflow(&mut self, state: &mut BufferState<'_>, request: GetRequest) -> bool {
        (**self).on_get_overflow(state, request)
    }

    fn on_put_overflow(&mut self, state: &mut BufferState<'_>, request: PutRequest) -> bool {
        (**self).on_put_overflow(state, request)
    }
}

/// Reads an in-memory source through a fixed-size window.
///
/// Only `window` bytes of the source are resident at a time; the window is
/// refilled starting at the get cursor whenever a read or seek leaves it.
/// Lookahead is therefore bounded by the window size, and
/// [`find_token`](crate::Buffer::find_token) only finds tokens shorter than
/// the window.
///
/// ```rust
/// use scanbuf::{BufferOptions, SliceStream};
///
/// let mut buffer = SliceStream::new(b"alpha beta gamma").into_buffer(8, BufferOptions::text());
/// assert!(buffer.find_token(b"gamma"));
/// assert_eq!(buffer.bytes_remaining(), 0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SliceStream<'s> {
    source: &'s [u8],
}

impl<'s> SliceStream<'s> {
    #[must_use]
    pub fn new(source: &'s [u8]) -> Self {
        Self { source }
    }

    /// Builds a read-only buffer over the source with a window of `window`
    /// bytes, primed with the start of the source.
    ///
    /// # Panics
    ///
    /// Panics if `window` is zero.
    #[must_use]
    pub fn into_buffer(self, window: usize, options: BufferOptions) -> Buffer<'static, Self> {
        assert!(window > 0, "streaming window must not be empty");
        let source = self.source;
        let options = BufferOptions {
            read_only: true,
            ..options
        };
        let mut buffer = Buffer::with_policy(self, 0, window, options);
        let state = buffer.state_mut();
        state.set_max_put(source.len());
        let primed = state.slide_window(0, &source[..window.min(source.len())]);
        debug_assert!(primed);
        buffer
    }

    #[must_use]
    pub fn source(&self) -> &'s [u8] {
        self.source
    }
}

impl Overflow for SliceStream<'_> {
    fn on_get_overflow(&mut self, state: &mut BufferState<'_>, request: GetRequest) -> bool {
        let needed = match request {
            GetRequest::Bytes(n) => n,
            GetRequest::Resync => 0,
        };
        if needed > state.capacity() {
            return false;
        }

        let start = state.get_pos().min(self.source.len());
        let end = (start + state.capacity()).min(self.source.len());
        state.slide_window(start, &self.source[start..end]) && end - start >= needed
    }

    fn on_put_overflow(&mut self, _state: &mut BufferState<'_>, request: PutRequest) -> bool {
        matches!(request, PutRequest::Flush { .. })
    }
}
