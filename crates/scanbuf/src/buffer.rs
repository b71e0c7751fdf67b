//! The buffer core: storage, cursors and the get/put/peek/seek primitives.
//!
//! Overview
//! - A [`Buffer`] has independent get and put cursors over a logical byte
//!   stream. Only the window `[window_base, window_base + capacity)` of that
//!   stream is resident in storage; for ordinary buffers the window starts at
//!   zero and covers everything written so far.
//! - `max_put` is the high-water mark of written bytes and bounds all reads.
//! - Failures latch a sticky error bit ([`ErrorFlags`]). While a bit is set,
//!   the operations of that class do nothing. A seek that lands within bounds
//!   clears the get bit.
//! - When an operation needs bytes outside the window, the [`Overflow`]
//!   policy is asked to provide them. Hooks see the buffer through
//!   [`BufferState`].
//!
//! Null termination
//! - Whenever the put cursor advances past the high-water mark, a zero byte is
//!   written just past the new mark (when there is room), so the resident text
//!   is always terminated. The terminator is not data: it is not counted by
//!   `max_put` and a failure to write it is ignored.

use alloc::vec::Vec;
use core::fmt;

use bstr::ByteSlice;

use crate::{
    cursor::{CursorState, SeekFrom},
    endian::{Endian, Primitive},
    error::{BufferError, ErrorFlags},
    numbers::TextNumber,
    options::BufferOptions,
    overflow::{GetRequest, GrowOnPut, Overflow, PutRequest},
    storage::Storage,
};

/// Largest lookahead used when reading a number from text.
pub(crate) const NUMBER_LOOKAHEAD: usize = 128;

/// The part of a buffer that overflow hooks may inspect and adjust.
#[derive(Debug)]
pub struct BufferState<'a> {
    pub(crate) storage: Storage<'a>,
    pub(crate) cursor: CursorState,
    pub(crate) options: BufferOptions,
}

impl<'a> BufferState<'a> {
    fn new(storage: Storage<'a>, options: BufferOptions) -> Self {
        Self {
            storage,
            cursor: CursorState::default(),
            options,
        }
    }

    /// Size of the resident window in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.num_allocated()
    }

    /// Logical position of the first resident byte.
    #[must_use]
    pub fn window_base(&self) -> usize {
        self.cursor.window_base
    }

    #[must_use]
    pub fn get_pos(&self) -> usize {
        self.cursor.get
    }

    #[must_use]
    pub fn put_pos(&self) -> usize {
        self.cursor.put
    }

    #[must_use]
    pub fn max_put(&self) -> usize {
        self.cursor.max_put
    }

    #[must_use]
    pub fn options(&self) -> &BufferOptions {
        &self.options
    }

    /// The resident window.
    #[must_use]
    pub fn window(&self) -> &[u8] {
        self.storage.as_slice()
    }

    /// Whether `[pos, pos + n)` lies inside the window.
    #[must_use]
    pub fn is_resident(&self, pos: usize, n: usize) -> bool {
        pos.checked_sub(self.cursor.window_base)
            .is_some_and(|index| index + n <= self.capacity())
    }

    /// Raises the high-water mark, e.g. when a streaming source learns that
    /// more data exists. The mark never moves backwards.
    pub fn set_max_put(&mut self, max_put: usize) {
        self.cursor.max_put = self.cursor.max_put.max(max_put);
    }

    /// Replaces the window contents with `bytes` and makes `base` the logical
    /// position of its first byte.
    ///
    /// Fails for read-only memory or when `bytes` is larger than the window.
    pub fn slide_window(&mut self, base: usize, bytes: &[u8]) -> bool {
        let Some(memory) = self.storage.as_mut_slice() else {
            return false;
        };
        let Some(dst) = memory.get_mut(..bytes.len()) else {
            return false;
        };
        dst.copy_from_slice(bytes);
        tracing::debug!(base, len = bytes.len(), "window slid");
        self.cursor.window_base = base;
        true
    }

    /// Default put overflow behaviour: grow storage until `[put_pos,
    /// put_pos + n)` fits.
    ///
    /// External memory is first converted to owned memory, which is only
    /// allowed when [`BufferOptions::external_growable`] is set.
    pub fn grow_for_put(&mut self, n: usize) -> bool {
        if self.storage.is_externally_allocated() {
            if !self.options.external_growable {
                return false;
            }
            self.storage.convert_to_growable(0);
        }

        let Some(index) = self.cursor.put.checked_sub(self.cursor.window_base) else {
            return false;
        };
        while self.storage.num_allocated() < index + n {
            self.storage.grow();
        }
        true
    }

    fn index_of(&self, pos: usize) -> usize {
        pos - self.cursor.window_base
    }
}

/// A dual-mode binary/text read-write byte buffer.
///
/// See the [module documentation](self) for the cursor model.
///
/// ```rust
/// use scanbuf::{Buffer, BufferOptions, SeekFrom};
///
/// let mut buffer = Buffer::new(BufferOptions::default());
/// buffer.put_value(7u32);
/// buffer.put_string("name");
///
/// assert_eq!(buffer.get_value::<u32>(), 7);
/// assert_eq!(buffer.get_string(0), "name");
/// assert!(buffer.status().is_ok());
/// ```
#[derive(Debug)]
pub struct Buffer<'a, O = GrowOnPut> {
    state: BufferState<'a>,
    overflow: O,
}

impl Buffer<'static, GrowOnPut> {
    /// An empty, growable buffer.
    #[must_use]
    pub fn new(options: BufferOptions) -> Self {
        Self::with_growth(0, 0, options)
    }

    /// A growable buffer with `init_size` bytes allocated up front.
    #[must_use]
    pub fn with_capacity(init_size: usize, options: BufferOptions) -> Self {
        Self::with_growth(0, init_size, options)
    }

    /// A growable buffer that grows by `grow_size` bytes at a time, or
    /// geometrically when `grow_size` is zero.
    #[must_use]
    pub fn with_growth(grow_size: usize, init_size: usize, options: BufferOptions) -> Self {
        Self::with_policy(GrowOnPut, grow_size, init_size, options)
    }

    /// Takes ownership of `memory`; its first `initial_put` bytes are data.
    #[must_use]
    pub fn assume(memory: Vec<u8>, initial_put: usize, options: BufferOptions) -> Self {
        let mut buffer = Self::new(options);
        buffer.assume_memory(memory, initial_put, options);
        buffer
    }
}

impl<'a> Buffer<'a, GrowOnPut> {
    /// A read-only view over `data`, all of which is readable.
    #[must_use]
    pub fn read_only(data: &'a [u8], options: BufferOptions) -> Self {
        let options = BufferOptions {
            read_only: true,
            ..options
        };
        let mut state = BufferState::new(Storage::read_only(data), options);
        state.cursor.put = data.len();
        state.cursor.max_put = data.len();
        Self {
            state,
            overflow: GrowOnPut,
        }
    }

    /// A writable buffer over caller memory whose first `initial_put` bytes
    /// are data. The caller keeps ownership of `memory`.
    #[must_use]
    pub fn external(memory: &'a mut [u8], initial_put: usize, options: BufferOptions) -> Self {
        let mut buffer = Self {
            state: BufferState::new(Storage::new(0, 0), options),
            overflow: GrowOnPut,
        };
        buffer.set_external_buffer(memory, initial_put, options);
        buffer
    }
}

impl<O: Overflow> Buffer<'static, O> {
    /// A growable buffer driven by a custom overflow policy.
    pub fn with_policy(policy: O, grow_size: usize, init_size: usize, options: BufferOptions) -> Self {
        let mut buffer = Self {
            state: BufferState::new(Storage::new(grow_size, init_size), options),
            overflow: policy,
        };
        if init_size != 0 && !options.read_only {
            buffer.add_null_termination(true);
        }
        buffer
    }
}

impl<'a, O: Overflow> Buffer<'a, O> {
    /// Swaps the overflow policy.
    pub fn with_overflow<P: Overflow>(self, policy: P) -> Buffer<'a, P> {
        Buffer {
            state: self.state,
            overflow: policy,
        }
    }

    pub fn overflow(&self) -> &O {
        &self.overflow
    }

    pub fn overflow_mut(&mut self) -> &mut O {
        &mut self.overflow
    }

    pub fn state(&self) -> &BufferState<'a> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut BufferState<'a> {
        &mut self.state
    }

    // --------------------------------------------------------------------------------------------
    // Memory management
    // --------------------------------------------------------------------------------------------

    /// Attaches caller memory, resetting every cursor. The caller keeps
    /// ownership of `memory`.
    pub fn set_external_buffer(&mut self, memory: &'a mut [u8], initial_put: usize, options: BufferOptions) {
        self.state.storage = Storage::external(memory);
        self.reset_for_memory(initial_put, options);
    }

    /// Takes ownership of `memory`, resetting every cursor.
    pub fn assume_memory(&mut self, memory: Vec<u8>, initial_put: usize, options: BufferOptions) {
        self.state.storage = Storage::assume(memory);
        self.reset_for_memory(initial_put, options);
    }

    fn reset_for_memory(&mut self, initial_put: usize, options: BufferOptions) {
        self.state.options = options;
        self.state.cursor.reset();
        self.state.cursor.put = initial_put;
        self.add_null_termination(true);
    }

    /// Hands owned storage to the caller and resets every cursor. Returns
    /// `None` when the storage belongs to the caller already.
    pub fn detach_memory(&mut self) -> Option<Vec<u8>> {
        self.state.cursor.reset();
        self.state.storage.detach()
    }

    /// Makes sure at least `n` bytes (plus the terminator) are allocated.
    pub fn ensure_capacity(&mut self, n: usize) {
        let mut n = n + 1;
        if self.state.storage.is_externally_allocated() {
            if self.state.options.external_growable && self.state.storage.num_allocated() < n {
                self.state.storage.convert_to_growable(0);
            } else {
                n -= 1;
            }
        }
        self.state.storage.ensure_capacity(n);
    }

    /// Resets cursors and errors, keeping the memory.
    pub fn clear(&mut self) {
        let tab_depth = self.state.cursor.tab_depth;
        self.state.cursor.reset();
        self.state.cursor.tab_depth = tab_depth;
        if self.state.storage.num_allocated() > 0 {
            self.add_null_termination(true);
        }
    }

    /// Resets cursors and errors and releases the memory.
    pub fn purge(&mut self) {
        let tab_depth = self.state.cursor.tab_depth;
        self.state.cursor.reset();
        self.state.cursor.tab_depth = tab_depth;
        self.state.storage.purge();
    }

    // --------------------------------------------------------------------------------------------
    // Queries
    // --------------------------------------------------------------------------------------------

    #[must_use]
    pub fn tell_get(&self) -> usize {
        self.state.cursor.get
    }

    #[must_use]
    pub fn tell_put(&self) -> usize {
        self.state.cursor.put
    }

    #[must_use]
    pub fn tell_max_put(&self) -> usize {
        self.state.cursor.max_put
    }

    #[must_use]
    pub fn bytes_remaining(&self) -> usize {
        self.state.cursor.max_put.saturating_sub(self.state.cursor.get)
    }

    #[must_use]
    pub fn window_base(&self) -> usize {
        self.state.cursor.window_base
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.state.capacity()
    }

    /// Resident data from the window base up to the high-water mark.
    #[must_use]
    pub fn base(&self) -> &[u8] {
        let window = self.state.window();
        let end = self
            .state
            .cursor
            .max_put
            .saturating_sub(self.state.cursor.window_base)
            .min(window.len());
        &window[..end]
    }

    #[must_use]
    pub fn options(&self) -> &BufferOptions {
        &self.state.options
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        self.state.options.text
    }

    #[must_use]
    pub fn contains_crlf(&self) -> bool {
        self.state.options.contains_crlf
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.state.options.read_only
    }

    #[must_use]
    pub fn is_externally_allocated(&self) -> bool {
        self.state.storage.is_externally_allocated()
    }

    /// Switches between binary and text and records the line ending
    /// convention. Content is not rewritten; see
    /// [`convert_crlf`](Self::convert_crlf).
    pub fn set_buffer_type(&mut self, text: bool, contains_crlf: bool) {
        if cfg!(debug_assertions) && self.tell_max_put() != 0 {
            if self.is_text() {
                if text {
                    debug_assert_eq!(self.contains_crlf(), contains_crlf);
                } else {
                    debug_assert!(self.contains_crlf());
                }
            } else if text {
                debug_assert!(contains_crlf);
            }
        }
        self.state.options.text = text;
        self.state.options.contains_crlf = contains_crlf;
    }

    pub fn set_auto_tabs_disabled(&mut self, disabled: bool) {
        self.state.options.auto_tabs_disabled = disabled;
    }

    // --------------------------------------------------------------------------------------------
    // Errors
    // --------------------------------------------------------------------------------------------

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.state.cursor.errors.is_empty()
    }

    #[must_use]
    pub fn error_flags(&self) -> ErrorFlags {
        self.state.cursor.errors
    }

    pub fn clear_errors(&mut self) {
        self.state.cursor.errors = ErrorFlags::empty();
    }

    /// Reports the latched error, if any.
    ///
    /// # Errors
    ///
    /// [`BufferError::GetOverflow`] if a read failed, otherwise
    /// [`BufferError::PutOverflow`] if a write failed.
    pub fn status(&self) -> Result<(), BufferError> {
        self.state.cursor.errors.check()
    }

    pub(crate) fn latch(&mut self, flag: ErrorFlags) {
        self.state.cursor.errors.insert(flag);
    }

    // --------------------------------------------------------------------------------------------
    // Byte order
    // --------------------------------------------------------------------------------------------

    pub fn set_big_endian(&mut self, big_endian: bool) {
        self.state.options.byte_order = if big_endian { Endian::Big } else { Endian::Little };
    }

    #[must_use]
    pub fn is_big_endian(&self) -> bool {
        self.state.options.byte_order == Endian::Big
    }

    /// Selects the non-native byte order when `activate` is set, the native
    /// order otherwise.
    pub fn activate_byte_swapping(&mut self, activate: bool) {
        self.state.options.byte_order = if activate { Endian::swapped() } else { Endian::NATIVE };
    }

    // --------------------------------------------------------------------------------------------
    // Get side
    // --------------------------------------------------------------------------------------------

    /// Checks that `n` bytes can be read at the get cursor, asking the
    /// overflow policy for them when they are outside the window. Latches the
    /// get error on failure.
    pub(crate) fn check_get(&mut self, n: usize) -> bool {
        let cursor = &self.state.cursor;
        if cursor.errors.contains(ErrorFlags::GET_OVERFLOW) {
            return false;
        }

        let get = cursor.get;
        if get.checked_add(n).is_none_or(|end| end > cursor.max_put) {
            self.latch(ErrorFlags::GET_OVERFLOW);
            return false;
        }

        if !self.state.is_resident(get, n)
            && !(self
                .overflow
                .on_get_overflow(&mut self.state, GetRequest::Bytes(n))
                && self.state.is_resident(get, n))
        {
            tracing::debug!(get, requested = n, "get overflow hook could not supply bytes");
            self.latch(ErrorFlags::GET_OVERFLOW);
            return false;
        }

        true
    }

    /// Like [`check_get`](Self::check_get) for `offset + n` bytes, without
    /// leaving the get error latched.
    pub(crate) fn check_peek(&mut self, offset: usize, n: usize) -> bool {
        if self.state.cursor.errors.contains(ErrorFlags::GET_OVERFLOW) {
            return false;
        }
        let Some(total) = offset.checked_add(n) else {
            return false;
        };
        let ok = self.check_get(total);
        self.state.cursor.errors.remove(ErrorFlags::GET_OVERFLOW);
        ok
    }

    /// Clamps `requested` to the bytes that can be peeked at `offset` past the
    /// get cursor. Never latches; returns zero only when nothing is available.
    pub(crate) fn check_arbitrary_peek(&mut self, offset: usize, requested: usize) -> usize {
        let Some(start) = self.state.cursor.get.checked_add(offset) else {
            return 0;
        };
        if start >= self.state.cursor.max_put || self.state.cursor.errors.contains(ErrorFlags::GET_OVERFLOW) {
            return 0;
        }

        let mut n = requested.min(self.state.cursor.max_put - start);
        // A window can only serve lookahead it is large enough to hold.
        if offset + n > self.state.capacity() {
            n = self.state.capacity().saturating_sub(offset);
        }
        if n == 0 {
            return 0;
        }

        self.check_peek(offset, n);

        // The hook may have moved the high-water mark of a streaming source.
        let available = self.state.cursor.max_put.saturating_sub(start);
        let resident = (self.state.cursor.window_base + self.state.capacity()).saturating_sub(start);
        if start < self.state.cursor.window_base {
            return 0;
        }
        n.min(available).min(resident)
    }

    /// Up to `requested` bytes at `offset` past the get cursor, possibly
    /// fewer. Empty when nothing is available.
    pub(crate) fn arbitrary_peek(&mut self, offset: usize, requested: usize) -> &[u8] {
        let n = self.check_arbitrary_peek(offset, requested);
        if n == 0 {
            return &[];
        }
        let index = self.state.index_of(self.state.cursor.get + offset);
        &self.state.window()[index..index + n]
    }

    /// A view of exactly `n` bytes at `offset` past the get cursor, without
    /// moving the cursor or latching an error.
    pub fn peek(&mut self, offset: usize, n: usize) -> Option<&[u8]> {
        if !self.check_peek(offset, n) {
            return None;
        }
        let index = self.state.index_of(self.state.cursor.get + offset);
        Some(&self.state.window()[index..index + n])
    }

    /// The byte at `offset` past the get cursor, if any.
    pub fn peek_byte(&mut self, offset: usize) -> Option<u8> {
        self.peek(offset, 1).map(|b| b[0])
    }

    /// Consumes the next byte without latching when there is none.
    pub(crate) fn take_byte(&mut self) -> Option<u8> {
        let b = self.peek_byte(0)?;
        self.state.cursor.get += 1;
        Some(b)
    }

    /// Advances the get cursor over `n` bytes a peek has already validated.
    pub(crate) fn skip_checked(&mut self, n: usize) {
        debug_assert!(self.state.cursor.get + n <= self.state.cursor.max_put);
        self.state.cursor.get += n;
    }

    /// Fills `dst` from the get cursor. Nothing is read unless all of `dst`
    /// can be filled.
    pub fn get(&mut self, dst: &mut [u8]) -> bool {
        if dst.is_empty() {
            return true;
        }
        if !self.check_get(dst.len()) {
            return false;
        }
        let index = self.state.index_of(self.state.cursor.get);
        dst.copy_from_slice(&self.state.window()[index..index + dst.len()]);
        self.state.cursor.get += dst.len();
        true
    }

    /// Reads between one and `dst.len()` bytes, returning how many were read.
    pub fn get_up_to(&mut self, dst: &mut [u8]) -> usize {
        let n = self.check_arbitrary_peek(0, dst.len());
        if n > 0 {
            let index = self.state.index_of(self.state.cursor.get);
            dst[..n].copy_from_slice(&self.state.window()[index..index + n]);
            self.state.cursor.get += n;
        }
        n
    }

    /// Reads one byte, or zero on failure.
    pub fn get_char(&mut self) -> u8 {
        let mut c = [0u8; 1];
        if self.get(&mut c) { c[0] } else { 0 }
    }

    /// Reads a fixed-width value in binary mode, or parses one from text in
    /// text mode. Yields zero on failure.
    pub fn get_value<T: Primitive>(&mut self) -> T {
        if self.is_text() {
            return self.get_text(10).unwrap_or_default();
        }
        let mut bytes = [0u8; 8];
        let bytes = &mut bytes[..T::SIZE];
        if self.get(bytes) {
            self.state.options.byte_order.read(bytes)
        } else {
            T::default()
        }
    }

    /// Parses a number from the text at the get cursor, skipping leading
    /// whitespace. The cursor does not move on failure.
    pub fn get_text<T: TextNumber>(&mut self, radix: u32) -> Option<T> {
        let (value, consumed) = T::scan_text(self.arbitrary_peek(0, NUMBER_LOOKAHEAD), radix)?;
        self.state.cursor.get += consumed;
        Some(value)
    }

    /// Moves the get cursor.
    ///
    /// Landing past the high-water mark (or before zero) latches the get
    /// error; landing within bounds clears it and lets a streaming policy
    /// relocate its window.
    pub fn seek_get(&mut self, from: SeekFrom) {
        let Some(target) = self.state.cursor.resolve(from, self.state.cursor.get) else {
            self.latch(ErrorFlags::GET_OVERFLOW);
            return;
        };

        self.state.cursor.get = target;
        if target > self.state.cursor.max_put {
            self.latch(ErrorFlags::GET_OVERFLOW);
            return;
        }

        self.state.cursor.errors.remove(ErrorFlags::GET_OVERFLOW);
        let base = self.state.cursor.window_base;
        if target < base || target - base >= self.state.capacity() {
            self.overflow.on_get_overflow(&mut self.state, GetRequest::Resync);
        }
    }

    // --------------------------------------------------------------------------------------------
    // Put side
    // --------------------------------------------------------------------------------------------

    /// Checks that `n` bytes can be written at the put cursor, asking the
    /// overflow policy for room when needed. Latches the put error on
    /// failure.
    pub(crate) fn check_put(&mut self, n: usize) -> bool {
        if self.state.cursor.errors.contains(ErrorFlags::PUT_OVERFLOW) || self.is_read_only() {
            return false;
        }

        let put = self.state.cursor.put;
        if !self.state.is_resident(put, n)
            && !(self
                .overflow
                .on_put_overflow(&mut self.state, PutRequest::Reserve(n))
                && self.state.is_resident(put, n))
        {
            tracing::debug!(put, requested = n, "put overflow hook could not make room");
            self.latch(ErrorFlags::PUT_OVERFLOW);
            return false;
        }

        true
    }

    /// Writes `src` at the put cursor.
    pub fn put(&mut self, src: &[u8]) {
        if src.is_empty() || !self.check_put(src.len()) {
            return;
        }

        let index = self.state.index_of(self.state.cursor.put);
        let Some(dst) = self
            .state
            .storage
            .as_mut_slice()
            .and_then(|memory| memory.get_mut(index..index + src.len()))
        else {
            self.latch(ErrorFlags::PUT_OVERFLOW);
            return;
        };
        dst.copy_from_slice(src);
        self.state.cursor.put += src.len();
        self.add_null_termination(false);
    }

    /// Writes one byte, indenting first if it follows a newline in text
    /// mode.
    pub fn put_char(&mut self, c: u8) {
        if self.was_last_character_newline() {
            self.put_tabs();
        }
        self.put(&[c]);
    }

    /// Writes a fixed-width value in binary mode, or its decimal text
    /// followed by a space in text mode.
    pub fn put_value<T: Primitive>(&mut self, value: T) {
        if self.is_text() {
            // A failed write is already latched.
            let _ = fmt::Write::write_fmt(self, format_args!("{value} "));
            return;
        }
        let mut bytes = [0u8; 8];
        let bytes = &mut bytes[..T::SIZE];
        self.state.options.byte_order.write(value, bytes);
        self.put(bytes);
    }

    /// Writes a string. Binary buffers append a zero terminator; text buffers
    /// indent every line that follows a newline.
    pub fn put_string(&mut self, s: impl AsRef<[u8]>) {
        let mut s = s.as_ref();
        if !self.is_text() {
            self.put(s);
            self.put(&[0]);
            return;
        }

        if self.tab_count() > 0 {
            if self.was_last_character_newline() {
                self.put_tabs();
            }
            while let Some(newline) = s.find_byte(b'\n') {
                self.put(&s[..=newline]);
                s = &s[newline + 1..];
                if s.is_empty() {
                    break;
                }
                self.put_tabs();
            }
        }
        self.put(s);
    }

    /// Moves the put cursor, flushing the overflow policy first.
    ///
    /// A target before zero latches the put error and leaves the cursor in
    /// place.
    pub fn seek_put(&mut self, from: SeekFrom) {
        let Some(next_put) = self.state.cursor.resolve(from, self.state.cursor.put) else {
            self.latch(ErrorFlags::PUT_OVERFLOW);
            return;
        };

        self.overflow
            .on_put_overflow(&mut self.state, PutRequest::Flush { next_put });
        self.state.cursor.put = next_put;
        self.add_null_termination(false);
    }

    /// Advances the high-water mark to the put cursor and writes a terminator
    /// after it. `force` terminates even when the mark does not move.
    fn add_null_termination(&mut self, force: bool) {
        let put = self.state.cursor.put;
        if put <= self.state.cursor.max_put && !force {
            return;
        }

        if !self.is_read_only() && !self.state.cursor.errors.contains(ErrorFlags::PUT_OVERFLOW) {
            if self.check_put(1) {
                let index = self.state.index_of(put);
                if let Some(slot) = self.state.storage.as_mut_slice().and_then(|m| m.get_mut(index)) {
                    *slot = 0;
                }
            } else {
                // The write that moved the cursor succeeded; only the
                // terminator did not fit.
                self.state.cursor.errors.remove(ErrorFlags::PUT_OVERFLOW);
            }
        }
        self.state.cursor.max_put = self.state.cursor.max_put.max(put);
    }

    // --------------------------------------------------------------------------------------------
    // Indentation
    // --------------------------------------------------------------------------------------------

    pub fn push_tab(&mut self) {
        self.state.cursor.tab_depth += 1;
    }

    pub fn pop_tab(&mut self) {
        self.state.cursor.tab_depth = self.state.cursor.tab_depth.saturating_sub(1);
    }

    #[must_use]
    pub fn tab_depth(&self) -> usize {
        self.state.cursor.tab_depth
    }

    fn tab_count(&self) -> usize {
        if self.state.options.auto_tabs_disabled {
            0
        } else {
            self.state.cursor.tab_depth
        }
    }

    /// Writes one tab per indentation level.
    pub fn put_tabs(&mut self) {
        for _ in 0..self.tab_count() {
            self.put(b"\t");
        }
    }

    pub(crate) fn was_last_character_newline(&self) -> bool {
        let put = self.state.cursor.put;
        if !self.is_text() || put == 0 || !self.state.is_resident(put - 1, 1) {
            return false;
        }
        self.state.window()[self.state.index_of(put - 1)] == b'\n'
    }
}

impl<O: Overflow> fmt::Write for Buffer<'_, O> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.put_string(s);
        if self.state.cursor.errors.contains(ErrorFlags::PUT_OVERFLOW) {
            Err(fmt::Error)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use core::fmt::Write;

    use super::*;

    #[test]
    fn put_then_get_roundtrip() {
        let mut buffer = Buffer::new(BufferOptions::default());
        buffer.put(b"hello");
        buffer.seek_get(SeekFrom::Head(0));
        let mut out = [0u8; 5];
        assert!(buffer.get(&mut out));
        assert_eq!(&out, b"hello");
        assert_eq!(buffer.bytes_remaining(), 0);
    }

    #[test]
    fn terminator_follows_data_but_is_not_data() {
        let mut buffer = Buffer::new(BufferOptions::text());
        buffer.put(b"abc");
        assert_eq!(buffer.tell_max_put(), 3);
        assert_eq!(buffer.base(), b"abc");
        assert_eq!(buffer.state().window()[3], 0);
    }

    #[test]
    fn failed_get_latches_until_seek() {
        let mut buffer = Buffer::new(BufferOptions::default());
        buffer.put(b"ab");
        let mut out = [0u8; 3];
        assert!(!buffer.get(&mut out));
        assert_eq!(buffer.status(), Err(BufferError::GetOverflow));

        let mut one = [0u8; 1];
        assert!(!buffer.get(&mut one));
        assert_eq!(buffer.tell_get(), 0);

        buffer.seek_get(SeekFrom::Head(1));
        assert!(buffer.is_valid());
        assert!(buffer.get(&mut one));
        assert_eq!(one, [b'b']);
    }

    #[test]
    fn seek_past_end_latches() {
        let mut buffer = Buffer::new(BufferOptions::default());
        buffer.put(b"ab");
        buffer.seek_get(SeekFrom::Head(3));
        assert!(buffer.error_flags().contains(ErrorFlags::GET_OVERFLOW));
        buffer.seek_get(SeekFrom::Tail(0));
        assert!(buffer.is_valid());
        buffer.seek_get(SeekFrom::Current(-5));
        assert!(!buffer.is_valid());
        assert_eq!(buffer.tell_get(), 2);
    }

    #[test]
    fn peek_does_not_move_or_latch() {
        let mut buffer = Buffer::new(BufferOptions::default());
        buffer.put(b"xyz");
        assert_eq!(buffer.peek(1, 2), Some(&b"yz"[..]));
        assert_eq!(buffer.peek(2, 2), None);
        assert!(buffer.is_valid());
        assert_eq!(buffer.tell_get(), 0);
    }

    #[test]
    fn peeks_far_past_the_cursor_are_unavailable() {
        let mut buffer = Buffer::new(BufferOptions::default());
        buffer.put(b"xyz");
        buffer.seek_get(SeekFrom::Head(1));
        assert_eq!(buffer.peek(usize::MAX, 1), None);
        assert_eq!(buffer.peek(1, usize::MAX), None);
        assert_eq!(buffer.peek_byte(usize::MAX), None);
        assert!(buffer.arbitrary_peek(usize::MAX, 4).is_empty());
        assert!(buffer.is_valid());
        assert_eq!(buffer.peek(0, 2), Some(&b"yz"[..]));
    }

    #[test]
    fn get_up_to_reads_partial() {
        let mut buffer = Buffer::new(BufferOptions::default());
        buffer.put(b"abc");
        let mut out = [0u8; 8];
        assert_eq!(buffer.get_up_to(&mut out), 3);
        assert_eq!(&out[..3], b"abc");
        assert_eq!(buffer.get_up_to(&mut out), 0);
        assert!(buffer.is_valid());
    }

    #[test]
    fn read_only_rejects_puts() {
        let data = b"fixed";
        let mut buffer = Buffer::read_only(data, BufferOptions::default());
        buffer.put(b"x");
        assert_eq!(buffer.tell_put(), 5);
        assert_eq!(buffer.base(), b"fixed");
    }

    #[test]
    fn external_memory_is_fixed_unless_growable() {
        let mut backing = [0u8; 4];
        let mut buffer = Buffer::external(&mut backing, 0, BufferOptions::default());
        buffer.put(b"abcd");
        assert!(buffer.is_valid(), "missing terminator must not latch");
        buffer.put(b"e");
        assert_eq!(buffer.status(), Err(BufferError::PutOverflow));
        drop(buffer);
        assert_eq!(&backing, b"abcd");

        let mut backing = [0u8; 2];
        let options = BufferOptions {
            external_growable: true,
            ..BufferOptions::default()
        };
        let mut buffer = Buffer::external(&mut backing, 0, options);
        buffer.put(b"grown");
        assert!(buffer.is_valid());
        assert!(!buffer.is_externally_allocated());
        assert_eq!(buffer.base(), b"grown");
    }

    #[test]
    fn assume_and_detach_transfer_ownership() {
        let mut buffer = Buffer::assume(vec![1, 2, 3, 0], 3, BufferOptions::default());
        assert_eq!(buffer.get_value::<u8>(), 1);
        let memory = buffer.detach_memory().unwrap();
        assert_eq!(&memory[..3], &[1, 2, 3]);
        assert_eq!(buffer.tell_get(), 0);
        assert_eq!(buffer.tell_max_put(), 0);
    }

    #[test]
    fn values_respect_byte_order() {
        let mut buffer = Buffer::new(BufferOptions::default());
        buffer.set_big_endian(true);
        buffer.put_value(0x0102_u16);
        assert_eq!(buffer.base(), &[1, 2]);
        buffer.set_big_endian(false);
        buffer.put_value(-1.5_f32);
        assert_eq!(buffer.get_value::<u16>(), 0x0201);
        assert!((buffer.get_value::<f32>() + 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn text_values_are_space_separated() {
        let mut buffer = Buffer::new(BufferOptions::text());
        buffer.put_value(12_i32);
        buffer.put_value(-3_i64);
        buffer.put_value(0.25_f64);
        assert_eq!(buffer.base(), b"12 -3 0.25 ");
        assert_eq!(buffer.get_value::<i32>(), 12);
        assert_eq!(buffer.get_value::<i64>(), -3);
        assert!((buffer.get_value::<f64>() - 0.25).abs() < f64::EPSILON);
        assert_eq!(buffer.get_value::<u32>(), 0);
    }

    #[test]
    fn auto_tabs_indent_after_newlines() {
        let mut buffer = Buffer::new(BufferOptions::text());
        buffer.put_string("{\n");
        buffer.push_tab();
        write!(buffer, "a\nb\n").unwrap();
        buffer.pop_tab();
        buffer.put_string("}");
        assert_eq!(buffer.base(), b"{\n\ta\n\tb\n}");
    }

    #[test]
    fn auto_tabs_can_be_disabled() {
        let mut buffer = Buffer::new(BufferOptions::text());
        buffer.set_auto_tabs_disabled(true);
        buffer.push_tab();
        buffer.put_string("a\nb");
        assert_eq!(buffer.base(), b"a\nb");
    }

    #[test]
    fn binary_strings_are_zero_terminated() {
        let mut buffer = Buffer::new(BufferOptions::default());
        buffer.put_string("ab");
        assert_eq!(buffer.base(), b"ab\0");
    }

    #[test]
    fn seek_put_back_and_overwrite() {
        let mut buffer = Buffer::new(BufferOptions::default());
        buffer.put(b"abcdef");
        buffer.seek_put(SeekFrom::Head(2));
        buffer.put(b"XY");
        assert_eq!(buffer.tell_max_put(), 6);
        assert_eq!(buffer.base(), b"abXYef");
        buffer.seek_put(SeekFrom::Current(-10));
        assert_eq!(buffer.status(), Err(BufferError::PutOverflow));
    }

    #[test]
    fn clear_keeps_memory_purge_releases_it() {
        let mut buffer = Buffer::with_capacity(16, BufferOptions::default());
        buffer.put(b"data");
        buffer.clear();
        assert_eq!(buffer.tell_max_put(), 0);
        assert!(buffer.capacity() >= 16);
        buffer.purge();
        assert_eq!(buffer.capacity(), 0);
        buffer.put(b"again");
        assert_eq!(buffer.base(), b"again");
    }

    #[test]
    fn clear_on_unused_buffer_allocates_nothing() {
        let mut buffer = Buffer::new(BufferOptions::text());
        buffer.clear();
        assert_eq!(buffer.capacity(), 0);
        assert!(buffer.is_valid());
        buffer.put_string("after");
        assert_eq!(buffer.base(), b"after");
    }

    #[test]
    fn detach_resets_indentation() {
        let mut buffer = Buffer::new(BufferOptions::text());
        buffer.push_tab();
        buffer.put_string("a\n");
        assert!(buffer.detach_memory().is_some());
        assert_eq!(buffer.tab_depth(), 0);
        buffer.put_string("b\nc");
        assert_eq!(buffer.base(), b"b\nc");
    }

    #[test]
    fn linear_growth_is_honoured() {
        let mut buffer = Buffer::with_growth(10, 0, BufferOptions::default());
        buffer.put(&[7u8; 25]);
        assert_eq!(buffer.capacity(), 30);
    }
}
