//! Text scanning on top of the buffer primitives.
//!
//! Every lookahead here goes through peeks, so scanning a streaming buffer
//! never needs more than one window of the source resident at a time.

use alloc::vec;

use bstr::BString;

use crate::{
    Buffer, SeekFrom,
    charset::{CharacterSet, is_space},
    error::ErrorFlags,
    overflow::Overflow,
};

/// Bytes examined per step by the length peeks.
const PEEK_CHUNK: usize = 128;

impl<O: Overflow> Buffer<'_, O> {
    /// Skips whitespace at the get cursor. Text mode only.
    pub fn eat_whitespace(&mut self) {
        if !self.is_text() || !self.is_valid() {
            return;
        }
        while self.peek_byte(0).is_some_and(is_space) {
            self.skip_checked(1);
        }
    }

    /// Skips a `//` comment through the end of its line. Returns `false`, and
    /// leaves the cursor alone, when no comment starts at the get cursor.
    pub fn eat_cpp_comment(&mut self) -> bool {
        if !self.is_text() || !self.is_valid() || self.peek(0, 2) != Some(&b"//"[..]) {
            return false;
        }
        self.skip_checked(2);
        while let Some(b) = self.take_byte() {
            if b == b'\n' {
                break;
            }
        }
        true
    }

    /// Offset of the first non-whitespace byte at or after `offset`.
    pub fn peek_whitespace(&mut self, mut offset: usize) -> usize {
        if !self.is_text() || !self.is_valid() {
            return offset;
        }
        while self.peek_byte(offset).is_some_and(is_space) {
            offset += 1;
        }
        offset
    }

    /// Whether the bytes at `offset` past the get cursor are exactly `s`.
    pub fn peek_string_match(&mut self, offset: usize, s: impl AsRef<[u8]>) -> bool {
        let s = s.as_ref();
        self.peek(offset, s.len()) == Some(s)
    }

    /// Length of the next string plus one for its terminator, or zero when
    /// nothing is available. Text mode skips leading whitespace and ends the
    /// string at whitespace or a zero byte; binary mode ends it at a zero
    /// byte only.
    pub fn peek_string_length(&mut self) -> usize {
        if !self.is_valid() {
            return 0;
        }
        let start = self.peek_whitespace(0);
        let text = self.is_text();
        self.peek_length(start, |b| {
            if b == 0 || (text && is_space(b)) {
                Some(1)
            } else {
                None
            }
        })
    }

    /// Length of the next line including its `\n` or `\r`, plus one for the
    /// terminator; zero when nothing is available.
    pub fn peek_line_length(&mut self) -> usize {
        if !self.is_valid() {
            return 0;
        }
        self.peek_length(0, |b| match b {
            b'\n' | b'\r' => Some(2),
            0 => Some(1),
            _ => None,
        })
    }

    /// Scans forward from `start` in chunks until `end_of` recognises a byte,
    /// and returns the distance to it plus whatever `end_of` adds.
    fn peek_length(&mut self, start: usize, end_of: impl Fn(u8) -> Option<usize>) -> usize {
        let mut offset = start;
        loop {
            let chunk = self.arbitrary_peek(offset, PEEK_CHUNK);
            if chunk.is_empty() {
                return if offset == start { 0 } else { offset - start + 1 };
            }
            let found = chunk
                .iter()
                .enumerate()
                .find_map(|(i, b)| end_of(*b).map(|extra| i + extra));
            if let Some(extra) = found {
                return offset - start + extra;
            }
            offset += chunk.len();
        }
    }

    /// Reads the next string: a whitespace-delimited word in text mode, a
    /// zero-terminated run in binary mode (the terminator is consumed).
    ///
    /// At most `max_chars - 1` bytes are returned; the rest of the string is
    /// skipped. Zero means no limit. An exhausted buffer latches the get
    /// error.
    pub fn get_string(&mut self, max_chars: usize) -> BString {
        if !self.is_valid() {
            return BString::default();
        }

        let len = self.peek_string_length();
        if self.is_text() {
            self.eat_whitespace();
        }
        let s = self.read_terminated(len, max_chars);

        if !self.is_text() && self.peek_byte(0) == Some(0) {
            self.skip_checked(1);
        }
        s
    }

    /// Reads through the next `\n` (kept in the result). Text buffers without
    /// CRLF only.
    pub fn get_line(&mut self, max_chars: usize) -> BString {
        debug_assert!(self.is_text() && !self.contains_crlf());
        if !self.is_valid() {
            return BString::default();
        }

        let len = self.peek_line_length();
        self.read_terminated(len, max_chars)
    }

    /// Copies out a run whose peeked length (terminator included) is `len`.
    fn read_terminated(&mut self, len: usize, max_chars: usize) -> BString {
        if len == 0 {
            self.latch(ErrorFlags::GET_OVERFLOW);
            return BString::default();
        }

        let max_chars = if max_chars == 0 { usize::MAX } else { max_chars };
        let mut s = vec![0; len.min(max_chars) - 1];
        self.get(&mut s);
        if len > max_chars {
            self.seek_get(SeekFrom::Current(to_offset(len - max_chars)));
        }
        s.into()
    }

    /// Borrows the next line straight from the window, without its trailing
    /// `\r`/`\n`, and moves past it. An empty line or exhausted buffer moves
    /// the cursor to the end and yields `None`.
    pub fn get_line_in_place(&mut self) -> Option<&[u8]> {
        debug_assert!(self.is_text() && !self.contains_crlf());
        let len = self.peek_line_length();
        if len <= 1 {
            self.seek_get(SeekFrom::Tail(0));
            return None;
        }

        let len = len - 1;
        let index = self.tell_get().checked_sub(self.window_base())?;
        self.skip_checked(len);
        let line = self.state().window().get(index..index + len)?;
        Some(match line.last() {
            Some(b'\n' | b'\r') => &line[..len - 1],
            _ => line,
        })
    }

    /// Advances past the next case-insensitive occurrence of `token`.
    ///
    /// On a streaming buffer the search moves through the source one window
    /// at a time; a match ending exactly at the edge of a window is only
    /// accepted once the following bytes have been seen. When nothing is
    /// found the cursor is restored. The token must be shorter than the
    /// window, or it is never found.
    ///
    /// # Panics
    ///
    /// Panics if `token` is empty.
    pub fn find_token(&mut self, token: impl AsRef<[u8]>) -> bool {
        let token = token.as_ref();
        assert!(!token.is_empty(), "cannot search for an empty token");
        let len = token.len();
        let start = self.tell_get();

        let capacity = self.capacity();
        let mut max_size = (self.window_base() + capacity).saturating_sub(start);
        if max_size <= len {
            max_size = capacity;
        }
        let mut remaining = self.bytes_remaining();

        while remaining >= len {
            let overflow = remaining > max_size;
            let to_check = if overflow { max_size } else { remaining };
            if overflow && to_check <= len {
                break;
            }

            let Some(window) = self.peek(0, to_check) else {
                break;
            };
            let found = find_ignore_ascii_case(window, token);
            let potential_mismatch = overflow && found == Some(to_check - len);

            match found {
                Some(offset) if !potential_mismatch => {
                    self.seek_get(SeekFrom::Current(to_offset(offset + len)));
                    return true;
                }
                _ => {
                    if !overflow {
                        break;
                    }
                    // The tail of this window may begin a match.
                    remaining = remaining - to_check + len;
                    max_size = capacity;
                    tracing::trace!(from = self.tell_get(), advance = to_check - len, "find_token window advanced");
                    self.seek_get(SeekFrom::Current(to_offset(to_check - len)));
                }
            }
        }

        self.seek_get(SeekFrom::Head(start));
        false
    }

    /// Reads the text between an optional leading literal and the next
    /// `end` delimiter, with surrounding whitespace trimmed.
    ///
    /// Whitespace in `start` matches any run of whitespace, other bytes match
    /// case-insensitively. The result is truncated to `max_len - 1` bytes.
    /// On failure the cursor is restored and `None` returned.
    ///
    /// # Panics
    ///
    /// Panics if `end` is empty or `max_len` is zero.
    pub fn parse_delimited_token(&mut self, start: Option<&[u8]>, end: &[u8], max_len: usize) -> Option<BString> {
        assert!(!end.is_empty(), "an ending delimiter is required");
        assert!(max_len > 0, "token buffer must hold the terminator");

        let start_get = self.tell_get();
        let token = self.parse_between(start.unwrap_or_default(), end, max_len);
        if token.is_none() {
            self.seek_get(SeekFrom::Head(start_get));
        }
        token
    }

    fn parse_between(&mut self, start: &[u8], end: &[u8], max_len: usize) -> Option<BString> {
        self.eat_whitespace();
        for &expected in start {
            if is_space(expected) {
                self.eat_whitespace();
            } else if !self.get_char().eq_ignore_ascii_case(&expected) || !self.is_valid() {
                return None;
            }
        }

        self.eat_whitespace();
        let token_start = self.tell_get();
        if !self.find_token(end) {
            return None;
        }
        let after = self.tell_get();

        let count = (after - end.len() - token_start).min(max_len - 1);
        let mut token = vec![0; count];
        if count > 0 {
            self.seek_get(SeekFrom::Head(token_start));
            if !self.get(&mut token) {
                return None;
            }
            let kept = token.iter().rposition(|b| !is_space(*b)).map_or(0, |i| i + 1);
            token.truncate(kept);
        }

        self.seek_get(SeekFrom::Head(after));
        Some(token.into())
    }

    /// Reads the next token, skipping whitespace (and `//` comments when
    /// `parse_comments` is set). Returns `None` at the end of the data.
    ///
    /// - `"` starts a quoted token running to the closing quote or the end of
    ///   the data. Break bytes inside quotes are ordinary; there are no
    ///   escapes.
    /// - A byte in `breaks` is a token on its own.
    /// - Anything else starts a word that ends before a break byte, a quote,
    ///   or a control or space byte.
    ///
    /// Tokens are consumed whole but truncated to `max_len - 1` bytes. A zero
    /// byte counts as the end of the data.
    ///
    /// # Panics
    ///
    /// Panics if `max_len` is zero.
    pub fn parse_token(&mut self, breaks: &CharacterSet, max_len: usize, parse_comments: bool) -> Option<BString> {
        assert!(max_len > 0, "token buffer must hold the terminator");
        let limit = max_len - 1;

        loop {
            if !self.is_valid() {
                return None;
            }
            self.eat_whitespace();
            if !(parse_comments && self.eat_cpp_comment()) {
                break;
            }
        }

        let first = self.take_byte().filter(|b| *b != 0)?;
        let mut token = BString::default();

        if first == b'"' {
            while let Some(b) = self.take_byte() {
                if b == b'"' || b == 0 {
                    break;
                }
                if token.len() < limit {
                    token.push(b);
                }
            }
            return Some(token);
        }

        if breaks.contains(first) {
            if limit > 0 {
                token.push(first);
            }
            return Some(token);
        }

        if limit > 0 {
            token.push(first);
        }
        while let Some(b) = self.peek_byte(0) {
            if breaks.contains(b) || b == b'"' || b <= b' ' {
                break;
            }
            self.skip_checked(1);
            if token.len() < limit {
                token.push(b);
            }
        }
        Some(token)
    }
}

pub(crate) fn find_ignore_ascii_case(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|candidate| candidate.eq_ignore_ascii_case(needle))
}

/// Converts a forward distance for [`SeekFrom::Current`]. Distances are
/// bounded by the data and always fit.
#[allow(clippy::cast_possible_wrap)]
fn to_offset(n: usize) -> isize {
    n as isize
}
