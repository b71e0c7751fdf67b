//! Delimited, escaped strings in text buffers.
//!
//! Binary buffers fall back to the plain string operations.

use bstr::BString;

use crate::{Buffer, conversion::CharConversion, overflow::Overflow};

/// What [`Buffer::peek_delimited_string_length`] measures. Both lengths
/// include one byte for a terminator, so zero means no string follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimitedLength {
    /// Length after unescaping, without delimiters.
    Decoded,
    /// Length of the encoded form, delimiters included.
    Encoded,
}

impl<O: Overflow> Buffer<'_, O> {
    /// Writes `c`, escaped according to `conversion` in text mode.
    pub fn put_delimited_char(&mut self, conversion: &CharConversion, c: u8) {
        if !self.is_text() {
            self.put_char(c);
            return;
        }
        self.put_escaped(conversion, c);
    }

    /// Writes `s` between delimiters with every byte escaped according to
    /// `conversion`. Auto-indentation only applies before the opening
    /// delimiter, never inside the quotes.
    pub fn put_delimited_string(&mut self, conversion: &CharConversion, s: impl AsRef<[u8]>) {
        if !self.is_text() {
            self.put_string(s);
            return;
        }

        if self.was_last_character_newline() {
            self.put_tabs();
        }
        self.put(conversion.delimiter());
        for &c in s.as_ref() {
            self.put_escaped(conversion, c);
        }
        self.put(conversion.delimiter());
    }

    fn put_escaped(&mut self, conversion: &CharConversion, c: u8) {
        match conversion.conversion(c) {
            Some(replacement) => {
                self.put(&[conversion.escape_byte()]);
                self.put(replacement);
            }
            None => self.put(&[c]),
        }
    }

    /// Measures the delimited string at the get cursor without consuming it.
    /// Leading whitespace is skipped; zero means no opening delimiter.
    pub fn peek_delimited_string_length(&mut self, conversion: &CharConversion, length: DelimitedLength) -> usize {
        if !self.is_text() {
            return self.peek_string_length();
        }

        let delimiter = conversion.delimiter();
        let mut offset = self.peek_whitespace(0);
        if !self.peek_string_match(offset, delimiter) {
            return 0;
        }

        let start = offset;
        offset += delimiter.len();
        let mut decoded = 1;
        while !self.peek_string_match(offset, delimiter) {
            let Some(c) = self.peek_byte(offset) else {
                break;
            };
            decoded += 1;
            offset += 1;

            if c == conversion.escape_byte() && conversion.max_conversion_length() > 0 {
                let tail = self.arbitrary_peek(offset, conversion.max_conversion_length());
                if tail.is_empty() {
                    break;
                }
                offset += conversion.find_conversion(tail).map_or(0, |(_, n)| n);
            }
        }

        match length {
            DelimitedLength::Decoded => decoded,
            DelimitedLength::Encoded => offset - start + delimiter.len() + 1,
        }
    }

    /// Reads one possibly escaped byte, or zero when the data is exhausted.
    pub fn get_delimited_char(&mut self, conversion: &CharConversion) -> u8 {
        if !self.is_text() {
            return self.get_char();
        }
        self.get_unescaped(conversion).unwrap_or(0)
    }

    fn get_unescaped(&mut self, conversion: &CharConversion) -> Option<u8> {
        let mut c = [0u8];
        if !self.get(&mut c) {
            return None;
        }
        let [c] = c;
        if c != conversion.escape_byte() || conversion.max_conversion_length() == 0 {
            return Some(c);
        }

        // Unknown escapes stand for themselves.
        match conversion.find_conversion(self.arbitrary_peek(0, conversion.max_conversion_length())) {
            Some((actual, n)) => {
                self.skip_checked(n);
                Some(actual)
            }
            None => Some(c),
        }
    }

    /// Reads a delimited string, unescaping it. Leading whitespace is
    /// skipped; without an opening delimiter nothing is consumed past it.
    ///
    /// At most `max_chars - 1` bytes are returned, but the whole string is
    /// consumed. Zero means no limit. A string that runs off the end of the
    /// data latches the get error.
    pub fn get_delimited_string(&mut self, conversion: &CharConversion, max_chars: usize) -> BString {
        if !self.is_text() {
            return self.get_string(max_chars);
        }
        if !self.is_valid() {
            return BString::default();
        }

        let limit = if max_chars == 0 { usize::MAX } else { max_chars - 1 };
        let delimiter = conversion.delimiter();
        self.eat_whitespace();
        if !self.peek_string_match(0, delimiter) {
            return BString::default();
        }
        self.skip_checked(delimiter.len());

        let mut s = BString::default();
        while self.is_valid() {
            if self.peek_string_match(0, delimiter) {
                self.skip_checked(delimiter.len());
                break;
            }
            let Some(c) = self.get_unescaped(conversion) else {
                break;
            };
            if s.len() < limit {
                s.push(c);
            }
        }
        s
    }
}
