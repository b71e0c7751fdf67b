//! `scanf`-style extraction from text buffers.

use alloc::vec::Vec;

use bstr::BString;

use crate::{Buffer, error::ErrorFlags, overflow::Overflow};

/// One value extracted by [`Buffer::scan`].
#[derive(Debug, Clone, PartialEq)]
pub enum Scanned {
    /// `%c`
    Char(u8),
    /// `%hd`
    I16(i16),
    /// `%hu`
    U16(u16),
    /// `%d`, `%i`
    I32(i32),
    /// `%u`, `%x`
    U32(u32),
    /// `%I64d`, `%lld`
    I64(i64),
    /// `%I64u`
    U64(u64),
    /// `%f`
    F32(f32),
    /// `%lf`
    F64(f64),
    /// `%s`
    Str(BString),
}

impl<O: Overflow> Buffer<'_, O> {
    /// Extracts values from text according to `format`.
    ///
    /// A space in the format skips any whitespace; any other literal byte
    /// must match the input exactly. Supported conversions are `%c`, `%hd`,
    /// `%hu`, `%d`, `%i`, `%u`, `%x`, `%I64d`, `%I64u`, `%lld`, `%f`, `%lf`
    /// and `%s`. Scanning stops at the first mismatch or failed conversion;
    /// the values converted until then are returned, so callers compare the
    /// length with the number they expect.
    ///
    /// Running out of input while format remains latches the get error.
    ///
    /// ```rust
    /// use scanbuf::{Buffer, BufferOptions, Scanned};
    ///
    /// let mut buffer = Buffer::read_only(b"size 12x34", BufferOptions::text());
    /// assert_eq!(
    ///     buffer.scan("size %dx%d"),
    ///     [Scanned::I32(12), Scanned::I32(34)]
    /// );
    /// ```
    pub fn scan(&mut self, format: impl AsRef<[u8]>) -> Vec<Scanned> {
        let mut scanned = Vec::new();
        if !self.is_valid() || !self.is_text() {
            return scanned;
        }

        let mut format = format.as_ref();
        while let Some((&c, rest)) = format.split_first() {
            format = rest;
            if self.bytes_remaining() == 0 {
                self.latch(ErrorFlags::GET_OVERFLOW);
                break;
            }

            match c {
                b' ' => self.eat_whitespace(),
                b'%' => {
                    let Some(value) = self.scan_conversion(&mut format) else {
                        break;
                    };
                    scanned.push(value);
                }
                literal => {
                    if self.peek_byte(0) != Some(literal) {
                        break;
                    }
                    self.skip_checked(1);
                }
            }
        }
        scanned
    }

    /// Performs the conversion at the start of `format` (just past the `%`),
    /// consuming its specifier.
    fn scan_conversion(&mut self, format: &mut &[u8]) -> Option<Scanned> {
        let (&kind, rest) = format.split_first()?;
        *format = rest;

        let value = match kind {
            b'c' => Scanned::Char(self.take_byte()?),
            b'h' => match take(format, &["d", "i", "u"])? {
                "u" => Scanned::U16(self.get_text(10)?),
                _ => Scanned::I16(self.get_text(10)?),
            },
            b'I' => match take(format, &["64d", "64u"])? {
                "64u" => Scanned::U64(self.get_text(10)?),
                _ => Scanned::I64(self.get_text(10)?),
            },
            b'l' => match take(format, &["f", "ld"])? {
                "f" => Scanned::F64(self.get_text(10)?),
                _ => Scanned::I64(self.get_text(10)?),
            },
            b'd' | b'i' => Scanned::I32(self.get_text(10)?),
            b'u' => Scanned::U32(self.get_text(10)?),
            b'x' => Scanned::U32(self.get_text(16)?),
            b'f' => Scanned::F32(self.get_text(10)?),
            b's' => {
                let s = self.get_string(0);
                if !self.is_valid() {
                    return None;
                }
                Scanned::Str(s)
            }
            _ => return None,
        };
        Some(value)
    }
}

/// Consumes whichever of `options` `format` starts with.
fn take(format: &mut &[u8], options: &[&'static str]) -> Option<&'static str> {
    let found = options
        .iter()
        .copied()
        .find(|option| format.starts_with(option.as_bytes()))?;
    *format = &format[found.len()..];
    Some(found)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::BufferOptions;

    fn scan(input: &str, format: &str) -> Vec<Scanned> {
        Buffer::read_only(input.as_bytes(), BufferOptions::text()).scan(format)
    }

    #[test]
    fn counts_successful_conversions() {
        assert_eq!(scan("12,34", "%d,%d"), [Scanned::I32(12), Scanned::I32(34)]);
        assert_eq!(scan("12;34", "%d,%d"), [Scanned::I32(12)]);
    }

    #[rstest]
    #[case("-7", "%hd", Scanned::I16(-7))]
    #[case("65535", "%hu", Scanned::U16(u16::MAX))]
    #[case("-9000000000", "%I64d", Scanned::I64(-9_000_000_000))]
    #[case("18446744073709551615", "%I64u", Scanned::U64(u64::MAX))]
    #[case("-9000000000", "%lld", Scanned::I64(-9_000_000_000))]
    #[case("ff", "%x", Scanned::U32(0xff))]
    #[case("0x1F", "%x", Scanned::U32(0x1f))]
    #[case("2.5", "%f", Scanned::F32(2.5))]
    #[case("1e3", "%lf", Scanned::F64(1000.0))]
    #[case("z", "%c", Scanned::Char(b'z'))]
    #[case("  word rest", "%s", Scanned::Str("word".into()))]
    fn conversions(#[case] input: &str, #[case] format: &str, #[case] expected: Scanned) {
        assert_eq!(scan(input, format), [expected]);
    }

    #[test]
    fn conversions_after_long_modifiers_continue() {
        assert_eq!(
            scan("1.5 2 3", "%lf %lld %d"),
            [Scanned::F64(1.5), Scanned::I64(2), Scanned::I32(3)]
        );
    }

    #[test]
    fn spaces_skip_any_whitespace() {
        assert_eq!(scan("a   \n 5", "a %u"), [Scanned::U32(5)]);
    }

    #[test]
    fn literals_are_case_sensitive() {
        assert!(scan("X=1", "x=%d").is_empty());
    }

    #[test]
    fn failed_conversion_stops() {
        assert_eq!(scan("1 two 3", "%d %d %d"), [Scanned::I32(1)]);
        assert!(scan("1", "%q").is_empty());
        assert!(scan("1", "%h").is_empty());
    }

    #[test]
    fn exhausted_input_latches() {
        let mut buffer = Buffer::read_only(b"5", BufferOptions::text());
        assert_eq!(buffer.scan("%d %d"), [Scanned::I32(5)]);
        assert!(!buffer.is_valid());
        assert!(buffer.scan("%d").is_empty());
    }

    #[test]
    fn binary_buffers_scan_nothing() {
        let mut buffer = Buffer::read_only(b"5", BufferOptions::default());
        assert!(buffer.scan("%d").is_empty());
        assert!(buffer.is_valid());
    }
}
