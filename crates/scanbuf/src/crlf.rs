use bstr::ByteSlice;

use crate::{Buffer, SeekFrom, overflow::Overflow};

impl<O: Overflow> Buffer<'_, O> {
    /// Rewrites this text buffer into `out` with the line endings `out`
    /// declares, LF to CRLF or the reverse.
    ///
    /// `out` is purged first. Its get and put cursors land on the same
    /// characters the cursors of this buffer point at. Returns `false`, and
    /// leaves `out` untouched, when either buffer is binary, both use the
    /// same convention, or this buffer is not fully resident.
    ///
    /// ```rust
    /// use scanbuf::{Buffer, BufferOptions};
    ///
    /// let mut unix = Buffer::new(BufferOptions::text());
    /// unix.put_string("one\ntwo\n");
    ///
    /// let mut dos = Buffer::new(BufferOptions::text_crlf());
    /// assert!(unix.convert_crlf(&mut dos));
    /// assert_eq!(dos.base(), b"one\r\ntwo\r\n");
    /// ```
    pub fn convert_crlf<P: Overflow>(&self, out: &mut Buffer<'_, P>) -> bool {
        if !self.is_text() || !out.is_text() || self.contains_crlf() == out.contains_crlf() {
            return false;
        }

        let source = self.base();
        if self.window_base() != 0 || source.len() != self.tell_max_put() {
            return false;
        }

        out.purge();
        out.ensure_capacity(source.len());

        let from_crlf = self.contains_crlf();
        let (get, put) = (self.tell_get(), self.tell_put());
        // Line endings rewritten before each cursor.
        let (mut get_shift, mut put_shift) = (0, 0);

        let mut rest = source;
        let mut consumed = 0;
        loop {
            let (found, ending_len) = if from_crlf {
                (rest.find(b"\r\n"), 2)
            } else {
                (rest.find_byte(b'\n'), 1)
            };
            let Some(at) = found else {
                out.put(rest);
                break;
            };

            out.put(&rest[..at]);
            out.put(if from_crlf { &b"\n"[..] } else { &b"\r\n"[..] });
            consumed += at + ending_len;
            rest = &rest[at + ending_len..];

            // A cursor on the `\n` of a CRLF pair moves back onto the lone
            // `\n`; one on a lone `\n` moves onto the `\r` that replaces it.
            let boundary = if from_crlf { consumed - 1 } else { consumed };
            if get >= boundary {
                get_shift += 1;
            }
            if put >= boundary {
                put_shift += 1;
            }
        }

        let shift = |pos: usize, n: usize| if from_crlf { pos - n } else { pos + n };
        tracing::debug!(
            from_crlf,
            input = source.len(),
            output = out.tell_max_put(),
            "converted line endings"
        );
        out.seek_get(SeekFrom::Head(shift(get, get_shift)));
        out.seek_put(SeekFrom::Head(shift(put, put_shift)));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BufferOptions;

    fn lf(s: &str) -> Buffer<'static> {
        let mut buffer = Buffer::new(BufferOptions::text());
        buffer.put_string(s);
        buffer
    }

    #[test]
    fn lf_to_crlf_moves_cursors_with_text() {
        let mut source = lf("a\nb\nc");
        source.seek_get(SeekFrom::Head(2));
        source.seek_put(SeekFrom::Head(4));

        let mut out = Buffer::new(BufferOptions::text_crlf());
        assert!(source.convert_crlf(&mut out));
        assert_eq!(out.base(), b"a\r\nb\r\nc");
        assert_eq!(out.tell_get(), 3);
        assert_eq!(out.tell_put(), 6);
        assert_eq!(out.peek_byte(0), Some(b'b'));
    }

    #[test]
    fn round_trip_restores_bytes_and_cursors() {
        let mut source = lf("x\n\ny\n");
        source.seek_get(SeekFrom::Head(1));

        let mut dos = Buffer::new(BufferOptions::text_crlf());
        assert!(source.convert_crlf(&mut dos));
        assert_eq!(dos.tell_get(), 1);

        let mut unix = Buffer::new(BufferOptions::text());
        assert!(dos.convert_crlf(&mut unix));
        assert_eq!(unix.base(), source.base());
        assert_eq!(unix.tell_get(), 1);
        assert_eq!(unix.tell_put(), source.tell_put());
    }

    #[test]
    fn lone_cr_is_kept() {
        let mut source = Buffer::new(BufferOptions::text_crlf());
        source.put_string("a\rb\r\n");
        let mut out = Buffer::new(BufferOptions::text());
        assert!(source.convert_crlf(&mut out));
        assert_eq!(out.base(), b"a\rb\n");
    }

    #[test]
    fn same_convention_is_refused() {
        let source = lf("a\n");
        let mut out = lf("keep");
        assert!(!source.convert_crlf(&mut out));
        assert_eq!(out.base(), b"keep");

        let binary = Buffer::new(BufferOptions::default());
        let mut out = Buffer::new(BufferOptions::text_crlf());
        assert!(!binary.convert_crlf(&mut out));
    }
}
