use alloc::vec::Vec;

use quickcheck::{QuickCheck, TestResult};

use super::property_tests;
use crate::{Buffer, BufferOptions, C_STRING, NO_ESCAPE, SeekFrom};

/// Property: bytes written to a fresh buffer read back unchanged, whatever
/// the growth policy and however the reads are chunked.
#[test]
fn put_get_roundtrip_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(bytes: Vec<u8>, grow_size: u8, init_size: u8, splits: Vec<usize>) -> bool {
        let mut buffer = Buffer::with_growth(usize::from(grow_size), usize::from(init_size), BufferOptions::default());
        buffer.put(&bytes);
        buffer.seek_get(SeekFrom::Head(0));

        let mut out = Vec::with_capacity(bytes.len());
        let mut remaining = bytes.len();
        for s in splits {
            if remaining == 0 {
                break;
            }
            let mut chunk = alloc::vec![0; 1 + s % remaining];
            if !buffer.get(&mut chunk) {
                return false;
            }
            remaining -= chunk.len();
            out.extend_from_slice(&chunk);
        }
        let mut rest = alloc::vec![0; remaining];
        buffer.get(&mut rest);
        out.extend_from_slice(&rest);

        out == bytes && buffer.is_valid() && buffer.tell_max_put() == bytes.len()
    }

    QuickCheck::new()
        .tests(property_tests())
        .quickcheck(prop as fn(Vec<u8>, u8, u8, Vec<usize>) -> bool);
}

/// Property: a failed read latches, reads nothing, and stays latched until a
/// seek lands in bounds.
#[test]
fn failed_get_latches_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(bytes: Vec<u8>, extra: u8) -> bool {
        let mut buffer = Buffer::new(BufferOptions::default());
        buffer.put(&bytes);

        let mut too_many = alloc::vec![0; bytes.len() + 1 + usize::from(extra)];
        let mut one = [0u8];
        let failed = !buffer.get(&mut too_many) && !buffer.is_valid();
        let still_latched = !buffer.get(&mut one) && buffer.tell_get() == 0;
        buffer.seek_get(SeekFrom::Head(0));
        failed && still_latched && buffer.is_valid()
    }

    QuickCheck::new()
        .tests(property_tests())
        .quickcheck(prop as fn(Vec<u8>, u8) -> bool);
}

/// Property: C string escaping decodes to the original bytes, for any bytes.
#[test]
fn c_string_codec_roundtrip_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(bytes: Vec<u8>, prefix_spaces: u8) -> bool {
        let mut buffer = Buffer::new(BufferOptions::text());
        for _ in 0..prefix_spaces % 4 {
            buffer.put_char(b' ');
        }
        buffer.put_delimited_string(&C_STRING, &bytes);
        buffer.put_string(" trailer");

        let encoded = buffer.peek_delimited_string_length(&C_STRING, crate::DelimitedLength::Encoded);
        let decoded = buffer.peek_delimited_string_length(&C_STRING, crate::DelimitedLength::Decoded);
        let value = buffer.get_delimited_string(&C_STRING, 0);

        value == bytes
            && decoded == bytes.len() + 1
            && encoded == buffer.tell_get() - usize::from(prefix_spaces % 4) + 1
            && buffer.get_string(0) == "trailer"
    }

    QuickCheck::new()
        .tests(property_tests())
        .quickcheck(prop as fn(Vec<u8>, u8) -> bool);
}

/// Property: the non-escaping table round-trips anything without a quote.
#[test]
fn no_escape_codec_roundtrip_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(bytes: Vec<u8>) -> TestResult {
        if bytes.contains(&b'"') {
            return TestResult::discard();
        }
        let mut buffer = Buffer::new(BufferOptions::text());
        buffer.put_delimited_string(&NO_ESCAPE, &bytes);
        TestResult::from_bool(buffer.get_delimited_string(&NO_ESCAPE, 0) == bytes)
    }

    QuickCheck::new()
        .tests(property_tests())
        .quickcheck(prop as fn(Vec<u8>) -> TestResult);
}

/// Property: LF to CRLF and back reproduces the bytes and both cursors.
#[test]
fn crlf_roundtrip_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(bytes: Vec<u8>, get: usize, put: usize) -> bool {
        let mut source = Buffer::new(BufferOptions::text());
        source.put(&bytes);
        let get = get % (bytes.len() + 1);
        let put = put % (bytes.len() + 1);
        source.seek_get(SeekFrom::Head(get));
        source.seek_put(SeekFrom::Head(put));

        let mut dos = Buffer::new(BufferOptions::text_crlf());
        let mut unix = Buffer::new(BufferOptions::text());
        if !source.convert_crlf(&mut dos) || !dos.convert_crlf(&mut unix) {
            return false;
        }

        let newlines = bytes.iter().filter(|b| **b == b'\n').count();
        dos.tell_max_put() == bytes.len() + newlines
            && unix.base() == source.base()
            && unix.tell_get() == get
            && unix.tell_put() == put
    }

    QuickCheck::new()
        .tests(property_tests())
        .quickcheck(prop as fn(Vec<u8>, usize, usize) -> bool);
}
