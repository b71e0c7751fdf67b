#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use scanbuf::{Buffer, BufferOptions, C_STRING, CharacterSet, NO_ESCAPE, Overflow, SeekFrom, SliceStream};

const BREAK_CANDIDATES: &[u8] = b"=,;{}()";

#[derive(Debug, Arbitrary)]
enum Op {
    Token { breaks: u8, comments: bool },
    Find { token: Vec<u8> },
    Seek(u16),
    Line,
    Word,
    Delimited,
    Number,
    Scan,
}

#[derive(Debug, Arbitrary)]
struct Input {
    window: u8,
    text: Vec<u8>,
    ops: Vec<Op>,
}

fn break_set(mask: u8) -> CharacterSet {
    let mut set = CharacterSet::empty();
    for (i, &b) in BREAK_CANDIDATES.iter().enumerate() {
        if mask & (1 << i) != 0 {
            set.insert(b);
        }
    }
    set
}

/// Runs an operation whose outcome must not depend on the window size.
fn windowed_op<O: Overflow>(buffer: &mut Buffer<'_, O>, op: &Op, window: usize) -> Option<Vec<u8>> {
    match op {
        Op::Token { breaks, comments } => buffer
            .parse_token(&break_set(*breaks), 64, *comments)
            .map(Vec::from),
        Op::Find { token } => {
            let token = &token[..token.len().min(window - 1)];
            if token.is_empty() {
                return None;
            }
            Some(vec![u8::from(buffer.find_token(token))])
        }
        Op::Seek(pos) => {
            buffer.seek_get(SeekFrom::Head(usize::from(*pos)));
            None
        }
        _ => None,
    }
}

fn any_op(buffer: &mut Buffer<'_>, op: &Op) {
    match op {
        Op::Token { breaks, comments } => {
            buffer.parse_token(&break_set(*breaks), 64, *comments);
        }
        Op::Find { token } if !token.is_empty() => {
            buffer.find_token(token);
        }
        Op::Find { .. } => {}
        Op::Seek(pos) => buffer.seek_get(SeekFrom::Head(usize::from(*pos))),
        Op::Line => {
            buffer.get_line(0);
        }
        Op::Word => {
            buffer.get_string(16);
        }
        Op::Delimited => {
            buffer.get_delimited_string(&C_STRING, 32);
        }
        Op::Number => {
            buffer.get_text::<i64>(10);
        }
        Op::Scan => {
            buffer.scan("%d %s %lf");
        }
    }
}

fn scanner(input: &Input) {
    let window = 2 + usize::from(input.window % 64);
    let text = &input.text;

    let mut plain = Buffer::read_only(text, BufferOptions::text());
    let mut stream = SliceStream::new(text).into_buffer(window, BufferOptions::text());
    for op in &input.ops {
        let expected = windowed_op(&mut plain, op, window);
        let actual = windowed_op(&mut stream, op, window);
        assert_eq!(expected, actual, "{op:?} through a window of {window}");
        assert_eq!(plain.tell_get(), stream.tell_get());
    }

    let mut plain = Buffer::read_only(text, BufferOptions::text());
    for op in &input.ops {
        any_op(&mut plain, op);
    }

    for conversion in [&C_STRING, &NO_ESCAPE] {
        if std::ptr::eq(conversion, &NO_ESCAPE) && text.contains(&b'"') {
            continue;
        }
        let mut encoded = Buffer::new(BufferOptions::text());
        encoded.put_delimited_string(conversion, text);
        assert_eq!(encoded.get_delimited_string(conversion, 0), text.as_slice());
    }
}

fuzz_target!(|input: Input| scanner(&input));
