//! Prefix scanning of numbers in text, with `strtol`/`strtod` semantics.

use crate::charset::is_space;

/// Numbers a text buffer can parse.
///
/// `scan_text` skips leading whitespace and reads the longest number-shaped
/// prefix of `bytes`, returning the value and the number of bytes consumed
/// (whitespace included). `radix` is honoured by the integer types and
/// ignored by the floating-point types.
pub trait TextNumber: Sized {
    fn scan_text(bytes: &[u8], radix: u32) -> Option<(Self, usize)>;
}

struct IntegerPrefix {
    negative: bool,
    magnitude: u64,
    overflowed: bool,
    end: usize,
}

fn skip_spaces(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| is_space(**b)).count()
}

fn scan_integer(bytes: &[u8], radix: u32) -> Option<IntegerPrefix> {
    debug_assert!((2..=36).contains(&radix));
    let mut i = skip_spaces(bytes);
    let mut negative = false;
    match bytes.get(i) {
        Some(b'-') => {
            negative = true;
            i += 1;
        }
        Some(b'+') => i += 1,
        _ => {}
    }

    if radix == 16
        && matches!(bytes.get(i..i + 2), Some(b"0x" | b"0X"))
        && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit)
    {
        i += 2;
    }

    let digits_start = i;
    let mut magnitude = 0u64;
    let mut overflowed = false;
    while let Some(digit) = bytes.get(i).and_then(|b| char::from(*b).to_digit(radix)) {
        match magnitude
            .checked_mul(u64::from(radix))
            .and_then(|m| m.checked_add(u64::from(digit)))
        {
            Some(m) => magnitude = m,
            None => overflowed = true,
        }
        i += 1;
    }

    (i > digits_start).then_some(IntegerPrefix {
        negative,
        magnitude,
        overflowed,
        end: i,
    })
}

macro_rules! signed_text_number {
    ($($ty:ty),*) => {
        $(
            impl TextNumber for $ty {
                fn scan_text(bytes: &[u8], radix: u32) -> Option<(Self, usize)> {
                    let prefix = scan_integer(bytes, radix)?;
                    let saturated = if prefix.negative { <$ty>::MIN } else { <$ty>::MAX };
                    let value = if prefix.overflowed {
                        saturated
                    } else {
                        let wide = i128::from(prefix.magnitude);
                        let wide = if prefix.negative { -wide } else { wide };
                        <$ty>::try_from(wide).unwrap_or(saturated)
                    };
                    Some((value, prefix.end))
                }
            }
        )*
    };
}

macro_rules! unsigned_text_number {
    ($($ty:ty),*) => {
        $(
            impl TextNumber for $ty {
                fn scan_text(bytes: &[u8], radix: u32) -> Option<(Self, usize)> {
                    let prefix = scan_integer(bytes, radix)?;
                    let value = if prefix.overflowed {
                        <$ty>::MAX
                    } else {
                        <$ty>::try_from(prefix.magnitude).unwrap_or(<$ty>::MAX)
                    };
                    // strtoul negates in the unsigned domain
                    let value = if prefix.negative { value.wrapping_neg() } else { value };
                    Some((value, prefix.end))
                }
            }
        )*
    };
}

signed_text_number!(i8, i16, i32, i64);
unsigned_text_number!(u8, u16, u32, u64);

fn scan_float(bytes: &[u8]) -> Option<(f64, usize)> {
    let start = skip_spaces(bytes);
    let mut i = start;
    if matches!(bytes.get(i), Some(b'-' | b'+')) {
        i += 1;
    }

    let digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let integral = digits(i);
    i += integral;
    let mut fraction = 0;
    if bytes.get(i) == Some(&b'.') {
        fraction = digits(i + 1);
        if integral > 0 || fraction > 0 {
            i += 1 + fraction;
        }
    }
    if integral == 0 && fraction == 0 {
        return None;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'-' | b'+')) {
            j += 1;
        }
        let exponent = digits(j);
        if exponent > 0 {
            i = j + exponent;
        }
    }

    let text = core::str::from_utf8(&bytes[start..i]).ok()?;
    let value = text.parse::<f64>().ok()?;
    Some((value, i))
}

impl TextNumber for f64 {
    fn scan_text(bytes: &[u8], _radix: u32) -> Option<(Self, usize)> {
        scan_float(bytes)
    }
}

impl TextNumber for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn scan_text(bytes: &[u8], _radix: u32) -> Option<(Self, usize)> {
        scan_float(bytes).map(|(v, n)| (v as f32, n))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(b"42", 42, 2)]
    #[case(b"  -17 rest", -17, 5)]
    #[case(b"+8,", 8, 2)]
    #[case(b"99999999999", i32::MAX, 11)]
    #[case(b"-99999999999", i32::MIN, 12)]
    fn signed_prefixes(#[case] input: &[u8], #[case] value: i32, #[case] consumed: usize) {
        assert_eq!(i32::scan_text(input, 10), Some((value, consumed)));
    }

    #[rstest]
    #[case(b"ff", 0xff, 2)]
    #[case(b"0x1A;", 0x1a, 4)]
    #[case(b" DEADbeef", 0xdead_beef, 9)]
    fn hex_prefixes(#[case] input: &[u8], #[case] value: u32, #[case] consumed: usize) {
        assert_eq!(u32::scan_text(input, 16), Some((value, consumed)));
    }

    #[test]
    fn hex_prefix_without_digits_reads_zero() {
        assert_eq!(u32::scan_text(b"0xg", 16), Some((0, 1)));
    }

    #[test]
    fn unsigned_negative_wraps() {
        assert_eq!(u16::scan_text(b"-1", 10), Some((u16::MAX, 2)));
    }

    #[test]
    fn no_digits_is_none() {
        assert_eq!(i64::scan_text(b"  -x", 10), None);
        assert_eq!(u8::scan_text(b"", 10), None);
        assert_eq!(f64::scan_text(b".", 10), None);
    }

    #[rstest]
    #[case(b"1.5", 1.5, 3)]
    #[case(b" -2.25e2x", -225.0, 8)]
    #[case(b"3e", 3.0, 1)]
    #[case(b".5 ", 0.5, 2)]
    #[case(b"7.", 7.0, 2)]
    fn float_prefixes(#[case] input: &[u8], #[case] value: f64, #[case] consumed: usize) {
        let (v, n) = f64::scan_text(input, 10).unwrap();
        assert!((v - value).abs() < f64::EPSILON, "{v} != {value}");
        assert_eq!(n, consumed);
    }
}
