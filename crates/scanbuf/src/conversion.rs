//! Escape tables for delimited strings.
//!
//! A [`CharConversion`] names a delimiter, an escape byte, and a list of
//! `(actual, replacement)` pairs. Encoding writes `escape` followed by the
//! replacement for every byte that has one; decoding maps the bytes after an
//! escape back to the actual byte.

use core::fmt;

/// How replacements are recognised when decoding.
#[derive(Clone, Copy)]
enum Lookup {
    /// Try each pair in declaration order; replacements may be any length.
    Linear,
    /// Single-byte replacements indexed by the replacement byte.
    Table([Option<u8>; 256]),
    /// Nothing after an escape is ever a replacement.
    NoEscape,
}

/// A character escaping scheme for delimited strings.
///
/// Tables are built in `const` context and shared by reference.
///
/// ```rust
/// use scanbuf::{CharConversion, C_STRING};
///
/// static SQL: CharConversion = CharConversion::new(b'\'', "'", &[(b'\'', "'")]);
///
/// assert_eq!(SQL.conversion(b'\''), Some(&b"'"[..]));
/// assert_eq!(C_STRING.find_conversion(b"n..."), Some((b'\n', 1)));
/// ```
pub struct CharConversion {
    escape: u8,
    delimiter: &'static [u8],
    pairs: &'static [(u8, &'static str)],
    replacements: [Option<&'static [u8]>; 256],
    max_conversion_length: usize,
    lookup: Lookup,
}

impl CharConversion {
    /// A table whose replacements may be any length.
    ///
    /// # Panics
    ///
    /// Panics if `delimiter` is empty or a byte is listed twice.
    #[must_use]
    pub const fn new(escape: u8, delimiter: &'static str, pairs: &'static [(u8, &'static str)]) -> Self {
        assert!(!delimiter.is_empty(), "a delimited string needs a delimiter");

        let mut replacements = [None; 256];
        let mut max_conversion_length = 0;
        let mut i = 0;
        while i < pairs.len() {
            let (actual, replacement) = pairs[i];
            let replacement = replacement.as_bytes();
            assert!(replacements[actual as usize].is_none(), "byte listed twice");
            replacements[actual as usize] = Some(replacement);
            if replacement.len() > max_conversion_length {
                max_conversion_length = replacement.len();
            }
            i += 1;
        }

        Self {
            escape,
            delimiter: delimiter.as_bytes(),
            pairs,
            replacements,
            max_conversion_length,
            lookup: Lookup::Linear,
        }
    }

    /// A table whose replacements are all one byte long, decoded by direct
    /// lookup.
    ///
    /// # Panics
    ///
    /// Panics under the conditions of [`new`](Self::new), or if a replacement
    /// is not exactly one byte.
    #[must_use]
    pub const fn single_byte(escape: u8, delimiter: &'static str, pairs: &'static [(u8, &'static str)]) -> Self {
        let mut conversion = Self::new(escape, delimiter, pairs);
        let mut table = [None; 256];
        let mut i = 0;
        while i < pairs.len() {
            let (actual, replacement) = pairs[i];
            assert!(replacement.len() == 1, "replacement must be a single byte");
            table[replacement.as_bytes()[0] as usize] = Some(actual);
            i += 1;
        }
        conversion.lookup = Lookup::Table(table);
        conversion
    }

    /// A table that escapes on write but never recognises a replacement on
    /// read.
    ///
    /// # Panics
    ///
    /// Panics under the conditions of [`new`](Self::new).
    #[must_use]
    pub const fn no_escape(escape: u8, delimiter: &'static str, pairs: &'static [(u8, &'static str)]) -> Self {
        let mut conversion = Self::new(escape, delimiter, pairs);
        conversion.lookup = Lookup::NoEscape;
        conversion
    }

    #[must_use]
    pub const fn escape_byte(&self) -> u8 {
        self.escape
    }

    #[must_use]
    pub const fn delimiter(&self) -> &'static [u8] {
        self.delimiter
    }

    /// Length of the longest replacement.
    #[must_use]
    pub const fn max_conversion_length(&self) -> usize {
        self.max_conversion_length
    }

    /// The replacement written after the escape byte for `actual`, if it
    /// needs escaping.
    #[must_use]
    pub const fn conversion(&self, actual: u8) -> Option<&'static [u8]> {
        self.replacements[actual as usize]
    }

    /// Recognises the replacement at the start of `input` (the bytes after an
    /// escape) and returns the byte it stands for with the replacement length.
    #[must_use]
    pub fn find_conversion(&self, input: &[u8]) -> Option<(u8, usize)> {
        match &self.lookup {
            Lookup::Linear => self.pairs.iter().find_map(|&(actual, replacement)| {
                input
                    .starts_with(replacement.as_bytes())
                    .then_some((actual, replacement.len()))
            }),
            Lookup::Table(table) => {
                let actual = table[usize::from(*input.first()?)]?;
                Some((actual, 1))
            }
            Lookup::NoEscape => None,
        }
    }
}

impl fmt::Debug for CharConversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lookup = match self.lookup {
            Lookup::Linear => "linear",
            Lookup::Table(_) => "table",
            Lookup::NoEscape => "no-escape",
        };
        f.debug_struct("CharConversion")
            .field("escape", &char::from(self.escape))
            .field("delimiter", &bstr::BStr::new(self.delimiter))
            .field("pairs", &self.pairs)
            .field("lookup", &lookup)
            .finish()
    }
}

/// C string literal escapes inside double quotes.
pub static C_STRING: CharConversion = CharConversion::single_byte(
    b'\\',
    "\"",
    &[
        (b'\n', "n"),
        (b'\t', "t"),
        (0x0B, "v"),
        (0x08, "b"),
        (b'\r', "r"),
        (0x0C, "f"),
        (0x07, "a"),
        (b'\\', "\\"),
        (b'?', "?"),
        (b'\'', "'"),
        (b'"', "\""),
    ],
);

/// Double quotes with no escaping on read. The DEL byte is the nominal escape
/// and stands for itself.
pub static NO_ESCAPE: CharConversion = CharConversion::no_escape(0x7F, "\"", &[(0x7F, "")]);
