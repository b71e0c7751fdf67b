//! Splitting a string on literal separators.

use alloc::vec::Vec;
use core::ops::Range;

use bstr::{BStr, BString, ByteSlice};

use crate::scanner::find_ignore_ascii_case;

/// The non-empty pieces of a string between separator matches.
///
/// The text is copied once and every piece borrows from that copy.
/// Separators match case-insensitively (ASCII); at each step the earliest
/// match wins, and among matches at the same position the separator listed
/// first wins. Empty separators are ignored.
///
/// ```rust
/// use scanbuf::SplitString;
///
/// let parts = SplitString::new("a, b;;c", &[", ", ";"]);
/// assert_eq!(parts.iter().collect::<Vec<_>>(), ["a", "b", "c"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitString {
    text: BString,
    pieces: Vec<Range<usize>>,
}

impl SplitString {
    pub fn new<S: AsRef<[u8]>>(text: impl Into<BString>, separators: &[S]) -> Self {
        let text = text.into();
        let mut pieces = Vec::new();
        let mut at = 0;

        loop {
            let rest = &text[at..];
            let next = separators
                .iter()
                .map(<S as AsRef<[u8]>>::as_ref)
                .filter(|separator| !separator.is_empty())
                .filter_map(|separator| find_ignore_ascii_case(rest, separator).map(|i| (i, separator.len())))
                .min_by_key(|&(i, _)| i);

            let end = next.map_or(text.len(), |(i, _)| at + i);
            if end > at {
                pieces.push(at..end);
            }
            match next {
                Some((i, len)) => at += i + len,
                None => break,
            }
        }

        Self { text, pieces }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&BStr> {
        let range = self.pieces.get(index)?;
        Some(self.text[range.clone()].as_bstr())
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &BStr> + '_ {
        self.pieces.iter().map(|range| self.text[range.clone()].as_bstr())
    }
}
