/// `isspace` in the C locale: space, `\t`, `\n`, `\v`, `\f`, `\r`.
#[inline]
#[must_use]
pub const fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

/// A set of byte values, used as the break set of
/// [`Buffer::parse_token`](crate::Buffer::parse_token).
///
/// ```rust
/// use scanbuf::CharacterSet;
///
/// const BREAKS: CharacterSet = CharacterSet::new(b"{}()',=");
/// assert!(BREAKS.contains(b'='));
/// assert!(!BREAKS.contains(b'a'));
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CharacterSet {
    bits: [u64; 4],
}

impl CharacterSet {
    /// Builds a set containing every byte of `members`.
    #[must_use]
    pub const fn new(members: &[u8]) -> Self {
        let mut bits = [0u64; 4];
        let mut i = 0;
        while i < members.len() {
            let b = members[i] as usize;
            bits[b >> 6] |= 1 << (b & 63);
            i += 1;
        }
        Self { bits }
    }

    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self { bits: [0; 4] }
    }

    #[inline]
    #[must_use]
    pub const fn contains(&self, b: u8) -> bool {
        let b = b as usize;
        self.bits[b >> 6] & (1 << (b & 63)) != 0
    }

    pub fn insert(&mut self, b: u8) {
        let b = b as usize;
        self.bits[b >> 6] |= 1 << (b & 63);
    }
}

impl core::fmt::Debug for CharacterSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let members = (0..=255u8).filter(|b| self.contains(*b));
        f.debug_set()
            .entries(members.map(|b| core::ascii::escape_default(b)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_covers_all_words() {
        let set = CharacterSet::new(&[0, 63, 64, 127, 128, 255]);
        for b in [0u8, 63, 64, 127, 128, 255] {
            assert!(set.contains(b), "{b} missing");
        }
        assert!(!set.contains(1));
        assert!(!set.contains(254));
    }

    #[test]
    fn c_locale_whitespace() {
        let spaces: alloc::vec::Vec<u8> = (0..=255u8).filter(|b| is_space(*b)).collect();
        assert_eq!(spaces, b"\t\n\x0B\x0C\r ");
    }
}
