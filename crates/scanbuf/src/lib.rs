//! A byte buffer for serialization in binary or human-readable text form.
//!
//! [`Buffer`] keeps independent get and put cursors over a byte stream,
//! grows on demand, and reports failures through sticky error latches rather
//! than per-call results. Reads and writes that fall outside the resident
//! window go to a pluggable [`Overflow`] policy, which is how streaming
//! sources such as [`SliceStream`] feed a buffer one window at a time.
//!
//! Text buffers add scanning on top: whitespace and comment skipping,
//! tokenizing, case-insensitive search, delimited strings with escapes
//! ([`CharConversion`]), line ending conversion and a small `scanf`.
//!
//! ```rust
//! use scanbuf::{Buffer, BufferOptions, C_STRING, CharacterSet};
//!
//! let mut out = Buffer::new(BufferOptions::text());
//! out.put_string("name = ");
//! out.put_delimited_string(&C_STRING, "a \"quoted\" value");
//!
//! let mut input = Buffer::read_only(out.base(), BufferOptions::text());
//! let breaks = CharacterSet::new(b"=");
//! assert_eq!(input.parse_token(&breaks, 64, false).unwrap(), "name");
//! assert_eq!(input.parse_token(&breaks, 64, false).unwrap(), "=");
//! assert_eq!(input.get_delimited_string(&C_STRING, 0), "a \"quoted\" value");
//! ```

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod buffer;
mod charset;
mod conversion;
mod crlf;
mod cursor;
mod delimited;
mod endian;
mod numbers;
mod overflow;
mod scan;
mod scanner;
mod split;
mod storage;

mod error;
mod options;

#[cfg(test)]
mod tests;

pub use buffer::{Buffer, BufferState};
pub use charset::{CharacterSet, is_space};
pub use conversion::{C_STRING, CharConversion, NO_ESCAPE};
pub use cursor::SeekFrom;
pub use delimited::DelimitedLength;
pub use endian::{Endian, Primitive};
pub use error::{BufferError, ErrorFlags};
pub use numbers::TextNumber;
pub use options::BufferOptions;
pub use overflow::{GetRequest, GrowOnPut, Overflow, PutRequest, SliceStream};
pub use scan::Scanned;
pub use split::SplitString;
