//! Byte order selection and fixed-width value encoding.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::numbers::TextNumber;

/// Byte order for fixed-width values written in binary mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    /// The byte order of the target platform.
    #[cfg(target_endian = "big")]
    pub const NATIVE: Self = Self::Big;
    /// The byte order of the target platform.
    #[cfg(target_endian = "little")]
    pub const NATIVE: Self = Self::Little;

    /// The order opposite to [`Endian::NATIVE`].
    #[must_use]
    pub const fn swapped() -> Self {
        match Self::NATIVE {
            Self::Little => Self::Big,
            Self::Big => Self::Little,
        }
    }

    pub(crate) fn write<T: Primitive>(self, value: T, dst: &mut [u8]) {
        match self {
            Self::Little => value.write_bytes::<LittleEndian>(dst),
            Self::Big => value.write_bytes::<BigEndian>(dst),
        }
    }

    pub(crate) fn read<T: Primitive>(self, src: &[u8]) -> T {
        match self {
            Self::Little => T::read_bytes::<LittleEndian>(src),
            Self::Big => T::read_bytes::<BigEndian>(src),
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Fixed-width values that a [`Buffer`](crate::Buffer) can put and get.
///
/// Implemented for `u8`, `i8`, `u16`, `i16`, `u32`, `i32`, `u64`, `i64`,
/// `f32` and `f64`. This trait is sealed.
pub trait Primitive: sealed::Sealed + Copy + Default + core::fmt::Display + TextNumber {
    /// Encoded width in bytes.
    const SIZE: usize;

    #[doc(hidden)]
    fn write_bytes<B: ByteOrder>(self, dst: &mut [u8]);

    #[doc(hidden)]
    fn read_bytes<B: ByteOrder>(src: &[u8]) -> Self;
}

impl sealed::Sealed for u8 {}
impl Primitive for u8 {
    const SIZE: usize = 1;

    fn write_bytes<B: ByteOrder>(self, dst: &mut [u8]) {
        dst[0] = self;
    }

    fn read_bytes<B: ByteOrder>(src: &[u8]) -> Self {
        src[0]
    }
}

impl sealed::Sealed for i8 {}
impl Primitive for i8 {
    const SIZE: usize = 1;

    fn write_bytes<B: ByteOrder>(self, dst: &mut [u8]) {
        dst[0] = self.to_ne_bytes()[0];
    }

    fn read_bytes<B: ByteOrder>(src: &[u8]) -> Self {
        i8::from_ne_bytes([src[0]])
    }
}

macro_rules! primitive {
    ($($ty:ty => $size:expr, $write:ident, $read:ident;)*) => {
        $(
            impl sealed::Sealed for $ty {}
            impl Primitive for $ty {
                const SIZE: usize = $size;

                fn write_bytes<B: ByteOrder>(self, dst: &mut [u8]) {
                    B::$write(dst, self);
                }

                fn read_bytes<B: ByteOrder>(src: &[u8]) -> Self {
                    B::$read(src)
                }
            }
        )*
    };
}

primitive! {
    u16 => 2, write_u16, read_u16;
    i16 => 2, write_i16, read_i16;
    u32 => 4, write_u32, read_u32;
    i32 => 4, write_i32, read_i32;
    u64 => 8, write_u64, read_u64;
    i64 => 8, write_i64, read_i64;
    f32 => 4, write_f32, read_f32;
    f64 => 8, write_f64, read_f64;
}
