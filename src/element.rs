//! Numeric element types supported by the protocol payload codec.
//!
//! Device payloads are raw little-endian byte runs; the controller has no type
//! information. The [`Element`] trait binds each supported Rust type to its
//! wire width and an explicit little-endian pack/unpack, so payload bytes are
//! never reinterpreted through an arbitrary caller-supplied type.
//!
//! Device word operations accept 2- and 4-byte elements ([`u16`], [`u32`],
//! [`f32`]); intelligent-module buffer operations additionally accept [`u8`].
//! Passing a type outside the accepted range fails with
//! [`McError::UnsupportedElementWidth`] before any bytes are built.

use crate::error::{McError, Result};

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
    impl Sealed for f32 {}
}

/// A numeric type that can travel in an MC protocol payload.
///
/// Sealed: implemented for `u8`, `u16`, `u32` and `f32` only.
pub trait Element: sealed::Sealed + Copy {
    /// Wire width of one element in bytes.
    const WIDTH: usize;

    /// Appends the little-endian encoding of `self` to `out`.
    fn put_le(self, out: &mut Vec<u8>);

    /// Decodes one element from exactly [`Self::WIDTH`] little-endian bytes.
    fn get_le(bytes: &[u8]) -> Self;
}

impl Element for u8 {
    const WIDTH: usize = 1;

    fn put_le(self, out: &mut Vec<u8>) {
        out.push(self);
    }

    fn get_le(bytes: &[u8]) -> Self {
        bytes[0]
    }
}

impl Element for u16 {
    const WIDTH: usize = 2;

    fn put_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn get_le(bytes: &[u8]) -> Self {
        u16::from_le_bytes([bytes[0], bytes[1]])
    }
}

impl Element for u32 {
    const WIDTH: usize = 4;

    fn put_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn get_le(bytes: &[u8]) -> Self {
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

impl Element for f32 {
    const WIDTH: usize = 4;

    fn put_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn get_le(bytes: &[u8]) -> Self {
        f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

/// Validates that `T`'s wire width falls in `min..=max`.
pub(crate) fn check_width<T: Element>(min: usize, max: usize) -> Result<usize> {
    if T::WIDTH < min || T::WIDTH > max {
        return Err(McError::UnsupportedElementWidth {
            width: T::WIDTH,
            min,
            max,
        });
    }
    Ok(T::WIDTH)
}

/// Width range accepted by device word/doubleword operations.
pub(crate) fn device_width<T: Element>() -> Result<usize> {
    check_width::<T>(2, 4)
}

/// Width range accepted by intelligent-module buffer operations.
pub(crate) fn module_width<T: Element>() -> Result<usize> {
    check_width::<T>(1, 4)
}

/// Serializes a slice of elements to little-endian payload bytes.
pub(crate) fn pack<T: Element>(values: &[T], out: &mut Vec<u8>) {
    out.reserve(values.len() * T::WIDTH);
    for v in values {
        v.put_le(out);
    }
}
