// src/memory.rs
//! Explicit wiping for heap buffers the type system cannot carry
//!
//! Derived keys and passwords need no call here — their secure-gate
//! aliases zeroize on drop. This helper covers plain buffers that hold
//! sensitive bytes transiently, e.g. a whole-file plaintext after it has
//! been encrypted.

use zeroize::Zeroize;

/// Overwrite every byte with zero. The write is guaranteed not to be
/// optimized away.
#[inline]
pub fn secure_wipe(buf: &mut [u8]) {
    buf.zeroize();
}
