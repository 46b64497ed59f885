// src/rng.rs
//! Secure randomness for salts and initialization vectors
//!
//! Thread-local `OsRng` — first call pays the syscall setup, every
//! subsequent call is cheap.

use std::cell::RefCell;

use rand::{rngs::OsRng, TryRngCore};

use crate::error::{CoreError, Result};

thread_local! {
    static RNG: RefCell<OsRng> = const { RefCell::new(OsRng) };
}

/// Fill a fresh fixed-size array from the OS CSPRNG.
///
/// A failing system RNG is unrecoverable for this crate — a salt or IV
/// that is not actually random breaks every guarantee downstream, so the
/// error propagates instead of being swallowed.
pub fn random_array<const N: usize>() -> Result<[u8; N]> {
    RNG.with(|rng_cell| {
        let mut rng = rng_cell.borrow_mut();
        let mut bytes = [0u8; N];
        rng.try_fill_bytes(&mut bytes)
            .map_err(|e| CoreError::Unknown(format!("system RNG failure: {e}")))?;
        Ok(bytes)
    })
}
