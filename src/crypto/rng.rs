// src/crypto/rng.rs
//! Secure randomness.
//!
//! Thin wrappers around the operating-system RNG; session keys, salts
//! and frame padding all come from here.

use rand::rngs::OsRng;
use rand::RngCore;

/// Fill `buf` with cryptographically secure random bytes.
#[inline]
pub fn fill_random(buf: &mut [u8]) {
    OsRng.fill_bytes(buf);
}

/// Fill `buf` with random bytes, none of which is zero.
///
/// Needed for session-key frame padding, where a zero octet would
/// terminate the pad early.
pub fn fill_random_nonzero(buf: &mut [u8]) {
    OsRng.fill_bytes(buf);
    for b in buf.iter_mut() {
        while *b == 0 {
            *b = (OsRng.next_u32() >> 24) as u8;
        }
    }
}
