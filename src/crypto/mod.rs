// src/crypto/mod.rs

//! Low-level crypto building blocks.
//!
//! Block-cipher dispatch, the packet-format CFB mode, and randomness.
//! Key derivation lives in [`crate::s2k`].

pub mod cfb;
pub mod engine;
pub mod rng;
