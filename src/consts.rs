//! # Constants
//!
//! Tunables for length-encoding policy, legacy compatibility and
//! key derivation defaults.

use crate::algo::CipherAlgo;

/// Buffer size for the raw streaming copy (no-literal mode and the
/// chunked read loop).
pub const COPY_BUFFER_SIZE: usize = 4096;

/// Chunk size for partial (indeterminate) body-length encoding.
///
/// Must be a power of two so it is representable as a single
/// partial-length octet.
pub const PARTIAL_CHUNK_SIZE: usize = 8192;

/// Default "very large file" threshold.
///
/// A probed plaintext at or above this size falls back to streamed
/// (partial-length) encoding instead of a fixed declared length. This
/// is policy, not protocol: override it via
/// `Options::large_file_threshold`.
pub const DEFAULT_LARGE_FILE_THRESHOLD: u64 = 0x7FFF_FFFF;

/// Cipher used when the recipients share no common preference.
///
/// Only reachable when mixing old- and new-format keys, since
/// new-format keys always advertise at least one baseline algorithm.
pub const FALLBACK_CIPHER: CipherAlgo = CipherAlgo::TripleDes;

/// Largest RSA modulus accepted while legacy-compatibility mode is on.
pub const LEGACY_MAX_RSA_BITS: u16 = 2048;

/// Ciphers a legacy reader is assumed to understand.
pub const LEGACY_CIPHERS: &[CipherAlgo] = &[CipherAlgo::Idea];

/// Default coded iteration count for iterated-and-salted key
/// derivation. Decodes to 65536 octets hashed.
pub const DEFAULT_S2K_COUNT: u8 = 96;

/// Longest file name a literal-data packet can carry.
pub const MAX_LITERAL_NAME_LEN: usize = 255;
