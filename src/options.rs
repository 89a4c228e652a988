//! Per-run configuration.
//!
//! One plain struct of knobs, read (and in one case written back) by
//! the encoder. There is no persistent configuration.

use crate::algo::{CipherAlgo, CompressAlgo, DigestAlgo};
use crate::consts::DEFAULT_LARGE_FILE_THRESHOLD;
use crate::s2k::S2kMode;

/// Options controlling one or more message-encryption runs.
///
/// The defaults produce a modern message: new-style streamed lengths
/// where the size is unknown, compression on, iterated-and-salted key
/// derivation with SHA-1 and AES-128.
#[derive(Debug, Clone)]
pub struct Options {
    /// Wrap the binary output in ASCII armor.
    pub armor: bool,
    /// Treat the input as text: canonicalize line endings and mark the
    /// literal packet as text mode.
    pub textmode: bool,
    /// Compress the plaintext before encryption (skipped when the input
    /// already probes as compressed data).
    pub compress: bool,
    /// Do not wrap the plaintext in a literal-data packet; copy the raw
    /// bytes into the cipher instead.
    pub no_literal: bool,
    /// Produce output readable by a legacy implementation: old-style
    /// packet headers, restricted ciphers, no separate session-key
    /// packet for symmetric messages.
    ///
    /// Cleared for the remainder of the run if a recipient key is
    /// incompatible with the legacy profile.
    pub legacy: bool,
    /// Cipher override; bypasses recipient preference resolution.
    pub def_cipher: Option<CipherAlgo>,
    /// Compression algorithm for modes without recipient preferences.
    pub def_compress: Option<CompressAlgo>,
    /// Digest override for key derivation.
    pub def_digest: Option<DigestAlgo>,
    /// Key-derivation mode for symmetric messages.
    pub s2k_mode: S2kMode,
    /// Key-derivation digest for symmetric messages.
    pub s2k_digest: DigestAlgo,
    /// Cipher for symmetric messages.
    pub s2k_cipher: CipherAlgo,
    /// Override the name stored in the literal-data packet.
    pub set_filename: Option<String>,
    /// Declared size for sources without one (e.g. standard input).
    pub set_filesize: Option<u64>,
    /// Probed sizes at or above this use streamed length encoding.
    pub large_file_threshold: u64,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            armor: false,
            textmode: false,
            compress: true,
            no_literal: false,
            legacy: false,
            def_cipher: None,
            def_compress: None,
            def_digest: None,
            s2k_mode: S2kMode::IteratedSalted,
            s2k_digest: DigestAlgo::Sha1,
            s2k_cipher: CipherAlgo::Aes128,
            set_filename: None,
            set_filesize: None,
            large_file_threshold: DEFAULT_LARGE_FILE_THRESHOLD,
        }
    }
}
