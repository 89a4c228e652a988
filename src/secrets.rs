//! Secret key material.
//!
//! The data-encryption key lives exactly as long as one message: the
//! session module creates it, the cipher filter borrows it, and the
//! bytes are overwritten on drop on every exit path.

use zeroize::Zeroize;

use crate::algo::CipherAlgo;

/// The data-encryption key (DEK) for one message. Zeroized on drop.
pub struct Dek {
    algo: CipherAlgo,
    key: Vec<u8>,
    use_mdc: bool,
}

impl Dek {
    /// Wrap freshly derived or generated key bytes.
    ///
    /// `key` must be exactly `algo.key_len()` bytes.
    pub fn new(algo: CipherAlgo, key: Vec<u8>, use_mdc: bool) -> Self {
        debug_assert_eq!(key.len(), algo.key_len());
        Dek { algo, key, use_mdc }
    }

    pub fn algo(&self) -> CipherAlgo {
        self.algo
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Whether the message carries an integrity-protection trailer.
    pub fn use_mdc(&self) -> bool {
        self.use_mdc
    }
}

impl Drop for Dek {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl std::fmt::Debug for Dek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dek")
            .field("algo", &self.algo)
            .field("key", &"[REDACTED]")
            .field("use_mdc", &self.use_mdc)
            .finish()
    }
}
