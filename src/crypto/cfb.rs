//! Packet-format CFB mode.
//!
//! Byte-granular cipher feedback over a [`CipherEngine`], starting
//! from an all-zero IV. The encrypted-data packet begins with a random
//! block plus two repeated octets; in the non-integrity-protected
//! variant the feedback register is resynchronized to the ciphertext
//! of that prefix before the payload starts.

use zeroize::Zeroize;

use crate::crypto::engine::CipherEngine;

const MAX_BLOCK_LEN: usize = 16;

/// A CFB stream cipher bound to one message.
pub struct CfbCipher {
    engine: CipherEngine,
    feedback: [u8; MAX_BLOCK_LEN],
    keystream: [u8; MAX_BLOCK_LEN],
    pos: usize,
    block_len: usize,
}

impl CfbCipher {
    pub fn new(engine: CipherEngine) -> Self {
        let block_len = engine.block_len();
        CfbCipher {
            engine,
            feedback: [0u8; MAX_BLOCK_LEN],
            keystream: [0u8; MAX_BLOCK_LEN],
            // forces a keystream refill on the first byte
            pos: block_len,
            block_len,
        }
    }

    pub fn block_len(&self) -> usize {
        self.block_len
    }

    fn refill(&mut self) {
        self.keystream[..self.block_len].copy_from_slice(&self.feedback[..self.block_len]);
        self.engine.encrypt_block(&mut self.keystream[..self.block_len]);
        self.pos = 0;
    }

    /// Encrypt in place.
    pub fn encrypt(&mut self, data: &mut [u8]) {
        for byte in data.iter_mut() {
            if self.pos == self.block_len {
                self.refill();
            }
            let c = *byte ^ self.keystream[self.pos];
            self.feedback[self.pos] = c;
            *byte = c;
            self.pos += 1;
        }
    }

    /// Decrypt in place (used by round-trip verification).
    pub fn decrypt(&mut self, data: &mut [u8]) {
        for byte in data.iter_mut() {
            if self.pos == self.block_len {
                self.refill();
            }
            let c = *byte;
            *byte = c ^ self.keystream[self.pos];
            self.feedback[self.pos] = c;
            self.pos += 1;
        }
    }

    /// Resynchronize the feedback register to `ciphertext_tail`, the
    /// last `block_len` ciphertext bytes written. The next byte starts
    /// a fresh keystream block.
    pub fn resync(&mut self, ciphertext_tail: &[u8]) {
        debug_assert_eq!(ciphertext_tail.len(), self.block_len);
        self.feedback[..self.block_len].copy_from_slice(ciphertext_tail);
        self.pos = self.block_len;
    }
}

impl Drop for CfbCipher {
    fn drop(&mut self) {
        self.feedback.zeroize();
        self.keystream.zeroize();
    }
}
