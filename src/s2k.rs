//! String-to-key (S2K) derivation.
//!
//! Turns a passphrase into cipher key bytes using a salted, optionally
//! iterated digest scheme. The same parameters are serialized into the
//! symmetric session-key packet so the recipient can re-derive the key.

use digest::Digest;
use md5::Md5;
use sha1::Sha1;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::algo::DigestAlgo;
use crate::consts::DEFAULT_S2K_COUNT;
use crate::crypto::rng;

/// Key-derivation mode, by wire id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum S2kMode {
    /// Digest of the passphrase alone.
    Simple,
    /// Salt prepended to the passphrase.
    Salted,
    /// Salt + passphrase fed cyclically until the coded octet count is
    /// reached.
    IteratedSalted,
}

impl S2kMode {
    pub fn id(self) -> u8 {
        match self {
            S2kMode::Simple => 0,
            S2kMode::Salted => 1,
            S2kMode::IteratedSalted => 3,
        }
    }
}

/// A concrete string-to-key specification.
#[derive(Debug, Clone)]
pub struct S2k {
    pub mode: S2kMode,
    pub hash: DigestAlgo,
    pub salt: [u8; 8],
    /// Coded iteration count; see [`S2k::decoded_count`].
    pub count: u8,
}

impl S2k {
    /// New spec with a fresh random salt and the default count.
    pub fn new(mode: S2kMode, hash: DigestAlgo) -> Self {
        let mut salt = [0u8; 8];
        rng::fill_random(&mut salt);
        S2k {
            mode,
            hash,
            salt,
            count: DEFAULT_S2K_COUNT,
        }
    }

    /// Octets hashed per digest pass in iterated mode.
    pub fn decoded_count(&self) -> u32 {
        (16 + (self.count & 15) as u32) << ((self.count >> 4) + 6)
    }

    /// Serialize the spec as it appears inside a session-key packet.
    pub fn encode(&self, out: &mut Vec<u8>) {
        out.push(self.mode.id());
        out.push(self.hash.id());
        if self.mode != S2kMode::Simple {
            out.extend_from_slice(&self.salt);
        }
        if self.mode == S2kMode::IteratedSalted {
            out.push(self.count);
        }
    }

    /// Derive `key_len` key bytes from `passphrase`.
    ///
    /// When `key_len` exceeds one digest, further passes run with an
    /// increasing number of zero bytes prefixed, and the outputs are
    /// concatenated.
    pub fn derive(&self, passphrase: &str, key_len: usize) -> Vec<u8> {
        let mut key = vec![0u8; key_len];
        let digest_len = self.hash.len();
        let mut offset = 0;
        let mut pass = 0;
        while offset < key_len {
            let mut out = match self.hash {
                DigestAlgo::Md5 => self.hash_pass::<Md5>(pass, passphrase),
                DigestAlgo::Sha1 => self.hash_pass::<Sha1>(pass, passphrase),
                DigestAlgo::Sha256 => self.hash_pass::<Sha256>(pass, passphrase),
            };
            let n = digest_len.min(key_len - offset);
            key[offset..offset + n].copy_from_slice(&out[..n]);
            out.zeroize();
            offset += n;
            pass += 1;
        }
        key
    }

    fn hash_pass<D: Digest>(&self, pass: usize, passphrase: &str) -> Vec<u8> {
        let pw = passphrase.as_bytes();
        let mut h = D::new();
        for _ in 0..pass {
            h.update([0u8]);
        }
        match self.mode {
            S2kMode::Simple => h.update(pw),
            S2kMode::Salted => {
                h.update(self.salt);
                h.update(pw);
            }
            S2kMode::IteratedSalted => {
                let chunk = self.salt.len() + pw.len();
                // never hash less than one full salt+passphrase round
                let mut left = (self.decoded_count() as usize).max(chunk);
                while left > 0 {
                    if left >= chunk {
                        h.update(self.salt);
                        h.update(pw);
                        left -= chunk;
                    } else if left <= self.salt.len() {
                        h.update(&self.salt[..left]);
                        left = 0;
                    } else {
                        h.update(self.salt);
                        h.update(&pw[..left - self.salt.len()]);
                        left = 0;
                    }
                }
            }
        }
        h.finalize().to_vec()
    }
}
