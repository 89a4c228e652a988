//! Block-cipher dispatch.
//!
//! A closed enum over the supported block ciphers with a uniform
//! single-block encrypt operation. The CFB layer on top only ever
//! needs the forward direction.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, KeyInit};
use aes::{Aes128Enc, Aes192Enc, Aes256Enc};
use cast5::Cast5;
use des::TdesEde3;
use idea::Idea;

use crate::algo::CipherAlgo;
use crate::error::EncodeError;

/// A keyed block cipher.
pub enum CipherEngine {
    Idea(Box<Idea>),
    TripleDes(Box<TdesEde3>),
    Cast5(Box<Cast5>),
    Aes128(Box<Aes128Enc>),
    Aes192(Box<Aes192Enc>),
    Aes256(Box<Aes256Enc>),
}

impl core::fmt::Debug for CipherEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            CipherEngine::Idea(_) => "Idea",
            CipherEngine::TripleDes(_) => "TripleDes",
            CipherEngine::Cast5(_) => "Cast5",
            CipherEngine::Aes128(_) => "Aes128",
            CipherEngine::Aes192(_) => "Aes192",
            CipherEngine::Aes256(_) => "Aes256",
        };
        f.debug_tuple("CipherEngine").field(&name).finish()
    }
}

impl CipherEngine {
    /// Key the cipher for `algo`. `key` must be `algo.key_len()` bytes.
    pub fn new(algo: CipherAlgo, key: &[u8]) -> Result<Self, EncodeError> {
        if key.len() != algo.key_len() {
            return Err(EncodeError::Crypto(format!(
                "{}: bad key length {}",
                algo.name(),
                key.len()
            )));
        }
        let bad_key = |_| EncodeError::Crypto(format!("{}: cipher setup failed", algo.name()));
        Ok(match algo {
            CipherAlgo::Idea => CipherEngine::Idea(Box::new(Idea::new_from_slice(key).map_err(bad_key)?)),
            CipherAlgo::TripleDes => {
                CipherEngine::TripleDes(Box::new(TdesEde3::new_from_slice(key).map_err(bad_key)?))
            }
            CipherAlgo::Cast5 => {
                CipherEngine::Cast5(Box::new(Cast5::new_from_slice(key).map_err(bad_key)?))
            }
            CipherAlgo::Aes128 => {
                CipherEngine::Aes128(Box::new(Aes128Enc::new_from_slice(key).map_err(bad_key)?))
            }
            CipherAlgo::Aes192 => {
                CipherEngine::Aes192(Box::new(Aes192Enc::new_from_slice(key).map_err(bad_key)?))
            }
            CipherAlgo::Aes256 => {
                CipherEngine::Aes256(Box::new(Aes256Enc::new_from_slice(key).map_err(bad_key)?))
            }
        })
    }

    /// Block length in bytes.
    pub fn block_len(&self) -> usize {
        match self {
            CipherEngine::Idea(_) | CipherEngine::TripleDes(_) | CipherEngine::Cast5(_) => 8,
            CipherEngine::Aes128(_) | CipherEngine::Aes192(_) | CipherEngine::Aes256(_) => 16,
        }
    }

    /// Encrypt one block in place. `block` must be exactly
    /// [`block_len`](Self::block_len) bytes.
    pub fn encrypt_block(&self, block: &mut [u8]) {
        debug_assert_eq!(block.len(), self.block_len());
        match self {
            CipherEngine::Idea(c) => c.encrypt_block(GenericArray::from_mut_slice(block)),
            CipherEngine::TripleDes(c) => c.encrypt_block(GenericArray::from_mut_slice(block)),
            CipherEngine::Cast5(c) => c.encrypt_block(GenericArray::from_mut_slice(block)),
            CipherEngine::Aes128(c) => c.encrypt_block(GenericArray::from_mut_slice(block)),
            CipherEngine::Aes192(c) => c.encrypt_block(GenericArray::from_mut_slice(block)),
            CipherEngine::Aes256(c) => c.encrypt_block(GenericArray::from_mut_slice(block)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_lengths_match_algo_table() {
        for algo in [
            CipherAlgo::Idea,
            CipherAlgo::TripleDes,
            CipherAlgo::Cast5,
            CipherAlgo::Aes128,
            CipherAlgo::Aes192,
            CipherAlgo::Aes256,
        ] {
            let engine = CipherEngine::new(algo, &vec![0x42; algo.key_len()]).unwrap();
            assert_eq!(engine.block_len(), algo.block_len(), "{}", algo.name());
        }
    }

    #[test]
    fn wrong_key_length_is_rejected() {
        let err = CipherEngine::new(CipherAlgo::Aes256, &[0u8; 16]).unwrap_err();
        assert!(matches!(err, EncodeError::Crypto(_)));
    }

    #[test]
    fn encryption_is_keyed() {
        let a = CipherEngine::new(CipherAlgo::Aes128, &[1u8; 16]).unwrap();
        let b = CipherEngine::new(CipherAlgo::Aes128, &[2u8; 16]).unwrap();
        let mut block_a = [0u8; 16];
        let mut block_b = [0u8; 16];
        a.encrypt_block(&mut block_a);
        b.encrypt_block(&mut block_b);
        assert_ne!(block_a, block_b);
    }
}
