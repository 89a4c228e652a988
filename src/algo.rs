//! Algorithm identifiers for the packet format.
//!
//! Ids follow the OpenPGP registry so the output interoperates with
//! other readers of the format.

/// Symmetric cipher algorithms the encoder can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherAlgo {
    Idea,
    TripleDes,
    Cast5,
    Aes128,
    Aes192,
    Aes256,
}

impl CipherAlgo {
    /// Wire id of this algorithm.
    pub fn id(self) -> u8 {
        match self {
            CipherAlgo::Idea => 1,
            CipherAlgo::TripleDes => 2,
            CipherAlgo::Cast5 => 3,
            CipherAlgo::Aes128 => 7,
            CipherAlgo::Aes192 => 8,
            CipherAlgo::Aes256 => 9,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Some(match id {
            1 => CipherAlgo::Idea,
            2 => CipherAlgo::TripleDes,
            3 => CipherAlgo::Cast5,
            7 => CipherAlgo::Aes128,
            8 => CipherAlgo::Aes192,
            9 => CipherAlgo::Aes256,
            _ => return None,
        })
    }

    /// Key length in bytes.
    pub fn key_len(self) -> usize {
        match self {
            CipherAlgo::Idea | CipherAlgo::Cast5 | CipherAlgo::Aes128 => 16,
            CipherAlgo::TripleDes | CipherAlgo::Aes192 => 24,
            CipherAlgo::Aes256 => 32,
        }
    }

    /// Block length in bytes.
    pub fn block_len(self) -> usize {
        match self {
            CipherAlgo::Idea | CipherAlgo::TripleDes | CipherAlgo::Cast5 => 8,
            CipherAlgo::Aes128 | CipherAlgo::Aes192 | CipherAlgo::Aes256 => 16,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CipherAlgo::Idea => "IDEA",
            CipherAlgo::TripleDes => "3DES",
            CipherAlgo::Cast5 => "CAST5",
            CipherAlgo::Aes128 => "AES128",
            CipherAlgo::Aes192 => "AES192",
            CipherAlgo::Aes256 => "AES256",
        }
    }
}

/// Digest algorithms used by the string-to-key derivation and the
/// integrity trailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgo {
    Md5,
    Sha1,
    Sha256,
}

impl DigestAlgo {
    pub fn id(self) -> u8 {
        match self {
            DigestAlgo::Md5 => 1,
            DigestAlgo::Sha1 => 2,
            DigestAlgo::Sha256 => 8,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Some(match id {
            1 => DigestAlgo::Md5,
            2 => DigestAlgo::Sha1,
            8 => DigestAlgo::Sha256,
            _ => return None,
        })
    }

    /// Digest output length in bytes.
    pub fn len(self) -> usize {
        match self {
            DigestAlgo::Md5 => 16,
            DigestAlgo::Sha1 => 20,
            DigestAlgo::Sha256 => 32,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DigestAlgo::Md5 => "MD5",
            DigestAlgo::Sha1 => "SHA1",
            DigestAlgo::Sha256 => "SHA256",
        }
    }
}

/// Compression algorithms for the compressed-data packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressAlgo {
    Uncompressed,
    Zip,
    Zlib,
}

impl CompressAlgo {
    pub fn id(self) -> u8 {
        match self {
            CompressAlgo::Uncompressed => 0,
            CompressAlgo::Zip => 1,
            CompressAlgo::Zlib => 2,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Some(match id {
            0 => CompressAlgo::Uncompressed,
            1 => CompressAlgo::Zip,
            2 => CompressAlgo::Zlib,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            CompressAlgo::Uncompressed => "uncompressed",
            CompressAlgo::Zip => "ZIP",
            CompressAlgo::Zlib => "ZLIB",
        }
    }
}

/// Public-key algorithms as they appear in recipient keys.
///
/// The concrete math lives behind the [`PublicKeyEncrypt`]
/// collaborator; the encoder only needs the id, the wrapped-integer
/// count, and the usage capability.
///
/// [`PublicKeyEncrypt`]: crate::keys::PublicKeyEncrypt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PubkeyAlgo {
    Rsa,
    RsaEncryptOnly,
    ElgamalEncrypt,
    Dsa,
    Elgamal,
}

impl PubkeyAlgo {
    pub fn id(self) -> u8 {
        match self {
            PubkeyAlgo::Rsa => 1,
            PubkeyAlgo::RsaEncryptOnly => 2,
            PubkeyAlgo::ElgamalEncrypt => 16,
            PubkeyAlgo::Dsa => 17,
            PubkeyAlgo::Elgamal => 20,
        }
    }

    /// Number of integers produced by encrypting a session-key frame.
    pub fn wrapped_mpi_count(self) -> usize {
        match self {
            PubkeyAlgo::Rsa | PubkeyAlgo::RsaEncryptOnly => 1,
            PubkeyAlgo::ElgamalEncrypt | PubkeyAlgo::Elgamal => 2,
            PubkeyAlgo::Dsa => 0,
        }
    }

    pub fn can_encrypt(self) -> bool {
        !matches!(self, PubkeyAlgo::Dsa)
    }

    pub fn is_rsa(self) -> bool {
        matches!(self, PubkeyAlgo::Rsa | PubkeyAlgo::RsaEncryptOnly)
    }

    pub fn name(self) -> &'static str {
        match self {
            PubkeyAlgo::Rsa => "RSA",
            PubkeyAlgo::RsaEncryptOnly => "RSA-E",
            PubkeyAlgo::ElgamalEncrypt => "ELG-E",
            PubkeyAlgo::Dsa => "DSA",
            PubkeyAlgo::Elgamal => "ELG",
        }
    }
}
