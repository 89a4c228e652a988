//! Recipient keys and the collaborator seams around them.
//!
//! The encoder never touches key storage: a [`Keyring`] resolves user
//! ids to [`RecipientKey`]s, and a [`PublicKeyEncrypt`] engine performs
//! the actual asymmetric operation on the session-key frame. Both are
//! supplied by the caller.

use thiserror::Error;

use crate::algo::{CipherAlgo, CompressAlgo, PubkeyAlgo};
use crate::error::EncodeError;
use crate::mpi::Mpi;

/// Key-format generation. New-format keys advertise preference lists
/// and carry implicit baseline algorithms; old-format keys do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyVersion {
    V3,
    V4,
}

/// What a looked-up key must be capable of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyUsage {
    Encrypt,
}

/// Why a keyring lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no matching key")]
    NotFound,
    #[error("user id matches more than one key")]
    Ambiguous,
    #[error("key does not allow the requested usage")]
    Unusable,
}

/// An encryption-capable public key, as delivered by the keyring.
///
/// The core only reads it: algorithm id, identifier, modulus size,
/// advertised preferences, and the opaque key material handed through
/// to the [`PublicKeyEncrypt`] collaborator.
#[derive(Debug, Clone)]
pub struct RecipientKey {
    pub algo: PubkeyAlgo,
    pub key_id: [u8; 8],
    /// Modulus size in bits; determines the session-key frame size.
    pub nbits: u16,
    pub version: KeyVersion,
    pub sym_prefs: Vec<CipherAlgo>,
    pub compress_prefs: Vec<CompressAlgo>,
    /// Whether this key's implementation handles the integrity trailer.
    pub supports_mdc: bool,
    /// Emit a zeroed key id in the session-key packet so the message
    /// does not name its recipient.
    pub hidden: bool,
    /// Public MPIs, opaque to the encoder.
    pub material: Vec<Mpi>,
}

impl RecipientKey {
    pub fn key_id_hex(&self) -> String {
        self.key_id.iter().map(|b| format!("{b:02X}")).collect()
    }

    /// Stated cipher preferences plus the implicit baseline a
    /// new-format key always understands.
    pub(crate) fn effective_sym_prefs(&self) -> Vec<CipherAlgo> {
        let mut prefs = self.sym_prefs.clone();
        if self.version == KeyVersion::V4 && !prefs.contains(&CipherAlgo::TripleDes) {
            prefs.push(CipherAlgo::TripleDes);
        }
        prefs
    }

    pub(crate) fn effective_compress_prefs(&self) -> Vec<CompressAlgo> {
        let mut prefs = self.compress_prefs.clone();
        if self.version == KeyVersion::V4 && !prefs.contains(&CompressAlgo::Zip) {
            prefs.push(CompressAlgo::Zip);
        }
        prefs
    }
}

/// Key lookup collaborator (storage, selection and trust live outside
/// the core).
pub trait Keyring {
    fn lookup(&self, user_id: &str, usage: KeyUsage) -> Result<RecipientKey, LookupError>;
}

/// Public-key encryption primitive.
///
/// Given the algorithm id, the recipient's public MPIs and the
/// modulus-sized session-key frame, returns the wrapped integers for
/// the session-key packet.
pub trait PublicKeyEncrypt {
    fn encrypt(
        &self,
        algo: PubkeyAlgo,
        public: &[Mpi],
        frame: &Mpi,
    ) -> Result<Vec<Mpi>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Resolve every user id, in order, short-circuiting on the first
/// failure with the offending id attached.
pub(crate) fn build_recipient_list(
    keyring: &dyn Keyring,
    user_ids: &[String],
    usage: KeyUsage,
) -> Result<Vec<RecipientKey>, EncodeError> {
    let mut keys = Vec::with_capacity(user_ids.len());
    for id in user_ids {
        let key = keyring.lookup(id, usage).map_err(|e| match e {
            LookupError::NotFound => EncodeError::NoSuchKey(id.clone()),
            LookupError::Ambiguous => EncodeError::AmbiguousKey(id.clone()),
            LookupError::Unusable => EncodeError::UnusableKey(id.clone()),
        })?;
        if !key.algo.can_encrypt() {
            return Err(EncodeError::UnusableKey(id.clone()));
        }
        keys.push(key);
    }
    Ok(keys)
}
