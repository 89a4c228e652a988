//! Session key lifecycle.
//!
//! Builds the data-encryption key — derived from a passphrase or
//! generated at random — and wraps it for every recipient. Key bytes
//! live inside [`Dek`] and are zeroized on drop; the frame built for
//! public-key wrapping is wiped as soon as it becomes an MPI.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use zeroize::Zeroize;

use crate::algo::CipherAlgo;
use crate::error::EncodeError;
use crate::keys::{PublicKeyEncrypt, RecipientKey};
use crate::mpi::Mpi;
use crate::packet::seskey::pubkey_packet;
use crate::s2k::S2k;
use crate::secrets::Dek;
use crate::crypto::rng;

/// Supplies passphrases for symmetric messages.
///
/// Returning `None` means the request was cancelled; the encoder turns
/// that (and an empty passphrase) into a passphrase error.
pub trait PassphraseSource {
    fn passphrase(&self, s2k: &S2k) -> Option<SecretString>;
}

/// A fixed passphrase is itself a source; convenient for library
/// callers that already acquired one.
impl PassphraseSource for SecretString {
    fn passphrase(&self, _s2k: &S2k) -> Option<SecretString> {
        Some(self.clone())
    }
}

/// Derive the message key from a passphrase with the given parameters.
pub(crate) fn passphrase_to_dek(
    source: &dyn PassphraseSource,
    algo: CipherAlgo,
    s2k: &S2k,
) -> Result<Dek, EncodeError> {
    let passphrase = source
        .passphrase(s2k)
        .ok_or_else(|| EncodeError::Passphrase("request cancelled".into()))?;
    if passphrase.expose_secret().is_empty() {
        return Err(EncodeError::Passphrase("empty passphrase".into()));
    }
    let key = s2k.derive(passphrase.expose_secret(), algo.key_len());
    Ok(Dek::new(algo, key, false))
}

/// Generate a fresh random message key.
pub(crate) fn make_session_key(algo: CipherAlgo, use_mdc: bool) -> Dek {
    let mut key = vec![0u8; algo.key_len()];
    rng::fill_random(&mut key);
    Dek::new(algo, key, use_mdc)
}

/// Encode the session key into an integer sized to an `nbits` modulus:
/// `0x02 ‖ nonzero pad ‖ 0x00 ‖ cipher id ‖ key ‖ 16-bit checksum`.
pub(crate) fn encode_session_key(dek: &Dek, nbits: u16) -> Result<Mpi, EncodeError> {
    let nframe = (nbits as usize + 7) / 8;
    let key = dek.key();
    if key.len() + 7 > nframe {
        return Err(EncodeError::Crypto(format!(
            "cannot encode a {}-bit key into a {}-bit frame",
            key.len() * 8,
            nbits
        )));
    }
    let mut frame = vec![0u8; nframe];
    frame[1] = 0x02;
    let pad_end = nframe - key.len() - 4;
    rng::fill_random_nonzero(&mut frame[2..pad_end]);
    frame[pad_end] = 0x00;
    frame[pad_end + 1] = dek.algo().id();
    frame[pad_end + 2..nframe - 2].copy_from_slice(key);
    let checksum: u16 = key.iter().fold(0u16, |acc, &b| acc.wrapping_add(b as u16));
    frame[nframe - 2..].copy_from_slice(&checksum.to_be_bytes());
    let mpi = Mpi::from_bytes(&frame);
    frame.zeroize();
    Ok(mpi)
}

/// Wrap the key for each recipient, in input order, and serialize one
/// session-key packet per recipient.
///
/// Short-circuits on the first failure: a message encrypted for only
/// some of its intended recipients is never produced.
pub(crate) fn write_pubkey_enc_list(
    engine: &dyn PublicKeyEncrypt,
    recipients: &[RecipientKey],
    dek: &Dek,
) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    for key in recipients {
        let frame = encode_session_key(dek, key.nbits).map_err(|e| EncodeError::KeyWrap {
            key_id: key.key_id_hex(),
            source: Box::new(e),
        })?;
        let wrapped = engine
            .encrypt(key.algo, &key.material, &frame)
            .map_err(|source| EncodeError::KeyWrap {
                key_id: key.key_id_hex(),
                source,
            })?;
        debug!(
            pubkey = key.algo.name(),
            cipher = dek.algo().name(),
            key_id = %key.key_id_hex(),
            "session key wrapped"
        );
        out.extend_from_slice(&pubkey_packet(key, &wrapped)?);
    }
    Ok(out)
}
