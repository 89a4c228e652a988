//! Algorithm and compatibility negotiation.
//!
//! Resolves, before any output byte exists, which cipher and
//! compression the message uses, whether it carries an integrity
//! trailer, and whether legacy compatibility survives the recipient
//! set. "No common algorithm" is never an error here: the cipher falls
//! back to a baseline, compression is simply skipped.

use tracing::{debug, warn};

use crate::algo::{CipherAlgo, CompressAlgo};
use crate::consts::{FALLBACK_CIPHER, LEGACY_CIPHERS, LEGACY_MAX_RSA_BITS};
use crate::keys::RecipientKey;
use crate::options::Options;

/// The negotiated result for one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    pub cipher: CipherAlgo,
    /// `None` disables the compress filter entirely.
    pub compress: Option<CompressAlgo>,
    /// Integrity protection; on iff every recipient key supports it.
    pub use_mdc: bool,
    /// Legacy mode as it survived the recipient checks.
    pub legacy: bool,
}

/// Negotiate algorithms for a public-key message.
pub fn resolve_policy(
    opts: &Options,
    recipients: &[RecipientKey],
    input_compressed: bool,
) -> Policy {
    debug_assert!(!recipients.is_empty());

    let mut legacy = opts.legacy;
    if legacy {
        for key in recipients {
            if !(key.algo.is_rsa() && key.nbits <= LEGACY_MAX_RSA_BITS) {
                warn!(
                    key = %key.key_id_hex(),
                    "recipient key exceeds the legacy profile; this message \
                     may not be usable by legacy readers"
                );
                legacy = false;
                break;
            }
        }
    }

    let cipher = match opts.def_cipher {
        Some(cipher) => cipher,
        None => select_cipher(recipients).unwrap_or_else(|| {
            debug!(
                fallback = FALLBACK_CIPHER.name(),
                "no common cipher preference, using the baseline"
            );
            FALLBACK_CIPHER
        }),
    };
    if legacy && !LEGACY_CIPHERS.contains(&cipher) {
        warn!(
            cipher = cipher.name(),
            "cannot use a legacy cipher for all recipients; this message \
             may not be usable by legacy readers"
        );
        legacy = false;
    }

    let use_mdc = recipients.iter().all(|k| k.supports_mdc);

    let compress = if opts.compress && !legacy && !input_compressed {
        select_compress(recipients).filter(|&algo| algo != CompressAlgo::Uncompressed)
    } else {
        None
    };

    Policy {
        cipher,
        compress,
        use_mdc,
        legacy,
    }
}

/// Best cipher present in every recipient's effective preference list.
pub fn select_cipher(recipients: &[RecipientKey]) -> Option<CipherAlgo> {
    let lists: Vec<Vec<CipherAlgo>> = recipients
        .iter()
        .map(RecipientKey::effective_sym_prefs)
        .collect();
    select_common(&lists)
}

/// Best compression present in every recipient's effective list.
pub fn select_compress(recipients: &[RecipientKey]) -> Option<CompressAlgo> {
    let lists: Vec<Vec<CompressAlgo>> = recipients
        .iter()
        .map(RecipientKey::effective_compress_prefs)
        .collect();
    select_common(&lists)
}

/// Rank-sum selection: eligible algorithms appear in every list; the
/// lowest summed rank wins, ties resolving to the first list's order.
fn select_common<T: Copy + Eq>(lists: &[Vec<T>]) -> Option<T> {
    let first = lists.first()?;
    let mut best: Option<(usize, T)> = None;
    for &candidate in first {
        let mut score = 0usize;
        let mut eligible = true;
        for list in lists {
            match list.iter().position(|&a| a == candidate) {
                Some(rank) => score += rank,
                None => {
                    eligible = false;
                    break;
                }
            }
        }
        if eligible && best.map_or(true, |(s, _)| score < s) {
            best = Some((score, candidate));
        }
    }
    best.map(|(_, algo)| algo)
}
