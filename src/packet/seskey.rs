//! Session-key packets.

use crate::algo::CipherAlgo;
use crate::error::EncodeError;
use crate::keys::RecipientKey;
use crate::mpi::Mpi;
use crate::packet::{write_packet, Tag};
use crate::s2k::S2k;

/// Serialize a symmetric session-key packet: version 4, cipher id and
/// the key-derivation parameters. The key itself is never embedded —
/// the recipient re-derives it from the shared passphrase.
pub fn symkey_packet(cipher: CipherAlgo, s2k: &S2k) -> Result<Vec<u8>, EncodeError> {
    let mut body = vec![4, cipher.id()];
    s2k.encode(&mut body);
    let mut out = Vec::with_capacity(body.len() + 3);
    write_packet(&mut out, Tag::SymkeyEnc, &body)?;
    Ok(out)
}

/// Serialize a public-key session-key packet: version 3, recipient key
/// id (zeroed for a hidden recipient), algorithm id and the wrapped
/// integers.
pub fn pubkey_packet(key: &RecipientKey, wrapped: &[Mpi]) -> Result<Vec<u8>, EncodeError> {
    let mut body = Vec::with_capacity(10 + wrapped.iter().map(Mpi::encoded_len).sum::<usize>());
    body.push(3);
    if key.hidden {
        body.extend_from_slice(&[0u8; 8]);
    } else {
        body.extend_from_slice(&key.key_id);
    }
    body.push(key.algo.id());
    for mpi in wrapped {
        mpi.encode(&mut body);
    }
    let mut out = Vec::with_capacity(body.len() + 3);
    write_packet(&mut out, Tag::PubkeyEnc, &body)?;
    Ok(out)
}
