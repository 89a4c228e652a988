// src/packet/mod.rs

//! Packet codec: tags, headers, length encodings, and the concrete
//! packet builders.
//!
//! One-shot packets (session-key packets, known-length literal data)
//! use old-style headers with the smallest length field that fits;
//! new-style headers appear exactly where they are required — streamed
//! partial-length bodies and the integrity-protected data packet,
//! whose tag does not fit an old-style header.

pub mod length;
pub mod literal;
pub mod seskey;

use crate::error::EncodeError;
use self::length::{old_ctb, old_len_size};

/// Packet tags emitted by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// Public-key encrypted session key.
    PubkeyEnc,
    /// Symmetric-key encrypted session key (key-derivation parameters).
    SymkeyEnc,
    /// Compressed data.
    Compressed,
    /// Symmetrically encrypted data.
    SymEncrypted,
    /// Literal data.
    Literal,
    /// Symmetrically encrypted and integrity protected data.
    SymEncryptedMdc,
}

impl Tag {
    pub fn value(self) -> u8 {
        match self {
            Tag::PubkeyEnc => 1,
            Tag::SymkeyEnc => 3,
            Tag::Compressed => 8,
            Tag::SymEncrypted => 9,
            Tag::Literal => 11,
            Tag::SymEncryptedMdc => 18,
        }
    }
}

/// Serialize a complete packet with an old-style header.
///
/// Fails with a format error if the body cannot be represented or the
/// tag does not fit an old-style header.
pub fn write_packet(out: &mut Vec<u8>, tag: Tag, body: &[u8]) -> Result<(), EncodeError> {
    if tag.value() > 15 {
        return Err(EncodeError::PacketFormat(format!(
            "tag {} needs a new-style header",
            tag.value()
        )));
    }
    let len = u32::try_from(body.len())
        .map_err(|_| EncodeError::PacketFormat("packet body exceeds 32-bit length".into()))?;
    let (lentype, size) = old_len_size(len);
    out.push(old_ctb(tag.value(), lentype));
    out.extend_from_slice(&len.to_be_bytes()[4 - size..]);
    out.extend_from_slice(body);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_packet_uses_minimal_old_header() {
        let mut out = Vec::new();
        write_packet(&mut out, Tag::SymkeyEnc, &[0xAA; 4]).unwrap();
        // 0x80 | 3<<2 | lentype 0, length 4
        assert_eq!(&out[..2], &[0x8C, 0x04]);
        assert_eq!(out.len(), 2 + 4);

        let mut out = Vec::new();
        write_packet(&mut out, Tag::PubkeyEnc, &[0u8; 300]).unwrap();
        // 0x80 | 1<<2 | lentype 1, length 300 big-endian
        assert_eq!(&out[..3], &[0x85, 0x01, 0x2C]);
    }

    #[test]
    fn high_tags_are_rejected_for_old_headers() {
        let mut out = Vec::new();
        let err = write_packet(&mut out, Tag::SymEncryptedMdc, &[]).unwrap_err();
        assert!(matches!(err, EncodeError::PacketFormat(_)));
    }
}
