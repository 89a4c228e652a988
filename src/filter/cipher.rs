//! Symmetric encryption transform.
//!
//! Turns everything written into it into one encrypted-data packet
//! (tag 9, or tag 18 with an integrity trailer). Session-key packets
//! are handed in serialized and emitted lazily on the first flush, so
//! they always precede the first ciphertext byte no matter who drives
//! the stack.

use sha1::{Digest, Sha1};

use crate::crypto::cfb::CfbCipher;
use crate::crypto::engine::CipherEngine;
use crate::crypto::rng;
use crate::error::EncodeError;
use crate::packet::length::{BodyLen, PacketStream};
use crate::packet::Tag;
use crate::secrets::Dek;

/// Deferred header emission: the session-key packets (and the
/// encrypted packet's own header) go out on the first flush.
enum HeaderState {
    Pending(Vec<u8>),
    Ready,
}

/// Encrypts the stream into a tag 9 / tag 18 packet.
pub struct CipherFilter {
    cfb: CfbCipher,
    use_mdc: bool,
    mdc: Option<Sha1>,
    pkt: PacketStream,
    state: HeaderState,
}

impl CipherFilter {
    /// Build the transform, borrowing `dek` only to key the cipher.
    ///
    /// `datalen` is the exact plaintext size about to be written
    /// (typically the whole literal packet), or `None` when unknown —
    /// fixed vs. streamed length encoding of the encrypted packet
    /// follows from it. `header_packets` are emitted verbatim before
    /// the packet header on first flush.
    pub fn new(
        dek: &Dek,
        datalen: Option<u64>,
        legacy: bool,
        header_packets: Vec<u8>,
    ) -> Result<Self, EncodeError> {
        let engine = CipherEngine::new(dek.algo(), dek.key())?;
        let block_len = engine.block_len() as u64;
        let use_mdc = dek.use_mdc();
        let pkt = match datalen {
            Some(n) => {
                let overhead = block_len + 2 + if use_mdc { 1 + 22 } else { 0 };
                let total = n
                    .checked_add(overhead)
                    .filter(|&t| t <= u32::MAX as u64)
                    .ok_or_else(|| {
                        EncodeError::PacketFormat(
                            "encrypted packet too large for a declared length".into(),
                        )
                    })?;
                if use_mdc {
                    PacketStream::new(Tag::SymEncryptedMdc, false, BodyLen::Fixed(total as u32))?
                } else {
                    PacketStream::new(Tag::SymEncrypted, true, BodyLen::Fixed(total as u32))?
                }
            }
            None if use_mdc => PacketStream::new(Tag::SymEncryptedMdc, false, BodyLen::Partial)?,
            None if legacy => PacketStream::new(Tag::SymEncrypted, true, BodyLen::Indeterminate)?,
            None => PacketStream::new(Tag::SymEncrypted, false, BodyLen::Partial)?,
        };
        Ok(CipherFilter {
            cfb: CfbCipher::new(engine),
            use_mdc,
            mdc: None,
            pkt,
            state: HeaderState::Pending(header_packets),
        })
    }

    /// Emit session-key packets, the packet header and the encrypted
    /// random prefix. Runs once, before the first ciphertext byte.
    fn ensure_ready(&mut self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        let headers = match std::mem::replace(&mut self.state, HeaderState::Ready) {
            HeaderState::Pending(headers) => headers,
            HeaderState::Ready => return Ok(()),
        };
        out.extend_from_slice(&headers);

        if self.use_mdc {
            self.pkt.write(&[1], out)?; // packet version
            self.mdc = Some(Sha1::new());
        }

        let block_len = self.cfb.block_len();
        let mut prefix = [0u8; 18];
        rng::fill_random(&mut prefix[..block_len]);
        prefix[block_len] = prefix[block_len - 2];
        prefix[block_len + 1] = prefix[block_len - 1];
        let prefix = &mut prefix[..block_len + 2];

        if let Some(mdc) = &mut self.mdc {
            mdc.update(&*prefix);
        }
        self.cfb.encrypt(prefix);
        self.pkt.write(prefix, out)?;
        if !self.use_mdc {
            // old-style CFB resyncs on the encrypted prefix
            self.cfb.resync(&prefix[2..]);
        }
        Ok(())
    }

    pub fn flush(&mut self, data: &[u8]) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::with_capacity(data.len() + 64);
        self.ensure_ready(&mut out)?;
        if let Some(mdc) = &mut self.mdc {
            mdc.update(data);
        }
        let mut buf = data.to_vec();
        self.cfb.encrypt(&mut buf);
        self.pkt.write(&buf, &mut out)?;
        Ok(out)
    }

    /// Emit the integrity trailer (tag 18) and close the packet. Also
    /// covers the degenerate empty message, where no flush ever ran.
    pub fn finalize(&mut self) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::new();
        self.ensure_ready(&mut out)?;
        if let Some(mut mdc) = self.mdc.take() {
            let mut trailer = Vec::with_capacity(22);
            trailer.extend_from_slice(&[0xD3, 0x14]);
            mdc.update(&trailer);
            trailer.extend_from_slice(mdc.finalize().as_slice());
            self.cfb.encrypt(&mut trailer);
            self.pkt.write(&trailer, &mut out)?;
        }
        self.pkt.finish(&mut out)?;
        Ok(out)
    }
}
