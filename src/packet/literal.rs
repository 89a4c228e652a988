//! Literal-data packet (the plaintext carrier).

use std::time::{SystemTime, UNIX_EPOCH};

use crate::consts::MAX_LITERAL_NAME_LEN;
use crate::error::EncodeError;
use crate::packet::length::{BodyLen, PacketStream};
use crate::packet::Tag;

/// Seconds since the epoch, truncated to the packet's 32-bit field.
pub fn make_timestamp() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0)
}

/// What the literal-data packet declares about its payload.
///
/// `len == 0` means the size is unknown and the body is streamed.
#[derive(Debug, Clone)]
pub struct LiteralSpec {
    pub name: String,
    pub timestamp: u32,
    pub text_mode: bool,
    pub len: u64,
}

impl LiteralSpec {
    /// Bytes preceding the payload: format octet, name, timestamp.
    pub fn prefix_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        if self.name.len() > MAX_LITERAL_NAME_LEN {
            return Err(EncodeError::PacketFormat(format!(
                "file name too long for literal packet ({} bytes)",
                self.name.len()
            )));
        }
        let mut out = Vec::with_capacity(6 + self.name.len());
        out.push(if self.text_mode { b't' } else { b'b' });
        out.push(self.name.len() as u8);
        out.extend_from_slice(self.name.as_bytes());
        out.extend_from_slice(&self.timestamp.to_be_bytes());
        Ok(out)
    }

    /// Declared body length (prefix + payload). Only meaningful when
    /// the payload size is known.
    pub fn body_len(&self) -> Result<u64, EncodeError> {
        Ok(self.prefix_bytes()?.len() as u64 + self.len)
    }

    /// Total serialized packet length including the header.
    ///
    /// Errors if the declared length cannot be represented; this check
    /// is independent of the large-file threshold, which instead falls
    /// back to streamed encoding.
    pub fn packet_len(&self) -> Result<u64, EncodeError> {
        let body = self.body_len()?;
        let body = u32::try_from(body).map_err(|_| {
            EncodeError::PacketFormat("literal data too large for a declared length".into())
        })?;
        let (_, size) = crate::packet::length::old_len_size(body);
        Ok(1 + size as u64 + body as u64)
    }
}

/// Streams one literal-data packet.
///
/// Known payload size → old-style fixed header. Unknown → new-style
/// partial chunks, or old-style indeterminate in legacy mode.
pub struct LiteralWriter {
    pkt: PacketStream,
    prefix: Option<Vec<u8>>,
}

impl LiteralWriter {
    pub fn new(spec: &LiteralSpec, legacy: bool) -> Result<Self, EncodeError> {
        let prefix = spec.prefix_bytes()?;
        let pkt = if spec.len > 0 {
            let body = spec.body_len()?;
            let body = u32::try_from(body).map_err(|_| {
                EncodeError::PacketFormat("literal data too large for a declared length".into())
            })?;
            PacketStream::new(Tag::Literal, true, BodyLen::Fixed(body))?
        } else if legacy {
            PacketStream::new(Tag::Literal, true, BodyLen::Indeterminate)?
        } else {
            PacketStream::new(Tag::Literal, false, BodyLen::Partial)?
        };
        Ok(LiteralWriter {
            pkt,
            prefix: Some(prefix),
        })
    }

    pub fn write(&mut self, data: &[u8], out: &mut Vec<u8>) -> Result<(), EncodeError> {
        if let Some(prefix) = self.prefix.take() {
            self.pkt.write(&prefix, out)?;
        }
        self.pkt.write(data, out)
    }

    pub fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        if let Some(prefix) = self.prefix.take() {
            self.pkt.write(&prefix, out)?;
        }
        self.pkt.finish(out)
    }
}
