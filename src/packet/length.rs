//! Packet length encodings.
//!
//! Old-style headers carry the tag plus a 1/2/4-byte length (or no
//! length at all, running to end of stream). New-style headers add the
//! partial-length form: the body arrives as power-of-two chunks, each
//! with its own length octet, closed by one regular-length chunk.

use crate::consts::PARTIAL_CHUNK_SIZE;
use crate::error::EncodeError;

/// How a packet body's extent is declared on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyLen {
    /// Known up front; a fixed declared length.
    Fixed(u32),
    /// Unknown; streamed as new-style partial chunks.
    Partial,
    /// Unknown; old-style "runs to end of stream".
    Indeterminate,
}

/// Old-style cipher type byte: tag in bits 5..2, length type in 1..0.
pub fn old_ctb(tag: u8, lentype: u8) -> u8 {
    debug_assert!(tag <= 15 && lentype <= 3);
    0x80 | (tag << 2) | lentype
}

/// New-style cipher type byte.
pub fn new_ctb(tag: u8) -> u8 {
    debug_assert!(tag <= 63);
    0xC0 | tag
}

/// Smallest old-style length type for `len`, with its size in bytes.
pub fn old_len_size(len: u32) -> (u8, usize) {
    if len <= 0xFF {
        (0, 1)
    } else if len <= 0xFFFF {
        (1, 2)
    } else {
        (2, 4)
    }
}

/// Encode a new-style regular (non-partial) length.
pub fn encode_new_len(len: u32, out: &mut Vec<u8>) {
    if len < 192 {
        out.push(len as u8);
    } else if len < 8384 {
        let len = len - 192;
        out.push((len >> 8) as u8 + 192);
        out.push(len as u8);
    } else {
        out.push(0xFF);
        out.extend_from_slice(&len.to_be_bytes());
    }
}

const PARTIAL_LEN_OCTET: u8 = 0xE0 | PARTIAL_CHUNK_SIZE.trailing_zeros() as u8;

/// Incremental writer for one packet: header, body, trailer.
///
/// In partial mode the body buffers up to one chunk and emits each
/// full chunk with its partial-length octet; `finish` closes the
/// stream with a regular-length final chunk.
pub struct PacketStream {
    tag: u8,
    old_format: bool,
    len: BodyLen,
    started: bool,
    written: u64,
    buf: Vec<u8>,
}

impl PacketStream {
    pub fn new(tag: crate::packet::Tag, old_format: bool, len: BodyLen) -> Result<Self, EncodeError> {
        let tag = tag.value();
        let ok = match (old_format, len) {
            (true, BodyLen::Partial) => false,
            (true, _) => tag <= 15,
            (false, BodyLen::Indeterminate) => false,
            (false, _) => true,
        };
        if !ok {
            return Err(EncodeError::PacketFormat(format!(
                "tag {tag}: unsupported header/length combination"
            )));
        }
        Ok(PacketStream {
            tag,
            old_format,
            len,
            started: false,
            written: 0,
            buf: Vec::new(),
        })
    }

    fn start(&mut self, out: &mut Vec<u8>) {
        self.started = true;
        match (self.old_format, self.len) {
            (true, BodyLen::Fixed(n)) => {
                let (lentype, size) = old_len_size(n);
                out.push(old_ctb(self.tag, lentype));
                out.extend_from_slice(&n.to_be_bytes()[4 - size..]);
            }
            (true, _) => out.push(old_ctb(self.tag, 3)),
            (false, BodyLen::Fixed(n)) => {
                out.push(new_ctb(self.tag));
                encode_new_len(n, out);
            }
            // partial chunks carry their own length octets
            (false, _) => out.push(new_ctb(self.tag)),
        }
    }

    pub fn write(&mut self, data: &[u8], out: &mut Vec<u8>) -> Result<(), EncodeError> {
        if !self.started {
            self.start(out);
        }
        self.written += data.len() as u64;
        if self.len == BodyLen::Partial {
            self.buf.extend_from_slice(data);
            while self.buf.len() >= PARTIAL_CHUNK_SIZE {
                out.push(PARTIAL_LEN_OCTET);
                out.extend_from_slice(&self.buf[..PARTIAL_CHUNK_SIZE]);
                self.buf.drain(..PARTIAL_CHUNK_SIZE);
            }
        } else {
            out.extend_from_slice(data);
        }
        Ok(())
    }

    /// Emit the final chunk (partial mode) and close the packet.
    pub fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        if !self.started {
            self.start(out);
        }
        if self.len == BodyLen::Partial {
            encode_new_len(self.buf.len() as u32, out);
            out.append(&mut self.buf);
        } else if let BodyLen::Fixed(n) = self.len {
            if self.written != n as u64 {
                tracing::warn!(
                    tag = self.tag,
                    declared = n,
                    written = self.written,
                    "packet body length mismatch"
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::Tag;

    #[test]
    fn new_length_encodings() {
        let cases: &[(u32, &[u8])] = &[
            (0, &[0x00]),
            (100, &[0x64]),
            (191, &[0xBF]),
            (192, &[0xC0, 0x00]),
            (8383, &[0xDF, 0xFF]),
            (8384, &[0xFF, 0x00, 0x00, 0x20, 0xC0]),
        ];
        for &(len, expected) in cases {
            let mut out = Vec::new();
            encode_new_len(len, &mut out);
            assert_eq!(out, expected, "len {len}");
        }
    }

    #[test]
    fn old_length_types() {
        assert_eq!(old_len_size(0xFF), (0, 1));
        assert_eq!(old_len_size(0x100), (1, 2));
        assert_eq!(old_len_size(0x10000), (2, 4));
    }

    #[test]
    fn partial_stream_chunks_and_closes() {
        let mut pkt = PacketStream::new(Tag::Literal, false, BodyLen::Partial).unwrap();
        let mut out = Vec::new();
        pkt.write(&vec![0x11; PARTIAL_CHUNK_SIZE + 10], &mut out).unwrap();
        // new ctb, one full chunk with partial octet, remainder buffered
        assert_eq!(out[0], 0xCB);
        assert_eq!(out[1], PARTIAL_LEN_OCTET);
        assert_eq!(out.len(), 2 + PARTIAL_CHUNK_SIZE);
        pkt.finish(&mut out).unwrap();
        assert_eq!(out[2 + PARTIAL_CHUNK_SIZE], 10);
        assert_eq!(out.len(), 2 + PARTIAL_CHUNK_SIZE + 1 + 10);
    }

    #[test]
    fn small_partial_stream_degenerates_to_final_chunk() {
        let mut pkt = PacketStream::new(Tag::Compressed, false, BodyLen::Partial).unwrap();
        let mut out = Vec::new();
        pkt.write(b"abc", &mut out).unwrap();
        pkt.finish(&mut out).unwrap();
        assert_eq!(out, vec![0xC8, 3, b'a', b'b', b'c']);
    }

    #[test]
    fn indeterminate_old_header_has_no_length() {
        let mut pkt = PacketStream::new(Tag::Compressed, true, BodyLen::Indeterminate).unwrap();
        let mut out = Vec::new();
        pkt.write(b"zz", &mut out).unwrap();
        pkt.finish(&mut out).unwrap();
        assert_eq!(out, vec![0xA3, b'z', b'z']);
    }

    #[test]
    fn invalid_combinations_are_rejected() {
        assert!(PacketStream::new(Tag::Literal, true, BodyLen::Partial).is_err());
        assert!(PacketStream::new(Tag::Literal, false, BodyLen::Indeterminate).is_err());
        assert!(PacketStream::new(Tag::SymEncryptedMdc, true, BodyLen::Fixed(1)).is_err());
    }
}
