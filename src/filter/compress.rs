//! Compression transform.
//!
//! Wraps the plaintext (usually an entire literal packet) in a
//! compressed-data packet. The deflate stream is produced
//! incrementally; the packet body is streamed with partial lengths, or
//! old-style indeterminate length in legacy mode, since the compressed
//! size is never known up front.

use std::io::Write;
use std::mem;

use flate2::write::{DeflateEncoder, ZlibEncoder};
use flate2::Compression;

use crate::algo::CompressAlgo;
use crate::error::EncodeError;
use crate::packet::length::{BodyLen, PacketStream};
use crate::packet::Tag;

enum Deflater {
    Zip(DeflateEncoder<Vec<u8>>),
    Zlib(ZlibEncoder<Vec<u8>>),
}

impl Deflater {
    fn write(&mut self, data: &[u8]) -> std::io::Result<()> {
        match self {
            Deflater::Zip(e) => e.write_all(data),
            Deflater::Zlib(e) => e.write_all(data),
        }
    }

    fn take_output(&mut self) -> Vec<u8> {
        match self {
            Deflater::Zip(e) => mem::take(e.get_mut()),
            Deflater::Zlib(e) => mem::take(e.get_mut()),
        }
    }

    fn finish(self) -> std::io::Result<Vec<u8>> {
        match self {
            Deflater::Zip(e) => e.finish(),
            Deflater::Zlib(e) => e.finish(),
        }
    }
}

/// Emits one compressed-data packet.
pub struct CompressFilter {
    algo: CompressAlgo,
    pkt: PacketStream,
    encoder: Option<Deflater>,
    started: bool,
}

impl CompressFilter {
    pub fn new(algo: CompressAlgo, legacy: bool) -> Result<Self, EncodeError> {
        let pkt = if legacy {
            PacketStream::new(Tag::Compressed, true, BodyLen::Indeterminate)?
        } else {
            PacketStream::new(Tag::Compressed, false, BodyLen::Partial)?
        };
        let encoder = match algo {
            CompressAlgo::Zip => Deflater::Zip(DeflateEncoder::new(Vec::new(), Compression::default())),
            CompressAlgo::Zlib => Deflater::Zlib(ZlibEncoder::new(Vec::new(), Compression::default())),
            CompressAlgo::Uncompressed => {
                return Err(EncodeError::Crypto(
                    "compress filter constructed without an algorithm".into(),
                ))
            }
        };
        Ok(CompressFilter {
            algo,
            pkt,
            encoder: Some(encoder),
            started: false,
        })
    }

    pub fn flush(&mut self, data: &[u8]) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::new();
        if !self.started {
            self.started = true;
            self.pkt.write(&[self.algo.id()], &mut out)?;
        }
        let encoder = self
            .encoder
            .as_mut()
            .ok_or_else(|| EncodeError::Crypto("compress filter used after finalize".into()))?;
        encoder.write(data)?;
        let produced = encoder.take_output();
        if !produced.is_empty() {
            self.pkt.write(&produced, &mut out)?;
        }
        Ok(out)
    }

    pub fn finalize(&mut self) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::new();
        if !self.started {
            self.started = true;
            self.pkt.write(&[self.algo.id()], &mut out)?;
        }
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| EncodeError::Crypto("compress filter finalized twice".into()))?;
        let tail = encoder.finish()?;
        if !tail.is_empty() {
            self.pkt.write(&tail, &mut out)?;
        }
        self.pkt.finish(&mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::DeflateDecoder;
    use std::io::Read;

    #[test]
    fn zip_packet_roundtrips_through_inflate() {
        let mut filter = CompressFilter::new(CompressAlgo::Zip, false).unwrap();
        let mut out = filter.flush(b"hello hello hello hello").unwrap();
        out.extend(filter.finalize().unwrap());

        // new-style tag 8, then chunked body: algo octet + deflate data
        assert_eq!(out[0], 0xC8);
        let body_len = out[1] as usize;
        let body = &out[2..2 + body_len];
        assert_eq!(body[0], CompressAlgo::Zip.id());
        let mut inflated = Vec::new();
        DeflateDecoder::new(&body[1..])
            .read_to_end(&mut inflated)
            .unwrap();
        assert_eq!(inflated, b"hello hello hello hello");
    }

    #[test]
    fn legacy_mode_uses_old_indeterminate_header() {
        let mut filter = CompressFilter::new(CompressAlgo::Zip, true).unwrap();
        let mut out = filter.flush(b"x").unwrap();
        out.extend(filter.finalize().unwrap());
        assert_eq!(out[0], 0xA3);
        assert_eq!(out[1], CompressAlgo::Zip.id());
    }

    #[test]
    fn uncompressed_is_not_a_valid_filter_algo() {
        assert!(CompressFilter::new(CompressAlgo::Uncompressed, false).is_err());
    }
}
