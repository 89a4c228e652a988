//! ASCII armor transform.
//!
//! Radix-64 framing for transports that cannot carry binary: header
//! line, 64-column encoded body, CRC-24 line, footer. Always the
//! outermost transform — it must see the final encrypted bytes.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::EncodeError;

const HEADER: &[u8] = b"-----BEGIN PGP MESSAGE-----\n\n";
const FOOTER: &[u8] = b"-----END PGP MESSAGE-----\n";
/// Input bytes per armor line (encodes to 64 columns).
const LINE_BYTES: usize = 48;

const CRC24_INIT: u32 = 0x00B7_04CE;
const CRC24_POLY: u32 = 0x0186_4CFB;

fn crc24(mut crc: u32, data: &[u8]) -> u32 {
    for &b in data {
        crc ^= (b as u32) << 16;
        for _ in 0..8 {
            crc <<= 1;
            if crc & 0x0100_0000 != 0 {
                crc ^= CRC24_POLY;
            }
        }
    }
    crc & 0x00FF_FFFF
}

/// Encodes the binary message into armored text.
pub struct ArmorFilter {
    started: bool,
    crc: u32,
    pending: Vec<u8>,
}

impl ArmorFilter {
    pub fn new() -> Self {
        ArmorFilter {
            started: false,
            crc: CRC24_INIT,
            pending: Vec::with_capacity(LINE_BYTES),
        }
    }

    pub fn flush(&mut self, data: &[u8]) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::new();
        if !self.started {
            self.started = true;
            out.extend_from_slice(HEADER);
        }
        self.crc = crc24(self.crc, data);
        self.pending.extend_from_slice(data);
        let full = self.pending.len() - self.pending.len() % LINE_BYTES;
        for line in self.pending[..full].chunks(LINE_BYTES) {
            out.extend_from_slice(STANDARD.encode(line).as_bytes());
            out.push(b'\n');
        }
        self.pending.drain(..full);
        Ok(out)
    }

    pub fn finalize(&mut self) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::new();
        if !self.started {
            self.started = true;
            out.extend_from_slice(HEADER);
        }
        if !self.pending.is_empty() {
            out.extend_from_slice(STANDARD.encode(&self.pending).as_bytes());
            out.push(b'\n');
            self.pending.clear();
        }
        let crc_bytes = [
            (self.crc >> 16) as u8,
            (self.crc >> 8) as u8,
            self.crc as u8,
        ];
        out.push(b'=');
        out.extend_from_slice(STANDARD.encode(crc_bytes).as_bytes());
        out.push(b'\n');
        out.extend_from_slice(FOOTER);
        Ok(out)
    }
}

impl Default for ArmorFilter {
    fn default() -> Self {
        Self::new()
    }
}
