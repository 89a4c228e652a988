//! Text canonicalization (input side).
//!
//! Rewrites line endings to CR+LF before the plaintext enters the
//! literal packet, so text-mode messages look the same regardless of
//! the producing platform. Runs on the read path: the composer pulls
//! normalized chunks out of the source instead of pushing into the
//! output stack.

use std::io::Read;

use crate::consts::COPY_BUFFER_SIZE;
use crate::error::EncodeError;

/// Line-ending canonicalizer. A bare `\r` at a chunk boundary is held
/// back until the next byte decides whether it starts a CR+LF pair.
pub struct TextFilter {
    pending_cr: bool,
}

impl TextFilter {
    pub fn new() -> Self {
        TextFilter { pending_cr: false }
    }

    /// Pull the next normalized chunk from `src`; empty means EOF and
    /// all held-back state has been drained.
    pub fn underflow(&mut self, src: &mut dyn Read) -> Result<Vec<u8>, EncodeError> {
        let mut raw = [0u8; COPY_BUFFER_SIZE];
        loop {
            let n = src.read(&mut raw)?;
            if n == 0 {
                return Ok(self.finalize());
            }
            let out = self.normalize(&raw[..n]);
            if !out.is_empty() {
                return Ok(out);
            }
        }
    }

    fn normalize(&mut self, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(data.len() + data.len() / 8);
        for &b in data {
            if self.pending_cr {
                self.pending_cr = false;
                if b == b'\n' {
                    out.extend_from_slice(b"\r\n");
                    continue;
                }
                out.push(b'\r');
            }
            match b {
                b'\r' => self.pending_cr = true,
                b'\n' => out.extend_from_slice(b"\r\n"),
                other => out.push(other),
            }
        }
        out
    }

    /// Drain a held-back carriage return, if any.
    pub fn finalize(&mut self) -> Vec<u8> {
        if std::mem::take(&mut self.pending_cr) {
            vec![b'\r']
        } else {
            Vec::new()
        }
    }
}

impl Default for TextFilter {
    fn default() -> Self {
        Self::new()
    }
}
