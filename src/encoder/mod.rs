// src/encoder/mod.rs

//! Message-level orchestration.
//!
//! The [`Encoder`] builds the transform stack appropriate to the mode
//! and drives one single-threaded, single-pass copy from source to
//! sink per message. Symmetric and store modes live in `simple`,
//! public-key encryption in `crypt`, the sequential batch driver in
//! `files`.

mod crypt;
mod files;
mod simple;

use std::io::{BufReader, Read, Write};

use tracing::warn;
use zeroize::Zeroize;

use crate::consts::COPY_BUFFER_SIZE;
use crate::error::EncodeError;
use crate::filter::{FilterStack, Transform};
use crate::options::Options;
use crate::packet::literal::{make_timestamp, LiteralSpec, LiteralWriter};
use crate::status::{NullStatus, StatusSink};

static NULL_STATUS: NullStatus = NullStatus;

/// Drives message encryption according to a set of [`Options`].
///
/// One value can encode any number of messages in sequence; the only
/// state carried across messages is the configuration itself (legacy
/// mode may be downgraded for the remainder of the run).
pub struct Encoder<'a> {
    pub(crate) opts: Options,
    pub(crate) status: &'a dyn StatusSink,
}

impl<'a> Encoder<'a> {
    pub fn new(opts: Options) -> Self {
        Encoder {
            opts,
            status: &NULL_STATUS,
        }
    }

    /// Attach a status sink receiving lifecycle events.
    pub fn with_status(mut self, status: &'a dyn StatusSink) -> Self {
        self.status = status;
        self
    }

    /// The effective options, including any legacy downgrade applied
    /// during this run.
    pub fn options(&self) -> &Options {
        &self.opts
    }
}

/// Decide what the literal packet declares and whether the cipher can
/// use a fixed declared length.
///
/// The probed file size is trusted only below the large-file
/// threshold and outside text mode; everything else streams. A
/// zero-byte file gets a warning, never an error.
pub(crate) fn plan_literal(
    opts: &Options,
    name: Option<String>,
    len: Option<u64>,
    from_file: bool,
    do_compress: bool,
) -> Result<(LiteralSpec, Option<u64>), EncodeError> {
    let filesize = if from_file && !opts.textmode {
        let probed = len.unwrap_or(0);
        if probed == 0 {
            warn!(file = name.as_deref().unwrap_or("[stdin]"), "empty file");
        }
        if probed >= opts.large_file_threshold {
            0
        } else {
            probed
        }
    } else {
        opts.set_filesize.unwrap_or(0)
    };

    let name = opts.set_filename.clone().or(name).unwrap_or_default();
    let spec = LiteralSpec {
        name,
        timestamp: make_timestamp(),
        text_mode: opts.textmode,
        len: filesize,
    };

    // a compressed body has no predictable size, and a streamed
    // literal none either; only the bare known-size case is fixed
    let datalen = if filesize != 0 && !do_compress {
        Some(if opts.no_literal {
            filesize
        } else {
            spec.packet_len()?
        })
    } else {
        None
    };
    Ok((spec, datalen))
}

/// The single streaming pass: read a bounded chunk (optionally through
/// the text filter's read path), wrap it in the literal packet unless
/// suppressed, and push it through the stack.
pub(crate) fn stream_plaintext<R: Read, W: Write>(
    stack: &mut FilterStack<W>,
    reader: &mut BufReader<R>,
    mut text: Option<Transform>,
    mut literal: Option<LiteralWriter>,
) -> Result<(), EncodeError> {
    let mut copy_buf = [0u8; COPY_BUFFER_SIZE];
    let mut total: u64 = 0;
    loop {
        let chunk = match text.as_mut() {
            Some(filter) => filter.underflow(reader)?,
            None => {
                let n = reader.read(&mut copy_buf)?;
                copy_buf[..n].to_vec()
            }
        };
        if chunk.is_empty() {
            break;
        }
        total += chunk.len() as u64;
        match literal.as_mut() {
            Some(writer) => {
                let mut bytes = Vec::with_capacity(chunk.len() + 16);
                writer.write(&chunk, &mut bytes)?;
                stack.write_all(&bytes)?;
            }
            None => stack.write_all(&chunk)?,
        }
    }
    if let Some(writer) = literal.as_mut() {
        let mut bytes = Vec::new();
        writer.finish(&mut bytes)?;
        stack.write_all(&bytes)?;
    } else if total == 0 {
        warn!("empty input");
    }
    copy_buf.zeroize();
    Ok(())
}
